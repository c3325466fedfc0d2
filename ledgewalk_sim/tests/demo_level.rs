// Scenario tests over the shipped demo level.
//
// Layout (y down):
//
//                                      7 ---------- 8   (y = 200)
//                                     / stairs
//              3 ------ 4 -door- 5 --'              (y = 350)
//             / ramp             : fall
//   0 ------ 1 --------------- 2 ---- 6              (y = 500)

use ledgewalk_level::{ConnectionKind, Floor, JointId, Side, Vec2};
use ledgewalk_sim::{DEMO_LEVEL, MoveInput, SimConfig, SimState};

const DT: f32 = 1.0 / 60.0;

fn demo(seed: u64) -> SimState {
    SimState::from_level_json(DEMO_LEVEL, SimConfig::default(), seed).unwrap()
}

fn run(sim: &mut SimState, input: MoveInput, ticks: usize) {
    for _ in 0..ticks {
        sim.step(input, DT);
    }
}

#[test]
fn demo_level_loads() {
    let sim = demo(0);
    assert_eq!(sim.level.joint_count(), 9);
    assert_eq!(
        sim.level.extents(),
        (Vec2::new(0.0, 200.0), Vec2::new(1200.0, 500.0))
    );
}

#[test]
fn holding_up_climbs_ramp_and_stairs_to_the_top() {
    let mut sim = demo(0);
    sim.spawn_player(Vec2::new(100.0, 500.0)).unwrap();
    run(&mut sim, MoveInput::new(1.0, -1.0), 600);

    let player = sim.player.as_ref().unwrap();
    assert_eq!(player.position, Vec2::new(1200.0, 200.0));
    assert_eq!(
        player.floor(),
        Some(Floor {
            left: JointId(7),
            right: JointId(8)
        })
    );
}

#[test]
fn holding_down_at_the_ledge_drops_to_the_ground() {
    let mut sim = demo(0);
    sim.spawn_player(Vec2::new(700.0, 350.0)).unwrap();

    let mut fell = false;
    for _ in 0..120 {
        sim.step(MoveInput::new(1.0, 1.0), DT);
        fell |= sim.player.as_ref().unwrap().is_falling();
    }
    assert!(fell, "player never fell");

    let player = sim.player.as_ref().unwrap();
    assert!(!player.is_falling());
    assert_eq!(player.position.y, 500.0);
    assert_eq!(
        player.floor(),
        Some(Floor {
            left: JointId(2),
            right: JointId(6)
        })
    );

    run(&mut sim, MoveInput::new(1.0, 1.0), 120);
    assert_eq!(sim.player.as_ref().unwrap().position, Vec2::new(900.0, 500.0));
}

#[test]
fn walking_level_at_the_ledge_stops_at_the_edge() {
    let mut sim = demo(0);
    sim.spawn_player(Vec2::new(700.0, 350.0)).unwrap();
    run(&mut sim, MoveInput::new(1.0, 0.0), 120);
    let player = sim.player.as_ref().unwrap();
    assert!(!player.is_falling());
    assert_eq!(player.position, Vec2::new(800.0, 350.0));
}

#[test]
fn locked_door_stops_the_player() {
    let mut sim = demo(0);
    sim.set_connection_lock(JointId(4), Side::Right, ConnectionKind::Straight, true)
        .unwrap();
    sim.spawn_player(Vec2::new(500.0, 350.0)).unwrap();
    run(&mut sim, MoveInput::new(1.0, 0.0), 120);
    assert_eq!(sim.player.as_ref().unwrap().position, Vec2::new(650.0, 350.0));
}

#[test]
fn enemies_wander_without_leaving_the_graph() {
    let mut sim = demo(3);
    for x in [50.0, 600.0, 1000.0] {
        let y = if x < 1000.0 { 500.0 } else { 200.0 };
        sim.spawn_enemy(Vec2::new(x, y)).unwrap();
    }
    sim.spawn_enemy(Vec2::new(500.0, 350.0)).unwrap();

    let start: Vec<Vec2> = sim.enemies.iter().map(|e| e.position).collect();
    for tick in 0..3600 {
        sim.step(MoveInput::NONE, DT);
        for (i, enemy) in sim.enemies.iter().enumerate() {
            assert!(
                sim.level.find_floor(enemy.position).is_some(),
                "tick {tick}: enemy {i} at {} is off the graph",
                enemy.position
            );
        }
    }
    let moved = sim
        .enemies
        .iter()
        .zip(&start)
        .filter(|(enemy, start)| enemy.position.distance(**start) > 1.0)
        .count();
    assert!(moved > 0, "no enemy moved in a minute of sim time");
}

#[test]
fn same_seed_same_run() {
    let run_once = |seed| {
        let mut sim = demo(seed);
        sim.spawn_player(Vec2::new(100.0, 500.0)).unwrap();
        sim.spawn_enemy(Vec2::new(50.0, 500.0)).unwrap();
        sim.spawn_enemy(Vec2::new(1000.0, 200.0)).unwrap();
        for tick in 0..1200u32 {
            let dir = if (tick / 200) % 2 == 0 { 1.0 } else { -1.0 };
            sim.step(MoveInput::new(dir, 0.0), DT);
        }
        (sim.player.unwrap(), sim.enemies)
    };
    assert_eq!(run_once(17), run_once(17));
}
