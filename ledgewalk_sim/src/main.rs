// ledgewalk: headless runner for the platformer simulation.
//
// Loads a level (the built-in demo level by default), spawns the player and
// a handful of enemies, and runs a fixed number of 60 Hz ticks with a
// scripted input that paces the player back and forth. Progress and the
// final state are reported through `tracing`.
//
// Usage:
//   cargo run -p ledgewalk_sim -- [--level FILE] [--config FILE] [--ticks N]
//     [--seed N] [--enemies N] [--log-level FILTER]

use anyhow::{Context, Result, bail};
use clap::Parser;
use ledgewalk_level::{Vec2, random_navigable_position};
use ledgewalk_sim::logging::init_tracing;
use ledgewalk_sim::{DEMO_LEVEL, MoveInput, SimConfig, SimState};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

const TICK_SECS: f32 = 1.0 / 60.0;

/// Headless 2D platformer navigation sandbox
#[derive(Parser, Debug)]
#[command(name = "ledgewalk")]
#[command(about = "Run the platformer simulation headless and log what happens", long_about = None)]
struct Args {
    /// Level JSON file (defaults to the built-in demo level)
    #[arg(long)]
    level: Option<PathBuf>,

    /// Sim config JSON file (defaults to built-in tuning)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(long, default_value = "600")]
    ticks: u64,

    /// PRNG seed
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Number of enemies to spawn at random positions
    #[arg(long, default_value = "3")]
    enemies: usize,

    /// Log filter (trace, debug, info, warn, error, or an EnvFilter directive)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Player spawn x; the player starts on the first floor found at this x
    #[arg(long, default_value = "100")]
    player_x: f32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SimConfig::from_json(&json).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SimConfig::default(),
    };

    let level_json = match &args.level {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading level {}", path.display()))?,
        None => DEMO_LEVEL.to_owned(),
    };

    let mut sim = SimState::from_level_json(&level_json, config, args.seed)
        .context("building level")?;
    let (min, max) = sim.level.extents();
    tracing::info!(
        joints = sim.level.joint_count(),
        floors = sim.level.floors().count(),
        %min,
        %max,
        "level loaded"
    );

    let spawn = player_spawn(&sim, args.player_x)?;
    sim.spawn_player(spawn)?;

    // Enemy placement uses its own stream so the sim's stream depends only
    // on the seed and what happens during ticks.
    let mut placement_rng = StdRng::seed_from_u64(args.seed.wrapping_add(1));
    for _ in 0..args.enemies {
        let Some(position) = random_navigable_position(&sim.level, &mut placement_rng) else {
            tracing::warn!("could not find an enemy spawn position; skipping");
            continue;
        };
        sim.spawn_enemy(position)?;
    }

    for tick in 0..args.ticks {
        sim.step(scripted_input(tick), TICK_SECS);
        if tick % 60 == 59
            && let Some(player) = &sim.player
        {
            tracing::debug!(tick = sim.tick, position = %player.position, falling = player.is_falling(), "player");
        }
    }

    if let Some(player) = &sim.player {
        tracing::info!(
            ticks = sim.tick,
            secs = sim.time,
            position = %player.position,
            floor = ?player.floor(),
            "player final state"
        );
    }
    for (i, enemy) in sim.enemies.iter().enumerate() {
        tracing::info!(
            enemy = i,
            position = %enemy.position,
            destination = ?enemy.destination,
            "enemy final state"
        );
    }
    Ok(())
}

/// Lowest floor point (largest y) at `x`, so the player starts on the ground.
fn player_spawn(sim: &SimState, x: f32) -> Result<Vec2> {
    let spawn = sim
        .level
        .floors()
        .map(|floor| sim.level.segment(floor))
        .filter(|segment| segment.contains_x(x))
        .map(|segment| segment.point_at(x))
        .max_by(|a, b| a.y.total_cmp(&b.y));
    match spawn {
        Some(position) => Ok(position),
        None => bail!("no floor spans x = {x}; pass a different --player-x"),
    }
}

/// Walk right for four seconds, then left for four, holding down on the way
/// back so ledges with drops are taken.
fn scripted_input(tick: u64) -> MoveInput {
    if (tick / 240) % 2 == 0 {
        MoveInput::new(1.0, 0.0)
    } else {
        MoveInput::new(-1.0, 1.0)
    }
}
