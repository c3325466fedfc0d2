// Property tests for floor construction, containment, and the resolver.
//
// These hold for any joint placement, not just the hand-built levels in the
// unit tests: floors are x-ordered and symmetric, every point interpolated
// along a floor is on that floor, and an entity standing still inside a
// floor stays exactly where it is.

use ledgewalk_level::{
    ConnectionKind, Joint, JointId, LevelConfig, LevelGeometry, Side, Vec2,
    resolve_floor_movement,
};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f32> {
    -500.0f32..500.0
}

fn point() -> impl Strategy<Value = Vec2> {
    (coord(), coord()).prop_map(|(x, y)| Vec2::new(x, y))
}

/// Two joints, 0 linked to 1 with a right-hand straight connection.
fn pair(a: Vec2, b: Vec2) -> LevelGeometry {
    let joints = vec![
        Joint::new(a).with(Side::Right, ConnectionKind::Straight, JointId(1)),
        Joint::new(b).with(Side::Left, ConnectionKind::Straight, JointId(0)),
    ];
    LevelGeometry::new(joints, &LevelConfig::default()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_floor_is_x_ordered_and_symmetric(
        points in prop::collection::vec(point(), 2..12),
        i in any::<prop::sample::Index>(),
        j in any::<prop::sample::Index>(),
    ) {
        let a = JointId(i.index(points.len()) as u32);
        let b = JointId(j.index(points.len()) as u32);
        let joints: Vec<Joint> = points.iter().copied().map(Joint::new).collect();
        let level = LevelGeometry::new(joints, &LevelConfig::default()).unwrap();

        let floor = level.floor(a, b);
        prop_assert!(
            level.joint(floor.left).position.x <= level.joint(floor.right).position.x,
            "floor {floor:?} is not x-ordered"
        );
        prop_assert_eq!(floor, level.floor(b, a));
    }

    #[test]
    fn prop_interpolated_points_are_on_their_floor(
        a in point(),
        b in point(),
        t in 0.0f32..=1.0,
    ) {
        let level = pair(a, b);
        let floor = level.floor(JointId(0), JointId(1));
        let p = a.lerp(b, t);
        prop_assert!(
            level.floor_contains_point(floor, p),
            "{p} at t={t} not on floor {a} -> {b}"
        );
    }

    #[test]
    fn prop_standing_still_does_not_drift(
        left in point(),
        width in 1.0f32..400.0,
        rise in -200.0f32..200.0,
        frac in 0.01f32..0.99,
    ) {
        let right = Vec2::new(left.x + width, left.y + rise);
        let level = pair(left, right);
        let floor = level.floor(JointId(0), JointId(1));
        let start = level.segment(floor).point_at(left.x + width * frac);

        let first = resolve_floor_movement(&level, start, floor, Vec2::ZERO);
        prop_assert!(!first.falling && !first.blocked);
        prop_assert_eq!(first.new_floor, floor);

        let mut position = first.desired_position;
        for _ in 0..10 {
            let next = resolve_floor_movement(&level, position, floor, Vec2::ZERO);
            prop_assert_eq!(next.desired_position, first.desired_position);
            prop_assert_eq!(next.new_floor, floor);
            position = next.desired_position;
        }
    }
}
