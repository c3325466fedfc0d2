// Random navigable positions for wandering enemies.
//
// Picks a random joint, then random slots on that joint until an occupied
// one turns up, then a random point along that connection. Every draw
// (joint or slot) counts against `LevelConfig::random_position_attempts`.
// When the budget runs out, the result is `None` and the caller should try
// again on a later tick.
//
// Randomness comes from any `rand::Rng` the caller owns; the sim passes its
// seeded `StdRng`, so wandering is reproducible from the seed.

use crate::geometry::{ConnectionKind, LevelGeometry, SLOTS_PER_JOINT, Side};
use crate::types::Vec2;
use rand::Rng;

/// Sample a point on a random edge of the joint graph.
pub fn random_navigable_position<R: Rng>(
    level: &LevelGeometry,
    rng: &mut R,
) -> Option<Vec2> {
    let budget = level.config().random_position_attempts;
    let joint_count = level.joint_count();
    let mut attempts = 0u32;

    while attempts < budget {
        let joint = &level.joints()[rng.random_range(0..joint_count)];
        attempts += 1;

        // Keep drawing slots on this joint until one is occupied or the
        // budget is gone. A joint with no connections at all is abandoned
        // immediately.
        if joint.slots().next().is_none() {
            continue;
        }
        while attempts < budget {
            let slot = rng.random_range(0..SLOTS_PER_JOINT);
            attempts += 1;
            let side = Side::ALL[slot / ConnectionKind::ALL.len()];
            let kind = ConnectionKind::ALL[slot % ConnectionKind::ALL.len()];
            if let Some(conn) = joint.connection(side, kind) {
                let t: f32 = rng.random();
                let target = level.joint(conn.target).position;
                return Some(joint.position.lerp(target, t));
            }
        }
    }

    tracing::warn!(budget, "random navigable position exhausted its attempts");
    None
}
