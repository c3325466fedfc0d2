// Tunable parameters for level queries.
//
// `LevelConfig` is loaded from JSON alongside the game config and copied
// into `LevelGeometry` at construction; it is never mutated afterwards.
// Floor containment uses an absolute tolerance instead of exact float
// equality, so ramp points produced by interpolation still count as "on"
// the floor.

use serde::{Deserialize, Serialize};

/// Parameters that affect geometric queries and random sampling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Absolute tolerance for floor containment, in world units: how far a
    /// point may sit off a floor line (or past its ends) and still count as
    /// on it.
    pub epsilon: f32,

    /// Total number of joint/slot draws `random_navigable_position` may make
    /// before giving up and returning `None`.
    pub random_position_attempts: u32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-3,
            random_position_attempts: 64,
        }
    }
}
