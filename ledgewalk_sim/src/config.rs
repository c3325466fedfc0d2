// Data-driven simulation configuration.
//
// All movement tuning lives in `SimConfig`, loaded from JSON (or defaulted).
// Speeds are in world units per second; times are in seconds. The nested
// `LevelConfig` is handed to `LevelGeometry` when the level is built, so one
// file tunes both the geometry queries and the entities walking over them.
//
// See also: `player.rs` and `enemy.rs`, which read these values every tick.

use crate::error::SimError;
use ledgewalk_level::LevelConfig;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Horizontal walking speed of the player.
    pub player_speed: f32,

    /// Terminal downward speed while falling.
    pub player_max_fall_speed: f32,

    /// Time taken to accelerate linearly from rest to `player_max_fall_speed`.
    pub player_time_to_max_fall_speed: f32,

    /// Speed at which enemies follow their waypoints.
    pub enemy_speed: f32,

    /// How long an enemy idles after reaching (or failing to reach) a
    /// destination before picking a new one.
    pub enemy_pathing_wait_secs: f64,

    /// An enemy within this distance of its current waypoint snaps onto it.
    pub waypoint_arrival_radius: f32,

    pub level: LevelConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            player_speed: 200.0,
            player_max_fall_speed: 800.0,
            player_time_to_max_fall_speed: 0.25,
            enemy_speed: 100.0,
            enemy_pathing_wait_secs: 1.5,
            waypoint_arrival_radius: 0.5,
            level: LevelConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Downward speed after falling for `elapsed` seconds.
    pub fn fall_speed_at(&self, elapsed: f32) -> f32 {
        if self.player_time_to_max_fall_speed <= 0.0 {
            return self.player_max_fall_speed;
        }
        let ramp = (elapsed / self.player_time_to_max_fall_speed).clamp(0.0, 1.0);
        self.player_max_fall_speed * ramp
    }
}
