// The player: input-driven walking over floors, plus gravity falls.
//
// While grounded, each tick turns the input into a movement vector and hands
// it to `resolve_floor_movement()`. The horizontal part is scaled by speed
// and delta; only the sign of the vertical part matters to the resolver
// (negative = up, since y grows downward), and it picks which connection to
// take at a floor end.
//
// When the resolver reports a fall, the player leaves the floor graph. The
// fall target and landing floor are stored, downward speed ramps linearly
// from zero to `player_max_fall_speed` over `player_time_to_max_fall_speed`,
// and x drifts toward the target at walking speed. Once the player reaches
// the target's height they snap onto the landing floor and walk again.
//
// See also: `ledgewalk_level::movement` for the resolver itself.

use crate::config::SimConfig;
use crate::error::SimError;
use ledgewalk_level::{Floor, LevelGeometry, Vec2, resolve_floor_movement};
use serde::{Deserialize, Serialize};

/// One tick of player input. Each axis is in `[-1, 1]`; `vertical < 0`
/// means "up" (screen space).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveInput {
    pub horizontal: f32,
    pub vertical: f32,
}

impl MoveInput {
    pub const NONE: MoveInput = MoveInput {
        horizontal: 0.0,
        vertical: 0.0,
    };

    pub fn new(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal: horizontal.clamp(-1.0, 1.0),
            vertical: vertical.clamp(-1.0, 1.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PlayerState {
    Grounded {
        floor: Floor,
    },
    Falling {
        /// Fall target joint position.
        target: Vec2,
        /// Floor to stand on once the target height is reached.
        landing: Floor,
        /// Seconds since the fall started.
        elapsed: f32,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec2,
    pub state: PlayerState,
}

impl Player {
    /// Place the player on whichever floor contains `position`.
    pub fn spawn(level: &LevelGeometry, position: Vec2) -> Result<Self, SimError> {
        let floor = level
            .find_floor(position)
            .ok_or(SimError::SpawnOffGraph(position))?;
        Ok(Self {
            position,
            state: PlayerState::Grounded { floor },
        })
    }

    /// The floor the player is standing on, or `None` mid-fall.
    pub fn floor(&self) -> Option<Floor> {
        match self.state {
            PlayerState::Grounded { floor } => Some(floor),
            PlayerState::Falling { .. } => None,
        }
    }

    pub fn is_falling(&self) -> bool {
        matches!(self.state, PlayerState::Falling { .. })
    }

    pub fn update_movement(
        &mut self,
        level: &LevelGeometry,
        config: &SimConfig,
        input: MoveInput,
        delta: f32,
    ) {
        match self.state {
            PlayerState::Grounded { floor } => self.walk(level, config, floor, input, delta),
            PlayerState::Falling {
                target,
                landing,
                elapsed,
            } => self.fall(level, config, target, landing, elapsed + delta, delta),
        }
    }

    fn walk(
        &mut self,
        level: &LevelGeometry,
        config: &SimConfig,
        floor: Floor,
        input: MoveInput,
        delta: f32,
    ) {
        let step = config.player_speed * delta;
        let movement = Vec2::new(input.horizontal * step, input.vertical * step);
        let result = resolve_floor_movement(level, self.position, floor, movement);

        if result.falling {
            tracing::debug!(from = %self.position, target = %result.desired_position, "player started falling");
            self.state = PlayerState::Falling {
                target: result.desired_position,
                landing: result.new_floor,
                elapsed: 0.0,
            };
            return;
        }

        self.position = result.desired_position;
        self.state = PlayerState::Grounded {
            floor: result.new_floor,
        };
    }

    fn fall(
        &mut self,
        level: &LevelGeometry,
        config: &SimConfig,
        target: Vec2,
        landing: Floor,
        elapsed: f32,
        delta: f32,
    ) {
        let drift = config.player_speed * delta;
        let dx = (target.x - self.position.x).clamp(-drift, drift);
        self.position.x += dx;
        self.position.y += config.fall_speed_at(elapsed) * delta;

        if self.position.y >= target.y {
            self.position = level.segment(landing).point_at(self.position.x);
            self.state = PlayerState::Grounded { floor: landing };
            tracing::debug!(at = %self.position, "player landed");
        } else {
            self.state = PlayerState::Falling {
                target,
                landing,
                elapsed,
            };
        }
    }
}
