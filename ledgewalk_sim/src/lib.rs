// ledgewalk_sim: headless platformer simulation over `ledgewalk_level`.
//
// Drives entities across a level: the player walks under input and falls
// under gravity, enemies wander between random destinations along A*
// routes. Rendering, input devices, and frame timing live elsewhere; this
// crate only sees a `MoveInput` and a `delta` per tick.
//
// Module overview:
// - `sim.rs`:     SimState: owns level, entities, pathfinder, PRNG; the tick loop.
// - `player.rs`:  Player walking (via the floor resolver) and falling.
// - `enemy.rs`:   Enemy waypoint following, idle wait, random destinations.
// - `config.rs`:  SimConfig: speeds, fall ramp, wait time, nested LevelConfig.
// - `logging.rs`: tracing-subscriber setup for the binary and tests.
// - `error.rs`:   SimError.
//
// All randomness comes from one `StdRng` seeded at construction, so a run
// is reproducible from `(level, config, seed, inputs)`.

pub mod config;
pub mod enemy;
pub mod error;
pub mod logging;
pub mod player;
pub mod sim;

/// The level shipped with the crate, used when no level file is given.
pub const DEMO_LEVEL: &str = include_str!("../levels/demo.json");

pub use config::SimConfig;
pub use enemy::Enemy;
pub use error::SimError;
pub use player::{MoveInput, Player, PlayerState};
pub use sim::SimState;
