// ledgewalk_level: level geometry and navigation for a 2D platformer.
//
// A level is a flat array of joints (points in screen space, y growing
// downward). Each joint owns up to eight typed connection slots, four per
// side: up, straight, down, fall. Any two connected joints form a walkable
// floor. This crate owns that topology and everything that can be asked of
// it: floor queries, per-tick floor-transition resolution, A* pathfinding,
// random navigable positions, and connection locks. It holds no entity
// state and has no notion of time; the companion crate `ledgewalk_sim`
// drives players and enemies over it.
//
// Module overview:
// - `geometry.rs`:    Joint, connection slots, LevelGeometry (validation, extents, locks, JSON loading).
// - `floor.rs`:       Floor / Segment, flatness, containment, find_floor(), landing floors.
// - `nav.rs`:         NavGraph: one node per joint, one undirected edge per connected pair.
// - `pathfinding.rs`: A* over the nav graph with reusable scratch buffers.
// - `movement.rs`:    resolve_floor_movement(): walking, climbing, blocking, and falling off floor ends.
// - `wander.rs`:      random_navigable_position() for wandering enemies.
// - `config.rs`:      LevelConfig (tolerance, sampling budget).
// - `error.rs`:       LevelError / PathfindError.
// - `types.rs`:       Vec2 and JointId.
//
// **Determinism.** Nothing here reads the clock or OS entropy. Randomness is
// injected as a caller-owned `rand::Rng`, and every scan (floor lookup, A*
// tie-breaking, nav edge order) follows joint index order, so identical
// inputs give identical outputs.

pub mod config;
pub mod error;
pub mod floor;
pub mod geometry;
pub mod movement;
pub mod nav;
pub mod pathfinding;
pub mod types;
pub mod wander;

pub use config::LevelConfig;
pub use error::{LevelError, PathfindError};
pub use floor::{Floor, Segment};
pub use geometry::{Connection, ConnectionKind, Joint, LevelData, LevelGeometry, Side};
pub use movement::{FloorMovement, VerticalIntent, resolve_floor_movement};
pub use pathfinding::Pathfinder;
pub use types::{JointId, Vec2};
pub use wander::random_navigable_position;
