// Error types for the simulation layer.
//
// Level construction and lock errors pass through from `ledgewalk_level`.
// Pathfinding failures are not errors here: an enemy that cannot plan a
// route simply waits and tries another destination.

use ledgewalk_level::{LevelError, Vec2};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Level(#[from] LevelError),

    #[error("spawn position {0} is not on any floor")]
    SpawnOffGraph(Vec2),

    #[error("invalid sim config: {0}")]
    Config(#[from] serde_json::Error),
}
