// Error types for level construction and pathfinding.
//
// Level data problems (dangling joint references, fall connections with no
// landing floor) are caught once, when `LevelGeometry` is built, so the
// per-tick movement and search code never has to fail on bad data.
// Pathfinding has a single recoverable failure: an endpoint that lies on no
// floor. "No path" is not an error and is reported as an empty waypoint list.

use crate::geometry::{ConnectionKind, Side};
use crate::types::{JointId, Vec2};
use thiserror::Error;

/// Problems detected while loading or editing level geometry.
#[derive(Error, Debug)]
pub enum LevelError {
    #[error("level has no joints")]
    Empty,

    #[error("{joint} {side:?}.{kind:?} points at {target}, but the level only has {joint_count} joints")]
    DanglingConnection {
        joint: JointId,
        side: Side,
        kind: ConnectionKind,
        target: JointId,
        joint_count: usize,
    },

    #[error("{joint} {side:?}.{kind:?} connects the joint to itself")]
    SelfConnection {
        joint: JointId,
        side: Side,
        kind: ConnectionKind,
    },

    #[error("{joint} {side:?}.fall lands on {target}, which has no straight connection to form a landing floor")]
    UnresolvedFallLanding {
        joint: JointId,
        side: Side,
        target: JointId,
    },

    #[error("{0} does not exist")]
    UnknownJoint(JointId),

    #[error("{joint} has no {side:?}.{kind:?} connection")]
    MissingConnection {
        joint: JointId,
        side: Side,
        kind: ConnectionKind,
    },

    #[error("invalid level data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Precondition failures of `pathfind`.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PathfindError {
    #[error("start point {0} is not on any floor")]
    StartOffGraph(Vec2),

    #[error("end point {0} is not on any floor")]
    EndOffGraph(Vec2),
}
