// Level geometry: the static joint graph that every walkable surface is
// derived from.
//
// A `Joint` is a point in world space with two sides (left, right), each
// holding four typed connection slots (up, straight, down, fall). A slot is
// either empty or a `Connection` to another joint, and every connection
// carries its own `locked` flag so doors can close a passage without
// changing the topology. Walkable segments ("floors") are never stored;
// they are derived from connected joint pairs (see `floor.rs`).
//
// `LevelGeometry` owns the joint arena, the axis-aligned extents of all joint
// positions, and the navigation graph (`nav.rs`) mirroring joint
// connectivity. It is built once per level by `LevelGeometry::new()`, which
// also validates the data: connection targets must exist, a joint may not
// connect to itself, and every fall connection must land on a resolvable
// floor. After construction only lock flags change.
//
// See also: `floor.rs` for floors and point queries, `movement.rs` for the
// floor resolver, `pathfinding.rs` for A* over `NavGraph`, `wander.rs` for
// random destinations.

use crate::config::LevelConfig;
use crate::error::LevelError;
use crate::nav::NavGraph;
use crate::types::{JointId, Vec2};
use serde::{Deserialize, Serialize};

/// Number of connection slots on one joint (4 kinds x 2 sides).
pub const SLOTS_PER_JOINT: usize = ConnectionKind::ALL.len() * Side::ALL.len();

/// Which side of a joint a connection leaves from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];
}

/// The kind of transition a connection represents. Chosen by the floor
/// resolver from the entity's vertical intent when it leaves a floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionKind {
    /// Ramp or stairs going up (smaller y).
    Up,
    /// Level continuation.
    Straight,
    /// Ramp or stairs going down (larger y).
    Down,
    /// One-way drop. The entity falls to the target joint and lands on the
    /// floor formed by the target and its straight neighbour.
    Fall,
}

impl ConnectionKind {
    pub const ALL: [ConnectionKind; 4] = [
        ConnectionKind::Up,
        ConnectionKind::Straight,
        ConnectionKind::Down,
        ConnectionKind::Fall,
    ];
}

/// A link from one joint to another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ConnectionRepr")]
pub struct Connection {
    pub target: JointId,
    /// Locked connections keep their target but cannot be traversed.
    pub locked: bool,
}

impl Connection {
    pub fn open(target: JointId) -> Self {
        Self {
            target,
            locked: false,
        }
    }
}

/// Level files may write a connection as a bare joint index or as
/// `{ "target": 3, "locked": true }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ConnectionRepr {
    Target(JointId),
    Full {
        target: JointId,
        #[serde(default)]
        locked: bool,
    },
}

impl From<ConnectionRepr> for Connection {
    fn from(repr: ConnectionRepr) -> Self {
        match repr {
            ConnectionRepr::Target(target) => Connection::open(target),
            ConnectionRepr::Full { target, locked } => Connection { target, locked },
        }
    }
}

/// The four typed slots on one side of a joint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connections {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<Connection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub straight: Option<Connection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<Connection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fall: Option<Connection>,
}

impl Connections {
    pub fn get(&self, kind: ConnectionKind) -> Option<Connection> {
        match kind {
            ConnectionKind::Up => self.up,
            ConnectionKind::Straight => self.straight,
            ConnectionKind::Down => self.down,
            ConnectionKind::Fall => self.fall,
        }
    }

    pub fn slot_mut(&mut self, kind: ConnectionKind) -> &mut Option<Connection> {
        match kind {
            ConnectionKind::Up => &mut self.up,
            ConnectionKind::Straight => &mut self.straight,
            ConnectionKind::Down => &mut self.down,
            ConnectionKind::Fall => &mut self.fall,
        }
    }

    /// Occupied slots in `ConnectionKind::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (ConnectionKind, Connection)> + '_ {
        ConnectionKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|c| (kind, c)))
    }
}

/// A graph node at a world position, with typed connections on each side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub position: Vec2,
    #[serde(default)]
    pub left: Connections,
    #[serde(default)]
    pub right: Connections,
}

impl Joint {
    /// A joint with no connections.
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            left: Connections::default(),
            right: Connections::default(),
        }
    }

    /// Builder used by level authoring code and tests: adds an unlocked
    /// connection in the given slot, replacing any previous one.
    pub fn with(mut self, side: Side, kind: ConnectionKind, target: JointId) -> Self {
        *self.connections_mut(side).slot_mut(kind) = Some(Connection::open(target));
        self
    }

    pub fn connections(&self, side: Side) -> &Connections {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn connections_mut(&mut self, side: Side) -> &mut Connections {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn connection(&self, side: Side, kind: ConnectionKind) -> Option<Connection> {
        self.connections(side).get(kind)
    }

    /// All occupied slots, left side first.
    pub fn slots(&self) -> impl Iterator<Item = (Side, ConnectionKind, Connection)> + '_ {
        Side::ALL.into_iter().flat_map(move |side| {
            self.connections(side)
                .iter()
                .map(move |(kind, conn)| (side, kind, conn))
        })
    }
}

/// Serialized form of a level: the static joint array.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LevelData {
    #[serde(default)]
    pub name: String,
    pub joints: Vec<Joint>,
}

/// The built level: joints, extents, and the navigation graph.
#[derive(Clone, Debug)]
pub struct LevelGeometry {
    joints: Vec<Joint>,
    min_extents: Vec2,
    max_extents: Vec2,
    nav: NavGraph,
    config: LevelConfig,
}

impl LevelGeometry {
    /// Validate the joint array and build extents and the navigation graph.
    pub fn new(joints: Vec<Joint>, config: &LevelConfig) -> Result<Self, LevelError> {
        if joints.is_empty() {
            return Err(LevelError::Empty);
        }
        validate_references(&joints)?;

        let (min_extents, max_extents) = joints.iter().fold(
            (
                Vec2::new(f32::INFINITY, f32::INFINITY),
                Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
            ),
            |(min, max), joint| (min.min(joint.position), max.max(joint.position)),
        );

        let nav = NavGraph::build(&joints);
        let level = Self {
            joints,
            min_extents,
            max_extents,
            nav,
            config: config.clone(),
        };
        level.validate_fall_landings()?;

        tracing::debug!(
            joints = level.joints.len(),
            nav_edges = level.nav.edge_count(),
            min = %level.min_extents,
            max = %level.max_extents,
            "built level geometry"
        );
        Ok(level)
    }

    /// Build from already-parsed level data.
    pub fn from_data(data: LevelData, config: &LevelConfig) -> Result<Self, LevelError> {
        let level = Self::new(data.joints, config)?;
        if !data.name.is_empty() {
            tracing::info!(name = %data.name, joints = level.joint_count(), "loaded level");
        }
        Ok(level)
    }

    /// Parse a JSON level file (see `LevelData`) and build it.
    pub fn from_json(json: &str, config: &LevelConfig) -> Result<Self, LevelError> {
        let data: LevelData = serde_json::from_str(json)?;
        Self::from_data(data, config)
    }

    /// Serialize the current joints, including lock state.
    pub fn to_data(&self, name: impl Into<String>) -> LevelData {
        LevelData {
            name: name.into(),
            joints: self.joints.clone(),
        }
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Get a joint by ID. Panics on an ID that did not come from this level.
    pub fn joint(&self, id: JointId) -> &Joint {
        &self.joints[id.index()]
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Iterate `(JointId, &Joint)` in arena order.
    pub fn joints_with_ids(&self) -> impl Iterator<Item = (JointId, &Joint)> {
        self.joints
            .iter()
            .enumerate()
            .map(|(i, j)| (JointId(i as u32), j))
    }

    /// Axis-aligned bounds of all joint positions, `(min, max)`.
    pub fn extents(&self) -> (Vec2, Vec2) {
        (self.min_extents, self.max_extents)
    }

    pub fn nav_graph(&self) -> &NavGraph {
        &self.nav
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Lock or unlock one connection slot (doors). The topology is untouched;
    /// only traversal eligibility changes.
    pub fn set_connection_lock(
        &mut self,
        joint: JointId,
        side: Side,
        kind: ConnectionKind,
        locked: bool,
    ) -> Result<(), LevelError> {
        let slot = self
            .joints
            .get_mut(joint.index())
            .ok_or(LevelError::UnknownJoint(joint))?
            .connections_mut(side)
            .slot_mut(kind);
        match slot {
            Some(conn) => {
                if conn.locked != locked {
                    tracing::debug!(%joint, ?side, ?kind, locked, "connection lock changed");
                }
                conn.locked = locked;
                Ok(())
            }
            None => Err(LevelError::MissingConnection { joint, side, kind }),
        }
    }

    /// Lock state of a slot, or `None` if the slot is empty or the joint
    /// does not exist.
    pub fn is_connection_locked(
        &self,
        joint: JointId,
        side: Side,
        kind: ConnectionKind,
    ) -> Option<bool> {
        self.joints
            .get(joint.index())?
            .connection(side, kind)
            .map(|c| c.locked)
    }

    fn validate_fall_landings(&self) -> Result<(), LevelError> {
        for (id, joint) in self.joints_with_ids() {
            for side in Side::ALL {
                if let Some(fall) = joint.connection(side, ConnectionKind::Fall)
                    && self.landing_floor(fall.target).is_none()
                {
                    return Err(LevelError::UnresolvedFallLanding {
                        joint: id,
                        side,
                        target: fall.target,
                    });
                }
            }
        }
        Ok(())
    }
}

fn validate_references(joints: &[Joint]) -> Result<(), LevelError> {
    let joint_count = joints.len();
    for (i, joint) in joints.iter().enumerate() {
        let id = JointId(i as u32);
        for (side, kind, conn) in joint.slots() {
            if conn.target.index() >= joint_count {
                return Err(LevelError::DanglingConnection {
                    joint: id,
                    side,
                    kind,
                    target: conn.target,
                    joint_count,
                });
            }
            if conn.target == id {
                return Err(LevelError::SelfConnection {
                    joint: id,
                    side,
                    kind,
                });
            }
        }
    }
    Ok(())
}
