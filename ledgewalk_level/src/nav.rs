// Navigation graph for pathfinding.
//
// The nav graph mirrors joint connectivity: one `NavNode` per joint (same
// index, so a `JointId` doubles as the node id) and one undirected `NavEdge`
// per connected joint pair. Connection kind and direction do not matter
// here. If joint A's right.straight points at B and B's left.straight points
// back at A, that is still a single edge, and the edge remembers both slots
// it was discovered from so lock state can be checked at search time.
//
// Built once by `NavGraph::build()` from the static joint topology and never
// resized afterwards. Lock toggles change whether an edge is open
// (`NavEdge::is_open()`), not whether it exists.
//
// All storage uses `Vec` indexed by node/edge index for O(1) lookup and
// deterministic iteration order. Per-node adjacency is a `SmallVec` with
// inline room for the 8 slots a joint can own; joints targeted by more
// neighbours than that spill to the heap.
//
// See also: `geometry.rs` which owns the `NavGraph` inside `LevelGeometry`,
// `pathfinding.rs` for A* search over this graph.

use crate::geometry::{ConnectionKind, Joint, SLOTS_PER_JOINT, Side};
use crate::types::{JointId, Vec2};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Identifies one connection slot on one joint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRef {
    pub joint: JointId,
    pub side: Side,
    pub kind: ConnectionKind,
}

/// An undirected edge between two joints.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NavEdge {
    pub a: JointId,
    pub b: JointId,
    /// Euclidean distance between the two joints.
    pub length: f32,
    /// Every slot linking `a` and `b`, in discovery order.
    pub slots: SmallVec<[SlotRef; 2]>,
}

impl NavEdge {
    /// An edge is closed when any slot linking its joints is locked: a door
    /// locked from either side blocks the passage.
    pub fn is_open(&self, joints: &[Joint]) -> bool {
        self.slots.iter().all(|slot| {
            joints[slot.joint.index()]
                .connection(slot.side, slot.kind)
                .is_some_and(|conn| !conn.locked)
        })
    }
}

/// A neighbour entry in a node's adjacency list.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavNeighbor {
    pub node: JointId,
    /// Index into `NavGraph::edges()`.
    pub edge: usize,
}

/// A node in the navigation graph, mirroring one joint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NavNode {
    pub id: JointId,
    pub position: Vec2,
    pub neighbors: SmallVec<[NavNeighbor; SLOTS_PER_JOINT]>,
}

/// The navigation graph container.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NavGraph {
    nodes: Vec<NavNode>,
    edges: Vec<NavEdge>,
}

impl NavGraph {
    /// Build the graph from a joint array. Connection targets must already be
    /// validated (in range, not self-referencing).
    pub fn build(joints: &[Joint]) -> Self {
        let mut graph = NavGraph {
            nodes: joints
                .iter()
                .enumerate()
                .map(|(i, joint)| NavNode {
                    id: JointId(i as u32),
                    position: joint.position,
                    neighbors: SmallVec::new(),
                })
                .collect(),
            edges: Vec::new(),
        };

        for (i, joint) in joints.iter().enumerate() {
            let id = JointId(i as u32);
            for (side, kind, conn) in joint.slots() {
                graph.connect(id, conn.target, SlotRef { joint: id, side, kind });
            }
        }
        graph
    }

    /// Link `a` and `b`, or record `slot` on their existing edge.
    fn connect(&mut self, a: JointId, b: JointId, slot: SlotRef) {
        if let Some(existing) = self.edge_between(a, b) {
            self.edges[existing].slots.push(slot);
            return;
        }

        let edge = self.edges.len();
        let length = self.nodes[a.index()]
            .position
            .distance(self.nodes[b.index()].position);
        let mut slots = SmallVec::new();
        slots.push(slot);
        self.edges.push(NavEdge { a, b, length, slots });
        self.nodes[a.index()]
            .neighbors
            .push(NavNeighbor { node: b, edge });
        self.nodes[b.index()]
            .neighbors
            .push(NavNeighbor { node: a, edge });
    }

    /// Index of the edge joining `a` and `b`, if any.
    pub fn edge_between(&self, a: JointId, b: JointId) -> Option<usize> {
        self.nodes[a.index()]
            .neighbors
            .iter()
            .find(|n| n.node == b)
            .map(|n| n.edge)
    }

    pub fn is_neighbor(&self, a: JointId, b: JointId) -> bool {
        self.edge_between(a, b).is_some()
    }

    pub fn neighbors(&self, node: JointId) -> &[NavNeighbor] {
        &self.nodes[node.index()].neighbors
    }

    pub fn node(&self, id: JointId) -> &NavNode {
        &self.nodes[id.index()]
    }

    pub fn nodes(&self) -> &[NavNode] {
        &self.nodes
    }

    pub fn edge(&self, idx: usize) -> &NavEdge {
        &self.edges[idx]
    }

    pub fn edges(&self) -> &[NavEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
