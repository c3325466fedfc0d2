// A* pathfinding over the navigation graph.
//
// Searches from the floor containing the start point to the floor containing
// the end point. Both ends of the start floor are seeded with their straight
// distance from the start point; the search stops as soon as either end of
// the end floor is popped. For those nodes the heuristic (straight distance
// to the end point) is exactly the remaining walk along the end floor, so
// the first one popped is on a shortest route.
//
// The open set is a `BinaryHeap` (min-heap via reversed ordering on
// `OpenEntry`). Ties on f-score go to the entry pushed first,
// tracked with a per-search sequence counter. Improved nodes are pushed
// again and stale entries are skipped on pop via the closed set.
//
// Scores and predecessors live in `Pathfinder`'s scratch `Vec`s indexed by
// node, not on the shared graph. Every call resets them before searching, so
// nothing leaks between searches, and a `Pathfinder` can be kept around to
// avoid reallocating. Each caller owns its own `Pathfinder`, so concurrent
// searches never share state.
//
// Locked connections close their edge for the search (see
// `NavEdge::is_open()`), so planned routes never rely on a door that the
// floor resolver would refuse to cross. An endpoint sitting on a joint lies
// on every floor of that joint; it is placed on an open one when there is
// one. If every floor there is locked, the joint itself becomes the only
// seed (or goal), since nothing past the locked door is reachable from it.
//
// The returned waypoint list is a stack: the end point comes first, then the
// end-floor joint reached, back to the first joint after leaving the start.
// Callers consume it from the back.

use crate::error::PathfindError;
use crate::floor::Floor;
use crate::geometry::LevelGeometry;
use crate::types::{JointId, Vec2};
use smallvec::{SmallVec, smallvec};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Entry in the A* open set (min-heap via reversed ordering).
struct OpenEntry {
    node: JointId,
    f_score: f32,
    /// Push order; earlier entries win ties.
    sequence: u64,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: smallest (f_score, sequence) is "greatest".
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Where a path endpoint sits on the graph.
struct Endpoint {
    floor: Floor,
    open: bool,
    /// The floor end the point is standing on, tracked only for a locked
    /// floor.
    joint: Option<JointId>,
}

impl Endpoint {
    /// Place `point` on an open floor if any contains it, else on the first
    /// locked one.
    fn locate(level: &LevelGeometry, point: Vec2) -> Option<Self> {
        let mut locked = None;
        for floor in level.floors_at(point) {
            if level.floor_is_open(floor) {
                return Some(Self {
                    floor,
                    open: true,
                    joint: None,
                });
            }
            if locked.is_none() {
                locked = Some(floor);
            }
        }
        locked.map(|floor| Self {
            floor,
            open: false,
            joint: level.floor_end_at(floor, point),
        })
    }

    /// Joints a search may start from. Inside a locked floor both ends are
    /// still a walk away; on one of its joints only that joint is.
    fn seeds(&self) -> SmallVec<[JointId; 2]> {
        match (self.open, self.joint) {
            (false, Some(joint)) => smallvec![joint],
            _ => smallvec![self.floor.left, self.floor.right],
        }
    }

    /// Joints a search may finish on. The inside of a locked floor cannot
    /// be entered from either end.
    fn goals(&self) -> SmallVec<[JointId; 2]> {
        match (self.open, self.joint) {
            (true, _) => smallvec![self.floor.left, self.floor.right],
            (false, Some(joint)) => smallvec![joint],
            (false, None) => SmallVec::new(),
        }
    }
}

/// Reusable A* scratch state.
#[derive(Default)]
pub struct Pathfinder {
    g_score: Vec<f32>,
    h_score: Vec<f32>,
    came_from: Vec<Option<JointId>>,
    closed: Vec<bool>,
    open: BinaryHeap<OpenEntry>,
    next_sequence: u64,
}

impl Pathfinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best known cost from the start point to `node` in the last search.
    /// `None` before any search or for a node outside the searched level.
    pub fn g_score(&self, node: JointId) -> Option<f32> {
        self.g_score.get(node.index()).copied()
    }

    /// Predecessor of `node` on the best known route in the last search.
    /// `None` for seeds, unreached nodes, and ids outside the searched level.
    pub fn came_from(&self, node: JointId) -> Option<JointId> {
        self.came_from.get(node.index()).copied().flatten()
    }

    /// Find waypoints from `start` to `end`.
    ///
    /// Returns `Ok(vec![])` when no route exists, and an error when either
    /// point lies on no floor.
    pub fn pathfind(
        &mut self,
        level: &LevelGeometry,
        start: Vec2,
        end: Vec2,
    ) -> Result<Vec<Vec2>, PathfindError> {
        let start_at = Endpoint::locate(level, start).ok_or(PathfindError::StartOffGraph(start))?;
        let end_at = Endpoint::locate(level, end).ok_or(PathfindError::EndOffGraph(end))?;

        if start_at.joint.is_none() && level.floor_contains_point(start_at.floor, end) {
            return Ok(vec![end]);
        }

        let goals = end_at.goals();
        if goals.is_empty() {
            tracing::debug!(%end, "end floor is locked, no path");
            return Ok(Vec::new());
        }

        let nav = level.nav_graph();
        let joints = level.joints();
        self.reset(level, end);

        for node in start_at.seeds() {
            let g = start.distance(nav.node(node).position);
            if g < self.g_score[node.index()] {
                self.g_score[node.index()] = g;
                self.push(node, g);
            }
        }

        while let Some(current) = self.open.pop() {
            let current_id = current.node;
            let ci = current_id.index();

            if self.closed[ci] {
                continue;
            }
            self.closed[ci] = true;

            if goals.contains(&current_id) {
                let path = self.reconstruct_path(level, current_id, end);
                tracing::debug!(%start, %end, waypoints = path.len(), cost = self.g_score[ci] + self.h_score[ci], "path found");
                return Ok(path);
            }

            let current_g = self.g_score[ci];
            for neighbor in nav.neighbors(current_id) {
                let ni = neighbor.node.index();
                if self.closed[ni] {
                    continue;
                }
                let edge = nav.edge(neighbor.edge);
                if !edge.is_open(joints) {
                    continue;
                }

                let tentative_g = current_g + edge.length;
                if tentative_g < self.g_score[ni] {
                    self.came_from[ni] = Some(current_id);
                    self.g_score[ni] = tentative_g;
                    self.push(neighbor.node, tentative_g);
                }
            }
        }

        tracing::debug!(%start, %end, "no path");
        Ok(Vec::new())
    }

    /// Clear all scratch state and size it for `level`.
    fn reset(&mut self, level: &LevelGeometry, end: Vec2) {
        let nav = level.nav_graph();
        let n = nav.node_count();

        self.g_score.clear();
        self.g_score.resize(n, f32::INFINITY);
        self.came_from.clear();
        self.came_from.resize(n, None);
        self.closed.clear();
        self.closed.resize(n, false);
        self.h_score.clear();
        self.h_score
            .extend(nav.nodes().iter().map(|node| node.position.distance(end)));
        self.open.clear();
        self.next_sequence = 0;
    }

    fn push(&mut self, node: JointId, g: f32) {
        let f_score = g + self.h_score[node.index()];
        self.open.push(OpenEntry {
            node,
            f_score,
            sequence: self.next_sequence,
        });
        self.next_sequence += 1;
    }

    /// Walk predecessors back from `goal`, producing the end-first stack.
    fn reconstruct_path(&self, level: &LevelGeometry, goal: JointId, end: Vec2) -> Vec<Vec2> {
        let mut path = vec![end];
        let mut current = Some(goal);
        while let Some(node) = current {
            path.push(level.joint(node).position);
            current = self.came_from[node.index()];
        }
        path
    }
}

impl LevelGeometry {
    /// One-off search with fresh scratch state. Hot callers should keep a
    /// `Pathfinder` instead.
    pub fn pathfind(&self, start: Vec2, end: Vec2) -> Result<Vec<Vec2>, PathfindError> {
        Pathfinder::new().pathfind(self, start, end)
    }
}

/// Total walking distance of a waypoint stack returned by `pathfind`,
/// starting from `start`.
pub fn path_length(start: Vec2, path: &[Vec2]) -> f32 {
    let mut length = 0.0;
    let mut from = start;
    for &waypoint in path.iter().rev() {
        length += from.distance(waypoint);
        from = waypoint;
    }
    length
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LevelConfig;
    use crate::geometry::{ConnectionKind::*, Joint, Side::*};

    fn build(joints: Vec<Joint>) -> LevelGeometry {
        LevelGeometry::new(joints, &LevelConfig::default()).unwrap()
    }

    /// A -- B -- C -- D along y = 100, each 100 apart.
    fn line() -> LevelGeometry {
        build(vec![
            Joint::new(Vec2::new(0.0, 100.0)).with(Right, Straight, JointId(1)),
            Joint::new(Vec2::new(100.0, 100.0))
                .with(Left, Straight, JointId(0))
                .with(Right, Straight, JointId(2)),
            Joint::new(Vec2::new(200.0, 100.0))
                .with(Left, Straight, JointId(1))
                .with(Right, Straight, JointId(3)),
            Joint::new(Vec2::new(300.0, 100.0)).with(Left, Straight, JointId(2)),
        ])
    }

    /// Two routes from the left floor to the right floor: a short valley
    /// 1 -> 2 -> 3 and a long hill 1 -> 4 -> 3.
    fn valley_and_hill() -> LevelGeometry {
        build(vec![
            // 0
            Joint::new(Vec2::new(0.0, 100.0)).with(Right, Straight, JointId(1)),
            // 1
            Joint::new(Vec2::new(100.0, 100.0))
                .with(Left, Straight, JointId(0))
                .with(Right, Down, JointId(2))
                .with(Right, Up, JointId(4)),
            // 2: valley floor, 50 below
            Joint::new(Vec2::new(200.0, 150.0))
                .with(Left, Up, JointId(1))
                .with(Right, Up, JointId(3)),
            // 3
            Joint::new(Vec2::new(300.0, 100.0))
                .with(Left, Down, JointId(2))
                .with(Left, Up, JointId(4))
                .with(Right, Straight, JointId(5)),
            // 4: hill top, 300 above
            Joint::new(Vec2::new(200.0, -200.0))
                .with(Left, Down, JointId(1))
                .with(Right, Down, JointId(3)),
            // 5
            Joint::new(Vec2::new(400.0, 100.0)).with(Left, Straight, JointId(3)),
        ])
    }

    #[test]
    fn same_floor_returns_end_only() {
        let level = line();
        let path = level
            .pathfind(Vec2::new(110.0, 100.0), Vec2::new(190.0, 100.0))
            .unwrap();
        assert_eq!(path, vec![Vec2::new(190.0, 100.0)]);
    }

    #[test]
    fn chain_visits_every_joint_in_order() {
        let level = line();
        let start = Vec2::new(50.0, 100.0);
        let end = Vec2::new(250.0, 100.0);
        let path = level.pathfind(start, end).unwrap();
        // End-first stack.
        assert_eq!(
            path,
            vec![end, Vec2::new(200.0, 100.0), Vec2::new(100.0, 100.0)]
        );
        assert!((path_length(start, &path) - 200.0).abs() < 1e-3);
    }

    #[test]
    fn chooses_shorter_of_two_routes() {
        let level = valley_and_hill();
        let start = Vec2::new(50.0, 100.0);
        let end = Vec2::new(350.0, 100.0);
        let path = level.pathfind(start, end).unwrap();
        assert_eq!(
            path,
            vec![
                end,
                Vec2::new(300.0, 100.0),
                Vec2::new(200.0, 150.0),
                Vec2::new(100.0, 100.0),
            ]
        );
        let valley = 50.0 + 2.0 * Vec2::new(100.0, 50.0).length() + 50.0;
        assert!((path_length(start, &path) - valley).abs() < 1e-3);
    }

    #[test]
    fn locked_edge_forces_long_route() {
        let mut level = valley_and_hill();
        level.set_connection_lock(JointId(1), Right, Down, true).unwrap();
        let path = level
            .pathfind(Vec2::new(50.0, 100.0), Vec2::new(350.0, 100.0))
            .unwrap();
        assert!(path.contains(&Vec2::new(200.0, -200.0)));
        assert!(!path.contains(&Vec2::new(200.0, 150.0)));
    }

    #[test]
    fn start_on_a_locked_door_joint_does_not_cross_it() {
        let mut level = line();
        level.set_connection_lock(JointId(2), Left, Straight, true).unwrap();

        // An entity stopped at the door ends up exactly on joint 2.
        let stopped = crate::movement::resolve_floor_movement(
            &level,
            Vec2::new(205.0, 100.0),
            level.floor(JointId(2), JointId(3)),
            Vec2::new(-10.0, 0.0),
        );
        assert!(stopped.blocked);
        let start = stopped.desired_position;
        assert_eq!(start, Vec2::new(200.0, 100.0));

        let path = level.pathfind(start, Vec2::new(50.0, 100.0)).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn end_on_a_locked_door_joint_is_reached_from_the_open_side() {
        let mut level = line();
        level.set_connection_lock(JointId(0), Right, Straight, true).unwrap();
        // Joint 1's first floor in scan order is the locked 0--1.
        assert_eq!(
            level.find_floor(Vec2::new(100.0, 100.0)),
            Some(level.floor(JointId(0), JointId(1)))
        );

        let end = Vec2::new(100.0, 100.0);
        let path = level.pathfind(Vec2::new(250.0, 100.0), end).unwrap();
        assert_eq!(path, vec![end, Vec2::new(200.0, 100.0)]);
    }

    #[test]
    fn end_inside_a_locked_floor_is_unreachable() {
        let mut level = line();
        level.set_connection_lock(JointId(2), Left, Straight, true).unwrap();
        let path = level
            .pathfind(Vec2::new(50.0, 100.0), Vec2::new(150.0, 100.0))
            .unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn start_inside_a_locked_floor_walks_out_either_end() {
        let mut level = line();
        level.set_connection_lock(JointId(2), Left, Straight, true).unwrap();
        let end = Vec2::new(250.0, 100.0);
        let path = level.pathfind(Vec2::new(150.0, 100.0), end).unwrap();
        assert_eq!(path, vec![end, Vec2::new(200.0, 100.0)]);
    }

    #[test]
    fn no_path_between_islands_is_empty() {
        let level = build(vec![
            Joint::new(Vec2::new(0.0, 0.0)).with(Right, Straight, JointId(1)),
            Joint::new(Vec2::new(100.0, 0.0)).with(Left, Straight, JointId(0)),
            Joint::new(Vec2::new(500.0, 0.0)).with(Right, Straight, JointId(3)),
            Joint::new(Vec2::new(600.0, 0.0)).with(Left, Straight, JointId(2)),
        ]);
        let path = level
            .pathfind(Vec2::new(50.0, 0.0), Vec2::new(550.0, 0.0))
            .unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn all_routes_locked_is_empty() {
        let mut level = line();
        level.set_connection_lock(JointId(1), Right, Straight, true).unwrap();
        let path = level
            .pathfind(Vec2::new(50.0, 100.0), Vec2::new(250.0, 100.0))
            .unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn off_graph_endpoints_are_errors() {
        let level = line();
        assert_eq!(
            level.pathfind(Vec2::new(50.0, 0.0), Vec2::new(250.0, 100.0)),
            Err(PathfindError::StartOffGraph(Vec2::new(50.0, 0.0)))
        );
        assert_eq!(
            level.pathfind(Vec2::new(50.0, 100.0), Vec2::new(900.0, 100.0)),
            Err(PathfindError::EndOffGraph(Vec2::new(900.0, 100.0)))
        );
    }

    #[test]
    fn reused_pathfinder_does_not_leak_state() {
        let level = valley_and_hill();
        let mut pathfinder = Pathfinder::new();

        // First search explores the right side of the level.
        let first = pathfinder
            .pathfind(&level, Vec2::new(50.0, 100.0), Vec2::new(350.0, 100.0))
            .unwrap();
        assert!(!first.is_empty());
        assert!(pathfinder.g_score(JointId(3)).is_some_and(f32::is_finite));

        // Second search goes the other way with a different goal.
        let start = Vec2::new(350.0, 100.0);
        let end = Vec2::new(50.0, 100.0);
        let second = pathfinder.pathfind(&level, start, end).unwrap();
        let fresh = level.pathfind(start, end).unwrap();
        assert_eq!(second, fresh);

        // Scores are relative to the new start, not left over from the first run.
        assert!((pathfinder.g_score(JointId(3)).unwrap() - 50.0).abs() < 1e-3);
        assert_eq!(pathfinder.came_from(JointId(3)), None);
        assert_eq!(pathfinder.came_from(JointId(5)), None);
    }

    #[test]
    fn scores_outside_the_searched_level_are_none() {
        let mut pathfinder = Pathfinder::new();
        assert_eq!(pathfinder.g_score(JointId(0)), None);
        assert_eq!(pathfinder.came_from(JointId(0)), None);

        let level = line();
        pathfinder
            .pathfind(&level, Vec2::new(50.0, 100.0), Vec2::new(250.0, 100.0))
            .unwrap();
        assert_eq!(pathfinder.came_from(JointId(2)), Some(JointId(1)));
        assert_eq!(pathfinder.g_score(JointId(4)), None);
        assert_eq!(pathfinder.came_from(JointId(99)), None);
    }

    #[test]
    fn repeated_searches_are_deterministic() {
        let level = valley_and_hill();
        let mut pathfinder = Pathfinder::new();
        let a = pathfinder
            .pathfind(&level, Vec2::new(10.0, 100.0), Vec2::new(390.0, 100.0))
            .unwrap();
        let b = pathfinder
            .pathfind(&level, Vec2::new(10.0, 100.0), Vec2::new(390.0, 100.0))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn open_entries_tie_break_by_push_order() {
        let mut heap = BinaryHeap::new();
        heap.push(OpenEntry { node: JointId(5), f_score: 1.0, sequence: 1 });
        heap.push(OpenEntry { node: JointId(9), f_score: 1.0, sequence: 0 });
        heap.push(OpenEntry { node: JointId(2), f_score: 0.5, sequence: 2 });
        let order: Vec<_> = std::iter::from_fn(|| heap.pop().map(|e| e.node)).collect();
        assert_eq!(order, vec![JointId(2), JointId(9), JointId(5)]);
    }
}
