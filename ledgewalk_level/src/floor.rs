// Floors: walkable segments derived from pairs of connected joints.
//
// A `Floor` is just two `JointId`s ordered by x, so it stays valid as long
// as the level's joint arena does. `Segment` is the same floor resolved to
// world positions, and carries the pure geometric predicates (flatness,
// containment, height-at-x). `LevelGeometry` gets the id-level wrappers plus
// `find_floor()`, which locates the floor an arbitrary point lies on.
//
// Containment uses the level's absolute tolerance. For a sloped floor a point
// is "on" it when its direction from the left joint matches the floor's
// direction; that is measured as the point's perpendicular offset from the
// floor line, which stays well-conditioned for points right next to a joint.
//
// `find_floor()` is a linear scan over every slot of every joint. That is
// fine for hand-authored levels of a few hundred joints; larger levels would
// want a spatial index.

use crate::geometry::{ConnectionKind, LevelGeometry, Side};
use crate::types::{JointId, Vec2};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A walkable segment between two connected joints, `left.x <= right.x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Floor {
    pub left: JointId,
    pub right: JointId,
}

impl Floor {
    /// The joint at the given end of the floor.
    pub fn end(&self, side: Side) -> JointId {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn has_joint(&self, joint: JointId) -> bool {
        self.left == joint || self.right == joint
    }
}

/// A floor resolved to world positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub left: Vec2,
    pub right: Vec2,
}

impl Segment {
    pub fn is_flat(&self) -> bool {
        self.left.y == self.right.y
    }

    /// Whether `x` lies within the floor's horizontal extent (inclusive).
    pub fn contains_x(&self, x: f32) -> bool {
        (self.left.x..=self.right.x).contains(&x)
    }

    /// Whether `point` lies on the floor, within `epsilon`.
    pub fn contains_point(&self, point: Vec2, epsilon: f32) -> bool {
        if point.x < self.left.x - epsilon || point.x > self.right.x + epsilon {
            return false;
        }
        if self.is_flat() {
            return (point.y - self.left.y).abs() <= epsilon;
        }

        let span = self.right - self.left;
        let length = span.length();
        let dir = span.normalize_or_zero();
        let offset = point - self.left;
        // Perpendicular distance from the floor line.
        let off_line = (dir.x * offset.y - dir.y * offset.x).abs();
        // Signed distance along the floor from the left joint.
        let along = dir.x * offset.x + dir.y * offset.y;
        off_line <= epsilon && (-epsilon..=length + epsilon).contains(&along)
    }

    /// Height of the floor at `x`, by linear interpolation between the two
    /// joints. Flat and zero-width floors return the left joint's y.
    pub fn y_at(&self, x: f32) -> f32 {
        let width = self.right.x - self.left.x;
        if self.is_flat() || width == 0.0 {
            return self.left.y;
        }
        let t = (x - self.left.x) / width;
        self.left.y + (self.right.y - self.left.y) * t
    }

    /// The point on the floor at `x`, with `x` clamped to the floor's extent.
    pub fn point_at(&self, x: f32) -> Vec2 {
        let x = x.clamp(self.left.x, self.right.x);
        Vec2::new(x, self.y_at(x))
    }

    pub fn length(&self) -> f32 {
        self.left.distance(self.right)
    }
}

impl LevelGeometry {
    /// Form the floor between two joints, ordered by x (then y, then id, so
    /// the result is symmetric in its arguments even for vertical pairs).
    pub fn floor(&self, a: JointId, b: JointId) -> Floor {
        let pa = self.joint(a).position;
        let pb = self.joint(b).position;
        let order = pa
            .x
            .total_cmp(&pb.x)
            .then_with(|| pa.y.total_cmp(&pb.y))
            .then_with(|| a.cmp(&b));
        match order {
            Ordering::Greater => Floor { left: b, right: a },
            _ => Floor { left: a, right: b },
        }
    }

    pub fn segment(&self, floor: Floor) -> Segment {
        Segment {
            left: self.joint(floor.left).position,
            right: self.joint(floor.right).position,
        }
    }

    pub fn floor_is_flat(&self, floor: Floor) -> bool {
        self.segment(floor).is_flat()
    }

    pub fn floor_contains_point(&self, floor: Floor, point: Vec2) -> bool {
        self.segment(floor).contains_point(point, self.config().epsilon)
    }

    /// Every floor containing `point`, in joint/slot scan order. A point on
    /// a joint lies on all of that joint's floors; a pair linked from both
    /// ends is reported once per slot.
    pub fn floors_at(&self, point: Vec2) -> impl Iterator<Item = Floor> + '_ {
        self.joints_with_ids().flat_map(move |(id, joint)| {
            joint.slots().filter_map(move |(_, _, conn)| {
                let floor = self.floor(id, conn.target);
                self.floor_contains_point(floor, point).then_some(floor)
            })
        })
    }

    /// The first floor (in joint/slot scan order) containing `point`, or
    /// `None` if the point is not on the walkable graph.
    pub fn find_floor(&self, point: Vec2) -> Option<Floor> {
        self.floors_at(point).next()
    }

    /// Whether the floor can be walked end to end: its joints are linked and
    /// no slot linking them is locked.
    pub fn floor_is_open(&self, floor: Floor) -> bool {
        let nav = self.nav_graph();
        nav.edge_between(floor.left, floor.right)
            .is_some_and(|edge| nav.edge(edge).is_open(self.joints()))
    }

    /// The end of `floor` that `point` sits on, if any.
    pub fn floor_end_at(&self, floor: Floor, point: Vec2) -> Option<JointId> {
        let epsilon = self.config().epsilon;
        [floor.left, floor.right]
            .into_iter()
            .find(|&joint| self.joint(joint).position.approx_eq(point, epsilon))
    }

    /// Every connected joint pair as a floor, each pair once.
    pub fn floors(&self) -> impl Iterator<Item = Floor> + '_ {
        self.nav_graph()
            .edges()
            .iter()
            .map(move |edge| self.floor(edge.a, edge.b))
    }

    /// The floor an entity lands on after falling to `target`: the target
    /// joint and its straight neighbour, left side checked first.
    pub fn landing_floor(&self, target: JointId) -> Option<Floor> {
        let joint = self.joints().get(target.index())?;
        Side::ALL.into_iter().find_map(|side| {
            joint
                .connection(side, ConnectionKind::Straight)
                .map(|conn| self.floor(target, conn.target))
        })
    }
}
