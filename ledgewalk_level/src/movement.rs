// Floor resolver: moves an entity along the floor graph for one tick.
//
// Callers pass the entity's position, the floor it stands on, and its
// movement for this tick (already scaled by the tick delta). The resolver
// advances x, and then:
//
//   1. If x is still inside the current floor, it snaps y onto the floor.
//   2. Otherwise the entity left through the boundary joint on the side it
//      was moving toward. That joint's connections on the same side pick the
//      next floor by vertical intent: up (if moving up and present), down
//      (if moving down and present), straight, and finally fall (moving down
//      only).
//   3. A locked or missing connection blocks: the entity stops on the
//      boundary joint and keeps its floor.
//   4. A fall hands off to the caller's gravity integration, with the fall
//      target's position and the landing floor to rejoin.
//
// The result is always a value; nothing here fails or panics on valid level
// data, and fall landings are validated when the level is built.
//
// See also: `floor.rs` for `Segment::y_at()`, `geometry.rs` for connection
// slots and lock flags.

use crate::floor::Floor;
use crate::geometry::{ConnectionKind, LevelGeometry, Side};
use crate::types::Vec2;

/// Vertical component of the entity's movement intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalIntent {
    Up,
    Down,
    Level,
}

impl VerticalIntent {
    /// y grows downward, so a negative y means "up".
    pub fn from_movement(movement: Vec2) -> Self {
        if movement.y < 0.0 {
            VerticalIntent::Up
        } else if movement.y > 0.0 {
            VerticalIntent::Down
        } else {
            VerticalIntent::Level
        }
    }
}

/// Outcome of one resolver step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloorMovement {
    /// The entity walked off a fall connection. `desired_position` is the
    /// fall target and `new_floor` is the floor to land on.
    pub falling: bool,
    /// A locked or missing connection stopped the entity at a floor end.
    pub blocked: bool,
    pub desired_position: Vec2,
    pub new_floor: Floor,
}

impl FloorMovement {
    fn on_floor(desired_position: Vec2, new_floor: Floor) -> Self {
        Self {
            falling: false,
            blocked: false,
            desired_position,
            new_floor,
        }
    }
}

/// Advance `position` by `movement` along `current_floor`, crossing into a
/// connected floor (or starting a fall) when the floor's extent is exceeded.
pub fn resolve_floor_movement(
    level: &LevelGeometry,
    position: Vec2,
    current_floor: Floor,
    movement: Vec2,
) -> FloorMovement {
    let x = position.x + movement.x;
    let segment = level.segment(current_floor);

    if segment.contains_x(x) {
        return finalize(level, x, current_floor);
    }

    let side = if x < segment.left.x { Side::Left } else { Side::Right };
    let boundary = current_floor.end(side);
    let boundary_pos = level.joint(boundary).position;
    let connections = level.joint(boundary).connections(side);
    let intent = VerticalIntent::from_movement(movement);

    let chosen = match (intent, connections.up, connections.down) {
        (VerticalIntent::Up, Some(up), _) => Some((ConnectionKind::Up, up)),
        (VerticalIntent::Down, _, Some(down)) => Some((ConnectionKind::Down, down)),
        _ => connections
            .straight
            .map(|c| (ConnectionKind::Straight, c))
            .or_else(|| {
                connections
                    .fall
                    .filter(|_| intent == VerticalIntent::Down)
                    .map(|c| (ConnectionKind::Fall, c))
            }),
    };

    let blocked = FloorMovement {
        falling: false,
        blocked: true,
        desired_position: boundary_pos,
        new_floor: current_floor,
    };

    let Some((kind, conn)) = chosen else {
        tracing::trace!(%boundary, ?side, "no connection, blocked");
        return blocked;
    };
    if conn.locked {
        tracing::trace!(%boundary, ?side, ?kind, "connection locked, blocked");
        return blocked;
    }

    if kind == ConnectionKind::Fall {
        // Landing floors are checked at level load; a missing one here means
        // the level was edited around validation, so treat it as a wall.
        let Some(landing) = level.landing_floor(conn.target) else {
            return blocked;
        };
        tracing::trace!(%boundary, target = %conn.target, "falling");
        return FloorMovement {
            falling: true,
            blocked: false,
            desired_position: level.joint(conn.target).position,
            new_floor: landing,
        };
    }

    tracing::trace!(%boundary, ?side, ?kind, target = %conn.target, "crossed floor boundary");
    finalize(level, x, level.floor(boundary, conn.target))
}

/// Snap `x` onto `floor`: clamp it into the floor's extent (one tick can
/// overshoot a short floor) and interpolate the height there.
fn finalize(level: &LevelGeometry, x: f32, floor: Floor) -> FloorMovement {
    FloorMovement::on_floor(level.segment(floor).point_at(x), floor)
}
