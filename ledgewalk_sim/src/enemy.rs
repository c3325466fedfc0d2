// Enemies: autonomous wanderers that path between random destinations.
//
// Each enemy holds a waypoint stack from `Pathfinder::pathfind()` (end point
// first) and an index into it. The index starts at the last entry and counts
// down as waypoints are reached; when waypoint 0 (the destination itself) is
// reached the path is dropped and the enemy idles for
// `enemy_pathing_wait_secs` before sampling a new destination with
// `random_navigable_position()`.
//
// Movement between waypoints is a straight line at `enemy_speed`. Waypoints
// are joints (or the final point on the last floor), so every leg runs
// along one floor and enemies never leave the graph.
//
// A failed plan (no route, or an endpoint off the graph) is not an error:
// the enemy starts its idle wait and tries a different destination later.
// A failed sample (the random budget ran out) retries on the next tick.

use crate::config::SimConfig;
use ledgewalk_level::{LevelGeometry, Pathfinder, Vec2, random_navigable_position};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const ENEMY_START_HEALTH: f32 = 100.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub position: Vec2,
    /// Final point of the current path.
    pub destination: Option<Vec2>,
    /// Sim time of the last arrival or failed plan; the idle wait counts
    /// from here.
    pub destination_request_time: f64,
    /// Waypoint stack, end point first.
    path: Vec<Vec2>,
    /// Index of the waypoint currently being walked toward.
    target: Option<usize>,
    pub health: f32,
}

impl Enemy {
    /// A fresh enemy with no destination. It picks one on its first update.
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            destination: None,
            destination_request_time: f64::NEG_INFINITY,
            path: Vec::new(),
            target: None,
            health: ENEMY_START_HEALTH,
        }
    }

    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    /// The waypoint currently being walked toward.
    pub fn current_target(&self) -> Option<Vec2> {
        self.target.map(|i| self.path[i])
    }

    pub fn has_path(&self) -> bool {
        self.target.is_some()
    }

    /// Plan a route from the current position to `destination`. On failure
    /// any previous path is dropped and `false` is returned.
    pub fn find_path_to(
        &mut self,
        level: &LevelGeometry,
        pathfinder: &mut Pathfinder,
        destination: Vec2,
    ) -> bool {
        self.path.clear();
        self.target = None;

        match pathfinder.pathfind(level, self.position, destination) {
            Ok(path) if !path.is_empty() => {
                tracing::debug!(
                    from = %self.position,
                    to = %destination,
                    waypoints = path.len(),
                    "enemy planned path"
                );
                self.target = Some(path.len() - 1);
                self.path = path;
                self.destination = Some(destination);
                true
            }
            Ok(_) => {
                tracing::debug!(from = %self.position, to = %destination, "no path");
                self.destination = None;
                false
            }
            Err(err) => {
                tracing::warn!(%err, "enemy pathfind failed");
                self.destination = None;
                false
            }
        }
    }

    /// Advance one tick: follow the current path, or (after the idle wait)
    /// pick and plan a new random destination.
    pub fn update<R: Rng>(
        &mut self,
        level: &LevelGeometry,
        pathfinder: &mut Pathfinder,
        rng: &mut R,
        config: &SimConfig,
        now: f64,
        delta: f32,
    ) {
        if self.target.is_none() {
            if now - self.destination_request_time < config.enemy_pathing_wait_secs {
                return;
            }
            let Some(destination) = random_navigable_position(level, rng) else {
                return;
            };
            if !self.find_path_to(level, pathfinder, destination) {
                self.destination_request_time = now;
                return;
            }
        }

        self.follow_path(config, now, delta);
    }

    fn follow_path(&mut self, config: &SimConfig, now: f64, delta: f32) {
        let mut budget = config.enemy_speed * delta;

        // A fast enemy (or a long tick) can pass several waypoints at once.
        while let Some(index) = self.target {
            let waypoint = self.path[index];
            let remaining = self.position.distance(waypoint);

            if remaining > budget.max(config.waypoint_arrival_radius) {
                let direction = (waypoint - self.position).normalize_or_zero();
                self.position += direction * budget;
                return;
            }

            self.position = waypoint;
            budget = (budget - remaining).max(0.0);

            if index == 0 {
                tracing::debug!(at = %self.position, "enemy reached destination");
                self.path.clear();
                self.target = None;
                self.destination_request_time = now;
                return;
            }
            self.target = Some(index - 1);
        }
    }
}
