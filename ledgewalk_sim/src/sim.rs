// Core simulation state and tick loop.
//
// `SimState` owns the level, the config, the player (if spawned), every
// enemy, one reusable `Pathfinder`, and the seeded `StdRng`. Time advances
// only through `step()`, which applies one tick of player input and then
// updates enemies in spawn order. Given the same level, config, seed, and
// input sequence, two sims stay identical tick for tick.
//
// Lock changes go through `set_connection_lock()` so that enemies already
// walking a route can replan: a door that closes mid-path would otherwise
// leave them walking through it.

use crate::config::SimConfig;
use crate::enemy::Enemy;
use crate::error::SimError;
use crate::player::{MoveInput, Player};
use ledgewalk_level::{ConnectionKind, JointId, LevelGeometry, Pathfinder, Side, Vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub struct SimState {
    pub level: LevelGeometry,
    pub config: SimConfig,
    pub player: Option<Player>,
    pub enemies: Vec<Enemy>,
    /// Ticks processed so far.
    pub tick: u64,
    /// Simulated seconds elapsed.
    pub time: f64,
    pathfinder: Pathfinder,
    rng: StdRng,
}

impl SimState {
    pub fn new(level: LevelGeometry, config: SimConfig, seed: u64) -> Self {
        tracing::info!(seed, joints = level.joint_count(), "sim created");
        Self {
            level,
            config,
            player: None,
            enemies: Vec::new(),
            tick: 0,
            time: 0.0,
            pathfinder: Pathfinder::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Build the level from JSON using the config's level settings.
    pub fn from_level_json(json: &str, config: SimConfig, seed: u64) -> Result<Self, SimError> {
        let level = LevelGeometry::from_json(json, &config.level)?;
        Ok(Self::new(level, config, seed))
    }

    pub fn spawn_player(&mut self, position: Vec2) -> Result<(), SimError> {
        let player = Player::spawn(&self.level, position)?;
        tracing::debug!(%position, "player spawned");
        self.player = Some(player);
        Ok(())
    }

    /// Add an enemy at `position`, which must lie on a floor. Returns its
    /// index in `enemies`.
    pub fn spawn_enemy(&mut self, position: Vec2) -> Result<usize, SimError> {
        if self.level.find_floor(position).is_none() {
            return Err(SimError::SpawnOffGraph(position));
        }
        self.enemies.push(Enemy::new(position));
        tracing::debug!(%position, count = self.enemies.len(), "enemy spawned");
        Ok(self.enemies.len() - 1)
    }

    /// Lock or unlock a connection, then make every enemy with a route
    /// replan toward its destination.
    pub fn set_connection_lock(
        &mut self,
        joint: JointId,
        side: Side,
        kind: ConnectionKind,
        locked: bool,
    ) -> Result<(), SimError> {
        self.level.set_connection_lock(joint, side, kind, locked)?;

        let now = self.time;
        for enemy in &mut self.enemies {
            let Some(destination) = enemy.destination.filter(|_| enemy.has_path()) else {
                continue;
            };
            if !enemy.find_path_to(&self.level, &mut self.pathfinder, destination) {
                enemy.destination_request_time = now;
            }
        }
        Ok(())
    }

    /// Advance the world by `delta` seconds.
    pub fn step(&mut self, input: MoveInput, delta: f32) {
        self.tick += 1;
        self.time += f64::from(delta);

        if let Some(player) = &mut self.player {
            player.update_movement(&self.level, &self.config, input, delta);
        }

        for enemy in &mut self.enemies {
            enemy.update(
                &self.level,
                &mut self.pathfinder,
                &mut self.rng,
                &self.config,
                self.time,
                delta,
            );
        }
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }
}
