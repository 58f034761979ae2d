#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for superfco.
//!
//! The world owns the level grid, the player's body and every level entity.
//! Systems never mutate it directly: they emit [`Command`]s which [`apply`]
//! executes in order, broadcasting [`Event`]s that describe what happened.

mod cannons;
mod level;

pub use level::{parse_level, LevelError};

use superfco_core::{
    CellCoord, CollisionModel, Command, DeathCause, Event, Position, Support, TerrainCode,
    TileGrid, Tuning, WELCOME_BANNER,
};
use superfco_system_collision::{classify, probe, sweep};
use superfco_system_kinematics::Body;

use cannons::CannonBattery;

/// Represents the authoritative superfco world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: TileGrid,
    tuning: Tuning,
    player: Body,
    settled: Position,
    support: Support,
    battery: CannonBattery,
    oxygen_tanks: Vec<CellCoord>,
    goals: Vec<CellCoord>,
    goal_reached: bool,
    tick_index: u64,
}

impl World {
    /// Builds a world from a validated grid, spawning every level entity.
    ///
    /// The grid must contain exactly one player tile.
    pub fn new(grid: TileGrid, tuning: Tuning) -> Result<Self, LevelError> {
        let spawns: Vec<CellCoord> = grid.cells_with(TerrainCode::Player).collect();
        let spawn = match spawns.as_slice() {
            [] => return Err(LevelError::MissingPlayer),
            [spawn] => *spawn,
            _ => {
                return Err(LevelError::MultiplePlayers {
                    count: spawns.len(),
                })
            }
        };

        let player = Body::at(spawn.position());
        let support = classify_at(&grid, player.position);
        let battery = CannonBattery::from_grid(&grid, &tuning);
        let oxygen_tanks = grid.cells_with(TerrainCode::Oxygen).collect();
        let goals: Vec<CellCoord> = grid.cells_with(TerrainCode::Goal).collect();

        tracing::info!(
            columns = grid.columns(),
            rows = grid.rows(),
            cannons = battery.cannons().len(),
            goals = goals.len(),
            spawn_column = spawn.column(),
            spawn_row = spawn.row(),
            "level loaded"
        );

        Ok(Self {
            banner: WELCOME_BANNER,
            grid,
            tuning,
            player,
            settled: player.position,
            support,
            battery,
            oxygen_tanks,
            goals,
            goal_reached: false,
            tick_index: 0,
        })
    }

    /// Parses level text `columns` wide and builds a world from it.
    pub fn from_level_text(
        text: &str,
        columns: usize,
        tuning: Tuning,
    ) -> Result<Self, LevelError> {
        Self::new(parse_level(text, columns)?, tuning)
    }

    fn kill_player(&mut self, cause: DeathCause, out_events: &mut Vec<Event>) {
        if let Some(cause) = self.player.die(cause) {
            tracing::info!(
                ?cause,
                x = self.player.position.x,
                y = self.player.position.y,
                "player died"
            );
            out_events.push(Event::PlayerDied { cause });
        }
    }

    fn resolve_frame(&mut self, out_events: &mut Vec<Event>) {
        let tentative = self.player.position;
        let bounds = match sweep(&self.grid, self.settled, tentative) {
            Ok(model) => model,
            Err(error) => {
                tracing::warn!(%error, "probe rejected tentative position, clamping to frame start");
                probe(&self.grid, self.settled)
                    .unwrap_or_else(|_| CollisionModel::outer_extent(&self.grid))
            }
        };

        if let Some(cause) = self.player.clamp_to_bounds(&self.tuning, &bounds) {
            tracing::info!(?cause, x = tentative.x, y = tentative.y, "player died on landing");
            out_events.push(Event::PlayerDied { cause });
        }
        self.settled = self.player.position;
        self.support = classify_at(&self.grid, self.settled);
        out_events.push(Event::FrameResolved {
            position: self.settled,
            support: self.support,
        });

        if !self.player.is_dead() {
            self.resolve_contacts(out_events);
        }
    }

    fn resolve_contacts(&mut self, out_events: &mut Vec<Event>) {
        let position = self.player.position;

        if !self.goal_reached {
            if let Some(cell) = self
                .goals
                .iter()
                .copied()
                .find(|goal| goal.position().overlaps(position))
            {
                self.goal_reached = true;
                tracing::info!(column = cell.column(), row = cell.row(), "goal reached");
                out_events.push(Event::GoalReached { cell });
            }
        }

        if let Some(cannonball) = self.battery.take_hit(position) {
            out_events.push(Event::CannonballExpired { cannonball });
            self.kill_player(DeathCause::Projectile, out_events);
            return;
        }

        let mut index = 0;
        while index < self.oxygen_tanks.len() {
            let cell = self.oxygen_tanks[index];
            if cell.position().overlaps(position) {
                let _ = self.oxygen_tanks.remove(index);
                self.player.grant_oxygen();
                tracing::debug!(column = cell.column(), row = cell.row(), "oxygen collected");
                out_events.push(Event::OxygenCollected { cell });
            } else {
                index += 1;
            }
        }
    }
}

fn classify_at(grid: &TileGrid, position: Position) -> Support {
    match probe(grid, position) {
        Ok(model) => classify(&model, position),
        Err(_) => Support::default(),
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Movement commands addressed to a dead player are ignored; `ResolveFrame`
/// still clamps the body so a death mid-frame never leaves it inside terrain.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let alive = !world.player.is_dead();
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            world
                .battery
                .advance(dt, &world.grid, &world.tuning, out_events);
        }
        Command::HaltPlayer if alive => world.player.halt(),
        Command::MoveLateral { direction, dt } if alive => {
            world.player.move_lateral(&world.tuning, direction, dt);
        }
        Command::MoveVertical { direction, dt } if alive => {
            world.player.move_vertical(&world.tuning, direction, dt);
        }
        Command::Jump { dt } if alive => world.player.jump(&world.tuning, dt),
        Command::JumpLateral { direction, dt } if alive => {
            world.player.jump_lateral(&world.tuning, direction, dt);
        }
        Command::Fall { dt } if alive => world.player.fall(&world.tuning, dt),
        Command::Dive { dt } if alive => {
            if let Some(cause) = world.player.dive(&world.tuning, dt) {
                tracing::info!(?cause, "player drowned");
                out_events.push(Event::PlayerDied { cause });
            }
        }
        Command::ResolveFrame => world.resolve_frame(out_events),
        Command::HaltPlayer
        | Command::MoveLateral { .. }
        | Command::MoveVertical { .. }
        | Command::Jump { .. }
        | Command::JumpLateral { .. }
        | Command::Fall { .. }
        | Command::Dive { .. } => {}
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use superfco_core::{
        EntityKind, PlayerSnapshot, Pose, Position, SpriteInstance, TileGrid, Tuning,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the level grid.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.grid
    }

    /// Tuning the world was built with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Captures the player's state and the support stored by the last frame.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position,
            velocity: world.player.velocity,
            support: world.support,
            has_oxygen: world.player.has_oxygen(),
            is_dead: world.player.is_dead(),
        }
    }

    /// Reports whether the player has touched a goal.
    #[must_use]
    pub fn is_complete(world: &World) -> bool {
        world.goal_reached
    }

    /// Number of ticks the world has processed.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Positions of the cannonballs currently in flight.
    #[must_use]
    pub fn cannonball_positions(world: &World) -> Vec<Position> {
        world
            .battery
            .cannonballs()
            .iter()
            .map(|ball| ball.position)
            .collect()
    }

    /// Lists every drawable entity grouped by kind, the player first.
    #[must_use]
    pub fn sprites(world: &World) -> Vec<SpriteInstance> {
        let normal = |kind, position| SpriteInstance {
            kind,
            position,
            pose: Pose::Normal,
        };

        let mut sprites = vec![SpriteInstance {
            kind: EntityKind::Player,
            position: world.player.position,
            pose: world.player.pose(),
        }];
        sprites.extend(
            world
                .goals
                .iter()
                .map(|cell| normal(EntityKind::Goal, cell.position())),
        );
        sprites.extend(
            world
                .battery
                .cannons()
                .iter()
                .map(|cannon| normal(EntityKind::Cannon, cannon.cell.position())),
        );
        sprites.extend(
            world
                .battery
                .cannonballs()
                .iter()
                .map(|ball| normal(EntityKind::Cannonball, ball.position)),
        );
        sprites.extend(
            world
                .oxygen_tanks
                .iter()
                .map(|cell| normal(EntityKind::OxygenTank, cell.position())),
        );
        sprites
    }
}
