//! Cannon and cannonball state owned by the world.

use std::time::Duration;

use superfco_core::{
    CannonId, CannonballId, CellCoord, Event, Position, TerrainCode, TileGrid, Tuning,
};

/// Stationary launcher spawned from a cannon tile.
#[derive(Clone, Debug)]
pub(crate) struct Cannon {
    /// Identifier allocated when the level was loaded.
    pub(crate) id: CannonId,
    /// Cell the cannon occupies.
    pub(crate) cell: CellCoord,
    /// Time accumulated since the cannon last fired.
    since_last_shot: Duration,
}

/// Projectile travelling horizontally away from its cannon.
#[derive(Clone, Debug)]
pub(crate) struct Cannonball {
    /// Identifier allocated when the ball was fired.
    pub(crate) id: CannonballId,
    /// Cannon that launched the ball.
    pub(crate) cannon: CannonId,
    /// Current position in tile units.
    pub(crate) position: Position,
}

/// Registry of cannons and their live cannonballs.
#[derive(Debug)]
pub(crate) struct CannonBattery {
    cannons: Vec<Cannon>,
    cannonballs: Vec<Cannonball>,
    next_cannonball_id: CannonballId,
}

impl CannonBattery {
    /// Spawns one cannon per cannon tile, primed to fire on the first tick.
    pub(crate) fn from_grid(grid: &TileGrid, tuning: &Tuning) -> Self {
        let cannons = grid
            .cells_with(TerrainCode::Cannon)
            .enumerate()
            .map(|(index, cell)| Cannon {
                id: CannonId::new(index as u32),
                cell,
                since_last_shot: tuning.cannon_fire_delay(),
            })
            .collect();

        Self {
            cannons,
            cannonballs: Vec::new(),
            next_cannonball_id: CannonballId::new(0),
        }
    }

    pub(crate) fn cannons(&self) -> &[Cannon] {
        &self.cannons
    }

    pub(crate) fn cannonballs(&self) -> &[Cannonball] {
        &self.cannonballs
    }

    /// Moves live cannonballs, retires the ones that left play, then lets
    /// every cannon with spare capacity fire once its delay has elapsed.
    pub(crate) fn advance(
        &mut self,
        dt: Duration,
        grid: &TileGrid,
        tuning: &Tuning,
        out_events: &mut Vec<Event>,
    ) {
        let travel = tuning.cannonball_speed * dt.as_secs_f32();
        for ball in &mut self.cannonballs {
            ball.position.x += travel;
        }
        self.cannonballs.retain(|ball| {
            let expired = has_left_play(grid, ball.position);
            if expired {
                out_events.push(Event::CannonballExpired {
                    cannonball: ball.id,
                });
            }
            !expired
        });

        let delay = tuning.cannon_fire_delay();
        for cannon in &mut self.cannons {
            cannon.since_last_shot = cannon.since_last_shot.saturating_add(dt);
            let live = self
                .cannonballs
                .iter()
                .filter(|ball| ball.cannon == cannon.id)
                .count();
            if live >= tuning.max_cannonballs || cannon.since_last_shot <= delay {
                continue;
            }

            let id = self.next_cannonball_id;
            self.next_cannonball_id = CannonballId::new(id.get().wrapping_add(1));
            cannon.since_last_shot = Duration::ZERO;
            self.cannonballs.push(Cannonball {
                id,
                cannon: cannon.id,
                position: cannon.cell.position(),
            });
            tracing::debug!(cannon = cannon.id.get(), cannonball = id.get(), "cannon fired");
            out_events.push(Event::CannonFired {
                cannon: cannon.id,
                cannonball: id,
            });
        }
    }

    /// Removes the cannonball that struck the player, if any, and reports it.
    pub(crate) fn take_hit(&mut self, target: Position) -> Option<CannonballId> {
        let index = self
            .cannonballs
            .iter()
            .position(|ball| ball.position.overlaps(target))?;
        Some(self.cannonballs.remove(index).id)
    }
}

/// A ball has left play once it is wholly outside the grid or its leading
/// cell is a wall.
fn has_left_play(grid: &TileGrid, position: Position) -> bool {
    if position.x <= -1.0 || position.x >= grid.columns() as f32 {
        return true;
    }
    let column = position.x.floor() as i64;
    let row = position.y.round() as i64;
    grid.terrain(column, row) == Some(TerrainCode::Wall)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn corridor(row: &str) -> TileGrid {
        let codes: Vec<u8> = row.bytes().map(|byte| byte - b'0').collect();
        TileGrid::from_codes(&[codes]).expect("valid corridor")
    }

    fn fired(events: &[Event]) -> usize {
        events
            .iter()
            .filter(|event| matches!(event, Event::CannonFired { .. }))
            .count()
    }

    #[test]
    fn cannons_fire_on_the_first_tick() {
        let grid = corridor("1111111117");
        let tuning = Tuning::default();
        let mut battery = CannonBattery::from_grid(&grid, &tuning);
        let mut events = Vec::new();

        battery.advance(FRAME, &grid, &tuning, &mut events);

        assert_eq!(fired(&events), 1);
        assert_eq!(battery.cannonballs().len(), 1);
        assert_eq!(battery.cannonballs()[0].position, Position::new(9.0, 0.0));
    }

    #[test]
    fn a_zero_length_tick_does_not_fire() {
        let grid = corridor("1111111117");
        let tuning = Tuning::default();
        let mut battery = CannonBattery::from_grid(&grid, &tuning);
        let mut events = Vec::new();

        battery.advance(Duration::ZERO, &grid, &tuning, &mut events);

        assert!(events.is_empty());
    }

    #[test]
    fn cannons_wait_out_the_delay_between_shots() {
        let grid = corridor("11111111111111111111111111111111111111117");
        let tuning = Tuning::default();
        let mut battery = CannonBattery::from_grid(&grid, &tuning);
        let mut events = Vec::new();

        battery.advance(FRAME, &grid, &tuning, &mut events);
        battery.advance(Duration::from_millis(3000), &grid, &tuning, &mut events);
        assert_eq!(fired(&events), 1);

        battery.advance(FRAME, &grid, &tuning, &mut events);
        assert_eq!(fired(&events), 2);
    }

    #[test]
    fn live_cannonballs_are_capped_per_cannon() {
        let grid = corridor(&format!("{}7", "1".repeat(79)));
        let tuning = Tuning::default();
        let mut battery = CannonBattery::from_grid(&grid, &tuning);
        let mut events = Vec::new();

        for _ in 0..4 {
            battery.advance(Duration::from_millis(3100), &grid, &tuning, &mut events);
        }

        assert_eq!(fired(&events), 2);
        assert_eq!(battery.cannonballs().len(), 2);
    }

    #[test]
    fn cannonballs_expire_against_walls() {
        let grid = corridor("1121111117");
        let tuning = Tuning::default();
        let mut battery = CannonBattery::from_grid(&grid, &tuning);
        let mut events = Vec::new();

        battery.advance(FRAME, &grid, &tuning, &mut events);
        let id = battery.cannonballs()[0].id;
        for _ in 0..60 {
            battery.advance(FRAME, &grid, &tuning, &mut events);
        }

        assert!(events.contains(&Event::CannonballExpired { cannonball: id }));
        assert!(battery.cannonballs().iter().all(|ball| ball.id != id));
    }

    #[test]
    fn cannonballs_expire_past_the_grid_edge() {
        let grid = corridor("7111");
        let tuning = Tuning::default();
        let mut battery = CannonBattery::from_grid(&grid, &tuning);
        let mut events = Vec::new();

        battery.advance(FRAME, &grid, &tuning, &mut events);
        battery.advance(Duration::from_millis(200), &grid, &tuning, &mut events);

        assert!(events.contains(&Event::CannonballExpired {
            cannonball: CannonballId::new(0)
        }));
    }

    #[test]
    fn hits_remove_the_overlapping_cannonball() {
        let grid = corridor("1111111117");
        let tuning = Tuning::default();
        let mut battery = CannonBattery::from_grid(&grid, &tuning);
        let mut events = Vec::new();
        battery.advance(FRAME, &grid, &tuning, &mut events);

        assert_eq!(battery.take_hit(Position::new(2.0, 0.0)), None);
        assert_eq!(
            battery.take_hit(Position::new(8.5, 0.0)),
            Some(CannonballId::new(0))
        );
        assert!(battery.cannonballs().is_empty());
    }
}
