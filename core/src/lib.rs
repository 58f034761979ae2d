#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the superfco engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The director submits [`Command`]
//! values describing the movement a player attempts during a frame, the world
//! executes those commands via its `apply` entry point, and then broadcasts
//! [`Event`] values describing what actually happened. Terrain is described by
//! an immutable [`TileGrid`] of [`TerrainCode`] values that every collision
//! probe reads from.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to superfco.";

/// Number of columns every row of a classic level carries.
pub const DEFAULT_COLUMNS: usize = 80;

/// Closed enumeration of the terrain codes a level may contain.
///
/// The numeric values are stable across level revisions; `5` is unassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TerrainCode {
    /// Open air the player moves through freely.
    Empty = 1,
    /// Solid block that stops movement in every direction.
    Wall = 2,
    /// Spawn marker for the player.
    Player = 3,
    /// Exit tile that completes the level on contact.
    Goal = 4,
    /// Submerging tile; the player drowns inside it without oxygen.
    Water = 6,
    /// Turret that fires cannonballs and blocks movement like a wall.
    Cannon = 7,
    /// Spawn marker for an oxygen tank pickup.
    Oxygen = 8,
}

impl TerrainCode {
    /// Every terrain code in ascending numeric order.
    pub const ALL: [TerrainCode; 7] = [
        Self::Empty,
        Self::Wall,
        Self::Player,
        Self::Goal,
        Self::Water,
        Self::Cannon,
        Self::Oxygen,
    ];

    /// Resolves a numeric level code into its terrain code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Empty),
            2 => Some(Self::Wall),
            3 => Some(Self::Player),
            4 => Some(Self::Goal),
            6 => Some(Self::Water),
            7 => Some(Self::Cannon),
            8 => Some(Self::Oxygen),
            _ => None,
        }
    }

    /// Numeric code used by level files.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Reports whether entities may pass through the tile.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        matches!(self, Self::Empty | Self::Water | Self::Goal)
    }

    /// Reports whether the tile stops movement.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Wall | Self::Cannon)
    }

    /// Reports whether the tile submerges whoever stands in it.
    #[must_use]
    pub const fn is_water(self) -> bool {
        matches!(self, Self::Water)
    }
}

impl TryFrom<u8> for TerrainCode {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(code)
    }
}

/// Reasons a tile grid cannot be constructed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The grid carries no rows or its rows carry no columns.
    #[error("tile grid must contain at least one row and one column")]
    Empty,
    /// A row's length differs from the width established by the first row.
    #[error("row {row} has {actual} columns, expected {expected}")]
    MalformedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width every row must have.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },
    /// A cell holds a value outside the terrain enumeration.
    #[error("unknown terrain code {code} at column {column}, row {row}")]
    UnknownTerrainCode {
        /// Zero-based row of the cell.
        row: usize,
        /// Zero-based column of the cell.
        column: usize,
        /// Raw value that failed to resolve.
        code: u8,
    },
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Continuous position of the cell's top-left corner in tile units.
    #[must_use]
    pub fn position(&self) -> Position {
        Position::new(self.column as f32, self.row as f32)
    }
}

/// Immutable rectangular grid of terrain codes describing one level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    columns: usize,
    rows: usize,
    cells: Vec<TerrainCode>,
}

impl TileGrid {
    /// Builds a grid from rows of terrain codes, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<TerrainCode>>) -> Result<Self, GridError> {
        let columns = rows.first().map_or(0, Vec::len);
        if columns == 0 {
            return Err(GridError::Empty);
        }

        let row_count = rows.len();
        let mut cells = Vec::with_capacity(columns * row_count);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != columns {
                return Err(GridError::MalformedRow {
                    row: index,
                    expected: columns,
                    actual: row.len(),
                });
            }
            cells.extend(row);
        }

        Ok(Self {
            columns,
            rows: row_count,
            cells,
        })
    }

    /// Builds a grid from the raw numeric codes a level loader produces.
    pub fn from_codes(rows: &[Vec<u8>]) -> Result<Self, GridError> {
        let mut resolved = Vec::with_capacity(rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let mut terrain = Vec::with_capacity(row.len());
            for (column, &code) in row.iter().enumerate() {
                let code =
                    TerrainCode::try_from(code).map_err(|code| GridError::UnknownTerrainCode {
                        row: row_index,
                        column,
                        code,
                    })?;
                terrain.push(code);
            }
            resolved.push(terrain);
        }
        Self::from_rows(resolved)
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the terrain at the provided signed coordinates, if inside the grid.
    #[must_use]
    pub fn terrain(&self, column: i64, row: i64) -> Option<TerrainCode> {
        let column = usize::try_from(column).ok()?;
        let row = usize::try_from(row).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.columns + column).copied()
    }

    /// Iterates every cell in row-major order alongside its coordinate.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, TerrainCode)> + '_ {
        let columns = self.columns;
        self.cells.iter().enumerate().map(move |(index, &code)| {
            let column = (index % columns) as u32;
            let row = (index / columns) as u32;
            (CellCoord::new(column, row), code)
        })
    }

    /// Coordinates of every cell holding the provided terrain code.
    pub fn cells_with(&self, code: TerrainCode) -> impl Iterator<Item = CellCoord> + '_ {
        self.iter()
            .filter(move |(_, terrain)| *terrain == code)
            .map(|(cell, _)| cell)
    }
}

/// Continuous position in tile units; `x` grows rightward and `y` downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate measured in tiles.
    pub x: f32,
    /// Vertical coordinate measured in tiles.
    pub y: f32,
}

impl Position {
    /// Creates a position from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Reports whether two one-tile sprites anchored at the positions overlap.
    #[must_use]
    pub fn overlaps(self, other: Position) -> bool {
        (self.x - other.x).abs() < 1.0 && (self.y - other.y).abs() < 1.0
    }
}

/// Speed of an entity in tiles per second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    /// Horizontal speed; positive values move rightward.
    pub hspeed: f32,
    /// Vertical speed; positive values move downward.
    pub vspeed: f32,
}

/// Nearest blocking boundaries around an entity plus terrain feature flags.
///
/// Recomputed every frame and never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollisionModel {
    /// Lowest row the entity may reach moving upward.
    pub top: f32,
    /// Highest row the entity may reach moving downward.
    pub bottom: f32,
    /// Lowest column the entity may reach moving leftward.
    pub left: f32,
    /// Highest column the entity may reach moving rightward.
    pub right: f32,
    /// Entity sits exactly on the leftmost or rightmost grid column.
    pub is_map_border: bool,
    /// Entity stands grid-aligned on a ledge whose floor continues diagonally.
    pub is_terrain_corner: bool,
    /// Entity occupies a water cell.
    pub is_water: bool,
}

impl CollisionModel {
    /// Boundaries spanning the whole grid with every flag cleared.
    #[must_use]
    pub fn outer_extent(grid: &TileGrid) -> Self {
        Self {
            top: 0.0,
            bottom: grid.rows().saturating_sub(1) as f32,
            left: 0.0,
            right: grid.columns().saturating_sub(1) as f32,
            is_map_border: false,
            is_terrain_corner: false,
            is_water: false,
        }
    }
}

/// Movement-support classification derived from a [`CollisionModel`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Support {
    /// Standing on a floor or clinging to a side wall away from the map edge.
    pub has_support: bool,
    /// Airborne inside the vertical play space and not propped by a corner.
    pub is_floating: bool,
    /// Standing on a floor or a terrain corner; gates walking and jumping.
    pub has_footing: bool,
    /// Resting exactly on the nearest floor.
    pub on_floor: bool,
    /// Pressed against the nearest wall on the left.
    pub against_left: bool,
    /// Pressed against the nearest wall on the right.
    pub against_right: bool,
    /// Sitting on the leftmost or rightmost grid column.
    pub on_map_border: bool,
    /// Submerged in water.
    pub in_water: bool,
}

impl Support {
    /// Reports whether the entity clings to a side wall it could climb.
    #[must_use]
    pub const fn is_clinging(&self) -> bool {
        !self.on_map_border && (self.against_left || self.against_right)
    }
}

/// Physics constants governing player and cannon behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Lateral walking speed in tiles per second.
    pub hmaxspeed: f32,
    /// Climbing and crouching speed in tiles per second.
    pub vmaxspeed: f32,
    /// Gravity added to the vertical speed per elapsed millisecond.
    pub v_acceleration: f32,
    /// Vertical speed applied by a jump; negative is upward.
    pub v_jump: f32,
    /// Fraction of speed water removes on every dive step.
    pub water_drag: f32,
    /// Divisor applied to the walking speed when launching a lateral jump.
    pub lateral_jump_divisor: f32,
    /// Milliseconds a cannon waits between shots.
    pub cannon_fire_delay_ms: u64,
    /// Maximum cannonballs a single cannon keeps in flight.
    pub max_cannonballs: usize,
    /// Horizontal cannonball speed in tiles per second.
    pub cannonball_speed: f32,
}

impl Tuning {
    /// Delay between cannon shots as a duration.
    #[must_use]
    pub const fn cannon_fire_delay(&self) -> Duration {
        Duration::from_millis(self.cannon_fire_delay_ms)
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            hmaxspeed: 10.0,
            vmaxspeed: 2.0,
            v_acceleration: 0.02,
            v_jump: -7.0,
            water_drag: 0.2,
            lateral_jump_divisor: 1.3,
            cannon_fire_delay_ms: 3000,
            max_cannonballs: 2,
            cannonball_speed: -8.0,
        }
    }
}

/// Reasons the player may die during a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// Hit the floor descending faster than twice the jump impulse.
    FallImpact,
    /// Dove into water without an oxygen tank.
    Drowned,
    /// Struck by a cannonball.
    Projectile,
}

/// Unique identifier assigned to a cannon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CannonId(u32);

impl CannonId {
    /// Creates a new cannon identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a cannonball.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CannonballId(u32);

impl CannonballId {
    /// Creates a new cannonball identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances cannons and cannonballs by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Zeroes both speed components of the player.
    HaltPlayer,
    /// Walks the player sideways.
    MoveLateral {
        /// Signed fraction of the walking speed; negative moves left.
        direction: f32,
        /// Elapsed frame time.
        dt: Duration,
    },
    /// Climbs or crouches the player.
    MoveVertical {
        /// Signed fraction of the climbing speed; negative moves up.
        direction: f32,
        /// Elapsed frame time.
        dt: Duration,
    },
    /// Launches the player straight up.
    Jump {
        /// Elapsed frame time.
        dt: Duration,
    },
    /// Launches the player diagonally.
    JumpLateral {
        /// Sign of the horizontal launch; negative jumps left.
        direction: f32,
        /// Elapsed frame time.
        dt: Duration,
    },
    /// Applies gravity to an airborne player.
    Fall {
        /// Elapsed frame time.
        dt: Duration,
    },
    /// Applies water drag to a submerged player.
    Dive {
        /// Elapsed frame time.
        dt: Duration,
    },
    /// Probes terrain at the tentative position, clamps, and resolves contacts.
    ResolveFrame,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a cannon launched a cannonball.
    CannonFired {
        /// Cannon that fired.
        cannon: CannonId,
        /// Identifier assigned to the new cannonball.
        cannonball: CannonballId,
    },
    /// Reports that a cannonball left the grid or struck a wall.
    CannonballExpired {
        /// Cannonball that was removed.
        cannonball: CannonballId,
    },
    /// Reports the player's clamped position and fresh support classification.
    FrameResolved {
        /// Position after clamping.
        position: Position,
        /// Support derived from this frame's probe.
        support: Support,
    },
    /// Confirms that the player picked up an oxygen tank.
    OxygenCollected {
        /// Cell the tank was spawned at.
        cell: CellCoord,
    },
    /// Announces that the player touched a goal tile.
    GoalReached {
        /// Cell of the goal that was touched.
        cell: CellCoord,
    },
    /// Announces that the player died.
    PlayerDied {
        /// What killed the player.
        cause: DeathCause,
    },
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Current position in tile units.
    pub position: Position,
    /// Current speed in tiles per second.
    pub velocity: Velocity,
    /// Classification computed by the most recent frame resolution.
    pub support: Support,
    /// Whether the player carries an oxygen tank.
    pub has_oxygen: bool,
    /// Whether the player has died.
    pub is_dead: bool,
}

/// Discrete directional input sampled once per frame.
///
/// Mirrors the numpad layout: 4/6 walk, 8 jumps or climbs, 2 crouches or
/// swims down, 7/9 jump diagonally and 1/3 swim diagonally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FrameInput {
    /// Numpad 4.
    pub left: bool,
    /// Numpad 6.
    pub right: bool,
    /// Numpad 8.
    pub up: bool,
    /// Numpad 2.
    pub down: bool,
    /// Numpad 7.
    pub up_left: bool,
    /// Numpad 9.
    pub up_right: bool,
    /// Numpad 1.
    pub down_left: bool,
    /// Numpad 3.
    pub down_right: bool,
}

impl FrameInput {
    /// Builds an input from numpad digits; unknown characters are ignored.
    #[must_use]
    pub fn from_numpad(keys: &str) -> Self {
        let mut input = Self::default();
        for key in keys.chars() {
            match key {
                '1' => input.down_left = true,
                '2' => input.down = true,
                '3' => input.down_right = true,
                '4' => input.left = true,
                '6' => input.right = true,
                '7' => input.up_left = true,
                '8' => input.up = true,
                '9' => input.up_right = true,
                _ => {}
            }
        }
        input
    }
}

/// Kinds of entities a renderer draws on top of the tile grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    /// The player character.
    Player,
    /// A level exit.
    Goal,
    /// A cannon turret.
    Cannon,
    /// A projectile in flight.
    Cannonball,
    /// An oxygen tank pickup.
    OxygenTank,
}

/// Visual state a sprite should be drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pose {
    /// Default appearance.
    Normal,
    /// Appearance of a dead player.
    Dead,
}

/// Renderable entity placed in tile space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteInstance {
    /// Render group the sprite belongs to.
    pub kind: EntityKind,
    /// Top-left corner in tile units.
    pub position: Position,
    /// Visual state of the sprite.
    pub pose: Pose,
}

/// Maps tile-space positions onto a pixel surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenProjection {
    width: f32,
    height: f32,
    columns: usize,
    rows: usize,
}

impl ScreenProjection {
    /// Creates a projection for a surface of the given pixel size and grid.
    #[must_use]
    pub fn new(width: f32, height: f32, grid: &TileGrid) -> Self {
        Self {
            width,
            height,
            columns: grid.columns(),
            rows: grid.rows(),
        }
    }

    /// Converts a tile-space position into pixel coordinates.
    #[must_use]
    pub fn project(&self, position: Position) -> (f32, f32) {
        (
            position.x * self.width / self.columns as f32,
            position.y * self.height / self.rows as f32,
        )
    }

    /// Pixel size of a single tile.
    #[must_use]
    pub fn tile_size(&self) -> (f32, f32) {
        (
            self.width / self.columns as f32,
            self.height / self.rows as f32,
        )
    }
}
