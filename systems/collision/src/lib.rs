#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terrain collision probe and movement-support classification.
//!
//! [`probe`] casts axis-aligned rays from an entity's continuous position
//! across the tile grid and reports the nearest blocking edge in each
//! direction. The support predicates in this crate turn that report into the
//! grounded / floating / footing classification the director gates input on.
//! Both halves are pure functions of the grid and a position; [`sweep`]
//! extends the probe to a whole integration step.

mod support;

pub use support::{classify, has_footing, has_support, is_floating};

use superfco_core::{CollisionModel, Position, TerrainCode, TileGrid};
use thiserror::Error;

/// Maximum distance from an integer coordinate that still counts as grid-aligned
/// when testing for terrain corners. Tunable; not physically derived.
pub const CORNER_EPSILON: f32 = 0.05;

/// Reasons a probe request is rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ProbeError {
    /// The position is not finite or lies a full tile or more outside the grid.
    #[error("position ({x}, {y}) lies outside the probe-able grid extent")]
    OutOfBounds {
        /// Rejected horizontal coordinate.
        x: f32,
        /// Rejected vertical coordinate.
        y: f32,
    },
}

/// Computes the nearest blocking boundaries and terrain flags around `position`.
///
/// Positions may overshoot the grid by less than one tile, which happens
/// routinely between tentative integration and clamping. Anything further
/// out is a contract violation reported as [`ProbeError::OutOfBounds`].
pub fn probe(grid: &TileGrid, position: Position) -> Result<CollisionModel, ProbeError> {
    ensure_within_reach(grid, position)?;

    let mut model = CollisionModel::outer_extent(grid);
    model.is_map_border = position.x == model.left || position.x == model.right;

    for (cell, terrain) in grid.iter() {
        let column = cell.column() as f32;
        let row = cell.row() as f32;
        // strict `< 1.0`: a cell exactly one tile away is not adjacent
        let same_row = (position.y - row).abs() < 1.0;
        let same_column = (position.x - column).abs() < 1.0;

        if terrain.is_blocking() {
            if same_row {
                let edge = column - 1.0;
                if edge >= position.x && edge < model.right {
                    model.right = edge;
                }
                let edge = column + 1.0;
                if edge <= position.x && edge > model.left {
                    model.left = edge;
                }
            }
            if same_column {
                let edge = row - 1.0;
                if edge >= position.y && edge < model.bottom {
                    model.bottom = edge;
                }
                let edge = row + 1.0;
                if edge <= position.y && edge > model.top {
                    model.top = edge;
                }
            }
        } else if terrain.is_water() && same_row && same_column {
            model.is_water = true;
        }
    }

    model.is_terrain_corner = is_terrain_corner(grid, position);
    Ok(model)
}

/// Probes `to` and tightens its boundaries with those seen from `from`.
///
/// A single integration step can carry an entity past the near edge of a
/// blocking tile, at which point a probe of the destination alone no longer
/// sees that tile. Intersecting with the boundaries seen from the step's
/// origin keeps such edges in force. Flags always describe `to`.
pub fn sweep(
    grid: &TileGrid,
    from: Position,
    to: Position,
) -> Result<CollisionModel, ProbeError> {
    let origin = probe(grid, from)?;
    let mut model = probe(grid, to)?;

    model.top = model.top.max(origin.top);
    model.bottom = model.bottom.min(origin.bottom);
    model.left = model.left.max(origin.left);
    model.right = model.right.min(origin.right);
    Ok(model)
}

fn ensure_within_reach(grid: &TileGrid, position: Position) -> Result<(), ProbeError> {
    let Position { x, y } = position;
    let reachable = x.is_finite()
        && y.is_finite()
        && x > -1.0
        && y > -1.0
        && x < grid.columns() as f32
        && y < grid.rows() as f32;

    if reachable {
        Ok(())
    } else {
        Err(ProbeError::OutOfBounds { x, y })
    }
}

/// Detects a grid-aligned entity hovering over open space beside a ledge whose
/// floor continues diagonally below, on either side.
fn is_terrain_corner(grid: &TileGrid, position: Position) -> bool {
    let column = position.x.round();
    let row = position.y.round();
    if (column - position.x).abs() >= CORNER_EPSILON || (row - position.y).abs() >= CORNER_EPSILON
    {
        return false;
    }

    let column = column as i64;
    let row = row as i64;
    let passable = |column, row| grid.terrain(column, row).is_some_and(TerrainCode::is_passable);
    let blocking = |column, row| grid.terrain(column, row).is_some_and(TerrainCode::is_blocking);

    if !passable(column, row + 1) {
        return false;
    }

    [-1, 1]
        .into_iter()
        .any(|side| passable(column + side, row) && blocking(column + side, row + 1))
}
