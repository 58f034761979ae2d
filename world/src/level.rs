//! Text level loader producing validated tile grids.

use superfco_core::{GridError, TerrainCode, TileGrid};
use thiserror::Error;

/// Line that stands for a full row of empty terrain.
const EMPTY_ROW_MARKER: &str = "0";

/// Reasons a level description cannot be turned into a playable level.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    /// A row contains a character that is not a decimal digit.
    #[error("row {row} column {column} holds `{character}`, expected a terrain digit")]
    InvalidCharacter {
        /// Zero-based row of the character.
        row: usize,
        /// Zero-based column of the character.
        column: usize,
        /// Offending character.
        character: char,
    },
    /// The rows do not form a valid rectangular grid of known terrain.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The level has no player spawn tile.
    #[error("level has no player spawn tile")]
    MissingPlayer,
    /// The level has more than one player spawn tile.
    #[error("level has {count} player spawn tiles, expected exactly one")]
    MultiplePlayers {
        /// Number of spawn tiles found.
        count: usize,
    },
}

/// Parses a level where each line is one row of terrain digits.
///
/// Blank lines and lines holding only `0` expand to a row of empty terrain
/// `columns` wide. Every other line must be exactly `columns` digits long.
/// Surrounding whitespace on each line is ignored.
pub fn parse_level(text: &str, columns: usize) -> Result<TileGrid, LevelError> {
    let mut rows = Vec::new();
    for (row, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line == EMPTY_ROW_MARKER {
            rows.push(vec![TerrainCode::Empty.code(); columns]);
            continue;
        }

        let mut codes = Vec::with_capacity(columns);
        for (column, character) in line.chars().enumerate() {
            let digit = character
                .to_digit(10)
                .ok_or(LevelError::InvalidCharacter {
                    row,
                    column,
                    character,
                })?;
            codes.push(digit as u8);
        }
        if codes.len() != columns {
            return Err(GridError::MalformedRow {
                row,
                expected: columns,
                actual: codes.len(),
            }
            .into());
        }
        rows.push(codes);
    }

    Ok(TileGrid::from_codes(&rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_zero_lines_become_empty_rows() {
        let grid = parse_level("1121\n\n0\n2222\n", 4).expect("valid level");

        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.columns(), 4);
        for column in 0..4 {
            assert_eq!(grid.terrain(column, 1), Some(TerrainCode::Empty));
            assert_eq!(grid.terrain(column, 2), Some(TerrainCode::Empty));
            assert_eq!(grid.terrain(column, 3), Some(TerrainCode::Wall));
        }
        assert_eq!(grid.terrain(2, 0), Some(TerrainCode::Wall));
    }

    #[test]
    fn lines_are_trimmed_before_measuring() {
        let grid = parse_level("  1311  \r\n2222", 4).expect("valid level");

        assert_eq!(grid.terrain(1, 0), Some(TerrainCode::Player));
    }

    #[test]
    fn short_rows_are_rejected() {
        let error = parse_level("1111\n111\n", 4).expect_err("short row");

        assert_eq!(
            error,
            LevelError::Grid(GridError::MalformedRow {
                row: 1,
                expected: 4,
                actual: 3,
            })
        );
    }

    #[test]
    fn non_digits_are_rejected() {
        let error = parse_level("11x1", 4).expect_err("letter in row");

        assert_eq!(
            error,
            LevelError::InvalidCharacter {
                row: 0,
                column: 2,
                character: 'x',
            }
        );
    }

    #[test]
    fn unassigned_digits_are_rejected() {
        let error = parse_level("1151", 4).expect_err("code 5 is unassigned");

        assert!(matches!(
            error,
            LevelError::Grid(GridError::UnknownTerrainCode { code: 5, .. })
        ));
    }

    #[test]
    fn empty_text_is_rejected() {
        assert_eq!(parse_level("", 4), Err(LevelError::Grid(GridError::Empty)));
    }
}
