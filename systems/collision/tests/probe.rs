use superfco_core::{Position, TerrainCode, TileGrid};
use superfco_system_collision::{classify, has_support, probe};

fn grid(rows: &[&str]) -> TileGrid {
    let codes: Vec<Vec<u8>> = rows
        .iter()
        .map(|row| row.bytes().map(|byte| byte - b'0').collect())
        .collect();
    TileGrid::from_codes(&codes).expect("valid test grid")
}

fn open_grid(columns: usize, rows: usize) -> TileGrid {
    TileGrid::from_rows(vec![vec![TerrainCode::Empty; columns]; rows]).expect("valid grid")
}

#[test]
fn open_room_reports_outer_extent_everywhere_inside() {
    let grid = open_grid(12, 7);

    for step_x in 1..22 {
        for step_y in 1..12 {
            let position = Position::new(step_x as f32 * 0.5, step_y as f32 * 0.5);
            let model = probe(&grid, position).expect("position inside grid");

            assert_eq!(model.left, 0.0);
            assert_eq!(model.right, 11.0);
            assert_eq!(model.top, 0.0);
            assert_eq!(model.bottom, 6.0);
        }
    }
}

#[test]
fn single_wall_tile_bounds_movement_to_the_right() {
    let mut rows = vec![vec![TerrainCode::Empty; 10]; 6];
    rows[3][5] = TerrainCode::Wall;
    let grid = TileGrid::from_rows(rows).expect("valid grid");

    let model = probe(&grid, Position::new(3.0, 3.0)).expect("inside grid");

    assert_eq!(model.right, 4.0);
    assert_eq!(model.left, 0.0);
    assert_eq!(model.bottom, 5.0);
}

#[test]
fn boundaries_stay_ordered_around_dense_terrain() {
    let grid = grid(&[
        "2222222222",
        "2111121112",
        "2121111212",
        "2111711112",
        "2222222222",
    ]);

    for column in 0..10 {
        for row in 0..5 {
            let position = Position::new(column as f32 + 0.3, row as f32 + 0.6);
            let model = probe(&grid, position).expect("inside grid");
            assert!(model.left <= model.right, "{model:?} at {position:?}");
            assert!(model.top <= model.bottom, "{model:?} at {position:?}");
            assert!(model.left >= 0.0 && model.right <= 9.0);
            assert!(model.top >= 0.0 && model.bottom <= 4.0);
        }
    }
}

#[test]
fn ledge_corner_requires_grid_alignment() {
    let (x, y) = (3usize, 2usize);
    let mut rows = vec![vec![TerrainCode::Empty; 8]; 6];
    rows[y + 1][x + 1] = TerrainCode::Wall;
    let grid = TileGrid::from_rows(rows).expect("valid grid");

    let aligned = probe(&grid, Position::new(x as f32, y as f32)).expect("inside grid");
    let drifted = probe(&grid, Position::new(x as f32 + 0.2, y as f32)).expect("inside grid");

    assert!(aligned.is_terrain_corner);
    assert!(!drifted.is_terrain_corner);
}

#[test]
fn floor_contact_always_counts_as_support() {
    let grids = [
        open_grid(6, 4),
        grid(&["111111", "121121", "111111", "222222"]),
        grid(&["161111", "111711", "111111", "111111"]),
    ];

    for grid in &grids {
        for column in 0..6 {
            for row in 0..4 {
                let probe_at = Position::new(column as f32 + 0.25, row as f32);
                let model = probe(grid, probe_at).expect("inside grid");
                let grounded = Position::new(probe_at.x, model.bottom);

                assert!(has_support(&model, grounded));
                assert!(classify(&model, grounded).has_footing);
            }
        }
    }
}

#[test]
fn standing_on_a_platform_is_grounded_and_stepping_off_floats() {
    let grid = grid(&["111111", "111111", "122111", "111111"]);

    let on_platform = Position::new(2.0, 1.0);
    let support = classify(&probe(&grid, on_platform).unwrap(), on_platform);
    assert!(support.has_support && support.on_floor && !support.is_floating);

    let past_edge = Position::new(3.4, 1.0);
    let support = classify(&probe(&grid, past_edge).unwrap(), past_edge);
    assert!(support.is_floating && !support.has_footing);
}
