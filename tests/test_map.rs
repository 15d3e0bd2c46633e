use pixel_quest::map::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

fn border_cells(map: &TileMap) -> Vec<GridPos> {
    map.cells()
        .map(|(cell, _)| cell)
        .filter(|c| c.x == 0 || c.y == 0 || c.x + 1 == map.width() || c.y + 1 == map.height())
        .collect()
}

// ── generate ──────────────────────────────────────────────────────────────────

#[test]
fn generate_uses_fixed_grid_size() {
    let map = TileMap::generate(1, &mut seeded_rng(1));
    assert_eq!(map.width(), GRID_WIDTH);
    assert_eq!(map.height(), GRID_HEIGHT);
}

#[test]
fn border_is_always_wall_and_never_walkable() {
    for level in 1..=5 {
        for seed in 0..20 {
            let map = TileMap::generate(level, &mut seeded_rng(seed));
            for cell in border_cells(&map) {
                assert_eq!(map.tile(cell), Some(Tile::Wall), "level {level} seed {seed} {cell:?}");
                assert!(!map.is_walkable(cell.x as i64, cell.y as i64));
            }
        }
    }
}

#[test]
fn fixed_features_survive_random_fill() {
    for seed in 0..20 {
        let l1 = TileMap::generate(1, &mut seeded_rng(seed));
        assert_eq!(l1.tile(GridPos::new(10, 7)), Some(Tile::Door));

        let l2 = TileMap::generate(2, &mut seeded_rng(seed));
        assert_eq!(l2.tile(GridPos::new(10, 7)), Some(Tile::Door));
        assert_eq!(l2.tile(GridPos::new(15, 7)), Some(Tile::Door));

        let l3 = TileMap::generate(3, &mut seeded_rng(seed));
        for door in [GridPos::new(8, 5), GridPos::new(10, 9), GridPos::new(15, 7)] {
            assert_eq!(l3.tile(door), Some(Tile::Door));
        }
    }
}

#[test]
fn level_one_has_no_water() {
    for seed in 0..20 {
        let map = TileMap::generate(1, &mut seeded_rng(seed));
        assert!(map.cells().all(|(_, t)| t != Tile::Water));
    }
}

/// A water cell is accounted for when some blob anchor next to it (itself,
/// left or above) has its full anchor/right/below shape in water. Fixed
/// doors and the exit are stamped afterwards and may cover part of a blob.
fn belongs_to_blob(map: &TileMap, cell: GridPos) -> bool {
    let stamped = |x: usize, y: usize| {
        matches!(map.tile(GridPos::new(x, y)), Some(Tile::Water | Tile::Door | Tile::Exit))
    };
    let anchors = [
        Some((cell.x, cell.y)),
        cell.x.checked_sub(1).map(|x| (x, cell.y)),
        cell.y.checked_sub(1).map(|y| (cell.x, y)),
    ];
    anchors
        .into_iter()
        .flatten()
        .any(|(x, y)| stamped(x, y) && stamped(x + 1, y) && stamped(x, y + 1))
}

#[test]
fn water_blobs_on_later_levels() {
    for level in 2..=3 {
        for seed in 0..30 {
            let map = TileMap::generate(level, &mut seeded_rng(seed));
            let water: Vec<GridPos> = map
                .cells()
                .filter(|&(_, t)| t == Tile::Water)
                .map(|(cell, _)| cell)
                .collect();

            // At least one blob survives whole: an anchor plus two neighbours.
            assert!(water.len() >= 3, "level {level} seed {seed}: {} water", water.len());
            for &cell in &water {
                assert!(cell.x > 1 && cell.y > 1, "level {level} seed {seed} {cell:?}");
                assert!(cell.x + 1 < GRID_WIDTH && cell.y + 1 < GRID_HEIGHT);
                assert_ne!(cell, GridPos::new(2, 2));
                assert!(belongs_to_blob(&map, cell), "level {level} seed {seed} {cell:?}");
            }
        }
    }
}

#[test]
fn lone_blob_has_anchor_right_and_below() {
    // A water cell with nothing stamped to its left or above can only be a
    // blob anchor, so its right and lower neighbours must be stamped too.
    let mut anchors = 0;
    for seed in 0..30 {
        let map = TileMap::generate(2, &mut seeded_rng(seed));
        let covered = |x: usize, y: usize| {
            matches!(map.tile(GridPos::new(x, y)), Some(Tile::Water | Tile::Door | Tile::Exit))
        };
        for (cell, tile) in map.cells() {
            if tile != Tile::Water || covered(cell.x - 1, cell.y) || covered(cell.x, cell.y - 1) {
                continue;
            }
            assert!(covered(cell.x + 1, cell.y), "seed {seed} {cell:?}");
            assert!(covered(cell.x, cell.y + 1), "seed {seed} {cell:?}");
            anchors += 1;
        }
    }
    assert!(anchors > 0);
}

#[test]
fn start_cell_is_never_an_obstacle() {
    for level in 1..=3 {
        for seed in 0..50 {
            let map = TileMap::generate(level, &mut seeded_rng(seed));
            assert_eq!(map.tile(GridPos::new(2, 2)), Some(Tile::Grass));
        }
    }
}

#[test]
fn same_seed_same_map() {
    let a = TileMap::generate(3, &mut seeded_rng(7));
    let b = TileMap::generate(3, &mut seeded_rng(7));
    assert_eq!(a, b);
}

#[test]
fn out_of_range_level_reuses_last_recipe() {
    let l3 = TileMap::generate(3, &mut seeded_rng(9));
    let l9 = TileMap::generate(9, &mut seeded_rng(9));
    assert_eq!(l3, l9);
}

// ── exit_position ─────────────────────────────────────────────────────────────

#[test]
fn exit_position_points_at_exit_tile() {
    for level in 1..=4 {
        let map = TileMap::generate(level, &mut seeded_rng(level as u64));
        let exit = map.exit_position();
        assert_eq!(map.tile(exit), Some(Tile::Exit));
        assert_eq!(exit, GridPos::new(18, 2));
    }
}

#[test]
fn exit_position_falls_back_when_missing() {
    let map = TileMap::bordered(GRID_WIDTH, GRID_HEIGHT);
    assert_eq!(map.exit_position(), GridPos::new(GRID_WIDTH - 2, 1));
}

#[test]
fn exit_position_takes_first_in_row_major_order() {
    let map = TileMap::bordered(GRID_WIDTH, GRID_HEIGHT)
        .with_tile(GridPos::new(4, 6), Tile::Exit)
        .with_tile(GridPos::new(12, 3), Tile::Exit);
    assert_eq!(map.exit_position(), GridPos::new(12, 3));
}

// ── walkability ───────────────────────────────────────────────────────────────

#[test]
fn walkable_tile_kinds() {
    assert!(Tile::Grass.is_walkable());
    assert!(Tile::Dirt.is_walkable());
    assert!(Tile::Exit.is_walkable());
    assert!(!Tile::Water.is_walkable());
    assert!(!Tile::Wall.is_walkable());
    assert!(!Tile::Door.is_walkable());
    assert!(!Tile::Stone.is_walkable());
}

#[test]
fn out_of_bounds_is_not_walkable() {
    let map = TileMap::bordered(GRID_WIDTH, GRID_HEIGHT);
    assert!(!map.is_walkable(-1, 5));
    assert!(!map.is_walkable(5, -1));
    assert!(!map.is_walkable(GRID_WIDTH as i64, 5));
    assert!(!map.is_walkable(5, GRID_HEIGHT as i64));
    assert!(map.is_walkable(5, 5));
}

#[test]
fn can_walk_checks_all_four_corners() {
    let map = TileMap::bordered(GRID_WIDTH, GRID_HEIGHT).with_tile(GridPos::new(4, 2), Tile::Wall);
    // Box entirely inside cell (2,2)..(3,2)
    assert!(map.can_walk(32.0, 32.0, 12.0, 14.0));
    // Right edge reaches into the wall at (4,2)
    assert!(!map.can_walk(54.0, 32.0, 12.0, 14.0));
    // Box touching the left border wall
    assert!(!map.can_walk(10.0, 32.0, 12.0, 14.0));
}

#[test]
fn can_walk_blocks_water() {
    let map = TileMap::bordered(GRID_WIDTH, GRID_HEIGHT).with_tile(GridPos::new(3, 3), Tile::Water);
    assert!(!map.can_walk(40.0, 40.0, 12.0, 14.0));
}

// ── positions ─────────────────────────────────────────────────────────────────

#[test]
fn start_position_is_cell_two_two() {
    let map = TileMap::generate(2, &mut seeded_rng(3));
    assert_eq!(map.start_position(), (32.0, 32.0));
}

#[test]
fn random_walkable_position_lands_on_walkable_cell() {
    for level in 1..=3 {
        let mut rng = seeded_rng(level as u64 * 31);
        let map = TileMap::generate(level, &mut rng);
        for _ in 0..200 {
            let (x, y) = map.random_walkable_position(&mut rng);
            let (gx, gy) = pixel_to_cell(x, y);
            assert!(map.is_walkable(gx, gy) || (gx, gy) == (5, 5));
            assert!((2..GRID_WIDTH as i64 - 2).contains(&gx));
            assert!((2..GRID_HEIGHT as i64 - 2).contains(&gy));
        }
    }
}

#[test]
fn random_walkable_position_falls_back_when_nothing_is_free() {
    let mut map = TileMap::bordered(GRID_WIDTH, GRID_HEIGHT);
    for y in 0..GRID_HEIGHT {
        for x in 0..GRID_WIDTH {
            map = map.with_tile(GridPos::new(x, y), Tile::Wall);
        }
    }
    let pos = map.random_walkable_position(&mut seeded_rng(0));
    assert_eq!(pos, (80.0, 80.0));
}

#[test]
fn pixel_to_cell_floors() {
    assert_eq!(pixel_to_cell(0.0, 0.0), (0, 0));
    assert_eq!(pixel_to_cell(15.9, 16.0), (0, 1));
    assert_eq!(pixel_to_cell(-0.5, 3.0), (-1, 0));
}
