/// Level grid: generation, walkability and well-known cells.
///
/// The grid is built once per level and never changes afterwards; all
/// queries borrow it immutably.

use rand::Rng;
use tracing::debug;

pub const TILE_SIZE: f32 = 16.0;
pub const GRID_WIDTH: usize = 20;
pub const GRID_HEIGHT: usize = 15;
pub const CANVAS_WIDTH: f32 = GRID_WIDTH as f32 * TILE_SIZE;
pub const CANVAS_HEIGHT: f32 = GRID_HEIGHT as f32 * TILE_SIZE;

/// Random obstacles and samples stay this many cells away from the edge.
const INTERIOR_MARGIN: usize = 2;
const START_CELL: GridPos = GridPos { x: 2, y: 2 };
const SAMPLE_ATTEMPTS: u32 = 100;
const SAMPLE_FALLBACK: GridPos = GridPos { x: 5, y: 5 };
const EXIT_CELL: GridPos = GridPos { x: 18, y: 2 };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Grass,
    Stone,
    Water,
    Dirt,
    Wall,
    Door,
    Exit,
}

impl Tile {
    pub fn is_walkable(self) -> bool {
        matches!(self, Tile::Grass | Tile::Dirt | Tile::Exit)
    }
}

/// A cell coordinate in grid units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridPos {
    pub x: usize,
    pub y: usize,
}

impl GridPos {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Top-left corner of the cell in pixel space.
    pub fn to_pixels(self) -> (f32, f32) {
        (self.x as f32 * TILE_SIZE, self.y as f32 * TILE_SIZE)
    }
}

// ── Per-level recipes ─────────────────────────────────────────────────────────

struct MapRecipe {
    walls: u32,
    water_blobs: u32,
    doors: &'static [GridPos],
}

const RECIPES: [MapRecipe; 3] = [
    MapRecipe {
        walls: 10,
        water_blobs: 0,
        doors: &[GridPos { x: 10, y: 7 }],
    },
    MapRecipe {
        walls: 20,
        water_blobs: 5,
        doors: &[GridPos { x: 10, y: 7 }, GridPos { x: 15, y: 7 }],
    },
    MapRecipe {
        walls: 30,
        water_blobs: 8,
        doors: &[
            GridPos { x: 8, y: 5 },
            GridPos { x: 10, y: 9 },
            GridPos { x: 15, y: 7 },
        ],
    },
];

fn recipe_for(level: u32) -> &'static MapRecipe {
    let index = (level.max(1) as usize - 1).min(RECIPES.len() - 1);
    &RECIPES[index]
}

// ── TileMap ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct TileMap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// A grass field of the given size enclosed by a wall border.
    pub fn bordered(width: usize, height: usize) -> Self {
        let mut tiles = vec![Tile::Grass; width * height];
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                    tiles[y * width + x] = Tile::Wall;
                }
            }
        }
        Self { width, height, tiles }
    }

    /// Build the map for `level`. Random obstacles go down first, then the
    /// fixed doors and exit are stamped on top so they always survive.
    pub fn generate(level: u32, rng: &mut impl Rng) -> Self {
        let recipe = recipe_for(level);
        let mut map = Self::bordered(GRID_WIDTH, GRID_HEIGHT);

        for _ in 0..recipe.walls {
            if let Some(cell) = map.random_interior(rng) {
                map.set(cell, Tile::Wall);
            }
        }
        for _ in 0..recipe.water_blobs {
            if let Some(cell) = map.random_interior(rng) {
                map.stamp_water(cell);
            }
        }
        for &door in recipe.doors {
            map.set(door, Tile::Door);
        }
        map.set(EXIT_CELL, Tile::Exit);

        debug!(level, walls = recipe.walls, water = recipe.water_blobs, "generated tile map");
        map
    }

    /// Return a copy with one cell replaced. Out-of-bounds cells are ignored.
    #[doc(hidden)]
    pub fn with_tile(mut self, cell: GridPos, tile: Tile) -> Self {
        self.set(cell, tile);
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile(&self, cell: GridPos) -> Option<Tile> {
        if cell.x < self.width && cell.y < self.height {
            Some(self.tiles[cell.y * self.width + cell.x])
        } else {
            None
        }
    }

    /// Row-major iteration over every cell and its tile.
    pub fn cells(&self) -> impl Iterator<Item = (GridPos, Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, &t)| (GridPos::new(i % self.width, i / self.width), t))
    }

    pub fn is_walkable(&self, cell_x: i64, cell_y: i64) -> bool {
        if cell_x < 0 || cell_y < 0 {
            return false;
        }
        self.tile(GridPos::new(cell_x as usize, cell_y as usize))
            .map_or(false, Tile::is_walkable)
    }

    /// True if all four corners of the box sit on walkable cells.
    pub fn can_walk(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        [(x, y), (x + width, y), (x, y + height), (x + width, y + height)]
            .iter()
            .all(|&(cx, cy)| {
                let (gx, gy) = pixel_to_cell(cx, cy);
                self.is_walkable(gx, gy)
            })
    }

    /// Pixel position of a random walkable interior cell, or of the fixed
    /// fallback cell if sampling keeps failing.
    pub fn random_walkable_position(&self, rng: &mut impl Rng) -> (f32, f32) {
        for _ in 0..SAMPLE_ATTEMPTS {
            let cell = self.sample_interior(rng);
            if self.is_walkable(cell.x as i64, cell.y as i64) {
                return cell.to_pixels();
            }
        }
        debug!(fallback = ?SAMPLE_FALLBACK, "no walkable cell sampled, using fallback");
        SAMPLE_FALLBACK.to_pixels()
    }

    pub fn start_position(&self) -> (f32, f32) {
        START_CELL.to_pixels()
    }

    /// First exit cell in row-major order, or the default exit cell.
    pub fn exit_position(&self) -> GridPos {
        self.cells()
            .find(|&(_, t)| t == Tile::Exit)
            .map(|(cell, _)| cell)
            .unwrap_or_else(|| GridPos::new(self.width.saturating_sub(2), 1))
    }

    // ── Generation helpers ───────────────────────────────────────────────────

    fn set(&mut self, cell: GridPos, tile: Tile) {
        if cell.x < self.width && cell.y < self.height {
            self.tiles[cell.y * self.width + cell.x] = tile;
        }
    }

    fn sample_interior(&self, rng: &mut impl Rng) -> GridPos {
        let x = rng.gen_range(INTERIOR_MARGIN..self.width - INTERIOR_MARGIN);
        let y = rng.gen_range(INTERIOR_MARGIN..self.height - INTERIOR_MARGIN);
        GridPos::new(x, y)
    }

    /// One placement attempt; the player's start cell is skipped, not retried.
    fn random_interior(&self, rng: &mut impl Rng) -> Option<GridPos> {
        let cell = self.sample_interior(rng);
        (cell != START_CELL).then_some(cell)
    }

    fn stamp_water(&mut self, anchor: GridPos) {
        self.set(anchor, Tile::Water);
        if anchor.x + 1 < self.width - 1 {
            self.set(GridPos::new(anchor.x + 1, anchor.y), Tile::Water);
        }
        if anchor.y + 1 < self.height - 1 {
            self.set(GridPos::new(anchor.x, anchor.y + 1), Tile::Water);
        }
    }
}

/// Grid cell containing a pixel-space point.
pub fn pixel_to_cell(x: f32, y: f32) -> (i64, i64) {
    ((x / TILE_SIZE).floor() as i64, (y / TILE_SIZE).floor() as i64)
}
