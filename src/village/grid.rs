//! Tile world model: terrain tags for the village and the home interior,
//! plus the solid grids derived from them.
//!
//! Solid grids are never patched. Whenever an obstacle changes they are
//! rebuilt from scratch: blanket pass first, walkable exceptions carved last.

use serde::{Deserialize, Serialize};

pub const COLS: i32 = 30;
pub const ROWS: i32 = 16;

pub const INTERIOR_COLS: i32 = 10;
pub const INTERIOR_ROWS: i32 = 10;
/// Top-left cell of the walkable interior inside the home grid.
pub const INTERIOR_ORIGIN: Cell = Cell::new(3, 10);

/// The home's exit: bottom row of the interior, centre column.
pub const HOME_DOOR: Cell = Cell::new(INTERIOR_ORIGIN.row + INTERIOR_ROWS - 1, INTERIOR_ORIGIN.col + 5);
/// Where the player appears when entering any house.
pub const HOME_SPAWN: Cell = Cell::new(HOME_DOOR.row - 1, HOME_DOOR.col);

/// Farm soil: rows 10..=13, cols 2..=8.
pub const FARM_ROWS: std::ops::RangeInclusive<i32> = 10..=13;
pub const FARM_COLS: std::ops::RangeInclusive<i32> = 2..=8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(self) -> bool {
        self.row >= 0 && self.col >= 0 && self.row < ROWS && self.col < COLS
    }

    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }

    fn index(self) -> Option<usize> {
        self.in_bounds()
            .then(|| (self.row * COLS + self.col) as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Grass,
    GrassDark,
    Path,
    PathBrick,
    Water,
    Dock,
    Soil,
    Wall,
    Floor,
    Rug,
    Door,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    tiles: Vec<Tile>,
}

impl TileMap {
    pub fn filled(tile: Tile) -> Self {
        Self {
            tiles: vec![tile; (ROWS * COLS) as usize],
        }
    }

    pub fn get(&self, cell: Cell) -> Option<Tile> {
        cell.index().map(|i| self.tiles[i])
    }

    pub fn set(&mut self, cell: Cell, tile: Tile) {
        if let Some(i) = cell.index() {
            self.tiles[i] = tile;
        }
    }

    /// Paint a `w`×`h` block whose top-left is column `col`, row `row`.
    pub fn paint_rect(&mut self, col: i32, row: i32, w: i32, h: i32, tile: Tile) {
        for r in row..row + h {
            for c in col..col + w {
                self.set(Cell::new(r, c), tile);
            }
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = (Cell, Tile)> + '_ {
        self.tiles.iter().enumerate().map(|(i, &tile)| {
            let i = i as i32;
            (Cell::new(i / COLS, i % COLS), tile)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolidGrid {
    solid: Vec<bool>,
}

impl Default for SolidGrid {
    fn default() -> Self {
        Self {
            solid: vec![false; (ROWS * COLS) as usize],
        }
    }
}

impl SolidGrid {
    /// Out-of-bounds cells count as solid.
    pub fn is_solid(&self, cell: Cell) -> bool {
        cell.index().map_or(true, |i| self.solid[i])
    }

    pub fn is_walkable(&self, cell: Cell) -> bool {
        !self.is_solid(cell)
    }

    pub fn set(&mut self, cell: Cell, solid: bool) {
        if let Some(i) = cell.index() {
            self.solid[i] = solid;
        }
    }

    pub fn set_rect(&mut self, col: i32, row: i32, w: i32, h: i32, solid: bool) {
        for r in row..row + h {
            for c in col..col + w {
                self.set(Cell::new(r, c), solid);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// VILLAGE LAYOUT
// ═══════════════════════════════════════════════════════════════════════

/// Decorations placed on top of the terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prop {
    Tree,
    Fence,
    Bush,
    Rock,
    Lantern,
    Sign,
    Well,
    Stall,
    Flower,
    Bench,
    Mailbox,
}

impl Prop {
    pub fn is_solid(self) -> bool {
        !matches!(self, Prop::Flower | Prop::Bench | Prop::Mailbox)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Building {
    pub col: i32,
    pub row: i32,
    pub w: i32,
    pub h: i32,
}

impl Building {
    /// Front door, one row below the roof block, centred.
    pub fn door(&self) -> Cell {
        Cell::new(self.row + self.h, self.col + self.w / 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Door {
    pub cell: Cell,
    /// The first building is the player's own house.
    pub is_player_home: bool,
}

pub const BUILDINGS: [Building; 4] = [
    Building { col: 3, row: 1, w: 4, h: 3 },
    Building { col: 10, row: 1, w: 4, h: 3 },
    Building { col: 18, row: 1, w: 5, h: 3 },
    Building { col: 22, row: 8, w: 4, h: 3 },
];

/// (col, row) of each tree.
const TREES: [(i32, i32); 8] = [(1, 6), (2, 12), (4, 14), (26, 12), (28, 14), (12, 13), (24, 3), (6, 3)];
const BUSHES: [Cell; 5] = [
    Cell::new(2, 26),
    Cell::new(3, 26),
    Cell::new(2, 27),
    Cell::new(12, 20),
    Cell::new(13, 20),
];
const ROCKS: [Cell; 3] = [Cell::new(8, 4), Cell::new(8, 5), Cell::new(15, 18)];
const LANTERNS: [Cell; 3] = [Cell::new(6, 11), Cell::new(6, 18), Cell::new(11, 14)];
const FLOWERS: [Cell; 8] = [
    Cell::new(4, 8),
    Cell::new(4, 9),
    Cell::new(4, 10),
    Cell::new(9, 12),
    Cell::new(9, 13),
    Cell::new(9, 14),
    Cell::new(12, 17),
    Cell::new(13, 17),
];
const BENCHES: [Cell; 2] = [Cell::new(8, 16), Cell::new(13, 23)];
const SIGN: Cell = Cell::new(7, 15);
const WELL: Cell = Cell::new(5, 13);
/// Market stall; facing it and interacting buys the selected furniture.
pub const STALL: Cell = Cell::new(5, 8);
const BRIDGE: [Cell; 3] = [Cell::new(12, 22), Cell::new(12, 23), Cell::new(12, 24)];

#[derive(Debug, Clone, PartialEq)]
pub struct VillageMap {
    pub tiles: TileMap,
    pub doors: Vec<Door>,
    pub props: Vec<(Cell, Prop)>,
    pub bridge: Vec<Cell>,
    pub docks: Vec<Cell>,
    /// Pond cells shallow enough to wade through.
    pub shallows: Vec<Cell>,
}

impl VillageMap {
    pub fn build() -> Self {
        let mut tiles = TileMap::filled(Tile::Grass);
        tiles.paint_rect(2, 6, 26, 2, Tile::Path);
        tiles.paint_rect(14, 2, 2, 12, Tile::Path);
        tiles.paint_rect(6, 8, 2, 7, Tile::Path);
        tiles.paint_rect(20, 8, 2, 5, Tile::Path);
        tiles.paint_rect(11, 4, 6, 2, Tile::PathBrick);
        tiles.paint_rect(21, 10, 7, 5, Tile::Water);
        tiles.paint_rect(0, 0, 5, 4, Tile::GrassDark);
        tiles.paint_rect(25, 0, 5, 4, Tile::GrassDark);
        tiles.paint_rect(22, 12, 3, 1, Tile::Dock);
        tiles.paint_rect(23, 11, 1, 2, Tile::Dock);

        let mut docks = Vec::new();
        let mut shallows = Vec::new();
        for (cell, tile) in tiles.cells() {
            match tile {
                Tile::Dock => docks.push(cell),
                Tile::Water => shallows.push(cell),
                _ => {}
            }
        }

        for row in FARM_ROWS {
            for col in FARM_COLS {
                tiles.set(Cell::new(row, col), Tile::Soil);
            }
        }

        let doors: Vec<Door> = BUILDINGS
            .iter()
            .enumerate()
            .map(|(i, building)| Door {
                cell: building.door(),
                is_player_home: i == 0,
            })
            .collect();
        for door in &doors {
            carve_front_path(&mut tiles, door.cell);
        }

        let mut props: Vec<(Cell, Prop)> = Vec::new();
        props.extend(TREES.iter().map(|&(col, row)| (Cell::new(row, col), Prop::Tree)));
        props.extend(fence_cells().into_iter().map(|cell| (cell, Prop::Fence)));
        props.extend(BUSHES.iter().map(|&cell| (cell, Prop::Bush)));
        props.extend(ROCKS.iter().map(|&cell| (cell, Prop::Rock)));
        props.extend(LANTERNS.iter().map(|&cell| (cell, Prop::Lantern)));
        props.extend(FLOWERS.iter().map(|&cell| (cell, Prop::Flower)));
        props.extend(BENCHES.iter().map(|&cell| (cell, Prop::Bench)));
        props.push((SIGN, Prop::Sign));
        props.push((WELL, Prop::Well));
        props.push((STALL, Prop::Stall));
        props.extend(doors.iter().map(|door| {
            let cell = Cell::new((door.cell.row + 1).min(ROWS - 1), (door.cell.col - 1).max(0));
            (cell, Prop::Mailbox)
        }));

        Self {
            tiles,
            doors,
            props,
            bridge: BRIDGE.to_vec(),
            docks,
            shallows,
        }
    }

    pub fn door_at(&self, cell: Cell) -> Option<Door> {
        self.doors.iter().copied().find(|door| door.cell == cell)
    }

    /// Full rebuild: water and every solid obstacle first, then the
    /// bridge, docks, shallows and doors are carved back out.
    pub fn solids(&self) -> SolidGrid {
        let mut solid = SolidGrid::default();
        for (cell, tile) in self.tiles.cells() {
            if tile == Tile::Water {
                solid.set(cell, true);
            }
        }
        for building in &BUILDINGS {
            solid.set_rect(building.col, building.row + 1, building.w, building.h, true);
        }
        for &(cell, prop) in &self.props {
            if prop.is_solid() {
                solid.set(cell, true);
            }
        }

        for &cell in self.bridge.iter().chain(&self.docks).chain(&self.shallows) {
            solid.set(cell, false);
        }
        for door in &self.doors {
            solid.set(door.cell, false);
        }
        solid
    }
}

/// Fence ring around the farm, leaving a two-tile gate on the top side.
fn fence_cells() -> Vec<Cell> {
    let mut cells = Vec::new();
    for col in 1..=9 {
        if col != 6 && col != 7 {
            cells.push(Cell::new(9, col));
        }
    }
    for col in 1..=9 {
        cells.push(Cell::new(14, col));
    }
    for row in 10..=13 {
        cells.push(Cell::new(row, 1));
        cells.push(Cell::new(row, 9));
    }
    cells
}

/// Lay path from the door down to the nearest path; if none lies below,
/// walk upwards instead. Everything on the way is repainted.
fn carve_front_path(tiles: &mut TileMap, door: Cell) {
    let is_path = |tile: Option<Tile>| matches!(tile, Some(Tile::Path | Tile::PathBrick));

    let below: Vec<Cell> = ((door.row + 1).min(ROWS - 1)..ROWS)
        .map(|row| Cell::new(row, door.col))
        .collect();
    if let Some(stop) = below.iter().position(|&cell| is_path(tiles.get(cell))) {
        for &cell in &below[..stop] {
            tiles.set(cell, Tile::Path);
        }
        return;
    }
    for &cell in &below {
        tiles.set(cell, Tile::Path);
    }
    for row in (0..door.row).rev() {
        let cell = Cell::new(row, door.col);
        if is_path(tiles.get(cell)) {
            break;
        }
        tiles.set(cell, Tile::Path);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// HOME INTERIOR
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct HomeMap {
    pub tiles: TileMap,
}

impl HomeMap {
    pub fn build() -> Self {
        let mut tiles = TileMap::filled(Tile::Wall);
        tiles.paint_rect(
            INTERIOR_ORIGIN.col,
            INTERIOR_ORIGIN.row,
            INTERIOR_COLS,
            INTERIOR_ROWS,
            Tile::Floor,
        );
        // Rugs only cover floor; anything reaching past the interior stays wall.
        for (col, row, w, h) in [
            (INTERIOR_ORIGIN.col + 8, INTERIOR_ORIGIN.row + 7, 6, 3),
            (INTERIOR_ORIGIN.col + 3, INTERIOR_ORIGIN.row + 4, 4, 3),
        ] {
            for r in row..row + h {
                for c in col..col + w {
                    let cell = Cell::new(r, c);
                    if tiles.get(cell) == Some(Tile::Floor) {
                        tiles.set(cell, Tile::Rug);
                    }
                }
            }
        }
        tiles.set(HOME_DOOR, Tile::Door);
        Self { tiles }
    }

    pub fn is_interior(cell: Cell) -> bool {
        cell.row >= INTERIOR_ORIGIN.row
            && cell.col >= INTERIOR_ORIGIN.col
            && cell.row < INTERIOR_ORIGIN.row + INTERIOR_ROWS
            && cell.col < INTERIOR_ORIGIN.col + INTERIOR_COLS
    }

    /// Full rebuild: walls, then `blocked` cells (furniture footprints),
    /// then the door is carved walkable.
    pub fn solids(&self, blocked: impl IntoIterator<Item = Cell>) -> SolidGrid {
        let mut solid = SolidGrid::default();
        for (cell, tile) in self.tiles.cells() {
            if tile == Tile::Wall {
                solid.set(cell, true);
            }
        }
        for cell in blocked {
            solid.set(cell, true);
        }
        solid.set(HOME_DOOR, false);
        solid
    }
}
