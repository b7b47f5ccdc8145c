//! Furniture catalog and the items placed inside the player's home.

use super::grid::{Cell, HomeMap, Tile, HOME_DOOR, INTERIOR_COLS, INTERIOR_ORIGIN, INTERIOR_ROWS};
use super::inventory::CatalogItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FurnitureKind {
    #[default]
    Stool,
    Table,
    Bed,
}

pub struct FurnitureDef {
    pub name: &'static str,
    pub w: i32,
    pub h: i32,
    pub cost: u32,
}

const STOOL: FurnitureDef = FurnitureDef { name: "Stool", w: 1, h: 1, cost: 2 };
const TABLE: FurnitureDef = FurnitureDef { name: "Table", w: 2, h: 1, cost: 4 };
const BED: FurnitureDef = FurnitureDef { name: "Bed", w: 2, h: 1, cost: 6 };

impl FurnitureKind {
    pub fn def(self) -> &'static FurnitureDef {
        match self {
            FurnitureKind::Stool => &STOOL,
            FurnitureKind::Table => &TABLE,
            FurnitureKind::Bed => &BED,
        }
    }

    /// (width, height) in tiles; odd rotations swap the two.
    pub fn size(self, rotation: u8) -> (i32, i32) {
        let def = self.def();
        if rotation % 2 == 1 {
            (def.h, def.w)
        } else {
            (def.w, def.h)
        }
    }

    /// Next/previous entry in catalog order, wrapping.
    pub fn cycled(self, step: isize) -> Self {
        let len = Self::ALL.len() as isize;
        let index = (self.index() as isize + step).rem_euclid(len);
        Self::ALL[index as usize]
    }
}

impl CatalogItem for FurnitureKind {
    const ALL: &'static [Self] = &[FurnitureKind::Stool, FurnitureKind::Table, FurnitureKind::Bed];

    fn id(self) -> &'static str {
        match self {
            FurnitureKind::Stool => "stool",
            FurnitureKind::Table => "table",
            FurnitureKind::Bed => "bed",
        }
    }

    fn name(self) -> &'static str {
        self.def().name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedFurniture {
    pub kind: FurnitureKind,
    pub row: i32,
    pub col: i32,
    pub rotation: u8,
}

impl PlacedFurniture {
    pub fn footprint(&self) -> impl Iterator<Item = Cell> {
        let (w, h) = self.kind.size(self.rotation);
        let (row, col) = (self.row, self.col);
        (row..row + h).flat_map(move |r| (col..col + w).map(move |c| Cell::new(r, c)))
    }

    pub fn covers(&self, cell: Cell) -> bool {
        let (w, h) = self.kind.size(self.rotation);
        cell.row >= self.row && cell.row < self.row + h && cell.col >= self.col && cell.col < self.col + w
    }

    /// Shift the item so its whole footprint lies inside the interior.
    pub fn clamped_into_interior(mut self) -> Self {
        let (w, h) = self.kind.size(self.rotation);
        let max_row = INTERIOR_ORIGIN.row + INTERIOR_ROWS - h;
        let max_col = INTERIOR_ORIGIN.col + INTERIOR_COLS - w;
        self.row = self.row.clamp(INTERIOR_ORIGIN.row, max_row);
        self.col = self.col.clamp(INTERIOR_ORIGIN.col, max_col);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeFurniture {
    pub items: Vec<PlacedFurniture>,
}

impl Default for HomeFurniture {
    fn default() -> Self {
        Self {
            items: vec![PlacedFurniture {
                kind: FurnitureKind::Bed,
                row: INTERIOR_ORIGIN.row + 6,
                col: INTERIOR_ORIGIN.col + 6,
                rotation: 0,
            }],
        }
    }
}

impl HomeFurniture {
    pub fn at(&self, cell: Cell) -> Option<usize> {
        self.items.iter().position(|item| item.covers(cell))
    }

    /// Every footprint cell must be interior, non-wall, not the door and
    /// not already covered by another item.
    pub fn can_place(&self, home: &HomeMap, kind: FurnitureKind, origin: Cell, rotation: u8) -> bool {
        let candidate = PlacedFurniture {
            kind,
            row: origin.row,
            col: origin.col,
            rotation,
        };
        candidate.footprint().all(|cell| {
            HomeMap::is_interior(cell)
                && home.tiles.get(cell).is_some_and(|tile| tile != Tile::Wall)
                && cell != HOME_DOOR
                && self.at(cell).is_none()
        })
    }

    pub fn place(&mut self, home: &HomeMap, kind: FurnitureKind, origin: Cell, rotation: u8) -> bool {
        if !self.can_place(home, kind, origin, rotation) {
            return false;
        }
        self.items.push(PlacedFurniture {
            kind,
            row: origin.row,
            col: origin.col,
            rotation: rotation % 2,
        });
        true
    }

    pub fn remove_at(&mut self, cell: Cell) -> Option<PlacedFurniture> {
        self.at(cell).map(|index| self.items.remove(index))
    }

    pub fn blocked_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.items.iter().flat_map(|item| item.footprint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> HomeFurniture {
        HomeFurniture { items: Vec::new() }
    }

    #[test]
    fn test_rotation_swaps_size() {
        assert_eq!(FurnitureKind::Table.size(0), (2, 1));
        assert_eq!(FurnitureKind::Table.size(1), (1, 2));
        assert_eq!(FurnitureKind::Table.size(2), (2, 1));
    }

    #[test]
    fn test_default_home_has_a_bed() {
        let furniture = HomeFurniture::default();
        assert_eq!(furniture.items.len(), 1);
        assert_eq!(furniture.at(Cell::new(9, 17)), Some(0));
        assert_eq!(furniture.at(Cell::new(9, 18)), None);
    }

    #[test]
    fn test_footprint_on_door_is_rejected() {
        let home = HomeMap::build();
        let furniture = empty();
        assert!(!furniture.can_place(&home, FurnitureKind::Stool, HOME_DOOR, 0));
        // A table whose second cell lands on the door.
        let left_of_door = HOME_DOOR.offset(0, -1);
        assert!(!furniture.can_place(&home, FurnitureKind::Table, left_of_door, 0));
        // Rotated, the same table stands vertically and misses the door.
        let above = HOME_DOOR.offset(-2, -1);
        assert!(furniture.can_place(&home, FurnitureKind::Table, above, 1));
    }

    #[test]
    fn test_overlap_and_walls_are_rejected() {
        let home = HomeMap::build();
        let mut furniture = HomeFurniture::default();
        assert!(!furniture.place(&home, FurnitureKind::Stool, Cell::new(9, 17), 0));
        assert!(!furniture.place(&home, FurnitureKind::Stool, Cell::new(2, 12), 0));
        let east_edge = Cell::new(5, INTERIOR_ORIGIN.col + INTERIOR_COLS - 1);
        assert!(!furniture.place(&home, FurnitureKind::Bed, east_edge, 0));
        assert_eq!(furniture.items.len(), 1);
        assert!(furniture.place(&home, FurnitureKind::Bed, east_edge, 1));
        assert_eq!(furniture.items.len(), 2);
    }

    #[test]
    fn test_remove_returns_item() {
        let mut furniture = HomeFurniture::default();
        let removed = furniture.remove_at(Cell::new(9, 16));
        assert_eq!(removed.map(|item| item.kind), Some(FurnitureKind::Bed));
        assert!(furniture.items.is_empty());
        assert!(furniture.remove_at(Cell::new(9, 16)).is_none());
    }

    #[test]
    fn test_clamp_into_interior() {
        let item = PlacedFurniture {
            kind: FurnitureKind::Bed,
            row: 0,
            col: 29,
            rotation: 0,
        }
        .clamped_into_interior();
        assert_eq!(item.row, INTERIOR_ORIGIN.row);
        assert_eq!(item.col, INTERIOR_ORIGIN.col + INTERIOR_COLS - 2);
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(FurnitureKind::Stool.cycled(-1), FurnitureKind::Bed);
        assert_eq!(FurnitureKind::Bed.cycled(1), FurnitureKind::Stool);
    }
}
