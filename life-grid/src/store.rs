use crate::{Cell, GridSize, Loc};
use std::ops::{Index, IndexMut};

/// Row-major cell storage whose physical capacity can exceed its logical
/// size. Cells outside the logical size are always dead.
#[derive(Clone, Debug)]
pub(crate) struct CellStore {
    cells: Vec<Cell>,
    size: GridSize,
    capacity: GridSize,
}

impl CellStore {
    pub fn new(size: GridSize) -> Self {
        assert!(size.width != 0 && size.height != 0);
        Self {
            cells: vec![Cell::default(); size.num_cells()],
            size,
            capacity: size,
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn capacity(&self) -> GridSize {
        self.capacity
    }

    pub fn cell(&self, loc: Loc) -> Option<&Cell> {
        self.index_of(loc).map(|index| &self.cells[index])
    }

    pub fn cell_mut(&mut self, loc: Loc) -> Option<&mut Cell> {
        self.index_of(loc).map(|index| &mut self.cells[index])
    }

    pub fn cells_iter(&self) -> impl Iterator<Item = (Loc, &Cell)> + Clone {
        let stride = self.capacity.width as usize;
        let size = self.size;
        self.cells
            .chunks_exact(stride)
            .take(size.height as usize)
            .enumerate()
            .flat_map(move |(row, cells)| {
                cells[..size.width as usize]
                    .iter()
                    .enumerate()
                    .map(move |(col, cell)| (Loc::new(row as u32, col as u32), cell))
            })
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Changes the logical size, keeping every cell that stays in range.
    /// Returns true if the backing storage had to be reallocated.
    pub fn resize(&mut self, new_size: GridSize) -> bool {
        assert!(new_size.width != 0 && new_size.height != 0);
        if self.capacity.covers(new_size) {
            self.clear_outside(new_size);
            self.size = new_size;
            return false;
        }

        let capacity = GridSize::new(
            Self::grow_capacity(self.capacity.width, new_size.width),
            Self::grow_capacity(self.capacity.height, new_size.height),
        );
        let mut cells = vec![Cell::default(); capacity.num_cells()];
        let keep_width = self.size.width.min(new_size.width) as usize;
        let keep_height = self.size.height.min(new_size.height) as usize;
        let old_stride = self.capacity.width as usize;
        let new_stride = capacity.width as usize;
        for row in 0..keep_height {
            let from = row * old_stride;
            let to = row * new_stride;
            cells[to..to + keep_width].copy_from_slice(&self.cells[from..from + keep_width]);
        }

        self.cells = cells;
        self.capacity = capacity;
        self.size = new_size;
        true
    }

    fn grow_capacity(current: u32, needed: u32) -> u32 {
        if needed <= current {
            current
        } else {
            needed.max(current.saturating_mul(2))
        }
    }

    fn clear_outside(&mut self, new_size: GridSize) {
        let stride = self.capacity.width as usize;
        let old = self.size;
        for row in 0..old.height as usize {
            let start = row * stride;
            let keep = if row < new_size.height as usize {
                new_size.width.min(old.width) as usize
            } else {
                0
            };
            self.cells[start + keep..start + old.width as usize].fill(Cell::default());
        }
    }

    fn index_of(&self, loc: Loc) -> Option<usize> {
        if self.size.contains(loc) {
            loc.grid_index(self.capacity.width, self.capacity.height)
        } else {
            None
        }
    }
}

impl Index<Loc> for CellStore {
    type Output = Cell;

    fn index(&self, loc: Loc) -> &Self::Output {
        self.cell(loc)
            .unwrap_or_else(|| panic!("Index indices {}, {} out of bounds", loc.row, loc.col))
    }
}

impl IndexMut<Loc> for CellStore {
    fn index_mut(&mut self, loc: Loc) -> &mut Self::Output {
        self.cell_mut(loc)
            .unwrap_or_else(|| panic!("Index_mut indices {}, {} out of bounds", loc.row, loc.col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_live(size: GridSize, live: &[Loc]) -> CellStore {
        let mut store = CellStore::new(size);
        for &loc in live {
            store[loc].set_alive(true);
        }
        store
    }

    #[test]
    fn growth_past_capacity_doubles() {
        let mut store = CellStore::new(GridSize::new(10, 10));
        assert!(store.resize(GridSize::new(11, 10)));
        assert_eq!(store.capacity(), GridSize::new(20, 10));
        assert!(!store.resize(GridSize::new(19, 10)));
        assert_eq!(store.capacity(), GridSize::new(20, 10));
    }

    #[test]
    fn shrink_then_grow_exposes_dead_cells() {
        let mut store = store_with_live(GridSize::new(10, 10), &[Loc::new(8, 8), Loc::new(1, 1)]);
        assert!(!store.resize(GridSize::new(5, 5)));
        assert!(!store.resize(GridSize::new(10, 10)));
        assert!(store[Loc::new(1, 1)].is_alive());
        assert!(!store[Loc::new(8, 8)].is_alive());
    }

    #[test]
    fn reallocation_keeps_overlap() {
        let mut store = store_with_live(GridSize::new(10, 10), &[Loc::new(9, 9), Loc::new(0, 3)]);
        assert!(store.resize(GridSize::new(30, 12)));
        assert!(store[Loc::new(9, 9)].is_alive());
        assert!(store[Loc::new(0, 3)].is_alive());
        assert_eq!(store.cells_iter().filter(|(_, c)| c.is_alive()).count(), 2);
    }

    #[test]
    fn cells_iter_skips_spare_capacity() {
        let mut store = CellStore::new(GridSize::new(4, 4));
        store.resize(GridSize::new(9, 3));
        store.resize(GridSize::new(5, 3));
        let locs: Vec<Loc> = store.cells_iter().map(|(loc, _)| loc).collect();
        assert_eq!(locs, GridSize::new(5, 3).locs().collect::<Vec<_>>());
    }

    #[test]
    fn out_of_logical_range_is_none() {
        let mut store = CellStore::new(GridSize::new(8, 8));
        store.resize(GridSize::new(4, 4));
        assert!(store.cell(Loc::new(5, 5)).is_none());
        assert!(store.cell(Loc::new(3, 3)).is_some());
    }
}
