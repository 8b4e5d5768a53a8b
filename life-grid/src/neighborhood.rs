use crate::store::CellStore;
use crate::{Cell, Loc};
use arrayvec::ArrayVec;

/// Edge policy for neighbor lookups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Coordinates past an edge are not neighbors.
    #[default]
    Bounded,
    /// Opposite edges are adjacent.
    Toroidal,
}

impl Topology {
    pub fn from_wrap(wrap: bool) -> Self {
        if wrap {
            Topology::Toroidal
        } else {
            Topology::Bounded
        }
    }

    pub fn wraps(self) -> bool {
        self == Topology::Toroidal
    }
}

pub(crate) struct Neighborhood<'a> {
    cells: &'a CellStore,
    rows: [Option<u32>; 3],
    cols: [Option<u32>; 3],
}

impl<'a> Neighborhood<'a> {
    pub fn new(cells: &'a CellStore, center: Loc, topology: Topology) -> Self {
        let size = cells.size();
        let (row_above, row_below) = Self::adjacent_indexes(center.row, size.height, topology);
        let (col_left, col_right) = Self::adjacent_indexes(center.col, size.width, topology);
        Self {
            cells,
            rows: [row_above, Some(center.row), row_below],
            cols: [col_left, Some(center.col), col_right],
        }
    }

    pub fn neighbor_locs(&self) -> ArrayVec<Loc, 8> {
        let mut result = ArrayVec::new();
        for (i, row) in self.rows.iter().enumerate() {
            for (j, col) in self.cols.iter().enumerate() {
                if i == 1 && j == 1 {
                    continue;
                }
                if let (Some(row), Some(col)) = (row, col) {
                    result.push(Loc::new(*row, *col));
                }
            }
        }
        result
    }

    pub fn for_neighbor_cells<F>(&self, mut f: F)
    where
        F: FnMut(&Cell),
    {
        for loc in self.neighbor_locs() {
            f(&self.cells[loc]);
        }
    }

    pub fn num_live_neighbors(&self) -> u8 {
        let mut result = 0;
        self.for_neighbor_cells(|neighbor| {
            if neighbor.is_alive() {
                result += 1;
            }
        });
        result
    }

    fn adjacent_indexes(cell_index: u32, max: u32, topology: Topology) -> (Option<u32>, Option<u32>) {
        match topology {
            Topology::Toroidal => (
                Some(Self::modulo(cell_index as i64 - 1, max)),
                Some(Self::modulo(cell_index as i64 + 1, max)),
            ),
            Topology::Bounded => (
                cell_index.checked_sub(1),
                Some(cell_index + 1).filter(|&index| index < max),
            ),
        }
    }

    fn modulo(val: i64, max: u32) -> u32 {
        val.rem_euclid(max as i64) as u32
    }
}
