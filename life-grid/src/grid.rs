use crate::error::{GridError, Result};
use crate::neighborhood::{Neighborhood, Topology};
use crate::store::CellStore;
use crate::{Cell, GridSize, Loc};
use log::{debug, trace};
use std::mem;
use std::ops::Index;

/// Smallest grid that can be created.
pub const MIN_GRID_SIZE: GridSize = GridSize::new(2, 2);

/// Resize requests smaller than this are ignored.
pub const DEFAULT_RESIZE_FLOOR: GridSize = GridSize::new(10, 10);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeOutcome {
    Unchanged,
    Resized { from: GridSize, to: GridSize },
    /// The request was below the resize floor and the grid was left alone.
    Ignored { requested: GridSize },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepSummary {
    pub births: usize,
    pub deaths: usize,
    pub population: usize,
}

/// A double-buffered Life grid with cached neighbor counts.
///
/// Every mutation marks the cached counts stale. Reading them through
/// [`LifeGrid::neighbor_count`] while stale is an error, and
/// [`LifeGrid::step`] recomputes them when needed, so a forgotten recompute
/// cannot silently feed wrong counts into a transition.
#[derive(Clone, Debug)]
pub struct LifeGrid {
    cells: CellStore,
    next_cells: CellStore,
    counts_topology: Option<Topology>,
    resize_floor: GridSize,
    generation: u64,
}

impl LifeGrid {
    pub fn new(size: GridSize) -> Result<Self> {
        if !size.covers(MIN_GRID_SIZE) {
            return Err(GridError::DegenerateSize(size));
        }
        Ok(Self {
            cells: CellStore::new(size),
            next_cells: CellStore::new(size),
            counts_topology: None,
            resize_floor: DEFAULT_RESIZE_FLOOR,
            generation: 0,
        })
    }

    pub fn with_resize_floor(mut self, floor: GridSize) -> Self {
        self.resize_floor = floor.at_least(MIN_GRID_SIZE);
        self
    }

    pub fn size(&self) -> GridSize {
        self.cells.size()
    }

    pub fn width(&self) -> u32 {
        self.size().width
    }

    pub fn height(&self) -> u32 {
        self.size().height
    }

    pub fn num_cells(&self) -> usize {
        self.size().num_cells()
    }

    pub fn capacity(&self) -> GridSize {
        self.cells.capacity()
    }

    pub fn resize_floor(&self) -> GridSize {
        self.resize_floor
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, loc: Loc) -> Result<Cell> {
        self.cell(loc)
            .copied()
            .ok_or_else(|| Self::out_of_bounds(loc, self.size()))
    }

    pub fn cell(&self, loc: Loc) -> Option<&Cell> {
        self.cells.cell(loc)
    }

    pub fn cells_iter(&self) -> impl Iterator<Item = (Loc, &Cell)> + Clone {
        self.cells.cells_iter()
    }

    pub fn live_cells(&self) -> impl Iterator<Item = (Loc, &Cell)> + Clone {
        self.cells_iter().filter(|(_, cell)| cell.is_alive())
    }

    pub fn population(&self) -> usize {
        self.live_cells().count()
    }

    pub fn set_alive(&mut self, loc: Loc, alive: bool) -> Result<()> {
        let cell = self.cell_mut(loc)?;
        cell.set_alive(alive);
        self.invalidate_counts();
        Ok(())
    }

    pub fn toggle(&mut self, loc: Loc) -> Result<bool> {
        let cell = self.cell_mut(loc)?;
        let alive = !cell.is_alive();
        cell.set_alive(alive);
        self.invalidate_counts();
        Ok(alive)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.next_cells.clear();
        self.generation = 0;
        self.invalidate_counts();
    }

    pub fn counts_valid(&self) -> bool {
        self.counts_topology.is_some()
    }

    pub fn counts_valid_for(&self, topology: Topology) -> bool {
        self.counts_topology == Some(topology)
    }

    /// The cached neighbor count of a cell, refusing to hand out stale values.
    pub fn neighbor_count(&self, loc: Loc) -> Result<u8> {
        let cell = self.get(loc)?;
        if self.counts_valid() {
            Ok(cell.neighbor_count())
        } else {
            Err(GridError::StaleNeighborCounts)
        }
    }

    /// Recounts the live Moore neighbors of every cell.
    pub fn recompute_neighbor_counts(&mut self, topology: Topology) {
        for loc in self.size().locs() {
            let count = Neighborhood::new(&self.cells, loc, topology).num_live_neighbors();
            self.cells[loc].set_neighbor_count(count);
        }
        self.counts_topology = Some(topology);
    }

    /// Recomputes only if the counts are stale or were computed under a
    /// different topology. Returns true if a recompute happened.
    pub fn ensure_neighbor_counts(&mut self, topology: Topology) -> bool {
        if self.counts_valid_for(topology) {
            false
        } else {
            self.recompute_neighbor_counts(topology);
            true
        }
    }

    /// Advances one generation. Every cell sees the counts of the same prior
    /// generation; the new generation is written to the back buffer and the
    /// buffers are swapped. Counts are valid again on return.
    pub fn step(&mut self, topology: Topology) -> StepSummary {
        if self.ensure_neighbor_counts(topology) {
            trace!("recomputed stale neighbor counts before step");
        }

        let mut summary = StepSummary::default();
        for (loc, cell) in self.cells.cells_iter() {
            let next_cell = cell.next_generation();
            match (cell.is_alive(), next_cell.is_alive()) {
                (false, true) => summary.births += 1,
                (true, false) => summary.deaths += 1,
                _ => {}
            }
            if next_cell.is_alive() {
                summary.population += 1;
            }
            self.next_cells[loc] = next_cell;
        }
        mem::swap(&mut self.next_cells, &mut self.cells);
        self.generation += 1;

        self.invalidate_counts();
        self.recompute_neighbor_counts(topology);
        summary
    }

    /// Tracks a new viewport size, keeping every cell that stays in range.
    /// Requests below the resize floor are ignored.
    pub fn resize(&mut self, new_size: GridSize) -> ResizeOutcome {
        let from = self.size();
        if new_size == from {
            return ResizeOutcome::Unchanged;
        }
        if !new_size.covers(self.resize_floor) {
            debug!("ignoring resize to {new_size}, below floor {}", self.resize_floor);
            return ResizeOutcome::Ignored {
                requested: new_size,
            };
        }

        let reallocated = self.cells.resize(new_size);
        self.next_cells.resize(new_size);
        self.invalidate_counts();
        if reallocated {
            debug!("grid resized {from} -> {new_size}, capacity now {}", self.capacity());
        } else {
            trace!("grid resized {from} -> {new_size} within capacity");
        }
        ResizeOutcome::Resized { from, to: new_size }
    }

    pub(crate) fn cell_mut(&mut self, loc: Loc) -> Result<&mut Cell> {
        let size = self.size();
        self.cells
            .cell_mut(loc)
            .ok_or_else(|| Self::out_of_bounds(loc, size))
    }

    pub(crate) fn invalidate_counts(&mut self) {
        self.counts_topology = None;
    }

    fn out_of_bounds(loc: Loc, size: GridSize) -> GridError {
        GridError::OutOfBounds {
            row: loc.row,
            col: loc.col,
            size,
        }
    }
}

impl Index<Loc> for LifeGrid {
    type Output = Cell;

    fn index(&self, loc: Loc) -> &Self::Output {
        &self.cells[loc]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_live(size: GridSize, live: &[(u32, u32)]) -> LifeGrid {
        let mut grid = LifeGrid::new(size).unwrap();
        for &(row, col) in live {
            grid.set_alive(Loc::new(row, col), true).unwrap();
        }
        grid
    }

    fn live_locs(grid: &LifeGrid) -> Vec<(u32, u32)> {
        grid.live_cells().map(|(loc, _)| (loc.row, loc.col)).collect()
    }

    #[test]
    fn new_grid_is_empty() {
        let grid = LifeGrid::new(GridSize::new(6, 4)).unwrap();
        assert_eq!(grid.size(), GridSize::new(6, 4));
        assert!(grid.cells_iter().all(|(_, cell)| *cell == Cell::default()));
        assert!(!grid.counts_valid());
    }

    #[test]
    fn degenerate_sizes_are_rejected() {
        for size in [GridSize::new(0, 0), GridSize::new(1, 1), GridSize::new(1, 10)] {
            assert_eq!(LifeGrid::new(size).unwrap_err(), GridError::DegenerateSize(size));
        }
    }

    #[test]
    fn out_of_bounds_access_is_an_error() {
        let mut grid = LifeGrid::new(GridSize::new(5, 5)).unwrap();
        let error = GridError::OutOfBounds {
            row: 5,
            col: 0,
            size: GridSize::new(5, 5),
        };
        assert_eq!(grid.get(Loc::new(5, 0)), Err(error.clone()));
        assert_eq!(grid.set_alive(Loc::new(5, 0), true), Err(error));
    }

    #[test]
    #[should_panic]
    fn indexing_out_of_bounds_panics() {
        let grid = LifeGrid::new(GridSize::new(5, 5)).unwrap();
        let _ = grid[Loc::new(0, 5)];
    }

    #[test]
    fn set_alive_leaves_counts_stale() {
        let mut grid = LifeGrid::new(GridSize::new(5, 5)).unwrap();
        grid.recompute_neighbor_counts(Topology::Bounded);
        grid.set_alive(Loc::new(2, 2), true).unwrap();
        assert_eq!(grid[Loc::new(2, 3)].neighbor_count(), 0);
        assert_eq!(
            grid.neighbor_count(Loc::new(2, 3)),
            Err(GridError::StaleNeighborCounts)
        );
        grid.recompute_neighbor_counts(Topology::Bounded);
        assert_eq!(grid.neighbor_count(Loc::new(2, 3)), Ok(1));
    }

    #[test]
    fn isolated_cell_dies() {
        for topology in [Topology::Bounded, Topology::Toroidal] {
            let mut grid = grid_with_live(GridSize::new(5, 5), &[(2, 2)]);
            let summary = grid.step(topology);
            assert_eq!(grid.population(), 0);
            assert_eq!(summary.deaths, 1);
            assert_eq!(grid.get(Loc::new(2, 2)).unwrap().age(), 0);
        }
    }

    #[test]
    fn block_is_still() {
        for topology in [Topology::Bounded, Topology::Toroidal] {
            let block = [(1, 1), (1, 2), (2, 1), (2, 2)];
            let mut grid = grid_with_live(GridSize::new(4, 4), &block);
            grid.step(topology);
            assert_eq!(live_locs(&grid), block.to_vec());
        }
    }

    #[test]
    fn blinker_has_period_two() {
        for topology in [Topology::Bounded, Topology::Toroidal] {
            let horizontal = vec![(2, 1), (2, 2), (2, 3)];
            let vertical = vec![(1, 2), (2, 2), (3, 2)];
            let mut grid = grid_with_live(GridSize::new(5, 5), &horizontal);
            grid.step(topology);
            assert_eq!(live_locs(&grid), vertical);
            grid.step(topology);
            assert_eq!(live_locs(&grid), horizontal);
        }
    }

    #[test]
    fn ages_follow_the_rule() {
        let mut grid = grid_with_live(GridSize::new(5, 5), &[(2, 1), (2, 2), (2, 3)]);
        grid.step(Topology::Bounded);
        assert_eq!(grid[Loc::new(2, 2)].age(), 2);
        assert_eq!(grid[Loc::new(1, 2)].age(), 1);
        assert_eq!(grid[Loc::new(2, 1)].age(), 0);
        assert!(grid
            .cells_iter()
            .all(|(_, cell)| cell.is_alive() || cell.age() == 0));
    }

    #[test]
    fn step_leaves_counts_valid() {
        let mut grid = grid_with_live(GridSize::new(5, 5), &[(2, 1), (2, 2), (2, 3)]);
        let summary = grid.step(Topology::Toroidal);
        assert!(grid.counts_valid_for(Topology::Toroidal));
        assert_eq!(grid.neighbor_count(Loc::new(2, 2)), Ok(2));
        assert_eq!(
            summary,
            StepSummary {
                births: 2,
                deaths: 2,
                population: 3
            }
        );
        assert_eq!(grid.generation(), 1);
    }

    #[test]
    fn step_recomputes_counts_for_a_different_topology() {
        // A vertical line on the left edge only survives where it wraps.
        let mut grid = grid_with_live(GridSize::new(5, 5), &[(1, 0), (2, 0), (3, 0)]);
        grid.recompute_neighbor_counts(Topology::Bounded);
        grid.step(Topology::Toroidal);
        assert!(grid[Loc::new(2, 4)].is_alive());
    }

    #[test]
    fn clear_resets_everything() {
        let mut grid = grid_with_live(GridSize::new(5, 5), &[(2, 1), (2, 2), (2, 3)]);
        grid.step(Topology::Bounded);
        grid.clear();
        assert_eq!(grid.population(), 0);
        assert_eq!(grid.generation(), 0);
        assert!(!grid.counts_valid());
    }

    #[test]
    fn toggle_flips_state() {
        let mut grid = LifeGrid::new(GridSize::new(3, 3)).unwrap();
        assert_eq!(grid.toggle(Loc::new(1, 1)), Ok(true));
        assert_eq!(grid[Loc::new(1, 1)].age(), 1);
        assert_eq!(grid.toggle(Loc::new(1, 1)), Ok(false));
        assert_eq!(grid[Loc::new(1, 1)].age(), 0);
    }

    #[test]
    fn resize_below_floor_is_ignored() {
        let mut grid = grid_with_live(GridSize::new(12, 12), &[(5, 5), (11, 11)]);
        grid.recompute_neighbor_counts(Topology::Bounded);
        let before: Vec<Cell> = grid.cells_iter().map(|(_, c)| *c).collect();
        assert_eq!(
            grid.resize(GridSize::new(5, 5)),
            ResizeOutcome::Ignored {
                requested: GridSize::new(5, 5)
            }
        );
        assert_eq!(grid.size(), GridSize::new(12, 12));
        let after: Vec<Cell> = grid.cells_iter().map(|(_, c)| *c).collect();
        assert_eq!(before, after);
        assert!(grid.counts_valid());
    }

    #[test]
    fn resize_preserves_overlap() {
        let mut grid = grid_with_live(GridSize::new(12, 12), &[(5, 5), (5, 6), (11, 11)]);
        grid.step(Topology::Bounded);
        grid.set_alive(Loc::new(0, 0), true).unwrap();
        grid.recompute_neighbor_counts(Topology::Bounded);
        let kept: Vec<(Loc, Cell)> = grid
            .cells_iter()
            .filter(|(loc, _)| loc.row < 10 && loc.col < 10)
            .map(|(loc, c)| (loc, *c))
            .collect();

        assert_eq!(
            grid.resize(GridSize::new(10, 30)),
            ResizeOutcome::Resized {
                from: GridSize::new(12, 12),
                to: GridSize::new(10, 30)
            }
        );
        for (loc, cell) in kept {
            assert_eq!(grid.get(loc), Ok(cell));
        }
        assert!(grid
            .cells_iter()
            .filter(|(loc, _)| loc.row >= 12)
            .all(|(_, c)| *c == Cell::default()));
        assert!(!grid.counts_valid());
    }

    #[test]
    fn resize_to_same_size_is_a_no_op() {
        let mut grid = LifeGrid::new(GridSize::new(12, 12)).unwrap();
        grid.recompute_neighbor_counts(Topology::Bounded);
        assert_eq!(grid.resize(GridSize::new(12, 12)), ResizeOutcome::Unchanged);
        assert!(grid.counts_valid());
    }

    #[test]
    fn repeated_growth_reallocates_logarithmically() {
        let mut grid = LifeGrid::new(GridSize::new(10, 10)).unwrap();
        let mut reallocations = 0;
        for width in 11..=1000 {
            let capacity = grid.capacity();
            grid.resize(GridSize::new(width, 10));
            if grid.capacity() != capacity {
                reallocations += 1;
            }
        }
        assert!(reallocations <= 7, "{reallocations} reallocations");
    }

    #[test]
    fn stepping_after_growth_uses_new_cells() {
        let mut grid = grid_with_live(GridSize::new(10, 10), &[(9, 8), (9, 9)]);
        grid.resize(GridSize::new(12, 12));
        grid.set_alive(Loc::new(10, 9), true).unwrap();
        grid.step(Topology::Bounded);
        assert!(grid[Loc::new(10, 8)].is_alive());
    }
}
