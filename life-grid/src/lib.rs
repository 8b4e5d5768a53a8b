#![deny(clippy::all)]
#![forbid(unsafe_code)]

mod cell;
mod error;
mod grid;
mod loc;
mod neighborhood;
mod pattern;
mod random;
mod seed;
mod store;

pub use cell::Cell;
pub use error::{GridError, PatternError, Result};
pub use grid::{DEFAULT_RESIZE_FLOOR, LifeGrid, MIN_GRID_SIZE, ResizeOutcome, StepSummary};
pub use loc::{GridSize, Loc};
pub use neighborhood::Topology;
pub use pattern::{MAX_PATTERN_SIDE, PATTERN_NAMES, Pattern};
pub use random::Random;

/// A simulation that owns a [`LifeGrid`] and knows how to (re)seed it.
pub trait World {
    fn grid(&self) -> &LifeGrid;
    fn grid_mut(&mut self) -> &mut LifeGrid;
    fn topology(&self) -> Topology;

    fn reset(&mut self);

    fn update(&mut self) -> StepSummary {
        let topology = self.topology();
        self.grid_mut().step(topology)
    }

    fn resize(&mut self, size: GridSize) -> ResizeOutcome {
        self.grid_mut().resize(size)
    }

    fn clear(&mut self) {
        self.grid_mut().clear();
    }

    fn toggle_cell(&mut self, loc: Loc) -> Result<bool> {
        self.grid_mut().toggle(loc)
    }

    fn refresh_neighbor_counts(&mut self) {
        let topology = self.topology();
        self.grid_mut().ensure_neighbor_counts(topology);
    }
}
