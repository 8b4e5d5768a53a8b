use crate::{GridSize, MIN_GRID_SIZE};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("location {row}, {col} is out of bounds for a {size} grid")]
    OutOfBounds { row: u32, col: u32, size: GridSize },

    #[error("grid size {0} is smaller than the minimum {}", MIN_GRID_SIZE)]
    DegenerateSize(GridSize),

    /// Cached neighbor counts were read after a mutation and before a recompute.
    #[error("neighbor counts are stale")]
    StaleNeighborCounts,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("unknown pattern name {0:?}")]
    UnknownName(String),

    #[error("unexpected character {ch:?} on line {line}")]
    InvalidCharacter { ch: char, line: usize },

    #[error("malformed RLE header {0:?}")]
    InvalidHeader(String),

    #[error("run count on line {line} is too long")]
    RunTooLong { line: usize },

    #[error("pattern is larger than {max}x{max} cells")]
    TooLarge { max: usize },

    #[error("pattern has no cells")]
    Empty,
}

pub type Result<T> = std::result::Result<T, GridError>;
