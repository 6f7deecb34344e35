use thiserror::Error;

use super::grid::{MAX_GRID_SIZE, MIN_GRID_SIZE};

#[derive(Debug, Error)]
pub enum GameError {
    #[error("grid size {0} is outside {min}..={max}", min = MIN_GRID_SIZE, max = MAX_GRID_SIZE)]
    InvalidSize(usize),
    #[error("state has no grid")]
    MissingGrid,
    #[error("state grid is not a {0}x{0} board of valid tiles")]
    MalformedState(usize),
    #[error("state is for a {actual}x{actual} grid but the engine is {expected}x{expected}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("could not parse state: {0}")]
    Parse(#[from] serde_json::Error),
}
