use serde::{Deserialize, Serialize};

use super::Position;

/// A single tile travelling from one cell to another during a move.
/// `value` is the tile's value before any merge it took part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMove {
    pub from_row: usize,
    pub from_col: usize,
    pub to_row: usize,
    pub to_col: usize,
    pub value: u32,
}

impl TileMove {
    pub fn to(&self) -> Position {
        Position::new(self.to_row, self.to_col)
    }
}

/// Outcome of a single directional move, used to drive animation and scoring
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    pub moved: bool,
    /// Set only when a merge in this move produced the win value
    pub won: bool,
    pub merges_count: usize,
    pub merges_positions: Vec<Position>,
    pub spawned_at: Option<Position>,
    pub moves: Vec<TileMove>,
    pub score_gained: u64,
}

impl MoveResult {
    pub fn unmoved() -> Self {
        Self::default()
    }
}
