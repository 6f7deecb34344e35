use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub const MIN_GRID_SIZE: usize = 3;
pub const MAX_GRID_SIZE: usize = 8;

/// Largest tile a grid may hold; two of these never merge
pub const MAX_TILE_VALUE: u32 = 1 << 30;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Row-major matrix of tile values; 0 marks an empty cell.
///
/// A `Grid` may be ragged when it comes from an external payload, so callers
/// that accept one from outside must check [`Grid::is_square_of`] first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Grid(Vec<Vec<u32>>);

impl Grid {
    pub fn empty(size: usize) -> Self {
        Grid(vec![vec![0; size]; size])
    }

    pub fn from_rows(rows: Vec<Vec<u32>>) -> Self {
        Grid(rows)
    }

    /// Number of rows
    pub fn size(&self) -> usize {
        self.0.len()
    }

    pub fn is_square_of(&self, size: usize) -> bool {
        self.0.len() == size && self.0.iter().all(|row| row.len() == size)
    }

    /// Every cell is empty or a power of two in `2..=MAX_TILE_VALUE`
    pub fn has_valid_tiles(&self) -> bool {
        self.0.iter().flatten().all(|&value| {
            value == 0 || (value.is_power_of_two() && (2..=MAX_TILE_VALUE).contains(&value))
        })
    }

    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.0[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u32) {
        self.0[row][col] = value;
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.0
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<Position> {
        self.0
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells
                    .iter()
                    .positions(|&value| value == 0)
                    .map(move |col| Position::new(row, col))
            })
            .collect()
    }

    pub fn empty_count(&self) -> usize {
        self.0.iter().flatten().filter(|&&value| value == 0).count()
    }

    pub fn tile_count(&self) -> usize {
        self.0.iter().flatten().filter(|&&value| value != 0).count()
    }

    pub fn max_tile(&self) -> u32 {
        self.0.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Whether any two horizontally or vertically adjacent cells could merge.
    /// Empty cells are compared too; callers combine this with an empty-cell check.
    pub fn has_adjacent_pair(&self) -> bool {
        let mergeable = |a: &u32, b: &u32| a == b && *a < MAX_TILE_VALUE;
        let horizontal = self
            .0
            .iter()
            .any(|row| row.iter().tuple_windows().any(|(a, b)| mergeable(a, b)));
        let vertical = self.0.iter().tuple_windows().any(|(upper, lower)| {
            upper.iter().zip(lower.iter()).any(|(a, b)| mergeable(a, b))
        });
        horizontal || vertical
    }

    #[cfg(test)]
    /// Parse a grid from whitespace-separated rows, e.g. "2 2 0 0\n0 0 0 0\n..."
    pub fn parse(s: &str) -> Self {
        Grid(
            s.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| {
                    line.split_whitespace()
                        .map(|value| value.parse::<u32>().unwrap())
                        .collect()
                })
                .collect(),
        )
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self.max_tile().to_string().len().max(1);
        for row in &self.0 {
            let line = row
                .iter()
                .map(|&value| {
                    if value == 0 {
                        format!("{:>width$}", ".", width = width)
                    } else {
                        format!("{:>width$}", value, width = width)
                    }
                })
                .join(" ");
            writeln!(f, "|{}|", line)?;
        }
        Ok(())
    }
}
