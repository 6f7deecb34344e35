use log::{info, trace, warn};

use super::spawner::RandomSpawner;
use crate::model::{
    Direction, GameError, GameState, Grid, MoveResult, Position, TileMove, MAX_GRID_SIZE,
    MAX_TILE_VALUE, MIN_GRID_SIZE,
};

/// Merging into this value wins the game
pub const WIN_VALUE: u32 = 2048;

pub const DEFAULT_GRID_SIZE: usize = 4;

/// Owns the grid and resolves moves against it.
///
/// A freshly constructed engine has an empty grid; call [`GridEngine::reset`]
/// to seed the first two tiles.
#[derive(Debug)]
pub struct GridEngine {
    size: usize,
    grid: Grid,
    score: u64,
    won: bool,
    spawner: RandomSpawner,
}

impl Default for GridEngine {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            grid: Grid::empty(DEFAULT_GRID_SIZE),
            score: 0,
            won: false,
            spawner: RandomSpawner::system(),
        }
    }
}

/// The result of sliding a single line toward its leading cell
struct LineOutcome {
    values: Vec<u32>,
    moves: Vec<TileMove>,
    merges: Vec<Position>,
    score: u64,
    won: bool,
}

impl GridEngine {
    pub fn new(size: usize, spawner: RandomSpawner) -> Result<Self, GameError> {
        Self::check_size(size)?;
        Ok(Self {
            size,
            grid: Grid::empty(size),
            score: 0,
            won: false,
            spawner,
        })
    }

    fn check_size(size: usize) -> Result<(), GameError> {
        if (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
            Ok(())
        } else {
            Err(GameError::InvalidSize(size))
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn won(&self) -> bool {
        self.won
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn seed(&self) -> Option<u32> {
        self.spawner.seed()
    }

    pub fn set_spawner(&mut self, spawner: RandomSpawner) {
        self.spawner = spawner;
    }

    /// Clears the board and places two fresh tiles. Returns where the second one landed.
    pub fn reset(&mut self) -> Option<Position> {
        self.grid = Grid::empty(self.size);
        self.score = 0;
        self.won = false;
        self.spawner.spawn(&mut self.grid);
        let second = self.spawner.spawn(&mut self.grid);
        info!(target: "grid_engine", "Reset {}x{} grid; seed: {:?}", self.size, self.size, self.spawner.seed());
        second
    }

    pub fn resize(&mut self, new_size: usize) -> Result<(), GameError> {
        Self::check_size(new_size)?;
        self.size = new_size;
        self.reset();
        Ok(())
    }

    /// Slides every line toward `direction`, merging equal neighbours once each.
    /// The grid is only touched when at least one tile moves.
    pub fn move_tiles(&mut self, direction: Direction) -> MoveResult {
        let mut next = Grid::empty(self.size);
        let mut result = MoveResult::unmoved();

        for line in 0..self.size {
            let cells = self.line_cells(direction, line);
            let outcome = Self::slide_line(&self.grid, &cells);
            for (cell, value) in cells.iter().zip(outcome.values) {
                next.set(cell.row, cell.col, value);
            }
            result.moves.extend(outcome.moves);
            result.merges_count += outcome.merges.len();
            result.merges_positions.extend(outcome.merges);
            result.score_gained += outcome.score;
            result.won |= outcome.won;
        }

        result.moved = !result.moves.is_empty();
        if !result.moved {
            trace!(target: "grid_engine", "Move {} changed nothing", direction);
            return MoveResult::unmoved();
        }

        self.grid = next;
        self.score += result.score_gained;
        self.won |= result.won;
        result.spawned_at = self.spawner.spawn(&mut self.grid);
        trace!(
            target: "grid_engine",
            "Move {}: {} tiles moved, {} merges, +{} points\n{}",
            direction,
            result.moves.len(),
            result.merges_count,
            result.score_gained,
            self.grid
        );
        result
    }

    /// Cells of one line, ordered from the edge tiles travel toward
    fn line_cells(&self, direction: Direction, line: usize) -> Vec<Position> {
        let size = self.size;
        (0..size)
            .map(|step| {
                let offset = if direction.is_toward_end() {
                    size - 1 - step
                } else {
                    step
                };
                if direction.is_vertical() {
                    Position::new(offset, line)
                } else {
                    Position::new(line, offset)
                }
            })
            .collect()
    }

    fn slide_line(grid: &Grid, cells: &[Position]) -> LineOutcome {
        let tiles: Vec<(Position, u32)> = cells
            .iter()
            .map(|&cell| (cell, grid.get(cell.row, cell.col)))
            .filter(|&(_, value)| value != 0)
            .collect();

        let mut outcome = LineOutcome {
            values: Vec::with_capacity(cells.len()),
            moves: Vec::new(),
            merges: Vec::new(),
            score: 0,
            won: false,
        };

        let mut index = 0;
        while index < tiles.len() {
            let target = cells[outcome.values.len()];
            let (origin, value) = tiles[index];
            let merges_with_next = tiles
                .get(index + 1)
                .is_some_and(|&(_, next_value)| next_value == value && value < MAX_TILE_VALUE);

            let consumed = if merges_with_next { 2 } else { 1 };
            for &(from, tile_value) in &tiles[index..index + consumed] {
                if from != target {
                    outcome.moves.push(TileMove {
                        from_row: from.row,
                        from_col: from.col,
                        to_row: target.row,
                        to_col: target.col,
                        value: tile_value,
                    });
                }
            }

            if merges_with_next {
                let merged = value * 2;
                outcome.values.push(merged);
                outcome.merges.push(target);
                outcome.score += merged as u64;
                outcome.won |= merged == WIN_VALUE;
            } else {
                outcome.values.push(value);
            }
            trace!(target: "grid_engine", "Tile {} from {:?} settles at {:?}", value, origin, target);
            index += consumed;
        }

        outcome.values.resize(cells.len(), 0);
        outcome
    }

    /// True when the board is full and no neighbouring pair can merge
    pub fn is_game_over(&self) -> bool {
        self.grid.empty_count() == 0 && !self.grid.has_adjacent_pair()
    }

    /// Whether a move in `direction` would change the board, without applying it
    pub fn can_move(&self, direction: Direction) -> bool {
        (0..self.size).any(|line| {
            let cells = self.line_cells(direction, line);
            !Self::slide_line(&self.grid, &cells).moves.is_empty()
        })
    }

    pub fn get_state(&self) -> GameState {
        GameState::new(self.grid.clone(), self.score, self.won)
    }

    /// Restores a snapshot. On error the engine is left untouched.
    pub fn set_state(&mut self, state: &GameState) -> Result<(), GameError> {
        if !state.grid.is_square_of(state.size) || !state.grid.has_valid_tiles() {
            warn!(target: "grid_engine", "Rejected malformed state of size {}", state.size);
            return Err(GameError::MalformedState(state.size));
        }
        if state.size != self.size {
            warn!(
                target: "grid_engine",
                "Rejected {}x{} state on {}x{} engine",
                state.size, state.size, self.size, self.size
            );
            return Err(GameError::SizeMismatch {
                expected: self.size,
                actual: state.size,
            });
        }
        self.grid = state.grid.clone();
        self.score = state.score;
        self.won = state.won;
        Ok(())
    }
}
