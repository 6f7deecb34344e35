use log::trace;

use super::grid_engine::GridEngine;
use super::spawner::RandomSpawner;
use crate::model::{Direction, GameState};

/// Seed for the throwaway engines used to look one move ahead
const SIMULATION_SEED: u32 = 123;

/// Suggests the direction with the best one-ply outcome, weighing free cells,
/// merges and points gained. Returns `None` when no direction moves anything.
/// Ties go to the earlier direction in `Direction::all()` order.
pub fn suggest_move(state: &GameState) -> Option<Direction> {
    let mut best: Option<(Direction, i64)> = None;
    for direction in Direction::all() {
        let Ok(mut simulation) = GridEngine::new(state.size, RandomSpawner::seeded(SIMULATION_SEED))
        else {
            return None;
        };
        if simulation.set_state(state).is_err() {
            return None;
        }
        let result = simulation.move_tiles(direction);
        if !result.moved {
            continue;
        }
        let evaluation = simulation.grid().empty_count() as i64 * 10
            + result.merges_count as i64 * 100
            + result.score_gained as i64;
        trace!(target: "hint", "{} evaluates to {}", direction, evaluation);
        if best.map_or(true, |(_, best_evaluation)| evaluation > best_evaluation) {
            best = Some((direction, evaluation));
        }
    }
    best.map(|(direction, _)| direction)
}
