use log::trace;

use crate::model::GameState;

/// Undo and redo stacks of engine snapshots.
///
/// The manager never touches the engine: callers hand it snapshots and apply
/// whatever it returns through `GridEngine::set_state`.
#[derive(Debug, Default)]
pub struct HistoryManager {
    undo_stack: Vec<GameState>,
    redo_stack: Vec<GameState>,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call right before applying an accepted move; discards any redo branch
    pub fn record_move(&mut self, pre_state: GameState) {
        self.undo_stack.push(pre_state);
        self.redo_stack.clear();
        trace!(target: "history", "Recorded move; undo depth {}", self.undo_stack.len());
    }

    /// Returns the state to restore, or `None` if there is nothing to undo
    pub fn undo(&mut self, current_state: GameState) -> Option<GameState> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current_state);
        Some(previous)
    }

    pub fn redo(&mut self, current_state: GameState) -> Option<GameState> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current_state);
        Some(next)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grid_engine::GridEngine;
    use crate::game::spawner::RandomSpawner;
    use crate::model::{Direction, Grid};

    fn state(score: u64) -> GameState {
        GameState::new(Grid::empty(3), score, false)
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut history = HistoryManager::new();
        assert_eq!(history.undo(state(1)), None);
        assert_eq!(history.redo(state(1)), None);
        assert_eq!(history.undo_len(), 0);
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn test_undo_then_redo() {
        let mut history = HistoryManager::new();
        history.record_move(state(0));
        history.record_move(state(4));

        assert_eq!(history.undo(state(8)), Some(state(4)));
        assert_eq!(history.undo(state(4)), Some(state(0)));
        assert!(!history.can_undo());
        assert_eq!(history.redo_len(), 2);

        assert_eq!(history.redo(state(0)), Some(state(4)));
        assert_eq!(history.redo(state(4)), Some(state(8)));
        assert!(!history.can_redo());
        assert_eq!(history.undo_len(), 2);
    }

    #[test]
    fn test_new_move_discards_redo_branch() {
        let mut history = HistoryManager::new();
        history.record_move(state(0));
        history.undo(state(4));
        assert!(history.can_redo());

        history.record_move(state(0));
        assert!(!history.can_redo());
        assert_eq!(history.redo(state(2)), None);
    }

    #[test]
    fn test_undo_redo_against_engine() {
        let mut engine = GridEngine::new(4, RandomSpawner::seeded(21)).unwrap();
        engine.reset();
        let mut history = HistoryManager::new();

        let initial = engine.get_state();
        let pre = engine.get_state();
        let direction = Direction::all()
            .into_iter()
            .find(|&direction| engine.can_move(direction))
            .unwrap();
        assert!(engine.move_tiles(direction).moved);
        history.record_move(pre);
        let after_move = engine.get_state();

        let restored = history.undo(engine.get_state()).unwrap();
        engine.set_state(&restored).unwrap();
        assert_eq!(engine.get_state(), initial);

        let replayed = history.redo(engine.get_state()).unwrap();
        engine.set_state(&replayed).unwrap();
        assert_eq!(engine.get_state(), after_move);
    }
}
