use super::{AchievementDef, Direction, GameState, GameStats, MoveResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    BoardUpdated(GameState),
    MoveResolved(MoveResult),
    HistoryChanged { undo_len: usize, redo_len: usize },
    AchievementsUnlocked(Vec<AchievementDef>),
    /// Emitted for the move whose merge produced the win value; carries the score
    Won(u64),
    GameOver(GameStats),
    HintSuggested(Option<Direction>),
    ResizeRejected(usize),
    LoadRejected(String),
}
