use super::{Direction, GameState};

#[derive(Debug, Clone)]
pub enum SessionCommand {
    NewGame,
    Resize(usize),
    Move(Direction),
    Undo,
    Redo,
    LoadState(GameState),
    ShowHint,
    Reseed(Option<u32>), // None switches to system randomness
    InitDisplay,
}
