mod achievement;
mod direction;
mod game_error;
mod game_state;
mod game_stats;
mod grid;
mod move_result;
mod session_command;
mod session_event;

pub use achievement::{AchievementDef, AchievementKind};
pub use direction::Direction;
pub use game_error::GameError;
pub use game_state::GameState;
pub use game_stats::{GameStats, GlobalStats};
pub use grid::{Grid, Position, MAX_GRID_SIZE, MAX_TILE_VALUE, MIN_GRID_SIZE};
pub use move_result::{MoveResult, TileMove};
pub use session_command::SessionCommand;
pub use session_event::SessionEvent;
