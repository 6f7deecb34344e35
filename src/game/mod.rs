pub mod achievements;
pub mod game_session;
pub mod grid_engine;
pub mod hint;
pub mod history;
pub mod settings;
pub mod spawner;
pub mod stats_manager;

pub use achievements::AchievementStore;
pub use game_session::GameSession;
pub use grid_engine::{GridEngine, WIN_VALUE};
pub use hint::suggest_move;
pub use history::HistoryManager;
pub use spawner::{RandomSource, RandomSpawner, SystemRandom, Xorshift32};
pub use stats_manager::StatsManager;
