use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::TimestampSeconds;
use std::time::{Duration, SystemTime};
use uuid::Uuid;

/// Record of one finished (or abandoned) playthrough
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameStats {
    pub score: u64,
    pub max_tile: u32,
    pub moves_made: u32,
    pub grid_size: usize,
    pub won: bool,
    pub play_time: Duration,
    #[serde_as(as = "TimestampSeconds")]
    pub finished_at: SystemTime,
    pub playthrough_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct GlobalStats {
    pub grid_size: usize,
    pub total_games_played: u32,
    pub total_games_won: u32,
    pub total_score: u64,
    pub best_score: u64,
    pub total_time_played: Duration,
}
