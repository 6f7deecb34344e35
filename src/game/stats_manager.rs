use log::{trace, warn};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::model::{GameStats, GlobalStats};

const HIGH_SCORES_KEPT: usize = 20;

/// Best scores and running totals, one pair of JSON files per grid size
#[derive(Debug)]
pub struct StatsManager {
    data_dir: PathBuf,
    scores: HashMap<usize, Vec<GameStats>>,
    global_stats: HashMap<usize, GlobalStats>,
}

impl StatsManager {
    pub fn new(data_dir: PathBuf) -> Self {
        if !data_dir.exists() {
            if let Err(err) = fs::create_dir_all(&data_dir) {
                warn!(target: "stats", "Could not create {:?}: {}", data_dir, err);
            }
        }
        Self {
            data_dir,
            scores: HashMap::new(),
            global_stats: HashMap::new(),
        }
    }

    fn scores_path(&self, grid_size: usize) -> PathBuf {
        self.data_dir.join(format!("scores_{}x{}.json", grid_size, grid_size))
    }

    fn global_stats_path(&self, grid_size: usize) -> PathBuf {
        self.data_dir
            .join(format!("global_stats_{}x{}.json", grid_size, grid_size))
    }

    /// Lazily loads the records for one grid size
    fn ensure_loaded(&mut self, grid_size: usize) {
        if !self.scores.contains_key(&grid_size) {
            let scores = fs::read_to_string(self.scores_path(grid_size))
                .ok()
                .and_then(|contents| serde_json::from_str(&contents).ok())
                .unwrap_or_default();
            self.scores.insert(grid_size, scores);
        }
        if !self.global_stats.contains_key(&grid_size) {
            let stats = fs::read_to_string(self.global_stats_path(grid_size))
                .ok()
                .and_then(|contents| serde_json::from_str(&contents).ok())
                .unwrap_or_else(|| GlobalStats {
                    grid_size,
                    ..Default::default()
                });
            self.global_stats.insert(grid_size, stats);
        }
    }

    fn save(&self, grid_size: usize) -> std::io::Result<()> {
        if let Some(scores) = self.scores.get(&grid_size) {
            let contents = serde_json::to_string_pretty(scores)?;
            fs::write(self.scores_path(grid_size), contents)?;
        }
        if let Some(stats) = self.global_stats.get(&grid_size) {
            let contents = serde_json::to_string_pretty(stats)?;
            fs::write(self.global_stats_path(grid_size), contents)?;
        }
        Ok(())
    }

    pub fn record_game(&mut self, stats: &GameStats) -> std::io::Result<()> {
        let grid_size = stats.grid_size;
        self.ensure_loaded(grid_size);

        let scores = self.scores.entry(grid_size).or_default();
        scores.push(stats.clone());
        scores.sort_by(|a, b| b.score.cmp(&a.score));
        scores.truncate(HIGH_SCORES_KEPT);

        let global_stats = self.global_stats.entry(grid_size).or_default();
        global_stats.total_games_played += 1;
        if stats.won {
            global_stats.total_games_won += 1;
        }
        global_stats.total_score += stats.score;
        global_stats.best_score = global_stats.best_score.max(stats.score);
        global_stats.total_time_played += stats.play_time;
        trace!(target: "stats", "Recorded game: {:?}", stats);

        self.save(grid_size)
    }

    pub fn get_high_scores(&mut self, grid_size: usize, limit: usize) -> Vec<GameStats> {
        self.ensure_loaded(grid_size);
        self.scores
            .get(&grid_size)
            .map(|scores| scores.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    pub fn get_global_stats(&mut self, grid_size: usize) -> GlobalStats {
        self.ensure_loaded(grid_size);
        self.global_stats
            .get(&grid_size)
            .cloned()
            .unwrap_or_else(|| GlobalStats {
                grid_size,
                ..Default::default()
            })
    }

    pub fn best_score(&mut self, grid_size: usize) -> u64 {
        self.get_global_stats(grid_size).best_score
    }
}
