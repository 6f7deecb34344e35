use log::{info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use crate::model::{AchievementDef, AchievementKind, GameState};

/// Evaluates `catalog` against `state`, inserting every newly satisfied id into
/// `unlocked`. Returns the newly unlocked definitions in catalog order; ids
/// already in `unlocked` are skipped.
pub fn check(
    state: &GameState,
    unlocked: &mut HashSet<String>,
    catalog: &[AchievementDef],
) -> Vec<AchievementDef> {
    let max_tile = state.max_tile();
    let mut newly_unlocked = Vec::new();
    for def in catalog {
        if unlocked.contains(&def.id) {
            continue;
        }
        let satisfied = match def.kind {
            AchievementKind::Tile(threshold) => max_tile >= threshold,
            AchievementKind::Score(threshold) => state.score >= threshold,
            AchievementKind::Win => state.won,
        };
        if satisfied && unlocked.insert(def.id.clone()) {
            info!(target: "achievements", "Unlocked {}", def.id);
            newly_unlocked.push(def.clone());
        }
    }
    newly_unlocked
}

/// The unlock set as it is persisted: a JSON array of ids
#[derive(Debug)]
pub struct AchievementStore {
    path: PathBuf,
    unlocked: HashSet<String>,
}

impl AchievementStore {
    /// Loads `achievements.json` from `data_dir`; a missing or unreadable file
    /// yields an empty set.
    pub fn load(data_dir: PathBuf) -> Self {
        let path = data_dir.join("achievements.json");
        let unlocked = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<String>>(&contents) {
                Ok(ids) => ids.into_iter().collect(),
                Err(err) => {
                    warn!(target: "achievements", "Ignoring corrupt {:?}: {}", path, err);
                    HashSet::new()
                }
            },
            Err(_) => HashSet::new(),
        };
        Self { path, unlocked }
    }

    pub fn save(&self) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut ids: Vec<&String> = self.unlocked.iter().collect();
        ids.sort();
        let contents = serde_json::to_string(&ids)?;
        fs::write(&self.path, contents)
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    pub fn unlocked(&self) -> &HashSet<String> {
        &self.unlocked
    }

    pub fn unlocked_mut(&mut self) -> &mut HashSet<String> {
        &mut self.unlocked
    }

    /// Convenience wrapper around [`check`] using the store's own set
    pub fn check(&mut self, state: &GameState, catalog: &[AchievementDef]) -> Vec<AchievementDef> {
        check(state, &mut self.unlocked, catalog)
    }
}
