use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum AchievementKind {
    /// Largest tile on the grid reaches the threshold
    Tile(u32),
    /// Score reaches the threshold
    Score(u64),
    Win,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AchievementDef {
    pub id: String,
    pub kind: AchievementKind,
}

impl AchievementDef {
    pub fn new(id: &str, kind: AchievementKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
        }
    }

    /// The fixed catalog shipped with the game, in display order
    pub fn catalog() -> Vec<AchievementDef> {
        vec![
            AchievementDef::new("ach_128", AchievementKind::Tile(128)),
            AchievementDef::new("ach_256", AchievementKind::Tile(256)),
            AchievementDef::new("ach_512", AchievementKind::Tile(512)),
            AchievementDef::new("ach_1024", AchievementKind::Tile(1024)),
            AchievementDef::new("ach_2048", AchievementKind::Tile(2048)),
            AchievementDef::new("ach_score_1000", AchievementKind::Score(1000)),
            AchievementDef::new("ach_score_5000", AchievementKind::Score(5000)),
            AchievementDef::new("ach_win", AchievementKind::Win),
        ]
    }
}
