use serde::{Deserialize, Deserializer, Serialize};

use super::{GameError, Grid};

/// Immutable snapshot of a grid engine: used for restore, undo/redo and persistence.
///
/// Fields are readable everywhere but only writable inside this module, so a
/// snapshot handed to a caller can't be edited in place.
#[readonly::make]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub size: usize,
    pub grid: Grid,
    pub score: u64,
    pub won: bool,
}

/// Wire shape accepted from persistence collaborators. Everything but the grid
/// is optional and falls back to the values a fresh game would have.
#[derive(Debug, Deserialize)]
struct GameStatePayload {
    size: Option<usize>,
    grid: Option<Grid>,
    score: Option<u64>,
    won: Option<bool>,
}

impl TryFrom<GameStatePayload> for GameState {
    type Error = GameError;

    fn try_from(payload: GameStatePayload) -> Result<Self, Self::Error> {
        let grid = payload.grid.ok_or(GameError::MissingGrid)?;
        let size = payload.size.unwrap_or(grid.size());
        if !grid.is_square_of(size) || !grid.has_valid_tiles() {
            return Err(GameError::MalformedState(size));
        }
        Ok(GameState::new(
            grid,
            payload.score.unwrap_or(0),
            payload.won.unwrap_or(false),
        ))
    }
}

// Hand-written so the readonly mirror type doesn't inherit a `try_from` attribute
impl<'de> Deserialize<'de> for GameState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let payload = GameStatePayload::deserialize(deserializer)?;
        GameState::try_from(payload).map_err(serde::de::Error::custom)
    }
}

impl GameState {
    /// Size is taken from the grid's row count.
    pub fn new(grid: Grid, score: u64, won: bool) -> Self {
        Self {
            size: grid.size(),
            grid,
            score,
            won,
        }
    }

    pub fn max_tile(&self) -> u32 {
        self.grid.max_tile()
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let state = GameState::new(Grid::parse("2 0 0\n0 0 0\n0 0 4"), 12, true);
        let json = state.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"size":3,"grid":[[2,0,0],[0,0,0],[0,0,4]],"score":12,"won":true}"#
        );
        assert_eq!(GameState::from_json(&json).unwrap(), state);
    }

    #[test]
    fn test_missing_score_and_won_default() {
        let state = GameState::from_json(r#"{"grid":[[2,0,0],[0,0,0],[0,0,0]]}"#).unwrap();
        assert_eq!(state.size, 3);
        assert_eq!(state.score, 0);
        assert!(!state.won);
    }

    #[test]
    fn test_missing_grid_is_rejected() {
        let result = GameState::from_json(r#"{"size":4,"score":10,"won":false}"#);
        assert!(matches!(result, Err(GameError::Parse(_))));
    }

    #[test]
    fn test_ragged_grid_is_rejected() {
        let result = GameState::from_json(r#"{"grid":[[2,0,0],[0,0],[0,0,0]]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_out_of_range_tiles_are_rejected() {
        let result = GameState::from_json(r#"{"grid":[[2147483648,0,0],[0,0,0],[0,0,0]]}"#);
        assert!(result.is_err());
        let result = GameState::from_json(r#"{"grid":[[3,0,0],[0,0,0],[0,0,0]]}"#);
        assert!(result.is_err());
        let state =
            GameState::from_json(r#"{"grid":[[1073741824,0,0],[0,0,0],[0,0,0]]}"#).unwrap();
        assert_eq!(state.max_tile(), 1 << 30);
    }

    #[test]
    fn test_size_must_match_grid() {
        let result = GameState::from_json(r#"{"size":4,"grid":[[2,0,0],[0,0,0],[0,0,0]]}"#);
        assert!(result.is_err());
    }
}
