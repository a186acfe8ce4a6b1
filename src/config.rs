//! Initial game configuration, read from a JSON settings file.

use crate::board::{BoardError, Side};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_BOARD_SIZE: usize = 20;
/// Upper bound on `board_width * board_height`.
pub const MAX_BOARD_CELLS: usize = 1 << 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Board dimensions must be positive and at most {} cells, got {width}x{height}",
        MAX_BOARD_CELLS
    )]
    InvalidDimensions { width: usize, height: usize },
    #[error("{side} unit at ({x}, {y}) is outside the board")]
    PositionOutOfBounds { side: Side, x: i64, y: i64 },
    #[error("More than one unit placed at ({x}, {y})")]
    DuplicatePosition { x: usize, y: usize },
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_width: usize,
    pub board_height: usize,
    pub starting_player: Side,
    /// Initial `[x, y]` positions per side. Signed so that negative
    /// coordinates surface as a validation error rather than a parse error.
    pub player_units: BTreeMap<Side, Vec<(i64, i64)>>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board_width: DEFAULT_BOARD_SIZE,
            board_height: DEFAULT_BOARD_SIZE,
            starting_player: Side::White,
            player_units: BTreeMap::from([
                (Side::White, vec![(0, 7), (0, 12), (19, 7), (19, 12)]),
                (Side::Black, vec![(7, 0), (12, 0), (7, 19), (12, 19)]),
            ]),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Checks dimensions and that every unit lands on a distinct cell.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.placements().map(|_| ())
    }

    /// Validated unit placements as `(side, x, y)`, in side then listing order.
    pub fn placements(&self) -> Result<Vec<(Side, usize, usize)>, ConfigError> {
        let cells = self.board_width.checked_mul(self.board_height);
        if !matches!(cells, Some(1..=MAX_BOARD_CELLS)) {
            return Err(ConfigError::InvalidDimensions {
                width: self.board_width,
                height: self.board_height,
            });
        }

        let mut seen = HashSet::new();
        let mut placements = Vec::new();

        for (&side, units) in &self.player_units {
            for &(x, y) in units {
                let in_bounds = usize::try_from(x)
                    .ok()
                    .zip(usize::try_from(y).ok())
                    .filter(|&(x, y)| x < self.board_width && y < self.board_height);
                let Some((x, y)) = in_bounds else {
                    return Err(ConfigError::PositionOutOfBounds { side, x, y });
                };
                if !seen.insert((x, y)) {
                    return Err(ConfigError::DuplicatePosition { x, y });
                }
                placements.push((side, x, y));
            }
        }

        Ok(placements)
    }
}
