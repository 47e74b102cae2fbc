//! Game configuration
//!
//! Every field has a default (see `tiles_types` constants), so a partial
//! JSON/TOML document deserializes into a complete config.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::types::{
    DEFAULT_COLUMNS, DEFAULT_HIGH_SPAWN_PERCENT, DEFAULT_ROWS, DEFAULT_TARGET_RANK,
    MAX_DIMENSION, MAX_TARGET_RANK, MIN_DIMENSION,
};

/// Rules and board size for one engine instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: u8,
    pub columns: u8,
    /// Rank that wins the game; `None` plays until stuck
    pub target_rank: Option<u8>,
    /// Whether reaching the target rank ends the game
    pub stop_on_win: bool,
    /// Percent chance that a spawn uses the high rank
    pub high_spawn_percent: u8,
}

impl GameConfig {
    /// Default rules on a `rows x columns` board
    pub fn with_dimensions(rows: u8, columns: u8) -> Self {
        Self {
            rows,
            columns,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn target_rank(mut self, rank: Option<u8>) -> Self {
        self.target_rank = rank;
        self
    }

    #[must_use]
    pub fn stop_on_win(mut self, stop: bool) -> Self {
        self.stop_on_win = stop;
        self
    }

    #[must_use]
    pub fn high_spawn_percent(mut self, percent: u8) -> Self {
        self.high_spawn_percent = percent;
        self
    }

    /// Check every field against its accepted range
    pub fn validate(&self) -> Result<(), EngineError> {
        validate_dimensions(self.rows, self.columns)?;

        if let Some(rank) = self.target_rank {
            if rank == 0 || rank > MAX_TARGET_RANK {
                return Err(EngineError::InvalidConfig("target_rank must be in 1..=63"));
            }
        }

        if self.high_spawn_percent > 100 {
            return Err(EngineError::InvalidConfig(
                "high_spawn_percent must be at most 100",
            ));
        }

        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            target_rank: Some(DEFAULT_TARGET_RANK),
            stop_on_win: true,
            high_spawn_percent: DEFAULT_HIGH_SPAWN_PERCENT,
        }
    }
}

pub(crate) fn validate_dimensions(rows: u8, columns: u8) -> Result<(), EngineError> {
    let range = MIN_DIMENSION..=MAX_DIMENSION;
    if range.contains(&rows) && range.contains(&columns) {
        Ok(())
    } else {
        Err(EngineError::InvalidDimensions { rows, columns })
    }
}
