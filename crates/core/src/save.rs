//! Save format - a serializable picture of a game in progress
//!
//! Layout: dimensions, score, status, then every tile as a
//! `(row, column, tile_id, rank)` tuple in row-major order.
//!
//! The RNG state is not saved; a restored game continues from a new seed.
//! Reading and writing files is left to the caller.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::GameConfig;
use crate::engine::Engine;
use crate::error::{EngineError, SaveError};
use crate::types::{Cell, GameStatus, Position, Tile, TileId};

/// One tile entry: `(row, column, tile_id, rank)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTile(pub u8, pub u8, pub TileId, pub u8);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    pub rows: u8,
    pub columns: u8,
    pub score: u64,
    pub status: GameStatus,
    pub tiles: Vec<SavedTile>,
}

impl Engine {
    /// Capture the current game
    pub fn to_saved(&self) -> SavedGame {
        let board = self.board();
        SavedGame {
            rows: board.rows(),
            columns: board.columns(),
            score: self.score(),
            status: self.status(),
            tiles: board
                .tiles()
                .map(|(pos, tile)| SavedTile(pos.row, pos.column, tile.id, tile.rank))
                .collect(),
        }
    }

    /// Rebuild a game from a save
    ///
    /// The save's dimensions override the ones in `config`; every other rule
    /// comes from `config`. New tiles get ids above the largest saved id.
    pub fn restore(saved: &SavedGame, config: GameConfig, seed: u32) -> Result<Self, EngineError> {
        let config = GameConfig {
            rows: saved.rows,
            columns: saved.columns,
            ..config
        };
        config.validate()?;

        let mut board = Board::new(saved.rows, saved.columns)?;
        let mut ids = HashSet::with_capacity(saved.tiles.len());

        for &SavedTile(row, column, id, rank) in &saved.tiles {
            if rank == 0 {
                return Err(SaveError::ZeroRank(id).into());
            }
            if id.get() == u64::MAX {
                return Err(SaveError::IdExhausted(id).into());
            }
            match board.get(row, column) {
                None => return Err(SaveError::OutOfBounds { id, row, column }.into()),
                Some(Cell::Occupied(_)) => {
                    return Err(SaveError::CellOccupied(Position::new(row, column)).into())
                }
                Some(Cell::Empty) => {}
            }
            if !ids.insert(id) {
                return Err(SaveError::DuplicateId(id).into());
            }
            board.set(row, column, Cell::Occupied(Tile::new(id, rank)));
        }

        tracing::debug!(
            rows = saved.rows,
            columns = saved.columns,
            tiles = saved.tiles.len(),
            status = %saved.status,
            "restored game"
        );
        Ok(Engine::from_parts(config, board, seed, saved.score, saved.status))
    }
}
