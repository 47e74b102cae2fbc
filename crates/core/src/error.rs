//! Engine errors.
//!
//! No-op moves are not errors: they come back as a normal
//! [`MoveResult`](crate::MoveResult) with `moved == false`.

use tiles_types::{Position, TileId};

/// Errors returned by engine construction, move parsing and restore.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Rows or columns outside the supported range.
    #[error("invalid board dimensions {rows}x{columns}")]
    InvalidDimensions { rows: u8, columns: u8 },

    /// Move input that does not name a direction.
    #[error("invalid direction {0:?}")]
    InvalidDirection(String),

    /// Configuration value out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),

    /// Saved game failed validation.
    #[error("invalid save: {0}")]
    InvalidSave(#[from] SaveError),
}

/// Reasons a [`SavedGame`](crate::SavedGame) cannot be restored.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    /// Tile placed outside the board.
    #[error("tile {id} at {row},{column} is outside the board")]
    OutOfBounds { id: TileId, row: u8, column: u8 },

    /// Two tiles placed in the same cell.
    #[error("cell {0:?} holds more than one tile")]
    CellOccupied(Position),

    /// Same id used by two tiles.
    #[error("tile id {0} appears more than once")]
    DuplicateId(TileId),

    /// Rank 0 is not a valid tile.
    #[error("tile {0} has rank 0")]
    ZeroRank(TileId),

    /// Id leaves no room for the ids of future spawns.
    #[error("tile id {0} is the largest possible id")]
    IdExhausted(TileId),
}
