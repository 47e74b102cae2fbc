//! Read-only views handed to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::types::{GameStatus, Position, Tile, TileId, Transition};

/// One merge performed by a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Merge {
    /// Leading tile; keeps its id and gains one rank
    pub survivor: TileId,
    /// Trailing tile; removed from the board
    pub absorbed: TileId,
    /// Cell the survivor ends up in
    pub position: Position,
    /// Rank after the merge
    pub rank: u8,
}

/// Animation hint for a tile present after a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileTransition {
    pub tile: Tile,
    pub position: Position,
    /// Cell the tile occupied before the move (equals `position` unless it slid)
    pub from: Position,
    pub tag: Transition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub board: Board,
    pub score: u64,
    pub status: GameStatus,
    /// Legal moves applied since the game started
    pub moves: u32,
    pub episode_id: u32,
    /// Whether further moves are ignored
    pub terminal: bool,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        !self.terminal
    }
}

/// Outcome of a single move attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// False when the move changed nothing (or the game had ended)
    pub moved: bool,
    pub snapshot: GameSnapshot,
    /// One entry per tile on the board after the move, row-major
    pub transitions: Vec<TileTransition>,
    pub merges: Vec<Merge>,
    pub spawned: Option<(Position, Tile)>,
    pub score_delta: u64,
}

impl MoveResult {
    pub fn status(&self) -> GameStatus {
        self.snapshot.status
    }

    pub fn board(&self) -> &Board {
        &self.snapshot.board
    }

    pub fn score(&self) -> u64 {
        self.snapshot.score
    }

    /// Transition recorded for the given tile, if it is still on the board
    pub fn transition_of(&self, id: TileId) -> Option<&TileTransition> {
        self.transitions.iter().find(|t| t.tile.id == id)
    }
}
