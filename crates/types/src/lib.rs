//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are pure data structures with no engine logic, making them
//! usable in any context (core logic, presentation, save files).
//!
//! # Board Dimensions
//!
//! The classic board is 4x4, but any size between [`MIN_DIMENSION`] and
//! [`MAX_DIMENSION`] is accepted on both axes.
//!
//! - **Rows**: indexed top to bottom, starting at 0
//! - **Columns**: indexed left to right, starting at 0
//!
//! # Spawn and Win Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `INITIAL_TILES` | 2 | Tiles placed by a new game |
//! | `SPAWN_RANK` | 1 | Usual rank of a spawned tile (value 2) |
//! | `SPAWN_HIGH_RANK` | 2 | Rare rank of a spawned tile (value 4) |
//! | `DEFAULT_HIGH_SPAWN_PERCENT` | 10 | Chance of a high-rank spawn |
//! | `DEFAULT_TARGET_RANK` | 11 | Winning rank (value 2048) |
//!
//! # Ranks
//!
//! A tile's value is `2^rank`. Rank 0 never appears on a tile; an empty cell
//! reports value 0.
//!
//! # Examples
//!
//! ```
//! use tiles_types::{Direction, Tile, TileId, Transition};
//!
//! // Parse from string (case-insensitive)
//! let dir = Direction::from_str("Left").unwrap();
//! assert_eq!(dir, Direction::Left);
//! assert_eq!(dir.opposite(), Direction::Right);
//!
//! // Ranks map to values
//! let tile = Tile::new(TileId::new(7), 11);
//! assert_eq!(tile.value(), 2048);
//!
//! // Transition tags carry a display glyph
//! assert_eq!(Transition::Slid(Direction::Up).glyph(), "↑");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Smallest accepted number of rows or columns
pub const MIN_DIMENSION: u8 = 2;

/// Largest accepted number of rows or columns
pub const MAX_DIMENSION: u8 = 16;

/// Default number of rows (4)
pub const DEFAULT_ROWS: u8 = 4;

/// Default number of columns (4)
pub const DEFAULT_COLUMNS: u8 = 4;

/// Number of tiles spawned when a game starts
pub const INITIAL_TILES: usize = 2;

/// Rank of a normal spawn (value 2)
pub const SPAWN_RANK: u8 = 1;

/// Rank of a lucky spawn (value 4)
pub const SPAWN_HIGH_RANK: u8 = 2;

/// Percent chance that a spawned tile uses [`SPAWN_HIGH_RANK`]
pub const DEFAULT_HIGH_SPAWN_PERCENT: u8 = 10;

/// Rank that wins the game by default (2^11 = 2048)
pub const DEFAULT_TARGET_RANK: u8 = 11;

/// Highest target rank a config may ask for.
///
/// Values above this no longer fit a `u64` score increment.
pub const MAX_TARGET_RANK: u8 = 63;


/// Value of a tile with the given rank (`2^rank`), saturating at `u64::MAX`
pub const fn rank_value(rank: u8) -> u64 {
    if rank < 64 {
        1u64 << rank
    } else {
        u64::MAX
    }
}

/// The four directions a move can push the tiles
///
/// The direction names the edge tiles travel toward: `Left` compacts every
/// row against column 0, `Up` compacts every column against row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in a fixed order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Parse direction from string
    ///
    /// Accepts full names or single letters (case-insensitive):
    /// "up" | "u", "down" | "d", "left" | "l", "right" | "r"
    ///
    /// # Examples
    ///
    /// ```
    /// use tiles_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("up"), Some(Direction::Up));
    /// assert_eq!(Direction::from_str("R"), Some(Direction::Right));
    /// assert_eq!(Direction::from_str("north"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// True for `Left` and `Right` (moves that act on rows)
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable tile identity
///
/// Assigned by the engine when a tile spawns and never reused by that engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(u64);

impl TileId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A tile on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub rank: u8,
}

impl Tile {
    pub const fn new(id: TileId, rank: u8) -> Self {
        Self { id, rank }
    }

    /// Face value of the tile (`2^rank`)
    pub const fn value(&self) -> u64 {
        rank_value(self.rank)
    }
}

/// A cell on the game board
///
/// - `Empty`: no tile
/// - `Occupied(tile)`: exactly one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Tile),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn tile(&self) -> Option<Tile> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(tile) => Some(*tile),
        }
    }

    pub fn rank(&self) -> Option<u8> {
        self.tile().map(|t| t.rank)
    }

    /// Face value, 0 for an empty cell
    pub fn value(&self) -> u64 {
        match self {
            Cell::Empty => 0,
            Cell::Occupied(tile) => tile.value(),
        }
    }
}

/// Cell coordinates (row 0 is the top edge, column 0 the left edge)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub column: u8,
}

impl Position {
    pub const fn new(row: u8, column: u8) -> Self {
        Self { row, column }
    }
}

/// Per-move annotation of what happened to a tile
///
/// Output only: the presentation layer animates from it, the move resolver
/// never reads it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Tile stayed in its cell
    None,
    /// Tile was created by the engine after the move
    Spawned,
    /// Tile absorbed its trailing neighbour and gained one rank
    Merged,
    /// Tile changed cell in the given direction without merging
    Slid(Direction),
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::None => "none",
            Transition::Spawned => "spawned",
            Transition::Merged => "merged",
            Transition::Slid(Direction::Up) => "slid_up",
            Transition::Slid(Direction::Down) => "slid_down",
            Transition::Slid(Direction::Left) => "slid_left",
            Transition::Slid(Direction::Right) => "slid_right",
        }
    }

    /// Single-character marker for text renderings
    pub fn glyph(&self) -> &'static str {
        match self {
            Transition::None => " ",
            Transition::Spawned => "+",
            Transition::Merged => "×",
            Transition::Slid(Direction::Up) => "↑",
            Transition::Slid(Direction::Down) => "↓",
            Transition::Slid(Direction::Left) => "←",
            Transition::Slid(Direction::Right) => "→",
        }
    }
}

/// Game lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::InProgress => "in_progress",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
