//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the board model and move resolver for a 2048-style
//! tile game. It has **no dependencies** on rendering, input or I/O, making it:
//!
//! - **Deterministic**: Same seed and same moves produce identical games
//! - **Testable**: Unit tests for every rule
//! - **Portable**: Any presentation layer (terminal, GUI, headless) can drive it
//! - **Isolated**: No global state; every [`Engine`] owns its board, RNG and id counter
//!
//! # Module Structure
//!
//! - [`board`]: tile grid, line traversal, slide/merge resolution
//! - [`engine`]: game lifecycle: spawns, moves, score, win/loss
//! - [`rng`]: seeded LCG used for spawns
//! - [`scoring`]: merge points and the win check
//! - [`snapshot`]: read-only views and per-move transition data
//! - [`save`]: serializable save format and restore validation
//! - [`config`]: rules and board size
//! - [`error`]: engine error types
//!
//! # Game Rules
//!
//! - **Slide**: every line compacts toward the move direction, keeping order
//! - **Merge**: two consecutive equal tiles merge into one of rank + 1; a
//!   merged tile does not merge again in the same move (`2 2 2 2` becomes `4 4`)
//! - **Spawn**: after a move that changed the board, one rank-1 tile (rank 2
//!   with a 10% chance) appears on a random empty cell
//! - **Score**: each merge adds the new tile's value
//! - **Win**: a tile reaches the target rank (2048 by default)
//! - **Loss**: no direction changes the board
//!
//! # Example
//!
//! ```
//! use tiles_core::Engine;
//! use tiles_types::{Direction, GameStatus};
//!
//! // Create a seeded 4x4 game
//! let mut game = Engine::new_game(4, 4, 12345).unwrap();
//! assert_eq!(game.board().tile_count(), 2);
//!
//! // Apply moves until one changes the board
//! let moved = Direction::ALL
//!     .into_iter()
//!     .any(|dir| game.apply_move(dir).moved);
//! assert!(moved);
//!
//! // A successful move always spawns a tile
//! assert!(game.board().tile_count() >= 2);
//! assert_eq!(game.status(), GameStatus::InProgress);
//! ```

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod rng;
pub mod save;
pub mod scoring;
pub mod snapshot;

pub use tiles_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::GameConfig;
pub use engine::{parse_direction, Engine};
pub use error::{EngineError, SaveError};
pub use rng::SimpleRng;
pub use save::{SavedGame, SavedTile};
pub use scoring::{merge_points, reaches_target, total_merge_points};
pub use snapshot::{GameSnapshot, Merge, MoveResult, TileTransition};
