//! Engine module - owns the board and resolves moves
//!
//! This module ties together the board, RNG, scoring and configuration.
//! It handles the game lifecycle: initial spawns, moves, the post-move spawn,
//! and win/loss detection.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::config::GameConfig;
use crate::error::EngineError;
use crate::rng::SimpleRng;
use crate::scoring::{reaches_target, total_merge_points};
use crate::snapshot::{GameSnapshot, MoveResult, TileTransition};
use crate::types::{
    Cell, Direction, GameStatus, Position, Tile, TileId, Transition, INITIAL_TILES,
    SPAWN_HIGH_RANK, SPAWN_RANK,
};

/// Parse a direction name, rejecting anything unrecognized
pub fn parse_direction(name: &str) -> Result<Direction, EngineError> {
    Direction::from_str(name).ok_or_else(|| EngineError::InvalidDirection(name.to_string()))
}

/// A single game session
///
/// The engine is the only writer of its board. Callers read snapshots and
/// submit directions; ids, spawns and score are all decided here.
#[derive(Debug, Clone)]
pub struct Engine {
    config: GameConfig,
    board: Board,
    rng: SimpleRng,
    /// Id handed to the next spawned tile (never reused, survives restarts)
    next_id: u64,
    score: u64,
    status: GameStatus,
    /// Set once the target rank is reached; sticks even if the game is later lost
    won: bool,
    /// Legal moves applied in the current episode
    moves: u32,
    /// Monotonic episode id (increments on restart)
    episode_id: u32,
}

impl Engine {
    /// Start a game with default rules on a `rows x columns` board
    pub fn new_game(rows: u8, columns: u8, seed: u32) -> Result<Self, EngineError> {
        Self::with_config(GameConfig::with_dimensions(rows, columns), seed)
    }

    /// Start a game with the given rules
    pub fn with_config(config: GameConfig, seed: u32) -> Result<Self, EngineError> {
        config.validate()?;

        let mut engine = Self {
            config,
            board: Board::new(config.rows, config.columns)?,
            rng: SimpleRng::new(seed),
            next_id: 1,
            score: 0,
            status: GameStatus::InProgress,
            won: false,
            moves: 0,
            episode_id: 0,
        };
        engine.spawn_initial();
        engine.check_win();

        tracing::debug!(
            rows = config.rows,
            columns = config.columns,
            seed,
            "new game"
        );
        Ok(engine)
    }

    /// Rebuild an engine around an existing board (used by restore)
    pub(crate) fn from_parts(
        config: GameConfig,
        board: Board,
        seed: u32,
        score: u64,
        status: GameStatus,
    ) -> Self {
        let next_id = board
            .tiles()
            .map(|(_, tile)| tile.id.get())
            .max()
            .map_or(1, |max| max.saturating_add(1));

        let mut engine = Self {
            config,
            board,
            rng: SimpleRng::new(seed),
            next_id,
            score,
            status,
            won: status == GameStatus::Won,
            moves: 0,
            episode_id: 0,
        };
        // A stuck board is only marked lost on the next move attempt.
        engine.check_win();
        engine
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    /// Whether the target rank has been reached in this episode
    pub fn has_won(&self) -> bool {
        self.won
    }

    /// Whether moves are ignored from now on
    pub fn is_terminal(&self) -> bool {
        match self.status {
            GameStatus::InProgress => false,
            GameStatus::Won => self.config.stop_on_win,
            GameStatus::Lost => true,
        }
    }

    /// Check whether a move in `direction` would be accepted
    pub fn can_move(&self, direction: Direction) -> bool {
        !self.is_terminal() && self.board.can_move(direction)
    }

    /// Directions that currently change the board (for enabling controls)
    pub fn available_moves(&self) -> ArrayVec<Direction, 4> {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.can_move(d))
            .collect()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.board.clone_from(&self.board);
        out.score = self.score;
        out.status = self.status;
        out.moves = self.moves;
        out.episode_id = self.episode_id;
        out.terminal = self.is_terminal();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            score: self.score,
            status: self.status,
            moves: self.moves,
            episode_id: self.episode_id,
            terminal: self.is_terminal(),
        }
    }

    /// Apply a move named by a string ("up", "l", ...)
    pub fn apply_named_move(&mut self, name: &str) -> Result<MoveResult, EngineError> {
        let direction = parse_direction(name)?;
        Ok(self.apply_move(direction))
    }

    /// Slide every line toward `direction`, merge, spawn, and update status
    ///
    /// A move that would change nothing, or any move on a finished game,
    /// leaves the engine untouched and returns `moved == false`.
    pub fn apply_move(&mut self, direction: Direction) -> MoveResult {
        if self.is_terminal() {
            return self.no_op();
        }

        if !self.board.has_any_move() {
            self.status = GameStatus::Lost;
            tracing::info!(score = self.score, "no moves left, game lost");
            return self.no_op();
        }

        if !self.board.can_move(direction) {
            tracing::trace!(%direction, "move changes nothing");
            return self.no_op();
        }

        let outcome = self.board.slide(direction);
        debug_assert_eq!(total_merge_points(&outcome.merges), outcome.score_gained);
        self.score = self.score.saturating_add(outcome.score_gained);
        self.moves = self.moves.wrapping_add(1);

        let mut transitions: Vec<TileTransition> = outcome
            .moves
            .iter()
            .map(|m| TileTransition {
                tile: m.tile,
                position: m.to,
                from: m.from,
                tag: if m.merged {
                    Transition::Merged
                } else if m.from != m.to {
                    Transition::Slid(direction)
                } else {
                    Transition::None
                },
            })
            .collect();

        let spawned = self.spawn_tile();
        if let Some((pos, tile)) = spawned {
            transitions.push(TileTransition {
                tile,
                position: pos,
                from: pos,
                tag: Transition::Spawned,
            });
        }
        transitions.sort_by_key(|t| t.position);

        self.update_status();

        tracing::debug!(
            %direction,
            merges = outcome.merges.len(),
            score_delta = outcome.score_gained,
            score = self.score,
            status = %self.status,
            "move applied"
        );

        MoveResult {
            moved: true,
            snapshot: self.snapshot(),
            transitions,
            merges: outcome.merges,
            spawned,
            score_delta: outcome.score_gained,
        }
    }

    /// Start over with the same rules
    ///
    /// The RNG stream and tile id counter carry on, so ids stay unique for
    /// the lifetime of this engine.
    pub fn restart(&mut self) {
        self.board.clear();
        self.score = 0;
        self.status = GameStatus::InProgress;
        self.won = false;
        self.moves = 0;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.spawn_initial();
        self.check_win();

        tracing::info!(episode_id = self.episode_id, "game restarted");
    }

    fn spawn_initial(&mut self) {
        for _ in 0..INITIAL_TILES {
            self.spawn_tile();
        }
    }

    /// Hand out the next unused id, or None once the id space is used up
    fn allocate_id(&mut self) -> Option<TileId> {
        let id = TileId::new(self.next_id);
        self.next_id = self.next_id.checked_add(1)?;
        Some(id)
    }

    /// Place one tile on a uniformly chosen empty cell
    ///
    /// Draws the cell first, then the rank. Returns None when the board is full.
    fn spawn_tile(&mut self) -> Option<(Position, Tile)> {
        let empty = self.board.empty_count();
        if empty == 0 {
            return None;
        }

        let pick = self.rng.next_range(empty as u32) as usize;
        let pos = self.board.nth_empty(pick)?;
        let rank = if self.rng.chance(self.config.high_spawn_percent) {
            SPAWN_HIGH_RANK
        } else {
            SPAWN_RANK
        };
        let tile = Tile::new(self.allocate_id()?, rank);
        self.board.set(pos.row, pos.column, Cell::Occupied(tile));

        tracing::trace!(id = tile.id.get(), rank, row = pos.row, column = pos.column, "spawned tile");
        Some((pos, tile))
    }

    fn check_win(&mut self) {
        if !self.won && reaches_target(self.board.max_rank(), self.config.target_rank) {
            self.won = true;
            self.status = GameStatus::Won;
            tracing::info!(score = self.score, moves = self.moves, "target rank reached");
        }
    }

    fn update_status(&mut self) {
        self.check_win();

        if !self.is_terminal() && !self.board.has_any_move() {
            self.status = GameStatus::Lost;
            tracing::info!(score = self.score, moves = self.moves, "no moves left, game lost");
        }
    }

    /// Result for a move that changed nothing
    fn no_op(&self) -> MoveResult {
        MoveResult {
            moved: false,
            snapshot: self.snapshot(),
            transitions: self
                .board
                .tiles()
                .map(|(pos, tile)| TileTransition {
                    tile,
                    position: pos,
                    from: pos,
                    tag: Transition::None,
                })
                .collect(),
            merges: Vec::new(),
            spawned: None,
            score_delta: 0,
        }
    }

    /// Replace the board for testing
    #[cfg(test)]
    pub(crate) fn set_board(&mut self, board: Board) {
        self.next_id = board
            .tiles()
            .map(|(_, tile)| tile.id.get() + 1)
            .max()
            .unwrap_or(1)
            .max(self.next_id);
        self.board = board;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(rows: &[&[u8]], config: GameConfig) -> Engine {
        let mut engine = Engine::with_config(config, 12345).unwrap();
        engine.set_board(Board::from_ranks(rows));
        engine
    }

    #[test]
    fn test_new_game() {
        let engine = Engine::new_game(4, 4, 12345).unwrap();

        assert_eq!(engine.board().tile_count(), 2);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.moves(), 0);
        assert_eq!(engine.episode_id(), 0);
        assert_eq!(engine.status(), GameStatus::InProgress);
        assert!(!engine.is_terminal());
        assert!(engine
            .board()
            .tiles()
            .all(|(_, t)| t.rank == SPAWN_RANK || t.rank == SPAWN_HIGH_RANK));
    }

    #[test]
    fn test_new_game_invalid_dimensions() {
        assert_eq!(
            Engine::new_game(1, 4, 1).unwrap_err(),
            EngineError::InvalidDimensions { rows: 1, columns: 4 }
        );
        assert!(Engine::new_game(4, 1, 1).is_err());
    }

    #[test]
    fn test_new_game_is_deterministic() {
        let a = Engine::new_game(4, 4, 777).unwrap();
        let b = Engine::new_game(4, 4, 777).unwrap();
        assert_eq!(a.board(), b.board());
    }

    #[test]
    fn test_initial_ids_are_distinct() {
        let engine = Engine::new_game(2, 2, 5).unwrap();
        let ids: Vec<_> = engine.board().tiles().map(|(_, t)| t.id).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_high_spawn_percent_extremes() {
        let config = GameConfig::default().high_spawn_percent(100);
        let engine = Engine::with_config(config, 9).unwrap();
        assert!(engine.board().tiles().all(|(_, t)| t.rank == SPAWN_HIGH_RANK));

        let config = GameConfig::default().high_spawn_percent(0);
        let engine = Engine::with_config(config, 9).unwrap();
        assert!(engine.board().tiles().all(|(_, t)| t.rank == SPAWN_RANK));
    }

    #[test]
    fn test_apply_move_example_row() {
        let mut engine = engine_with(
            &[&[1, 1, 0, 1], &[0, 0, 0, 0]],
            GameConfig::with_dimensions(2, 4),
        );
        let result = engine.apply_move(Direction::Left);

        assert!(result.moved);
        let row0: Vec<_> = (0..4)
            .map(|c| engine.board().get(0, c).and_then(|cell| cell.rank()))
            .collect();
        // The spawn can land anywhere empty, including row 0.
        assert_eq!(row0[0], Some(2));
        assert_eq!(row0[1], Some(1));
        assert_eq!(result.score_delta, 4);
        assert_eq!(engine.score(), 4);
        assert_eq!(result.merges.len(), 1);
    }

    #[test]
    fn test_apply_move_tags() {
        let mut engine = engine_with(
            &[&[1, 1, 0, 2], &[3, 0, 0, 0]],
            GameConfig::with_dimensions(2, 4),
        );
        let result = engine.apply_move(Direction::Left);

        // ids: 1=(0,0) r1, 2=(0,1) r1, 3=(0,3) r2, 4=(1,0) r3
        assert_eq!(result.transition_of(TileId::new(1)).unwrap().tag, Transition::Merged);
        assert!(result.transition_of(TileId::new(2)).is_none());
        let slid = result.transition_of(TileId::new(3)).unwrap();
        assert_eq!(slid.tag, Transition::Slid(Direction::Left));
        assert_eq!(slid.from, Position::new(0, 3));
        assert_eq!(slid.position, Position::new(0, 1));
        assert_eq!(result.transition_of(TileId::new(4)).unwrap().tag, Transition::None);

        let (pos, tile) = result.spawned.unwrap();
        assert_eq!(tile.id, TileId::new(5));
        assert_eq!(result.transition_of(tile.id).unwrap().tag, Transition::Spawned);
        assert_eq!(result.transition_of(tile.id).unwrap().position, pos);
        assert_eq!(result.transitions.len(), engine.board().tile_count());
    }

    #[test]
    fn test_no_op_move_changes_nothing() {
        let mut engine = engine_with(&[&[1, 2], &[0, 0]], GameConfig::with_dimensions(2, 2));
        let before = engine.snapshot();

        let result = engine.apply_move(Direction::Up);
        assert!(!result.moved);
        assert!(result.spawned.is_none());
        assert_eq!(result.score_delta, 0);
        assert_eq!(engine.snapshot(), before);
        assert!(result.transitions.iter().all(|t| t.tag == Transition::None));
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!(parse_direction("down"), Ok(Direction::Down));
        assert_eq!(
            parse_direction("diagonal"),
            Err(EngineError::InvalidDirection("diagonal".to_string()))
        );
    }

    #[test]
    fn test_apply_named_move_rejects_unknown() {
        let mut engine = Engine::new_game(4, 4, 3).unwrap();
        let before = engine.snapshot();
        assert!(matches!(
            engine.apply_named_move("sideways"),
            Err(EngineError::InvalidDirection(_))
        ));
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_win_stops_game() {
        let config = GameConfig::with_dimensions(2, 2).target_rank(Some(3));
        let mut engine = engine_with(&[&[2, 2], &[0, 0]], config);

        let result = engine.apply_move(Direction::Left);
        assert!(result.moved);
        assert_eq!(result.status(), GameStatus::Won);
        assert!(engine.has_won());
        assert!(engine.is_terminal());
        assert!(engine.available_moves().is_empty());

        let after = engine.apply_move(Direction::Right);
        assert!(!after.moved);
        assert_eq!(after.status(), GameStatus::Won);
    }

    #[test]
    fn test_win_can_continue() {
        let config = GameConfig::with_dimensions(2, 2)
            .target_rank(Some(3))
            .stop_on_win(false);
        let mut engine = engine_with(&[&[2, 2], &[0, 0]], config);

        let result = engine.apply_move(Direction::Left);
        assert_eq!(result.status(), GameStatus::Won);
        assert!(!engine.is_terminal());
        assert!(!engine.available_moves().is_empty());
    }

    #[test]
    fn test_loss_after_spawn() {
        // High spawn odds at 0 make every spawn rank 1, so the board fills predictably.
        let config = GameConfig::with_dimensions(2, 2)
            .target_rank(None)
            .high_spawn_percent(0);
        let mut engine = engine_with(&[&[0, 2], &[2, 3]], config);

        let result = engine.apply_move(Direction::Left);
        assert!(result.moved);
        assert_eq!(engine.board().to_ranks(), vec![vec![2, 1], vec![2, 3]]);
        // Column 0 holds two rank-2 tiles, so the game is still alive.
        assert_eq!(result.status(), GameStatus::InProgress);

        let result = engine.apply_move(Direction::Up);
        assert!(result.moved);
        assert_eq!(engine.board().to_ranks(), vec![vec![3, 1], vec![1, 3]]);
        assert_eq!(result.status(), GameStatus::Lost);
        assert!(engine.is_terminal());
        assert!(!engine.apply_move(Direction::Down).moved);
    }

    #[test]
    fn test_won_then_lost_without_stop_on_win() {
        let config = GameConfig::with_dimensions(2, 2)
            .target_rank(Some(3))
            .stop_on_win(false)
            .high_spawn_percent(0);
        let mut engine = engine_with(&[&[2, 2], &[2, 1]], config);

        let result = engine.apply_move(Direction::Left);
        assert!(result.moved);
        assert_eq!(engine.board().to_ranks(), vec![vec![3, 1], vec![2, 1]]);
        assert_eq!(result.status(), GameStatus::Won);
        assert!(!engine.is_terminal());

        // Column 1 merges and the spawn fills the last gap.
        let result = engine.apply_move(Direction::Up);
        assert!(result.moved);
        assert_eq!(engine.board().to_ranks(), vec![vec![3, 2], vec![2, 1]]);
        assert_eq!(result.status(), GameStatus::Lost);
        assert!(engine.has_won());
        assert!(engine.is_terminal());

        let before = engine.snapshot();
        for dir in Direction::ALL {
            let result = engine.apply_move(dir);
            assert!(!result.moved);
            assert_eq!(result.status(), GameStatus::Lost);
        }
        assert_eq!(engine.snapshot(), before);
        assert!(engine.has_won());
    }

    #[test]
    fn test_starting_board_can_already_win() {
        let config = GameConfig::default().target_rank(Some(1));
        let mut engine = Engine::with_config(config, 3).unwrap();
        assert_eq!(engine.status(), GameStatus::Won);
        assert!(engine.has_won());
        assert!(engine.is_terminal());
        assert!(!engine.apply_move(Direction::Left).moved);

        engine.restart();
        assert_eq!(engine.status(), GameStatus::Won);
        assert!(engine.has_won());
    }

    #[test]
    fn test_spawn_skipped_when_ids_run_out() {
        let mut engine = engine_with(&[&[1, 0], &[0, 0]], GameConfig::with_dimensions(2, 2));
        engine.next_id = u64::MAX;

        let result = engine.apply_move(Direction::Right);
        assert!(result.moved);
        assert!(result.spawned.is_none());
        assert_eq!(engine.board().tile_count(), 1);
    }

    #[test]
    fn test_stuck_board_is_lost_on_next_attempt() {
        let config = GameConfig::with_dimensions(2, 2).target_rank(None);
        let mut engine = engine_with(&[&[1, 2], &[2, 1]], config);
        assert_eq!(engine.status(), GameStatus::InProgress);

        let result = engine.apply_move(Direction::Left);
        assert!(!result.moved);
        assert_eq!(result.status(), GameStatus::Lost);
        assert!(engine.is_terminal());
    }

    #[test]
    fn test_restart_keeps_ids_unique() {
        let mut engine = Engine::new_game(4, 4, 42).unwrap();
        let first: Vec<_> = engine.board().tiles().map(|(_, t)| t.id).collect();

        engine.apply_move(Direction::Left);
        engine.apply_move(Direction::Down);
        engine.restart();
        assert_eq!(engine.episode_id(), 1);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.moves(), 0);
        assert_eq!(engine.board().tile_count(), 2);
        assert!(engine
            .board()
            .tiles()
            .all(|(_, t)| !first.contains(&t.id)));
    }

    #[test]
    fn test_snapshot_into_matches_snapshot() {
        let mut engine = Engine::new_game(4, 4, 8).unwrap();
        let mut snap = Engine::new_game(2, 2, 1).unwrap().snapshot();
        for dir in Direction::ALL {
            engine.apply_move(dir);
        }
        engine.snapshot_into(&mut snap);
        assert_eq!(snap, engine.snapshot());
    }
}
