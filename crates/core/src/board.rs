//! Board module - manages the tile grid
//!
//! The board is a `rows x columns` grid where each cell is empty or holds one tile.
//! Uses a flat vector in row-major order (`row * columns + column`).
//!
//! Moves are resolved one line at a time. A *line* is a row (for `Left`/`Right`)
//! or a column (for `Up`/`Down`), walked from its leading edge: the edge the
//! tiles travel toward.

use std::fmt;

use arrayvec::ArrayVec;

use crate::config::validate_dimensions;
use crate::error::EngineError;
use crate::scoring::merge_points;
use crate::snapshot::Merge;
use crate::types::{Cell, Direction, Position, Tile, TileId, MAX_DIMENSION};

/// Longest possible line
const MAX_LINE: usize = MAX_DIMENSION as usize;

/// The tile grid
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: u8,
    columns: u8,
    /// Flat array of cells, row-major order (row * columns + column)
    cells: Vec<Cell>,
}

/// One tile's journey during a slide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TileMove {
    /// Tile after the move (rank already bumped if it merged)
    pub tile: Tile,
    pub from: Position,
    pub to: Position,
    pub merged: bool,
}

/// Everything a slide did to the board
#[derive(Debug, Default)]
pub(crate) struct SlideOutcome {
    /// Surviving tiles, line by line from the leading edge
    pub moves: Vec<TileMove>,
    pub merges: Vec<Merge>,
    /// Sum of the values of all merged tiles
    pub score_gained: u64,
}

impl SlideOutcome {
    /// True if any tile changed cell or rank
    pub fn changed(&self) -> bool {
        !self.merges.is_empty() || self.moves.iter().any(|m| m.from != m.to)
    }
}

/// Work slot used while compacting a single line
#[derive(Clone, Copy)]
struct Slot {
    tile: Tile,
    from: Position,
    merged: bool,
}

impl Board {
    /// Create a new empty board
    pub fn new(rows: u8, columns: u8) -> Result<Self, EngineError> {
        validate_dimensions(rows, columns)?;
        Ok(Self {
            rows,
            columns,
            cells: vec![Cell::Empty; rows as usize * columns as usize],
        })
    }

    /// Calculate flat index from (row, column)
    #[inline(always)]
    fn index(&self, row: u8, column: u8) -> Option<usize> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        Some(row as usize * self.columns as usize + column as usize)
    }

    #[inline(always)]
    fn position_of(&self, index: usize) -> Position {
        let columns = self.columns as usize;
        Position::new((index / columns) as u8, (index % columns) as u8)
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    /// Get cell at (row, column)
    /// Returns None if out of bounds
    pub fn get(&self, row: u8, column: u8) -> Option<Cell> {
        self.index(row, column).map(|idx| self.cells[idx])
    }

    /// Get cell at a position
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.get(pos.row, pos.column)
    }

    /// Set cell at (row, column)
    /// Returns false if out of bounds
    pub(crate) fn set(&mut self, row: u8, column: u8, cell: Cell) -> bool {
        match self.index(row, column) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Empty every cell, keeping the dimensions
    pub(crate) fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// All tiles with their positions, row-major
    pub fn tiles(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(idx, cell)| cell.tile().map(|tile| (self.position_of(idx), tile)))
    }

    /// Position of the tile with the given id
    pub fn find(&self, id: TileId) -> Option<Position> {
        self.tiles()
            .find(|(_, tile)| tile.id == id)
            .map(|(pos, _)| pos)
    }

    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Position of the `n`-th empty cell in row-major order
    pub(crate) fn nth_empty(&self, n: usize) -> Option<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_empty())
            .nth(n)
            .map(|(idx, _)| self.position_of(idx))
    }

    /// Highest rank on the board
    pub fn max_rank(&self) -> Option<u8> {
        self.cells.iter().filter_map(Cell::rank).max()
    }

    /// Check if any two orthogonal neighbours share a rank
    pub fn has_adjacent_equal(&self) -> bool {
        for row in 0..self.rows {
            for column in 0..self.columns {
                let Some(rank) = self.get(row, column).and_then(|c| c.rank()) else {
                    continue;
                };
                let right = self.get(row, column + 1).and_then(|c| c.rank());
                let below = self.get(row + 1, column).and_then(|c| c.rank());
                if right == Some(rank) || below == Some(rank) {
                    return true;
                }
            }
        }
        false
    }

    /// Number of lines a move in `direction` resolves
    fn line_count(&self, direction: Direction) -> u8 {
        if direction.is_horizontal() {
            self.rows
        } else {
            self.columns
        }
    }

    /// Number of cells per line for a move in `direction`
    fn line_len(&self, direction: Direction) -> u8 {
        if direction.is_horizontal() {
            self.columns
        } else {
            self.rows
        }
    }

    /// Position of the `k`-th cell of `line`, counted from the leading edge
    fn line_position(&self, direction: Direction, line: u8, k: u8) -> Position {
        match direction {
            Direction::Left => Position::new(line, k),
            Direction::Right => Position::new(line, self.columns - 1 - k),
            Direction::Up => Position::new(k, line),
            Direction::Down => Position::new(self.rows - 1 - k, line),
        }
    }

    fn cell_at(&self, pos: Position) -> Cell {
        self.cells[pos.row as usize * self.columns as usize + pos.column as usize]
    }

    fn put(&mut self, pos: Position, cell: Cell) {
        let idx = pos.row as usize * self.columns as usize + pos.column as usize;
        self.cells[idx] = cell;
    }

    /// Check whether a move in `direction` would change anything
    ///
    /// A line can move if a tile sits behind an empty cell, or if two
    /// consecutive tiles share a rank.
    pub fn can_move(&self, direction: Direction) -> bool {
        for line in 0..self.line_count(direction) {
            let mut seen_empty = false;
            let mut prev_rank = None;
            for k in 0..self.line_len(direction) {
                match self.cell_at(self.line_position(direction, line, k)) {
                    Cell::Empty => seen_empty = true,
                    Cell::Occupied(tile) => {
                        if seen_empty || prev_rank == Some(tile.rank) {
                            return true;
                        }
                        prev_rank = Some(tile.rank);
                    }
                }
            }
        }
        false
    }

    /// Check whether any direction still has a legal move
    pub fn has_any_move(&self) -> bool {
        Direction::ALL.iter().any(|&d| self.can_move(d))
    }

    /// Slide and merge every line toward `direction`
    ///
    /// Within a line, a tile merges into the previous output tile when their
    /// ranks match and that output tile has not merged yet this move. The
    /// leading tile survives with rank + 1; the trailing tile is dropped.
    pub(crate) fn slide(&mut self, direction: Direction) -> SlideOutcome {
        let mut out = SlideOutcome::default();
        let len = self.line_len(direction);

        for line in 0..self.line_count(direction) {
            let mut slots: ArrayVec<Slot, MAX_LINE> = ArrayVec::new();

            for k in 0..len {
                let from = self.line_position(direction, line, k);
                let Cell::Occupied(tile) = self.cell_at(from) else {
                    continue;
                };

                // Where the last slot lands, should this tile merge into it.
                let at = slots.len().saturating_sub(1) as u8;
                match slots.last_mut() {
                    Some(last) if !last.merged && last.tile.rank == tile.rank => {
                        last.tile.rank = last.tile.rank.saturating_add(1);
                        last.merged = true;
                        out.score_gained = out
                            .score_gained
                            .saturating_add(merge_points(last.tile.rank));
                        out.merges.push(Merge {
                            survivor: last.tile.id,
                            absorbed: tile.id,
                            position: self.line_position(direction, line, at),
                            rank: last.tile.rank,
                        });
                    }
                    _ => slots.push(Slot {
                        tile,
                        from,
                        merged: false,
                    }),
                }
            }

            for k in 0..len {
                let to = self.line_position(direction, line, k);
                match slots.get(k as usize) {
                    Some(slot) => {
                        self.put(to, Cell::Occupied(slot.tile));
                        out.moves.push(TileMove {
                            tile: slot.tile,
                            from: slot.from,
                            to,
                            merged: slot.merged,
                        });
                    }
                    None => self.put(to, Cell::Empty),
                }
            }
        }

        out
    }

    /// Create from rows of ranks for testing (0 = empty); ids count up from 1
    #[cfg(test)]
    pub(crate) fn from_ranks(rows: &[&[u8]]) -> Self {
        let mut board = Self::new(rows.len() as u8, rows[0].len() as u8).unwrap();
        let mut next_id = 1;
        for (r, ranks) in rows.iter().enumerate() {
            for (c, &rank) in ranks.iter().enumerate() {
                if rank > 0 {
                    board.set(r as u8, c as u8, Cell::Occupied(Tile::new(TileId::new(next_id), rank)));
                    next_id += 1;
                }
            }
        }
        board
    }

    /// Convert to rows of ranks for testing/display (0 = empty)
    #[cfg(test)]
    pub(crate) fn to_ranks(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.columns as usize)
            .map(|row| row.iter().map(|c| c.rank().unwrap_or(0)).collect())
            .collect()
    }
}

impl fmt::Display for Board {
    /// Text grid of tile values, `.` for empty cells
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .cells
            .iter()
            .map(|c| c.value().to_string().len())
            .max()
            .unwrap_or(1);

        for (r, row) in self.cells.chunks(self.columns as usize).enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for (c, cell) in row.iter().enumerate() {
                if c > 0 {
                    f.write_str(" ")?;
                }
                match cell {
                    Cell::Empty => write!(f, "{:>width$}", ".")?,
                    Cell::Occupied(tile) => write!(f, "{:>width$}", tile.value())?,
                }
            }
        }
        Ok(())
    }
}
