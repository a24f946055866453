// Core minefield model
// Owns the grid, cursor and flag counters; handles mine placement, flood-fill reveal and flagging

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("invalid field size {rows}x{cols}, rows and columns must be between 1 and 1024")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("mine percentage {0} is out of range (0-100)")]
    InvalidPercentage(u8),
    #[error("position ({row}, {col}) is outside the field")]
    InvalidCoords { row: usize, col: usize },
    #[error("mines were already placed on this field")]
    MinesAlreadyPlaced,
}

/// Largest number of rows or columns a field may have
pub const MAX_SIDE: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Closed,
    Open,
    Flagged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Empty,
    Mine,
}

/// A single cell on the field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub state: CellState,
    pub kind: CellKind,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            state: CellState::Closed,
            kind: CellKind::Empty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// When mines are put on the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinePlacement {
    /// On the first reveal, never under the cursor
    #[default]
    Lazy,
    /// Right after creation, the first reveal may hit a mine
    Eager,
}

impl MinePlacement {
    /// Config file identifier, keep stable across versions
    pub fn name(&self) -> &'static str {
        match self {
            MinePlacement::Lazy => "Lazy",
            MinePlacement::Eager => "Eager",
        }
    }
}

impl Serialize for MinePlacement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for MinePlacement {
    fn deserialize<D>(deserializer: D) -> Result<MinePlacement, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            x if x.eq_ignore_ascii_case(MinePlacement::Lazy.name()) => Ok(MinePlacement::Lazy),
            x if x.eq_ignore_ascii_case(MinePlacement::Eager.name()) => Ok(MinePlacement::Eager),
            _ => Err(serde::de::Error::custom("unknown mine placement")),
        }
    }
}

/// Rules that differ between play styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldRules {
    pub placement: MinePlacement,
    /// Let the flood fill open flagged cells (and drop their flags)
    pub flood_opens_flags: bool,
}

/// What a cell looks like to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Closed,
    Flagged,
    Blank,
    Count(u8),
    Mine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    NoChange,
    /// Number of cells turned open, flood fill included
    Opened(usize),
    Exploded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

/// The grid of cells plus cursor and counters
#[derive(Debug, Clone)]
pub struct Field {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    cursor: (usize, usize),
    rules: FieldRules,
    mines_placed: bool,
    total_mines: usize,
    total_flagged: usize,
    correctly_flagged: usize,
}

impl Field {
    /// Create an empty field, all cells closed and no mines yet
    pub fn new(rows: usize, cols: usize, rules: FieldRules) -> Result<Self, FieldError> {
        if !(1..=MAX_SIDE).contains(&rows) || !(1..=MAX_SIDE).contains(&cols) {
            return Err(FieldError::InvalidDimensions { rows, cols });
        }
        let n = rows
            .checked_mul(cols)
            .ok_or(FieldError::InvalidDimensions { rows, cols })?;
        Ok(Field {
            rows,
            cols,
            cells: vec![Cell::default(); n],
            cursor: (0, 0),
            rules,
            mines_placed: false,
            total_mines: 0,
            total_flagged: 0,
            correctly_flagged: 0,
        })
    }

    /// Create a field with mines at exactly the given positions
    /// Duplicate positions count once
    #[cfg(test)]
    pub fn with_mines(
        rows: usize,
        cols: usize,
        rules: FieldRules,
        mines: &[(usize, usize)],
    ) -> Result<Self, FieldError> {
        let mut field = Field::new(rows, cols, rules)?;
        for &(row, col) in mines {
            let idx = field.checked_index(row, col)?;
            if field.cells[idx].kind != CellKind::Mine {
                field.cells[idx].kind = CellKind::Mine;
                field.total_mines += 1;
            }
        }
        field.mines_placed = true;
        Ok(field)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Current cursor position as (row, col)
    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn total_mines(&self) -> usize {
        self.total_mines
    }

    pub fn total_flagged(&self) -> usize {
        self.total_flagged
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    pub fn cursor_cell(&self) -> Cell {
        self.cells[self.index(self.cursor.0, self.cursor.1)]
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    fn checked_index(&self, row: usize, col: usize) -> Result<usize, FieldError> {
        if self.contains(row, col) {
            Ok(self.index(row, col))
        } else {
            Err(FieldError::InvalidCoords { row, col })
        }
    }

    /// Up to 8 in-bounds positions around (row, col)
    fn neighbors(&self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> + use<> {
        let rows = row.saturating_sub(1)..=(row + 1).min(self.rows - 1);
        let cols = col.saturating_sub(1)..=(col + 1).min(self.cols - 1);
        rows.flat_map(move |r| cols.clone().map(move |c| (r, c)))
            .filter(move |&pos| pos != (row, col))
    }

    /// Randomly place `rows * cols * percentage / 100` mines by rejection sampling
    /// Lazy rules keep the cursor cell free, so the count is capped at one less than the cell count
    pub fn place_mines<R: Rng>(
        &mut self,
        percentage: u8,
        rng: &mut R,
    ) -> Result<usize, FieldError> {
        if percentage > 100 {
            return Err(FieldError::InvalidPercentage(percentage));
        }
        if self.mines_placed {
            return Err(FieldError::MinesAlreadyPlaced);
        }

        let n = self.cells.len();
        let requested = n * percentage as usize / 100;
        let avoid = match self.rules.placement {
            MinePlacement::Lazy => Some(self.index(self.cursor.0, self.cursor.1)),
            MinePlacement::Eager => None,
        };
        let room = if avoid.is_some() { n - 1 } else { n };
        let mines = requested.min(room);
        if mines < requested {
            warn!(requested, placed = mines, "not enough room for all mines, count capped");
        }

        let mut placed = 0;
        while placed < mines {
            let i = rng.gen_range(0..n);
            if Some(i) == avoid || self.cells[i].kind == CellKind::Mine {
                continue;
            }
            self.cells[i].kind = CellKind::Mine;
            placed += 1;
        }

        self.total_mines = mines;
        self.mines_placed = true;
        // flags set before placement may now sit on mines
        self.correctly_flagged = self
            .cells
            .iter()
            .filter(|c| c.state == CellState::Flagged && c.kind == CellKind::Mine)
            .count();
        debug!(rows = self.rows, cols = self.cols, mines, "mines placed");
        Ok(mines)
    }

    /// Number of mines around (row, col), 0 for positions off the field
    pub fn neighbor_mine_count(&self, row: usize, col: usize) -> u8 {
        if !self.contains(row, col) {
            return 0;
        }
        self.neighbors(row, col)
            .filter(|&(r, c)| self.cells[self.index(r, c)].kind == CellKind::Mine)
            .count() as u8
    }

    /// Open a cell
    /// - Mine: every mine is revealed and the field explodes
    /// - Zero neighbor count: flood fill over the connected zero region and its numbered border
    /// - Flagged or already open cells are left alone
    pub fn open_cell(&mut self, row: usize, col: usize) -> Result<OpenOutcome, FieldError> {
        let idx = self.checked_index(row, col)?;
        let cell = self.cells[idx];
        if cell.state != CellState::Closed {
            return Ok(OpenOutcome::NoChange);
        }
        if cell.kind == CellKind::Mine {
            self.reveal_all_mines();
            return Ok(OpenOutcome::Exploded);
        }
        Ok(OpenOutcome::Opened(self.flood_open(row, col)))
    }

    pub fn open_at_cursor(&mut self) -> Result<OpenOutcome, FieldError> {
        self.open_cell(self.cursor.0, self.cursor.1)
    }

    fn flood_open(&mut self, row: usize, col: usize) -> usize {
        let idx = self.index(row, col);
        self.cells[idx].state = CellState::Open;
        let mut opened = 1;

        let mut stack = Vec::new();
        if self.neighbor_mine_count(row, col) == 0 {
            stack.push((row, col));
        }
        // cells are marked open before they are pushed, so each is expanded once
        while let Some((r, c)) = stack.pop() {
            for (nr, nc) in self.neighbors(r, c) {
                let nidx = self.index(nr, nc);
                let neighbor = self.cells[nidx];
                if neighbor.kind == CellKind::Mine || neighbor.state == CellState::Open {
                    continue;
                }
                if neighbor.state == CellState::Flagged {
                    if !self.rules.flood_opens_flags {
                        continue;
                    }
                    self.total_flagged -= 1;
                }
                self.cells[nidx].state = CellState::Open;
                opened += 1;
                if self.neighbor_mine_count(nr, nc) == 0 {
                    stack.push((nr, nc));
                }
            }
        }
        opened
    }

    pub fn reveal_all_mines(&mut self) {
        for cell in self.cells.iter_mut().filter(|c| c.kind == CellKind::Mine) {
            cell.state = CellState::Open;
        }
    }

    /// Toggle the flag on a closed cell, open cells are left alone
    pub fn toggle_flag(&mut self, row: usize, col: usize) -> Result<FlagOutcome, FieldError> {
        let idx = self.checked_index(row, col)?;
        let is_mine = self.cells[idx].kind == CellKind::Mine;
        Ok(match self.cells[idx].state {
            CellState::Open => FlagOutcome::NoChange,
            CellState::Flagged => {
                self.cells[idx].state = CellState::Closed;
                self.total_flagged -= 1;
                if is_mine {
                    self.correctly_flagged -= 1;
                }
                FlagOutcome::Unflagged
            }
            CellState::Closed => {
                self.cells[idx].state = CellState::Flagged;
                self.total_flagged += 1;
                if is_mine {
                    self.correctly_flagged += 1;
                }
                FlagOutcome::Flagged
            }
        })
    }

    pub fn toggle_flag_at_cursor(&mut self) -> Result<FlagOutcome, FieldError> {
        self.toggle_flag(self.cursor.0, self.cursor.1)
    }

    /// Every mine carries a flag
    pub fn is_won(&self) -> bool {
        self.correctly_flagged == self.total_mines
    }

    /// Move the cursor one step, stopping at the edges
    pub fn move_cursor(&mut self, direction: Direction) {
        let (row, col) = self.cursor;
        self.cursor = match direction {
            Direction::Up => (row.saturating_sub(1), col),
            Direction::Down => ((row + 1).min(self.rows - 1), col),
            Direction::Left => (row, col.saturating_sub(1)),
            Direction::Right => (row, (col + 1).min(self.cols - 1)),
        };
    }

    /// Display symbol for a cell; panics if (row, col) is off the field
    pub fn symbol_at(&self, row: usize, col: usize) -> Symbol {
        let cell = self.cells[self.index(row, col)];
        match (cell.state, cell.kind) {
            (CellState::Closed, _) => Symbol::Closed,
            (CellState::Flagged, _) => Symbol::Flagged,
            (CellState::Open, CellKind::Mine) => Symbol::Mine,
            (CellState::Open, CellKind::Empty) => match self.neighbor_mine_count(row, col) {
                0 => Symbol::Blank,
                n => Symbol::Count(n),
            },
        }
    }
}
