//! Board module - the game grid.
//!
//! A width x height grid where each cell is empty or filled with a piece
//! kind. Stored as a flat row-major vector, allocated once at game start and
//! mutated in place. Coordinates are (x, y) with x growing rightwards and y
//! growing downwards; rows `0..HIDDEN_ROWS` are the spawn zone.

use crate::types::{Cell, PieceKind, HIDDEN_ROWS};

/// The game board.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: u8,
    height: u8,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board with the given dimensions.
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    /// Calculate flat index from (x, y) coordinates.
    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= self.width as i8 || y < 0 || y >= self.height as i8 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Get cell at (x, y). Returns `None` when out of bounds.
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Set cell at (x, y). Returns false when out of bounds.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Within bounds and empty.
    pub fn is_valid(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Within bounds and filled.
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Every column of row `y` is filled.
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.height as usize {
            return false;
        }
        let start = y * self.width as usize;
        self.cells[start..start + self.width as usize]
            .iter()
            .all(|cell| cell.is_some())
    }

    /// Every column of row `y` is empty.
    pub fn is_row_empty(&self, y: usize) -> bool {
        if y >= self.height as usize {
            return true;
        }
        let start = y * self.width as usize;
        self.cells[start..start + self.width as usize]
            .iter()
            .all(|cell| cell.is_none())
    }

    /// Clear row `y` and shift the visible rows above it down by one.
    ///
    /// Colors move with occupancy. The spawn rows are left untouched: nothing
    /// is ever shifted into rows `0..HIDDEN_ROWS`, and the topmost visible row
    /// ends up empty.
    pub fn clear_row(&mut self, y: usize) {
        let hidden = HIDDEN_ROWS as usize;
        if y < hidden || y >= self.height as usize {
            return;
        }

        let width = self.width as usize;
        for row in (hidden + 1..=y).rev() {
            let src = (row - 1) * width;
            let dst = row * width;
            self.cells.copy_within(src..src + width, dst);
        }

        let top = hidden * width;
        for cell in &mut self.cells[top..top + width] {
            *cell = None;
        }
    }

    /// True when any spawn-zone cell is occupied.
    ///
    /// Called after a lock (before the next piece is written), so occupancy
    /// here is permanent stack, not the falling piece.
    pub fn spawn_rows_occupied(&self) -> bool {
        (0..HIDDEN_ROWS as usize).any(|y| !self.is_row_empty(y))
    }

    /// Raw cell slice, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Append the grid as one byte per cell (0 empty, 1..=7 piece code).
    pub fn write_codes_into(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.cells.len());
        out.extend(
            self.cells
                .iter()
                .map(|cell| cell.map_or(0, PieceKind::code)),
        );
    }

    /// Serialize the grid as one byte per cell (0 empty, 1..=7 piece code).
    pub fn to_codes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_codes_into(&mut out);
        out
    }

    /// Rebuild a board from a code blob produced by [`Board::to_codes`].
    ///
    /// Returns `None` when the blob length does not match the dimensions or
    /// contains an unknown code.
    pub fn from_codes(width: u8, height: u8, codes: &[u8]) -> Option<Self> {
        if codes.len() != width as usize * height as usize {
            return None;
        }
        let mut cells = Vec::with_capacity(codes.len());
        for &code in codes {
            if code == 0 {
                cells.push(None);
            } else {
                cells.push(Some(PieceKind::from_code(code)?));
            }
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }
}
