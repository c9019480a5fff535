//! Read-only view of the engine state for rendering and persistence.
//!
//! A snapshot owns its buffers so the renderer can hold one across frames
//! and refill it in place with [`Game::snapshot_into`] without allocating.
//!
//! [`Game::snapshot_into`]: crate::core::Game::snapshot_into

use arrayvec::ArrayVec;

use crate::core::piece::PieceShape;
use crate::types::{GameStatus, PieceKind, MAX_LOOKAHEAD};

/// Geometry of the falling piece at snapshot time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    /// Current-orientation cell offsets around the pivot.
    pub cells: PieceShape,
    pub x: i8,
    pub y: i8,
}

impl ActiveSnapshot {
    /// Absolute board coordinates of the four cells.
    pub fn blocks(&self) -> [(i8, i8); 4] {
        let mut out = [(0, 0); 4];
        for (slot, &(dx, dy)) in out.iter_mut().zip(self.cells.iter()) {
            *slot = (self.x + dx, self.y + dy);
        }
        out
    }

    /// The four cells with the pivot moved to `row` (ghost projection).
    pub fn blocks_at_row(&self, row: i8) -> [(i8, i8); 4] {
        let mut out = [(0, 0); 4];
        for (slot, &(dx, dy)) in out.iter_mut().zip(self.cells.iter()) {
            *slot = (self.x + dx, row + dy);
        }
        out
    }
}

/// One complete frame of game state.
///
/// The board bytes use the persisted cell coding (0 empty, 1..=7 kind) and
/// include the falling piece, which the engine keeps written on the board.
#[derive(Debug, Clone, Default)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    /// Row-major cell codes, `width * height` bytes.
    pub board: Vec<u8>,
    /// `None` once the game is over.
    pub active: Option<ActiveSnapshot>,
    /// Pivot row the active piece would rest at, when the ghost is enabled.
    pub ghost_row: Option<i8>,
    pub hold: Option<PieceKind>,
    /// Upcoming kinds in spawn order.
    pub next: ArrayVec<PieceKind, MAX_LOOKAHEAD>,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub status: GameStatus,
}

impl GameSnapshot {
    /// Cell code at (x, y), 0 when out of bounds.
    pub fn code_at(&self, x: i8, y: i8) -> u8 {
        if x < 0 || x >= self.width as i8 || y < 0 || y >= self.height as i8 {
            return 0;
        }
        self.board[y as usize * self.width as usize + x as usize]
    }
}
