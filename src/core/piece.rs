//! Piece module - tetromino geometry against the board.
//!
//! A piece is four cell offsets around a pivot plus a board position. All
//! mutations are atomic: every candidate cell is validated against bounds and
//! occupancy before anything is committed, so a failed move leaves the piece
//! bit-for-bit unchanged.
//!
//! Piece values are reusable slots owned by the queue: locking does not
//! allocate a new piece, it resets the same instance in place via
//! [`Piece::spawn`].

use crate::core::Board;
use crate::types::{Dir, PieceKind, Spin};

/// Offset of a single cell relative to the piece pivot.
pub type CellOffset = (i8, i8);

/// Shape of a piece - 4 cell offsets around the pivot at the origin.
pub type PieceShape = [CellOffset; 4];

/// Spawn-orientation shape for a piece kind.
///
/// y grows downwards; offsets use row -1 as the upper row so a freshly
/// spawned piece (row offset 1) sits inside the hidden spawn rows.
pub fn spawn_shape(kind: PieceKind) -> PieceShape {
    match kind {
        PieceKind::O => [(0, -1), (1, -1), (0, 0), (1, 0)],
        PieceKind::I => [(-1, 0), (0, 0), (1, 0), (2, 0)],
        PieceKind::T => [(0, -1), (-1, 0), (0, 0), (1, 0)],
        PieceKind::L => [(1, -1), (-1, 0), (0, 0), (1, 0)],
        PieceKind::J => [(-1, -1), (-1, 0), (0, 0), (1, 0)],
        PieceKind::Z => [(-1, -1), (0, -1), (0, 0), (1, 0)],
        PieceKind::S => [(0, -1), (1, -1), (-1, 0), (0, 0)],
    }
}

/// Spawn pivot column for a board of the given width (horizontally centered).
pub fn spawn_column(board_width: u8) -> i8 {
    (board_width / 2) as i8 - 1
}

/// Spawn pivot row. Cells sit in the hidden spawn rows.
pub const SPAWN_ROW: i8 = 1;

/// One falling (or queued) tetromino instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    /// Current-orientation cell offsets around the pivot.
    pub cells: PieceShape,
    /// Pivot column on the board.
    pub x: i8,
    /// Pivot row on the board.
    pub y: i8,
    /// Rows soft-dropped this piece-life.
    pub soft_dropped: u32,
    /// Rows hard-dropped this piece-life.
    pub hard_dropped: u32,
    /// Hold was already used this piece-life.
    pub held: bool,
    /// One-shot lock-delay grace flag.
    pub lock_armed: bool,
    /// T-spin probe result, meaningful only at lock time.
    pub t_spin: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, board_width: u8) -> Self {
        let mut piece = Self {
            kind,
            cells: spawn_shape(kind),
            x: 0,
            y: 0,
            soft_dropped: 0,
            hard_dropped: 0,
            held: false,
            lock_armed: false,
            t_spin: false,
        };
        piece.spawn(kind, board_width);
        piece
    }

    /// Reset this instance in place: default shape and spawn offset for
    /// `kind`, drop counters and flags cleared.
    pub fn spawn(&mut self, kind: PieceKind, board_width: u8) {
        self.kind = kind;
        self.cells = spawn_shape(kind);
        self.x = spawn_column(board_width);
        self.y = SPAWN_ROW;
        self.soft_dropped = 0;
        self.hard_dropped = 0;
        self.held = false;
        self.lock_armed = false;
        self.t_spin = false;
    }

    /// Absolute board coordinates of the four cells.
    pub fn blocks(&self) -> [(i8, i8); 4] {
        let mut out = [(0, 0); 4];
        for (slot, &(dx, dy)) in out.iter_mut().zip(self.cells.iter()) {
            *slot = (self.x + dx, self.y + dy);
        }
        out
    }

    /// All four cells of `shape` fit at pivot (x, y) on `board`.
    fn fits(board: &Board, shape: &PieceShape, x: i8, y: i8) -> bool {
        shape
            .iter()
            .all(|&(dx, dy)| board.is_valid(x + dx, y + dy))
    }

    /// Move one column left or right. Fails atomically on any collision or
    /// out-of-bounds cell.
    pub fn translate(&mut self, board: &Board, dir: Dir) -> bool {
        let dx = dir.dx();
        if Self::fits(board, &self.cells, self.x + dx, self.y) {
            self.x += dx;
            return true;
        }
        false
    }

    /// Move one row down (`dy = 1`) or up (`dy = -1`), same atomic
    /// commit-or-reject discipline as [`Piece::translate`].
    pub fn fall(&mut self, board: &Board, dy: i8) -> bool {
        if Self::fits(board, &self.cells, self.x, self.y + dy) {
            self.y += dy;
            return true;
        }
        false
    }

    /// Rotate 90 degrees about the pivot.
    ///
    /// The O piece never rotates and trivially succeeds without changing
    /// geometry. For the rest, all four rotated cells are validated before
    /// any are committed; partial success is never applied.
    pub fn rotate(&mut self, board: &Board, spin: Spin) -> bool {
        if self.kind == PieceKind::O {
            return true;
        }

        let mut rotated = self.cells;
        for cell in &mut rotated {
            let (dx, dy) = *cell;
            *cell = match spin {
                Spin::Cw => (-dy, dx),
                Spin::Ccw => (dy, -dx),
            };
        }

        if Self::fits(board, &rotated, self.x, self.y) {
            self.cells = rotated;
            return true;
        }
        false
    }

    /// Rotate with the wall-kick rule: direct rotation first, then a
    /// left-shifted retry, then a right-shifted retry. The left-before-right
    /// order is fixed. Failed attempts are fully undone.
    pub fn wall_kick(&mut self, board: &Board, spin: Spin) -> bool {
        if self.rotate(board, spin) {
            return true;
        }

        for dir in [Dir::Left, Dir::Right] {
            if self.translate(board, dir) {
                if self.rotate(board, spin) {
                    return true;
                }
                let undone = self.translate(board, opposite(dir));
                debug_assert!(undone, "wall-kick undo must return to a valid cell");
            }
        }

        false
    }

    /// Set this piece's four cells (and color) on the board. Idempotent.
    pub fn write(&self, board: &mut Board) {
        for (cx, cy) in self.blocks() {
            board.set(cx, cy, Some(self.kind));
        }
    }

    /// Clear this piece's four cells from the board. Idempotent.
    pub fn unwrite(&self, board: &mut Board) {
        for (cx, cy) in self.blocks() {
            board.set(cx, cy, None);
        }
    }
}

fn opposite(dir: Dir) -> Dir {
    match dir {
        Dir::Left => Dir::Right,
        Dir::Right => Dir::Left,
    }
}
