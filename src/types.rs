//! Shared pure data types and constants.
//!
//! Everything in this module is plain data usable from any layer
//! (engine, rendering, persistence, runtime).

use anyhow::{bail, Result};

/// Default playfield width in columns.
pub const DEFAULT_BOARD_WIDTH: u8 = 10;

/// Default playfield height in rows, including the hidden spawn rows.
pub const DEFAULT_BOARD_HEIGHT: u8 = 22;

/// Rows reserved at the top of the board for spawning.
///
/// A permanently occupied cell in these rows after a lock ends the game.
pub const HIDDEN_ROWS: u8 = 2;

/// Default number of preview pieces in the queue.
pub const DEFAULT_LOOKAHEAD: usize = 5;

/// Upper bound on the preview count (sizes the bounded preview buffers).
pub const MAX_LOOKAHEAD: usize = 8;

/// Base points for clearing N rows in one lock, multiplied by the level.
pub const LINE_SCORES: [u64; 5] = [0, 100, 300, 500, 800];

/// Difficult-clear bonus is 3/2 of the base clear points.
pub const DIFFICULT_NUMERATOR: u64 = 3;
pub const DIFFICULT_DENOMINATOR: u64 = 2;

/// Points per row of soft drop, credited when the piece locks.
pub const SOFT_DROP_POINTS: u64 = 1;

/// Points per row of hard drop, credited when the piece locks.
pub const HARD_DROP_POINTS: u64 = 2;

/// The seven tetromino piece kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    O,
    I,
    T,
    L,
    J,
    Z,
    S,
}

impl PieceKind {
    /// All kinds, in bag order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::O,
        PieceKind::I,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::Z,
        PieceKind::S,
    ];

    /// Stable numeric code used by the persisted grid blob (1..=7).
    pub fn code(self) -> u8 {
        match self {
            PieceKind::O => 1,
            PieceKind::I => 2,
            PieceKind::T => 3,
            PieceKind::L => 4,
            PieceKind::J => 5,
            PieceKind::Z => 6,
            PieceKind::S => 7,
        }
    }

    /// Inverse of [`PieceKind::code`]. Zero and unknown codes map to `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PieceKind::O),
            2 => Some(PieceKind::I),
            3 => Some(PieceKind::T),
            4 => Some(PieceKind::L),
            5 => Some(PieceKind::J),
            6 => Some(PieceKind::Z),
            7 => Some(PieceKind::S),
            _ => None,
        }
    }
}

/// A cell on the game board.
///
/// `None` is empty; `Some(kind)` is occupied, with the kind doubling as the
/// cell's color. The color is meaningful only while the cell is occupied.
pub type Cell = Option<PieceKind>;

/// Rotation direction for the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spin {
    Cw,
    Ccw,
}

/// Horizontal step direction for the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Left,
    Right,
}

impl Dir {
    pub fn dx(self) -> i8 {
        match self {
            Dir::Left => -1,
            Dir::Right => 1,
        }
    }
}

/// Discrete command tokens accepted by the engine's command processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    Hold,
    Pause,
    Quit,
    /// Advance gravity by one step (issued by the gravity driver).
    Tick,
}

/// Command-processor state.
///
/// `Lost`, `Won` and `Quit` are terminal: once any is set the engine stops
/// mutating simulation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    Running,
    Paused,
    Lost,
    Won,
    Quit,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Lost | GameStatus::Won | GameStatus::Quit)
    }
}

/// Session-constant rule configuration.
///
/// Set before game start; the engine never mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Board width in columns.
    pub width: u8,
    /// Board height in rows, including the hidden spawn rows.
    pub height: u8,
    /// Number of preview pieces (at most [`MAX_LOOKAHEAD`]).
    pub lookahead: usize,
    /// Retry failed rotations after a compensating horizontal shift.
    pub wall_kicks: bool,
    /// Recompute the ghost projection after each accepted command.
    pub ghost: bool,
    /// Probe for T-spins before a lock and score them as difficult clears.
    pub t_spin: bool,
    /// Defer the first lock of a hard-dropped piece by one tick.
    pub lock_delay: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            lookahead: DEFAULT_LOOKAHEAD,
            wall_kicks: true,
            ghost: true,
            t_spin: true,
            lock_delay: true,
        }
    }
}

impl GameConfig {
    /// Check the configuration is playable. The game cannot run without a
    /// usable board and queue, so callers treat an error here as fatal.
    pub fn validate(self) -> Result<Self> {
        if self.width < 4 {
            bail!("board width {} is too narrow to spawn pieces", self.width);
        }
        if self.height <= HIDDEN_ROWS + 2 {
            bail!("board height {} leaves no visible playfield", self.height);
        }
        if self.lookahead == 0 || self.lookahead > MAX_LOOKAHEAD {
            bail!(
                "lookahead {} out of range 1..={}",
                self.lookahead,
                MAX_LOOKAHEAD
            );
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_kind_codes_round_trip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(PieceKind::from_code(0), None);
        assert_eq!(PieceKind::from_code(8), None);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn degenerate_configs_are_rejected() {
        let mut cfg = GameConfig::default();
        cfg.width = 3;
        assert!(cfg.validate().is_err());

        let mut cfg = GameConfig::default();
        cfg.height = 4;
        assert!(cfg.validate().is_err());

        let mut cfg = GameConfig::default();
        cfg.lookahead = MAX_LOOKAHEAD + 1;
        assert!(cfg.validate().is_err());
    }
}
