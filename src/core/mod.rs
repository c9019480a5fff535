//! Core game logic: board, pieces, randomization, queue and the engine.
//!
//! Everything here is pure simulation with no terminal, I/O or timing
//! concerns; the runtime shell drives it with command tokens.

pub mod bag;
pub mod board;
pub mod game;
pub mod piece;
pub mod queue;
pub mod snapshot;

pub use bag::{Bag, SimpleRng};
pub use board::Board;
pub use game::{level_threshold, tick_interval_for_level, Game, WinCondition};
pub use piece::{Piece, PieceShape};
pub use queue::PieceQueue;
pub use snapshot::{ActiveSnapshot, GameSnapshot};
