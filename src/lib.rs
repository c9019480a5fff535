//! A terminal falling-block puzzle game.
//!
//! The crate splits into a pure simulation core ([`core`]), a terminal
//! front-end ([`term`]), key-to-command mapping ([`input`]), JSON session
//! and high-score persistence ([`persist`]) and the two-thread runtime
//! shell ([`runtime`]) that wires them together.

pub mod core;
pub mod input;
pub mod persist;
pub mod runtime;
pub mod term;
pub mod types;
