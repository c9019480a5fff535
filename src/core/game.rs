//! Game module - the simulation engine.
//!
//! Ties board, queue and bag together and owns the rules: gravity, locking,
//! line clears, scoring, difficulty progression and the command-processor
//! state machine. The active piece stays written on the board between
//! operations; every mutation follows the unwrite -> mutate -> write
//! discipline, so rule rejections leave the aggregate untouched.
//!
//! The engine is single-threaded; the runtime shell serializes access with
//! one lock per discrete operation.

use std::time::Duration;

use crate::core::{Board, Piece, PieceQueue};
use crate::types::{
    Command, Dir, GameConfig, GameStatus, PieceKind, Spin, DIFFICULT_DENOMINATOR,
    DIFFICULT_NUMERATOR, HARD_DROP_POINTS, HIDDEN_ROWS, LINE_SCORES, SOFT_DROP_POINTS,
};

/// Lines required to advance past `level`.
pub fn level_threshold(level: u32) -> u32 {
    level * level + 3 * level + 2
}

/// Gravity interval for `level`.
///
/// Monotonically decreasing, asymptotically approaching a floor of a quarter
/// of the base interval.
pub fn tick_interval_for_level(level: u32) -> Duration {
    let l = level as f64;
    let ns = 1e9 / (1.0 + (l / 5.0).atan() * std::f64::consts::FRAC_2_PI * 3.0) - 1.0;
    Duration::from_nanos(ns.max(0.0) as u64)
}

/// Win-condition predicate, evaluated after every accepted command.
pub type WinCondition = fn(&Game) -> bool;

/// Complete simulation state.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    board: Board,
    queue: PieceQueue,
    status: GameStatus,
    score: u64,
    level: u32,
    /// Total lines destroyed this game.
    lines: u32,
    /// Lines destroyed since the last level-up (remainder carries over).
    level_lines: u32,
    tick_interval: Duration,
    /// True while consecutive difficult clears chain the scoring bonus.
    difficult_streak: bool,
    /// Pivot row the active piece would rest at (display only).
    ghost_row: Option<i8>,
    win: Option<WinCondition>,
}

impl Game {
    /// Create a fresh game. `config` must have been validated.
    pub fn new(config: GameConfig, seed: u32) -> Self {
        debug_assert!(config.validate().is_ok());
        let board = Board::new(config.width, config.height);
        let queue = PieceQueue::new(config.lookahead, config.width, seed);
        let mut game = Self {
            config,
            board,
            queue,
            status: GameStatus::Running,
            score: 0,
            level: 1,
            lines: 0,
            level_lines: 0,
            tick_interval: tick_interval_for_level(1),
            difficult_streak: false,
            ghost_row: None,
            win: None,
        };
        game.queue.current().write(&mut game.board);
        game.recompute_ghost();
        game
    }

    /// Rebuild a game from a persisted session.
    ///
    /// The grid, score, lines and level round-trip exactly; the tick interval
    /// is re-derived from the level. Queue, bag and piece flags are volatile
    /// and regenerated fresh.
    pub fn restore(
        config: GameConfig,
        seed: u32,
        board: Board,
        score: u64,
        lines: u32,
        level_lines: u32,
        level: u32,
    ) -> Self {
        debug_assert!(config.validate().is_ok());
        let level = level.max(1);
        let queue = PieceQueue::new(config.lookahead, config.width, seed);
        let mut game = Self {
            config,
            board,
            queue,
            status: GameStatus::Running,
            score,
            level,
            lines,
            level_lines,
            tick_interval: tick_interval_for_level(level),
            difficult_streak: false,
            ghost_row: None,
            win: None,
        };
        game.queue.current().write(&mut game.board);
        game.recompute_ghost();
        game
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level_lines(&self) -> u32 {
        self.level_lines
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn difficult_streak(&self) -> bool {
        self.difficult_streak
    }

    pub fn ghost_row(&self) -> Option<i8> {
        self.ghost_row
    }

    pub fn hold_kind(&self) -> Option<PieceKind> {
        self.queue.hold_kind()
    }

    pub fn active(&self) -> &Piece {
        self.queue.current()
    }

    /// Register a predicate that ends the game in `Won` once satisfied.
    pub fn set_win_condition(&mut self, win: WinCondition) {
        self.win = Some(win);
    }

    /// Fill `out` with a read-only view of the current state.
    pub fn snapshot_into(&self, out: &mut crate::core::snapshot::GameSnapshot) {
        use crate::core::snapshot::ActiveSnapshot;

        out.width = self.board.width();
        out.height = self.board.height();
        self.board.write_codes_into(&mut out.board);
        out.active = (!self.status.is_terminal()).then(|| {
            let piece = self.queue.current();
            ActiveSnapshot {
                kind: piece.kind,
                cells: piece.cells,
                x: piece.x,
                y: piece.y,
            }
        });
        out.ghost_row = self.ghost_row;
        out.hold = self.queue.hold_kind();
        out.next.clear();
        out.next.extend(self.queue.next_kinds());
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.status = self.status;
    }

    pub fn snapshot(&self) -> crate::core::snapshot::GameSnapshot {
        let mut s = crate::core::snapshot::GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Apply one command token. Returns whether the command was accepted.
    ///
    /// Terminal states accept nothing. While paused only `Pause` (toggle
    /// back) and `Quit` are accepted; everything else is a rejected no-op.
    pub fn apply(&mut self, cmd: Command) -> bool {
        if self.status.is_terminal() {
            return false;
        }

        if self.status == GameStatus::Paused {
            return match cmd {
                Command::Pause => {
                    self.status = GameStatus::Running;
                    true
                }
                Command::Quit => {
                    self.status = GameStatus::Quit;
                    true
                }
                _ => false,
            };
        }

        let accepted = match cmd {
            Command::MoveLeft => self.translate(Dir::Left),
            Command::MoveRight => self.translate(Dir::Right),
            Command::SoftDrop => self.soft_drop(),
            Command::HardDrop => self.hard_drop(),
            Command::RotateCw => self.rotate(Spin::Cw),
            Command::RotateCcw => self.rotate(Spin::Ccw),
            Command::Hold => self.hold(),
            Command::Pause => {
                // Pausing breaks the difficult-clear chain.
                self.status = GameStatus::Paused;
                self.difficult_streak = false;
                true
            }
            Command::Quit => {
                self.status = GameStatus::Quit;
                true
            }
            Command::Tick => self.step(),
        };

        if accepted && !self.status.is_terminal() {
            if let Some(win) = self.win {
                if win(self) {
                    self.status = GameStatus::Won;
                    return true;
                }
            }
            self.recompute_ghost();
        }

        accepted
    }

    /// Move the active piece one column sideways.
    fn translate(&mut self, dir: Dir) -> bool {
        let piece = self.queue.current_mut();
        piece.unwrite(&mut self.board);
        let moved = piece.translate(&self.board, dir);
        piece.write(&mut self.board);
        moved
    }

    /// Rotate the active piece, with wall kicks when enabled.
    fn rotate(&mut self, spin: Spin) -> bool {
        let kicks = self.config.wall_kicks;
        let piece = self.queue.current_mut();
        piece.unwrite(&mut self.board);
        let rotated = if kicks {
            piece.wall_kick(&self.board, spin)
        } else {
            piece.rotate(&self.board, spin)
        };
        piece.write(&mut self.board);
        rotated
    }

    /// Drop the active piece one row, counting the distance for scoring.
    fn soft_drop(&mut self) -> bool {
        let piece = self.queue.current_mut();
        piece.unwrite(&mut self.board);
        let dropped = piece.fall(&self.board, 1);
        if dropped {
            piece.soft_dropped += 1;
        }
        piece.write(&mut self.board);
        dropped
    }

    /// Drop the active piece until blocked, then lock (or arm the one-shot
    /// lock-delay grace when enabled).
    fn hard_drop(&mut self) -> bool {
        let piece = self.queue.current_mut();
        piece.unwrite(&mut self.board);
        let mut moved = 0u32;
        while piece.fall(&self.board, 1) {
            moved += 1;
        }
        piece.hard_dropped += moved;
        if moved > 0 {
            // Any earlier probe result described the pre-drop position.
            piece.t_spin = false;
        }
        piece.write(&mut self.board);

        let piece = self.queue.current_mut();
        if self.config.lock_delay && piece.hard_dropped > 0 && !piece.lock_armed {
            piece.lock_armed = true;
        } else {
            self.lock_current();
        }
        true
    }

    /// Exchange the active piece with the hold slot (once per piece-life).
    fn hold(&mut self) -> bool {
        self.queue.current().unwrite(&mut self.board);
        let swapped = self.queue.swap_hold();
        self.queue.current().write(&mut self.board);
        swapped
    }

    /// Advance gravity by one step: T-spin probes, then fall or lock.
    fn step(&mut self) -> bool {
        self.probe_t_spin();

        let piece = self.queue.current_mut();
        piece.unwrite(&mut self.board);
        let fell = piece.fall(&self.board, 1);
        piece.write(&mut self.board);
        if fell {
            return true;
        }

        // Grounded. A hard-dropped piece gets exactly one grace tick when
        // lock delay is on; the flag stays armed so the next tick locks.
        let piece = self.queue.current_mut();
        if self.config.lock_delay && piece.hard_dropped > 0 && !piece.lock_armed {
            piece.lock_armed = true;
            return true;
        }

        self.lock_current();
        true
    }

    /// T-spin detection: immediately before the fall-lock decision, mark the
    /// T piece a candidate and attempt (then undo) a left, right and upward
    /// move. Any success means the piece had room and is not a T-spin.
    fn probe_t_spin(&mut self) {
        if !self.config.t_spin || self.queue.current().kind != PieceKind::T {
            return;
        }

        let piece = self.queue.current_mut();
        piece.unwrite(&mut self.board);
        piece.t_spin = true;

        if piece.translate(&self.board, Dir::Left) {
            let undone = piece.translate(&self.board, Dir::Right);
            debug_assert!(undone);
            piece.t_spin = false;
        }
        if piece.translate(&self.board, Dir::Right) {
            let undone = piece.translate(&self.board, Dir::Left);
            debug_assert!(undone);
            piece.t_spin = false;
        }
        if piece.fall(&self.board, -1) {
            let undone = piece.fall(&self.board, 1);
            debug_assert!(undone);
            piece.t_spin = false;
        }

        piece.write(&mut self.board);
    }

    /// Fix the active piece to the board, clear full rows, score, check the
    /// loss condition and promote the next piece.
    fn lock_current(&mut self) {
        // The piece is already written; credit its drop counters.
        let locked = *self.queue.current();
        self.score = self
            .score
            .saturating_add(locked.soft_dropped as u64 * SOFT_DROP_POINTS)
            .saturating_add(locked.hard_dropped as u64 * HARD_DROP_POINTS);

        // Scan bottom-up, re-examining a freshly shifted row index.
        let hidden = HIDDEN_ROWS as usize;
        let mut destroyed = 0usize;
        let mut y = self.board.height() as usize - 1;
        loop {
            if self.board.is_row_full(y) {
                self.board.clear_row(y);
                destroyed += 1;
                continue;
            }
            if y == hidden {
                break;
            }
            y -= 1;
        }
        debug_assert!(destroyed <= 4, "one piece cannot clear {destroyed} rows");

        if destroyed > 0 {
            let mut points = LINE_SCORES[destroyed].saturating_mul(self.level as u64);
            let difficult = destroyed == 4 || locked.t_spin;
            if difficult && self.difficult_streak {
                points = points * DIFFICULT_NUMERATOR / DIFFICULT_DENOMINATOR;
            }
            self.difficult_streak = difficult;
            self.score = self.score.saturating_add(points);

            self.lines += destroyed as u32;
            self.level_lines += destroyed as u32;
            while self.level_lines >= level_threshold(self.level) {
                self.level_lines -= level_threshold(self.level);
                self.level += 1;
                self.tick_interval = tick_interval_for_level(self.level);
            }
        }
        // A 0-line lock leaves the difficult chain untouched.

        // Permanent occupancy in the spawn rows ends the game.
        if self.board.spawn_rows_occupied() {
            self.status = GameStatus::Lost;
            return;
        }

        self.queue.advance();
        let spawned = self.queue.current();
        debug_assert!(
            spawned.blocks().iter().all(|&(x, y)| self.board.is_valid(x, y)),
            "spawn cells must be empty when the spawn rows are clear"
        );
        spawned.write(&mut self.board);
    }

    /// Recompute the display-only resting row of the active piece.
    fn recompute_ghost(&mut self) {
        if !self.config.ghost || self.status.is_terminal() {
            self.ghost_row = None;
            return;
        }
        let piece = self.queue.current_mut();
        piece.unwrite(&mut self.board);
        let mut ghost = *piece;
        while ghost.fall(&self.board, 1) {}
        piece.write(&mut self.board);
        self.ghost_row = Some(ghost.y);
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Replace the active piece's kind, keeping it at the spawn position.
    #[cfg(test)]
    pub(crate) fn force_active(&mut self, kind: PieceKind) {
        let width = self.board.width();
        let piece = self.queue.current_mut();
        piece.unwrite(&mut self.board);
        piece.spawn(kind, width);
        piece.write(&mut self.board);
        self.recompute_ghost();
    }

    /// Teleport the active piece's pivot (test scaffolding; assumes valid).
    #[cfg(test)]
    pub(crate) fn place_active(&mut self, x: i8, y: i8) {
        let piece = self.queue.current_mut();
        piece.unwrite(&mut self.board);
        piece.x = x;
        piece.y = y;
        debug_assert!(piece.blocks().iter().all(|&(bx, by)| self.board.is_valid(bx, by)));
        piece.write(&mut self.board);
        self.recompute_ghost();
    }
}
