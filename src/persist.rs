//! JSON persistence for game sessions and the high-score table.
//!
//! Saving is fatal on error (the player asked for it and should know), but
//! loading is not: a missing or corrupt file logs a warning and the caller
//! starts fresh.

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::{Board, Game};
use crate::types::GameConfig;

/// Most entries kept in the high-score table.
const MAX_HIGH_SCORES: usize = 10;

/// Seconds since the Unix epoch, 0 if the clock is unusable.
fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// A suspended session: the settled stack plus the scoring counters.
///
/// The falling piece, queue and bag are volatile and not persisted; resuming
/// deals a fresh queue. The grid is one byte per cell (0 empty, 1..=7 kind),
/// row-major.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedGame {
    pub name: String,
    pub score: u64,
    pub lines: u32,
    pub level_lines: u32,
    pub level: u32,
    /// Unix timestamp of the save.
    pub date: u64,
    pub width: u8,
    pub height: u8,
    pub grid: Vec<u8>,
}

impl SavedGame {
    /// Capture a game. The falling piece is erased from the grid so the
    /// resumed session starts with only the settled stack.
    pub fn capture(name: &str, game: &Game) -> Self {
        let mut grid = game.board().to_codes();
        let width = game.board().width();
        for (x, y) in game.active().blocks() {
            if x >= 0 && y >= 0 {
                grid[y as usize * width as usize + x as usize] = 0;
            }
        }
        Self {
            name: name.to_owned(),
            score: game.score(),
            lines: game.lines(),
            level_lines: game.level_lines(),
            level: game.level(),
            date: now_unix_secs(),
            width,
            height: game.board().height(),
            grid,
        }
    }

    /// Rebuild a running game from this save.
    ///
    /// The saved board dimensions override the configured ones. Returns
    /// `None` when the grid blob is inconsistent.
    pub fn resume(&self, config: GameConfig, seed: u32) -> Option<Game> {
        let config = GameConfig {
            width: self.width,
            height: self.height,
            ..config
        }
        .validate()
        .ok()?;
        let board = Board::from_codes(self.width, self.height, &self.grid)?;
        Some(Game::restore(
            config,
            seed,
            board,
            self.score,
            self.lines,
            self.level_lines,
            self.level,
        ))
    }
}

/// Write a session save to `path`.
pub fn save_session(path: &Path, saved: &SavedGame) -> Result<()> {
    let json = serde_json::to_string_pretty(saved)?;
    fs::write(path, json).with_context(|| format!("writing save file {}", path.display()))?;
    Ok(())
}

/// Read a session save, or `None` (with a warning) when absent or corrupt.
pub fn load_session(path: &Path) -> Option<SavedGame> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) => {
            warn!("no usable save at {}: {err}", path.display());
            return None;
        }
    };
    match serde_json::from_str::<SavedGame>(&json) {
        Ok(saved) => Some(saved),
        Err(err) => {
            warn!("ignoring corrupt save at {}: {err}", path.display());
            None
        }
    }
}

/// One finished game on the score table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub level: u32,
    pub score: u64,
    /// Unix timestamp of the game's end.
    pub date: u64,
}

/// Top scores, ordered best first, capped at [`MAX_HIGH_SCORES`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<ScoreEntry>,
}

impl HighScores {
    /// Read the table, or an empty one (with a warning) when absent or
    /// corrupt. Entries are re-sorted defensively after loading.
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                warn!("no high-score table at {}: {err}", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str::<Self>(&json) {
            Ok(mut scores) => {
                scores.normalize();
                scores
            }
            Err(err) => {
                warn!("ignoring corrupt high-score table at {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("writing high scores {}", path.display()))?;
        Ok(())
    }

    /// Whether `score` would enter the table.
    pub fn qualifies(&self, score: u64) -> bool {
        score > 0
            && (self.entries.len() < MAX_HIGH_SCORES
                || self.entries.last().is_some_and(|worst| score > worst.score))
    }

    /// Record a finished game, keeping the table sorted and capped.
    pub fn record(&mut self, name: &str, game: &Game) {
        self.entries.push(ScoreEntry {
            name: name.to_owned(),
            level: game.level(),
            score: game.score(),
            date: now_unix_secs(),
        });
        self.normalize();
    }

    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }
}
