//! Terminal runner (default binary).
//!
//! Wires the engine to crossterm input and the framebuffer renderer, with
//! JSON save files next to the working directory. `--resume` continues the
//! last saved session; quitting mid-game saves it back.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use log::info;

use blockfall::core::Game;
use blockfall::persist::{self, HighScores, SavedGame};
use blockfall::runtime::{self, Session};
use blockfall::term::Screen;
use blockfall::types::{GameConfig, GameStatus};

const SAVE_FILE: &str = "blockfall-save.json";
const SCORES_FILE: &str = "blockfall-scores.json";

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn player_name() -> String {
    std::env::var("USER").unwrap_or_else(|_| "player".to_owned())
}

fn main() -> Result<()> {
    env_logger::init();

    let config = GameConfig::default().validate()?;
    let seed = clock_seed();
    let resume = std::env::args().any(|arg| arg == "--resume");

    let game = if resume {
        match persist::load_session(Path::new(SAVE_FILE)).and_then(|s| s.resume(config, seed)) {
            Some(game) => {
                info!("resumed session at level {}", game.level());
                game
            }
            None => Game::new(config, seed),
        }
    } else {
        Game::new(config, seed)
    };

    let mut screen = Screen::new();
    screen.enter()?;
    let session = Arc::new(Mutex::new(Session::new(game, screen)));

    let result = runtime::run(&session);

    // Always restore the terminal, even when the run failed.
    let mut s = session
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let _ = s.screen.exit();
    result?;

    let name = player_name();
    match s.game.status() {
        GameStatus::Quit => {
            persist::save_session(Path::new(SAVE_FILE), &SavedGame::capture(&name, &s.game))?;
            println!("Session saved to {SAVE_FILE}. Resume with --resume.");
        }
        GameStatus::Lost | GameStatus::Won => {
            let scores_path = Path::new(SCORES_FILE);
            let mut scores = HighScores::load(scores_path);
            if scores.qualifies(s.game.score()) {
                scores.record(&name, &s.game);
                scores.save(scores_path)?;
            }
            println!(
                "Final score: {} (level {}, {} lines)",
                s.game.score(),
                s.game.level(),
                s.game.lines()
            );
        }
        GameStatus::Running | GameStatus::Paused => {}
    }

    Ok(())
}
