//! Two-thread runtime shell.
//!
//! One shared [`Session`] behind a mutex; the gravity loop (calling thread)
//! and the input thread each take the lock for exactly one discrete
//! operation (apply a command, redraw) and never hold it while sleeping or
//! blocked on the keyboard. The gravity loop is the sole owner of
//! termination: it returns once the game reaches a terminal status, and the
//! process exit takes the detached input thread down with it.

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};
use log::{debug, info};

use crate::core::snapshot::GameSnapshot;
use crate::core::Game;
use crate::input::map_key_event;
use crate::term::{Frame, GameView, Screen};
use crate::types::Command;

/// How often the sleeping gravity loop wakes to notice a terminal status.
const WAKE_SLICE: Duration = Duration::from_millis(50);

/// Everything the two threads share: the engine plus the presentation
/// pipeline, redrawn under the same lock that applied the command.
pub struct Session {
    pub game: Game,
    pub screen: Screen,
    view: GameView,
    frame: Frame,
    snapshot: GameSnapshot,
}

impl Session {
    pub fn new(game: Game, screen: Screen) -> Self {
        Self {
            game,
            screen,
            view: GameView,
            frame: Frame::new(0, 0),
            snapshot: GameSnapshot::default(),
        }
    }

    /// Snapshot the engine and flush one frame.
    pub fn redraw(&mut self) -> Result<()> {
        self.game.snapshot_into(&mut self.snapshot);
        let (cols, rows) = self.screen.size().unwrap_or((80, 24));
        let (need_cols, need_rows) = self.view.required_size(&self.snapshot);
        self.view
            .render(&self.snapshot, &mut self.frame, cols.max(need_cols), rows.max(need_rows));
        self.screen.present(&self.frame)
    }
}

fn lock(session: &Arc<Mutex<Session>>) -> MutexGuard<'_, Session> {
    // A panic while holding the lock is unrecoverable for the session
    // anyway; keep the surviving thread running on the inner value.
    session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Drive the session until the game ends. Returns the session's final state
/// to the caller via the shared handle.
pub fn run(session: &Arc<Mutex<Session>>) -> Result<()> {
    if lock(session).game.status().is_terminal() {
        return Ok(());
    }
    lock(session).redraw()?;
    spawn_input_thread(Arc::clone(session));

    loop {
        let (interval, status) = {
            let s = lock(session);
            (s.game.tick_interval(), s.game.status())
        };
        if status.is_terminal() {
            info!("game over: {status:?}");
            return Ok(());
        }

        // Sleep outside the lock, waking periodically so a quit entered on
        // the input thread ends the loop promptly.
        let deadline = Instant::now() + interval;
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep((deadline - now).min(WAKE_SLICE));
            if lock(session).game.status().is_terminal() {
                break;
            }
        }

        let mut s = lock(session);
        s.game.apply(Command::Tick);
        s.redraw()?;
        if s.game.status().is_terminal() {
            info!("game over: {:?}", s.game.status());
            return Ok(());
        }
    }
}

/// Input thread: block on the keyboard outside the lock, apply the mapped
/// command and redraw under it.
fn spawn_input_thread(session: Arc<Mutex<Session>>) {
    thread::spawn(move || loop {
        let ev = match event::read() {
            Ok(ev) => ev,
            Err(err) => {
                debug!("input thread stopping: {err}");
                return;
            }
        };

        match ev {
            Event::Key(key) => {
                let Some(cmd) = map_key_event(key) else {
                    continue;
                };
                let mut s = lock(&session);
                if s.game.status().is_terminal() {
                    return;
                }
                if s.game.apply(cmd) {
                    let _ = s.redraw();
                }
            }
            Event::Resize(_, _) => {
                let _ = lock(&session).redraw();
            }
            _ => {}
        }
    });
}
