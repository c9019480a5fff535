//! Key mapping from terminal events to engine commands.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::types::Command;

/// Map one keyboard event to a command token.
///
/// Repeats count as presses (holding soft drop should keep dropping);
/// release events are ignored.
pub fn map_key_event(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Command::Quit);
    }

    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => Some(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => Some(Command::MoveRight),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => Some(Command::SoftDrop),
        KeyCode::Char(' ') => Some(Command::HardDrop),

        // Rotation
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('x') => {
            Some(Command::RotateCw)
        }
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(Command::RotateCcw),

        // Session
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Hold),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::Pause),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys() {
        assert_eq!(
            map_key_event(KeyEvent::from(KeyCode::Left)),
            Some(Command::MoveLeft)
        );
        assert_eq!(
            map_key_event(KeyEvent::from(KeyCode::Char('l'))),
            Some(Command::MoveRight)
        );
        assert_eq!(
            map_key_event(KeyEvent::from(KeyCode::Down)),
            Some(Command::SoftDrop)
        );
        assert_eq!(
            map_key_event(KeyEvent::from(KeyCode::Char(' '))),
            Some(Command::HardDrop)
        );
    }

    #[test]
    fn rotation_keys() {
        assert_eq!(
            map_key_event(KeyEvent::from(KeyCode::Up)),
            Some(Command::RotateCw)
        );
        assert_eq!(
            map_key_event(KeyEvent::from(KeyCode::Char('z'))),
            Some(Command::RotateCcw)
        );
    }

    #[test]
    fn session_keys() {
        assert_eq!(
            map_key_event(KeyEvent::from(KeyCode::Char('c'))),
            Some(Command::Hold)
        );
        assert_eq!(
            map_key_event(KeyEvent::from(KeyCode::Char('p'))),
            Some(Command::Pause)
        );
        assert_eq!(
            map_key_event(KeyEvent::from(KeyCode::Char('q'))),
            Some(Command::Quit)
        );
        assert_eq!(
            map_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(map_key_event(KeyEvent::from(KeyCode::Char('b'))), None);
        assert_eq!(map_key_event(KeyEvent::from(KeyCode::Tab)), None);
        assert_eq!(
            map_key_event(KeyEvent::new_with_kind(
                KeyCode::Left,
                KeyModifiers::NONE,
                KeyEventKind::Release,
            )),
            None
        );
    }
}
