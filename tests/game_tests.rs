//! Integration tests driving the engine through its public API.

use blockfall::core::{Board, Game};
use blockfall::types::{Command, GameConfig, GameStatus, PieceKind};

fn new_game(seed: u32) -> Game {
    Game::new(GameConfig::default(), seed)
}

/// Occupied cell count of the snapshot's board view.
fn occupied(game: &Game) -> usize {
    game.snapshot().board.iter().filter(|&&c| c != 0).count()
}

#[test]
fn fresh_game_state() {
    let game = new_game(12345);
    assert_eq!(game.status(), GameStatus::Running);
    assert_eq!(game.score(), 0);
    assert_eq!(game.level(), 1);
    assert_eq!(game.lines(), 0);
    // Exactly the falling piece occupies the board.
    assert_eq!(occupied(&game), 4);
}

#[test]
fn same_seed_same_game() {
    let mut a = new_game(777);
    let mut b = new_game(777);

    for _ in 0..50 {
        a.apply(Command::Tick);
        b.apply(Command::Tick);
        assert_eq!(a.snapshot().board, b.snapshot().board);
        assert_eq!(a.active().kind, b.active().kind);
    }
}

#[test]
fn gravity_locks_and_spawns() {
    let mut game = new_game(3);

    // Enough ticks for the first piece to reach the floor and lock.
    for _ in 0..30 {
        game.apply(Command::Tick);
    }
    assert_eq!(game.status(), GameStatus::Running);
    assert!(occupied(&game) >= 8, "expected a settled piece plus the active one");
}

#[test]
fn active_piece_stays_in_bounds_under_command_pressure() {
    let commands = [
        Command::MoveLeft,
        Command::RotateCw,
        Command::MoveLeft,
        Command::SoftDrop,
        Command::MoveRight,
        Command::RotateCcw,
        Command::Tick,
        Command::MoveRight,
        Command::Hold,
        Command::Tick,
    ];

    for seed in 0..20u32 {
        let mut game = new_game(seed);
        for _ in 0..40 {
            for cmd in commands {
                game.apply(cmd);
                if game.status().is_terminal() {
                    break;
                }
                for (x, y) in game.active().blocks() {
                    assert!((0..10).contains(&x), "seed {seed}: x {x}");
                    assert!((0..22).contains(&y), "seed {seed}: y {y}");
                }
            }
        }
    }
}

#[test]
fn stack_reaching_the_spawn_rows_ends_the_game() {
    // A stack filling everything below the spawn rows except one column.
    let mut board = Board::new(10, 22);
    for y in 2..22 {
        for x in 1..10 {
            board.set(x, y, Some(PieceKind::J));
        }
    }
    let mut game = Game::restore(GameConfig::default(), 5, board, 0, 0, 0, 1);

    // The first gravity step cannot move the piece, so it locks inside the
    // spawn rows and the game is lost.
    assert!(game.apply(Command::Tick));
    assert_eq!(game.status(), GameStatus::Lost);

    // Terminal state rejects everything.
    assert!(!game.apply(Command::Tick));
    assert!(!game.apply(Command::MoveLeft));
    assert!(!game.apply(Command::Pause));
    assert!(!game.apply(Command::Quit));
}

#[test]
fn pause_freezes_gravity() {
    let mut game = new_game(9);
    assert!(game.apply(Command::Pause));
    let before = game.snapshot().board;
    for _ in 0..10 {
        assert!(!game.apply(Command::Tick));
    }
    assert_eq!(game.snapshot().board, before);

    assert!(game.apply(Command::Pause));
    assert!(game.apply(Command::Tick));
}

#[test]
fn hold_round_trips_through_the_public_api() {
    let mut game = new_game(11);
    let first = game.active().kind;
    assert!(game.apply(Command::Hold));
    assert_eq!(game.hold_kind(), Some(first));
    assert_ne!(game.snapshot().hold, None);

    // Exactly four active cells remain on the board after the swap.
    assert_eq!(occupied(&game), 4);
}
