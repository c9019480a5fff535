//! Maps a [`GameSnapshot`] into a terminal frame.
//!
//! Pure layout code, no I/O. The snapshot's board bytes already contain the
//! falling piece, so the well is drawn straight from them; only the ghost is
//! overlaid separately. The hidden spawn rows are never shown.

use crate::core::snapshot::GameSnapshot;
use crate::term::fb::{Frame, Rgb, Style};
use crate::types::{GameStatus, PieceKind, HIDDEN_ROWS};

/// Board cell width in terminal columns (compensates glyph aspect ratio).
const CELL_W: u16 = 2;

const WELL_BG: Rgb = Rgb::new(28, 28, 38);

/// Stateless view; holds the layout only.
#[derive(Debug, Default)]
pub struct GameView;

impl GameView {
    /// Columns and rows the full layout needs for a snapshot.
    pub fn required_size(&self, snapshot: &GameSnapshot) -> (u16, u16) {
        let (well_w, well_h) = well_size(snapshot);
        // Well frame plus a side panel wide enough for labels and previews.
        (well_w + 2 + 16, (well_h + 2).max(16))
    }

    /// Render `snapshot` into `frame`, resizing the frame if the viewport
    /// changed.
    pub fn render(&self, snapshot: &GameSnapshot, frame: &mut Frame, cols: u16, rows: u16) {
        if frame.width() != cols || frame.height() != rows {
            frame.resize(cols, rows);
        }
        frame.clear();

        let (well_w, well_h) = well_size(snapshot);
        let frame_w = well_w + 2;
        let frame_h = well_h + 2;
        let x0 = cols.saturating_sub(frame_w + 16) / 2;
        let y0 = rows.saturating_sub(frame_h) / 2;

        self.draw_well(snapshot, frame, x0, y0, well_w, well_h);
        self.draw_ghost(snapshot, frame, x0, y0);
        self.draw_panel(snapshot, frame, x0 + frame_w + 2, y0);
        self.draw_banner(snapshot, frame, x0, y0, frame_w, frame_h);
    }

    fn draw_well(
        &self,
        snapshot: &GameSnapshot,
        frame: &mut Frame,
        x0: u16,
        y0: u16,
        well_w: u16,
        well_h: u16,
    ) {
        border(frame, x0, y0, well_w + 2, well_h + 2);

        let empty = Style::plain(Rgb::new(90, 90, 100), WELL_BG).dim();
        for vy in 0..visible_rows(snapshot) {
            let by = vy as i8 + HIDDEN_ROWS as i8;
            for bx in 0..snapshot.width as i8 {
                let code = snapshot.code_at(bx, by);
                let (ch, style) = match PieceKind::from_code(code) {
                    Some(kind) => ('█', Style::plain(kind_color(kind), WELL_BG)),
                    None => ('·', empty),
                };
                frame.fill(
                    x0 + 1 + bx as u16 * CELL_W,
                    y0 + 1 + vy,
                    CELL_W,
                    1,
                    ch,
                    style,
                );
            }
        }
    }

    fn draw_ghost(&self, snapshot: &GameSnapshot, frame: &mut Frame, x0: u16, y0: u16) {
        let (active, ghost_row) = match (snapshot.active, snapshot.ghost_row) {
            (Some(a), Some(g)) => (a, g),
            _ => return,
        };

        let style = Style::plain(Rgb::new(140, 140, 140), WELL_BG).dim();
        for (bx, by) in active.blocks_at_row(ghost_row) {
            let vy = by - HIDDEN_ROWS as i8;
            if vy < 0 || bx < 0 || bx >= snapshot.width as i8 {
                continue;
            }
            // Never paint over the piece itself or the settled stack.
            if snapshot.code_at(bx, by) != 0 {
                continue;
            }
            frame.fill(
                x0 + 1 + bx as u16 * CELL_W,
                y0 + 1 + vy as u16,
                CELL_W,
                1,
                '░',
                style,
            );
        }
    }

    fn draw_panel(&self, snapshot: &GameSnapshot, frame: &mut Frame, x: u16, y0: u16) {
        let label = Style::default().bold();
        let value = Style::plain(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

        let mut y = y0;
        for (name, val) in [
            ("SCORE", snapshot.score.to_string()),
            ("LEVEL", snapshot.level.to_string()),
            ("LINES", snapshot.lines.to_string()),
        ] {
            frame.put_str(x, y, name, label);
            frame.put_str(x, y + 1, &val, value);
            y += 3;
        }

        frame.put_str(x, y, "HOLD", label);
        match snapshot.hold {
            Some(kind) => frame.put_str(
                x,
                y + 1,
                kind_letter(kind),
                Style::plain(kind_color(kind), Rgb::new(0, 0, 0)),
            ),
            None => frame.put_str(x, y + 1, "-", value),
        }
        y += 3;

        frame.put_str(x, y, "NEXT", label);
        for (i, &kind) in snapshot.next.iter().enumerate() {
            frame.put_str(
                x,
                y + 1 + i as u16,
                kind_letter(kind),
                Style::plain(kind_color(kind), Rgb::new(0, 0, 0)),
            );
        }
    }

    fn draw_banner(
        &self,
        snapshot: &GameSnapshot,
        frame: &mut Frame,
        x0: u16,
        y0: u16,
        frame_w: u16,
        frame_h: u16,
    ) {
        let text = match snapshot.status {
            GameStatus::Paused => "PAUSED",
            GameStatus::Lost => "GAME OVER",
            GameStatus::Won => "YOU WIN",
            GameStatus::Running | GameStatus::Quit => return,
        };
        let style = Style::plain(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
        let x = x0 + frame_w.saturating_sub(text.len() as u16) / 2;
        frame.put_str(x, y0 + frame_h / 2, text, style);
    }
}

fn visible_rows(snapshot: &GameSnapshot) -> u16 {
    (snapshot.height as u16).saturating_sub(HIDDEN_ROWS as u16)
}

fn well_size(snapshot: &GameSnapshot) -> (u16, u16) {
    (snapshot.width as u16 * CELL_W, visible_rows(snapshot))
}

fn border(frame: &mut Frame, x: u16, y: u16, w: u16, h: u16) {
    let style = Style::plain(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
    frame.put(x, y, '┌', style);
    frame.put(x + w - 1, y, '┐', style);
    frame.put(x, y + h - 1, '└', style);
    frame.put(x + w - 1, y + h - 1, '┘', style);
    for dx in 1..w - 1 {
        frame.put(x + dx, y, '─', style);
        frame.put(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        frame.put(x, y + dy, '│', style);
        frame.put(x + w - 1, y + dy, '│', style);
    }
}

fn kind_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
    }
}

fn kind_letter(kind: PieceKind) -> &'static str {
    match kind {
        PieceKind::I => "I",
        PieceKind::O => "O",
        PieceKind::T => "T",
        PieceKind::S => "S",
        PieceKind::Z => "Z",
        PieceKind::J => "J",
        PieceKind::L => "L",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Game;
    use crate::types::GameConfig;

    fn rendered() -> (GameSnapshot, Frame) {
        let game = Game::new(GameConfig::default(), 42);
        let snapshot = game.snapshot();
        let view = GameView;
        let (cols, rows) = view.required_size(&snapshot);
        let mut frame = Frame::new(cols, rows);
        view.render(&snapshot, &mut frame, cols, rows);
        (snapshot, frame)
    }

    fn frame_chars(frame: &Frame) -> String {
        (0..frame.height())
            .flat_map(|y| frame.row(y).iter().map(|g| g.ch))
            .collect()
    }

    #[test]
    fn hidden_rows_are_not_drawn() {
        let (snapshot, frame) = rendered();
        // 20 visible board rows plus the two border rows fit exactly.
        let (_, rows) = GameView.required_size(&snapshot);
        assert_eq!(frame.height(), rows);
        assert_eq!(visible_rows(&snapshot), 20);

        // The fresh piece sits entirely in the spawn rows, so no piece
        // glyphs appear in the well yet.
        let y0 = (rows - 22) / 2;
        for vy in 0..20u16 {
            for x in 0..snapshot.width as u16 * CELL_W {
                let glyph = frame.get(1 + x, y0 + 1 + vy).unwrap();
                assert_ne!(glyph.ch, '█', "piece glyph at visible row {vy}");
            }
        }
    }

    #[test]
    fn panel_shows_score_and_previews() {
        let (snapshot, frame) = rendered();
        let chars = frame_chars(&frame);
        assert!(chars.contains("SCORE"));
        assert!(chars.contains("LEVEL"));
        assert!(chars.contains("NEXT"));
        assert_eq!(snapshot.next.len(), 5);
    }

    #[test]
    fn ghost_is_drawn_in_the_open_well() {
        let (snapshot, frame) = rendered();
        assert!(snapshot.ghost_row.is_some());
        assert!(frame_chars(&frame).contains('░'));
    }

    #[test]
    fn paused_banner_is_shown() {
        let mut game = Game::new(GameConfig::default(), 42);
        game.apply(crate::types::Command::Pause);
        let snapshot = game.snapshot();
        let view = GameView;
        let (cols, rows) = view.required_size(&snapshot);
        let mut frame = Frame::new(cols, rows);
        view.render(&snapshot, &mut frame, cols, rows);
        assert!(frame_chars(&frame).contains("PAUSED"));
    }
}
