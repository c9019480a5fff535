//! Terminal presenter: owns raw mode and flushes frames to stdout.
//!
//! Frames are redrawn in full. The gravity cadence tops out around once per
//! second plus one redraw per keypress, so a coalesced full flush is cheap
//! enough and keeps the presenter trivial to reason about.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::term::fb::{Frame, Rgb, Style};

pub struct Screen {
    stdout: io::Stdout,
    entered: bool,
}

impl Screen {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            entered: false,
        }
    }

    /// Switch to raw mode on the alternate screen.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.stdout.queue(terminal::EnterAlternateScreen)?;
        self.stdout.queue(cursor::Hide)?;
        self.stdout.queue(terminal::DisableLineWrap)?;
        self.stdout.flush()?;
        self.entered = true;
        Ok(())
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn exit(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(terminal::EnableLineWrap)?;
        self.stdout.queue(cursor::Show)?;
        self.stdout.queue(terminal::LeaveAlternateScreen)?;
        self.stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Current terminal size in columns and rows.
    pub fn size(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    /// Flush one frame, re-emitting style escapes only when the style
    /// changes between adjacent glyphs.
    pub fn present(&mut self, frame: &Frame) -> Result<()> {
        self.stdout.queue(cursor::MoveTo(0, 0))?;

        let mut current: Option<Style> = None;
        for y in 0..frame.height() {
            self.stdout.queue(cursor::MoveTo(0, y))?;
            for glyph in frame.row(y) {
                if current != Some(glyph.style) {
                    self.apply_style(glyph.style)?;
                    current = Some(glyph.style);
                }
                self.stdout.queue(Print(glyph.ch))?;
            }
        }

        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.flush()?;
        Ok(())
    }

    fn apply_style(&mut self, style: Style) -> Result<()> {
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(SetForegroundColor(color(style.fg)))?;
        self.stdout.queue(SetBackgroundColor(color(style.bg)))?;
        if style.bold {
            self.stdout.queue(SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            self.stdout.queue(SetAttribute(Attribute::Dim))?;
        }
        Ok(())
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        // Last-resort restore; errors are moot at this point.
        let _ = self.exit();
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
