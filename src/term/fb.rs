//! Styled character framebuffer the game view draws into.

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Per-cell styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
    pub dim: bool,
}

impl Style {
    pub const fn plain(fg: Rgb, bg: Rgb) -> Self {
        Self {
            fg,
            bg,
            bold: false,
            dim: false,
        }
    }

    pub const fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    pub const fn dim(self) -> Self {
        Self { dim: true, ..self }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::plain(Rgb::new(220, 220, 220), Rgb::new(0, 0, 0))
    }
}

/// One styled terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub style: Style,
}

impl Default for Glyph {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::default(),
        }
    }
}

/// 2D buffer of styled characters, reused across frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u16,
    height: u16,
    cells: Vec<Glyph>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Glyph::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Reset every cell to a blank default glyph.
    pub fn clear(&mut self) {
        self.cells.fill(Glyph::default());
    }

    /// Resize, preserving the allocation when possible. Contents reset.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(width as usize * height as usize, Glyph::default());
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Glyph> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y as usize * self.width as usize + x as usize])
    }

    /// Write one glyph; out-of-bounds writes are ignored.
    pub fn put(&mut self, x: u16, y: u16, ch: char, style: Style) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.cells[y as usize * self.width as usize + x as usize] = Glyph { ch, style };
    }

    /// Write a string left-to-right, clipped at the right edge.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, style: Style) {
        for (i, ch) in s.chars().enumerate() {
            self.put(x + i as u16, y, ch, style);
        }
    }

    /// Fill a rectangle with one glyph, clipped at the edges.
    pub fn fill(&mut self, x: u16, y: u16, w: u16, h: u16, ch: char, style: Style) {
        for dy in 0..h {
            for dx in 0..w {
                self.put(x + dx, y + dy, ch, style);
            }
        }
    }

    /// Glyphs of row `y`, or an empty slice when out of range.
    pub fn row(&self, y: u16) -> &[Glyph] {
        if y >= self.height {
            return &[];
        }
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_are_clipped_at_the_edges() {
        let mut frame = Frame::new(4, 2);
        frame.put(3, 1, 'x', Style::default());
        frame.put(4, 0, 'y', Style::default());
        frame.put(0, 2, 'z', Style::default());
        assert_eq!(frame.get(3, 1).unwrap().ch, 'x');
        assert_eq!(frame.get(4, 0), None);

        frame.put_str(2, 0, "abc", Style::default());
        assert_eq!(frame.get(2, 0).unwrap().ch, 'a');
        assert_eq!(frame.get(3, 0).unwrap().ch, 'b');
    }

    #[test]
    fn resize_resets_contents() {
        let mut frame = Frame::new(2, 2);
        frame.put(0, 0, 'x', Style::default());
        frame.resize(3, 3);
        assert_eq!(frame.get(0, 0).unwrap().ch, ' ');
        assert_eq!(frame.row(2).len(), 3);
    }
}
