//! Terminal front-end: framebuffer, presenter and the game view.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use fb::{Frame, Glyph, Rgb, Style};
pub use game_view::GameView;
pub use renderer::Screen;
