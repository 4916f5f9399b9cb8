//! Canvas 2D rendering backend.
//!
//! Draws the grid with the HTML Canvas 2D API via web-sys: rectangles,
//! lines and text, redrawn in full each frame for the visible window only.

mod cells;
mod headers;
mod overlay;
mod renderer;
mod text;

pub use renderer::CanvasRenderer;
pub use text::CanvasTextMeasure;
