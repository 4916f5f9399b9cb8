//! Render backend trait for pluggable rendering implementations.
//!
//! The grid core hands a backend a read-only view of everything a frame
//! needs; the backend decides how to draw it.

use crate::error::Result;
use crate::provider::DataGridProvider;
use crate::state::ViewportState;
use crate::types::GridConfig;

/// Render parameters passed to the backend
pub struct RenderParams<'a> {
    pub state: &'a ViewportState,
    pub config: &'a GridConfig,
    /// Data as displayed (filtered, sorted and grouped when a view is active)
    pub data: &'a dyn DataGridProvider,
}

/// Trait for render backends
pub trait RenderBackend {
    /// Initialize the backend
    fn init(&mut self) -> Result<()>;

    /// Resize the render surface to `width` x `height` CSS pixels
    fn resize(&mut self, width: u32, height: u32, dpr: f32);

    /// Render a frame with the given parameters
    fn render(&mut self, params: &RenderParams) -> Result<()>;

    /// Get the current width
    fn width(&self) -> u32;

    /// Get the current height
    fn height(&self) -> u32;
}
