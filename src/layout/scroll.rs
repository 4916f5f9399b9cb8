//! Virtual-to-physical scroll mapping.
//!
//! Browsers cap the size of a scrollable element. Content larger than the cap
//! is represented by a shadow element of at most [`MAX_BROWSER_SIZE`] pixels per
//! axis, and scroll offsets are linearly rescaled between the two spaces.

/// Largest physical scroll extent the grid asks the browser for, per axis.
pub const MAX_BROWSER_SIZE: f64 = 15_000_000.0;

/// Viewport extent used when the container reports zero (not yet laid out).
const FALLBACK_VIEWPORT: f64 = 100.0;

/// One scroll axis: virtual extent, physical (shadow) extent and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAxis {
    pub virtual_size: f64,
    pub physical_size: f64,
    pub viewport: f64,
    pub scale: f64,
}

impl Default for ScrollAxis {
    fn default() -> Self {
        Self {
            virtual_size: 0.0,
            physical_size: 0.0,
            viewport: FALLBACK_VIEWPORT,
            scale: 1.0,
        }
    }
}

impl ScrollAxis {
    /// Recompute the physical size and scale for a new virtual extent.
    pub fn update(&mut self, virtual_size: f64, viewport: f64) {
        let viewport = if viewport > 0.0 {
            viewport
        } else {
            FALLBACK_VIEWPORT
        };
        let physical = virtual_size.min(MAX_BROWSER_SIZE);
        let scale = if virtual_size <= viewport {
            1.0
        } else {
            (virtual_size - viewport) / (physical - viewport).max(1.0)
        };
        self.virtual_size = virtual_size;
        self.physical_size = physical;
        self.viewport = viewport;
        self.scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
    }

    /// Physical scroll offset to virtual, rounded to whole pixels.
    pub fn to_virtual(&self, physical: f64) -> f64 {
        (physical * self.scale).round()
    }

    /// Virtual scroll offset to physical.
    pub fn to_physical(&self, virtual_offset: f64) -> f64 {
        virtual_offset / self.scale
    }
}

/// Minimal scroll adjustment bringing `[start, start + len]` into
/// `[current, current + viewport]`. No centering.
pub fn reveal(current: f64, viewport: f64, start: f64, len: f64) -> f64 {
    if start < current {
        start
    } else if start + len > current + viewport {
        start + len - viewport
    } else {
        current
    }
}

/// Two-axis scroll bridge. Tracks the last reported virtual position so
/// unchanged native scroll events can be dropped.
#[derive(Debug, Clone, Default)]
pub struct ScrollBridge {
    pub x: ScrollAxis,
    pub y: ScrollAxis,
    last: (f64, f64),
}

impl ScrollBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update both axes. Returns the physical (shadow element) size.
    pub fn update_virtual_size(
        &mut self,
        width: f64,
        height: f64,
        viewport_width: f64,
        viewport_height: f64,
    ) -> (f64, f64) {
        self.x.update(width, viewport_width);
        self.y.update(height, viewport_height);
        (self.x.physical_size, self.y.physical_size)
    }

    /// Map a native scroll event. Returns the virtual position only when it
    /// differs from the last one reported.
    pub fn on_native_scroll(&mut self, left: f64, top: f64) -> Option<(f64, f64)> {
        let next = (self.x.to_virtual(left), self.y.to_virtual(top));
        if (next.0 - self.last.0).abs() < f64::EPSILON && (next.1 - self.last.1).abs() < f64::EPSILON
        {
            return None;
        }
        self.last = next;
        Some(next)
    }

    /// Physical offsets for a virtual scroll target.
    pub fn physical_for(&self, x: f64, y: f64) -> (f64, f64) {
        (self.x.to_physical(x), self.y.to_physical(y))
    }

    /// Virtual scroll target that reveals a cell rectangle, or `None` if it
    /// is already fully visible. `left`/`top` are the current physical offsets.
    ///
    /// `cell` is in content coordinates, excluding the sticky bands. `inset`
    /// is the (row-number band width, header height) those bands cover, so
    /// the cell lands in the unobstructed part of the viewport.
    pub fn scroll_to_cell(
        &self,
        left: f64,
        top: f64,
        cell: (f64, f64, f64, f64),
        inset: (f64, f64),
    ) -> Option<(f64, f64)> {
        let (x, y, w, h) = cell;
        let current_x = left * self.x.scale;
        let current_y = top * self.y.scale;
        let next_x = reveal(current_x, (self.x.viewport - inset.0).max(0.0), x, w);
        let next_y = reveal(current_y, (self.y.viewport - inset.1).max(0.0), y, h);
        if (next_x - current_x).abs() < f64::EPSILON && (next_y - current_y).abs() < f64::EPSILON {
            None
        } else {
            Some((next_x, next_y))
        }
    }
}
