//! Viewport state for scrolling and visible-range queries.

use super::ColumnLayout;

/// Viewport state: the visible window into virtual content space.
///
/// `scroll_x`/`scroll_y` are virtual offsets (never the clamped physical
/// scroll of the DOM container).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Horizontal scroll position in content coordinates
    pub scroll_x: f64,
    /// Vertical scroll position in content coordinates
    pub scroll_y: f64,
    /// Viewport width in CSS pixels
    pub width: f64,
    /// Viewport height in CSS pixels
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width: 800.0,
            height: 600.0,
        }
    }

    /// Visible row range (inclusive) for `row_count` rows of `row_height`.
    ///
    /// Returns `None` when there are no rows.
    pub fn visible_rows(&self, row_count: usize, row_height: f64) -> Option<(u32, u32)> {
        if row_count == 0 || row_height <= 0.0 {
            return None;
        }
        let last = row_count - 1;
        let start = to_index((self.scroll_y / row_height).floor()).min(last);
        let end = to_index(((self.scroll_y + self.height) / row_height).ceil()).min(last);
        Some((to_u32(start), to_u32(end)))
    }

    /// Visible column range as visual indices (inclusive), found by binary
    /// search over the column offsets. `band` is the row-number band width.
    pub fn visible_cols(&self, columns: &ColumnLayout, band: f64) -> Option<(usize, usize)> {
        let start = columns.column_at(self.scroll_x)?;
        let right = self.scroll_x + (self.width - band).max(0.0);
        let end = columns.column_at(right).unwrap_or(start);
        Some((start, end.max(start)))
    }

    /// Content-space row under a viewport y, given the header height.
    pub fn row_at(&self, y: f64, header_height: f64, row_height: f64) -> Option<u32> {
        if row_height <= 0.0 {
            return None;
        }
        let row = ((y - header_height + self.scroll_y) / row_height).floor();
        if row < 0.0 {
            return None;
        }
        Some(to_u32(to_index(row)))
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_index(v: f64) -> usize {
    if v.is_finite() && v > 0.0 {
        v as usize
    } else {
        0
    }
}

fn to_u32(v: usize) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}
