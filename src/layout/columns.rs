//! Column geometry: visual order, sparse width overrides and the cumulative
//! offset array used for O(log n) hit testing.

use std::collections::HashMap;

/// Smallest width a drag-resize can produce.
pub const MIN_COLUMN_WIDTH: f64 = 30.0;

/// Column order, widths and pre-computed offsets.
///
/// `offsets` has `order.len() + 1` entries, starts at 0 and satisfies
/// `offsets[i + 1] - offsets[i] == width_of(order[i])`. Every mutation goes
/// through a method that rebuilds it.
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    /// Sparse width overrides keyed by column id
    widths: HashMap<u32, f64>,
    /// Visual order: visual index `i` shows column id `order[i]`
    order: Vec<u32>,
    /// Cumulative left edges in visual order, plus the final right edge
    offsets: Vec<f64>,
    /// Width for columns without an override
    default_width: f64,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::new(0, 100.0)
    }
}

impl ColumnLayout {
    /// Identity order over `count` columns.
    pub fn new(count: usize, default_width: f64) -> Self {
        let mut layout = Self {
            widths: HashMap::new(),
            order: identity(count),
            offsets: Vec::new(),
            default_width,
        };
        layout.rebuild();
        layout
    }

    /// Recompute the offset array in a single pass over the order.
    fn rebuild(&mut self) {
        self.offsets.clear();
        self.offsets.reserve(self.order.len() + 1);
        let mut x = 0.0;
        for &col in &self.order {
            self.offsets.push(x);
            x += self.width_of(col);
        }
        self.offsets.push(x);
    }

    /// Width of a column id, falling back to the default.
    pub fn width_of(&self, col: u32) -> f64 {
        self.widths.get(&col).copied().unwrap_or(self.default_width)
    }

    pub fn set_width(&mut self, col: u32, width: f64) {
        self.widths.insert(col, width);
        self.rebuild();
    }

    pub fn set_default_width(&mut self, width: f64) {
        self.default_width = width;
        self.rebuild();
    }

    /// Replace all width overrides.
    pub fn set_widths(&mut self, widths: HashMap<u32, f64>) {
        self.widths = widths;
        self.rebuild();
    }

    pub fn widths(&self) -> &HashMap<u32, f64> {
        &self.widths
    }

    pub fn order(&self) -> &[u32] {
        &self.order
    }

    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Replace the visual order. Orders that are not a permutation of
    /// `0..order.len()` are rejected and the identity order is kept.
    pub fn set_order(&mut self, order: Vec<u32>) -> bool {
        let mut seen = vec![false; order.len()];
        for &col in &order {
            match seen.get_mut(col as usize) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        self.order = order;
        self.rebuild();
        true
    }

    /// Back to the identity order over `count` columns, keeping widths.
    pub fn reset_order(&mut self, count: usize) {
        self.order = identity(count);
        self.rebuild();
    }

    /// Reset to the identity order when the column count changes.
    pub fn sync_count(&mut self, count: usize) {
        if self.order.len() != count {
            self.order = identity(count);
            self.rebuild();
        }
    }

    /// Column id shown at a visual index.
    pub fn column_at_index(&self, index: usize) -> Option<u32> {
        self.order.get(index).copied()
    }

    /// Visual index of a column id.
    pub fn index_of(&self, col: u32) -> Option<usize> {
        self.order.iter().position(|&c| c == col)
    }

    /// Left edge of a visual index, clamped to the total width.
    pub fn offset_of(&self, index: usize) -> f64 {
        self.offsets
            .get(index)
            .copied()
            .unwrap_or_else(|| self.total_width())
    }

    pub fn total_width(&self) -> f64 {
        self.offsets.last().copied().unwrap_or(0.0)
    }

    /// Visual index containing content-space `x` (binary search).
    ///
    /// Returns `None` for negative `x` or an empty layout; positions past the
    /// right edge resolve to the last column.
    pub fn column_at(&self, x: f64) -> Option<usize> {
        if x < 0.0 || self.order.is_empty() {
            return None;
        }
        let last = self.order.len() - 1;
        if x >= self.total_width() {
            return Some(last);
        }
        // Number of left edges at or before x; the containing column is the last of them.
        let edges = self.offsets.partition_point(|&edge| edge <= x);
        Some(edges.saturating_sub(1).min(last))
    }

    /// Move the column at visual index `from` onto visual index `target`.
    ///
    /// `target` is the slot the column occupies after the move. Expressed as
    /// an insertion gap, dropping past the removed slot lands one gap further
    /// right, which cancels the shift caused by the removal.
    ///
    /// Returns the moved column id.
    pub fn move_column(&mut self, from: usize, target: usize) -> Option<u32> {
        if from >= self.order.len() {
            return None;
        }
        let mut insert_at = insertion_gap(from, target);
        let moved = self.order.remove(from);
        if insert_at > from {
            insert_at -= 1;
        }
        let insert_at = insert_at.min(self.order.len());
        self.order.insert(insert_at, moved);
        self.rebuild();
        Some(moved)
    }
}

/// Gap index (0..=len) where a column dragged from `from` onto `target` is
/// inserted: the right edge of the target when moving right, its left edge otherwise.
pub fn insertion_gap(from: usize, target: usize) -> usize {
    if target > from {
        target + 1
    } else {
        target
    }
}

fn identity(count: usize) -> Vec<u32> {
    (0..count)
        .map(|c| u32::try_from(c).unwrap_or(u32::MAX))
        .collect()
}
