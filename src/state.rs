//! Mutable per-grid view state shared by the interaction handlers and the renderer.

use crate::layout::{ColumnLayout, Viewport};
use crate::selection::SelectionState;

/// What a resize drag adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeTarget {
    /// The row-number band itself
    RowNumbers,
    /// A column, by id
    Column(u32),
}

/// Single owned instance per grid. The interaction handlers mutate it,
/// the renderer only reads it.
#[derive(Debug, Clone, Default)]
pub struct ViewportState {
    pub viewport: Viewport,
    /// Current header band height
    pub header_height: f64,
    pub columns: ColumnLayout,
    pub selection: SelectionState,

    // Transient gesture state; at most one gesture is active at a time.
    pub resizing_col: Option<ResizeTarget>,
    /// Visual index of the column being dragged
    pub reordering_col: Option<usize>,
    /// Visual index the dragged column would land on
    pub reordering_target: Option<usize>,
    /// Pointer x (viewport space) the ghost column follows
    pub reordering_x: Option<f64>,
    /// Column id of the header under the pointer
    pub hovered_col: Option<u32>,
}

impl ViewportState {
    pub fn new(column_count: usize, default_width: f64, header_height: f64) -> Self {
        Self {
            header_height,
            columns: ColumnLayout::new(column_count, default_width),
            ..Self::default()
        }
    }

    pub fn scroll_x(&self) -> f64 {
        self.viewport.scroll_x
    }

    pub fn scroll_y(&self) -> f64 {
        self.viewport.scroll_y
    }

    /// Whether any drag gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.resizing_col.is_some() || self.reordering_col.is_some()
    }

    /// Reset the reorder fields after a commit or abort.
    pub fn clear_reorder(&mut self) {
        self.reordering_col = None;
        self.reordering_target = None;
        self.reordering_x = None;
    }
}
