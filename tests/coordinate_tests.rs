//! Coordinate model and virtual scroll bridge tests.
//!
//! Column hit testing over very wide grids, the virtual/physical scroll
//! mapping past the browser's element size cap, and hit testing while
//! scrolled deep into a huge grid.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::*;
use scigrid::interaction::{hit_test, HitTarget, PointerInput};
use scigrid::layout::{reveal, ColumnLayout, ScrollAxis, MAX_BROWSER_SIZE};
use scigrid::{CellValue, ColumnHeader, DataGridProvider, GridConfig, GridCore, SelectionRange};

/// Rows generated on demand.
struct Huge {
    rows: usize,
    cols: usize,
}

impl DataGridProvider for Huge {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn column_count(&self) -> usize {
        self.cols
    }

    fn cell_data(&self, row: u32, _col: u32) -> CellValue {
        CellValue::Number(f64::from(row))
    }

    fn header(&self, col: u32) -> ColumnHeader {
        ColumnHeader::new(format!("c{col}"))
    }
}

fn huge(rows: usize, cols: usize) -> GridCore {
    sized(GridCore::new(Box::new(Huge { rows, cols }), GridConfig::default()))
}

// ============================================================================
// Column layout
// ============================================================================

#[test]
fn test_column_at_over_ten_thousand_columns() {
    let layout = ColumnLayout::new(10_000, 100.0);
    assert_eq!(layout.column_at(500_000.0), Some(5000));
    assert_eq!(layout.column_at(499_999.9), Some(4999));
    assert_eq!(layout.column_at(0.0), Some(0));
    assert_eq!(layout.column_at(-1.0), None);
    assert_eq!(layout.column_at(5e9), Some(9999));
    assert_eq!(layout.total_width(), 1_000_000.0);
}

#[test]
fn test_width_overrides_shift_offsets() {
    let mut layout = ColumnLayout::new(4, 100.0);
    layout.set_width(0, 300.0);
    assert_eq!(layout.offsets(), &[0.0, 300.0, 400.0, 500.0, 600.0]);
    assert_eq!(layout.column_at(250.0), Some(0));
    assert_eq!(layout.column_at(300.0), Some(1));
    assert_eq!(layout.offset_of(2), 400.0);
}

#[test]
fn test_offsets_follow_visual_order() {
    let mut layout = ColumnLayout::new(3, 100.0);
    layout.set_width(2, 50.0);
    assert!(layout.set_order(vec![2, 0, 1]));
    assert_eq!(layout.offsets(), &[0.0, 50.0, 150.0, 250.0]);
    assert_eq!(layout.column_at_index(0), Some(2));
    assert_eq!(layout.index_of(1), Some(2));
    // Not a permutation
    assert!(!layout.set_order(vec![0, 0, 1]));
}

#[test]
fn test_empty_layout_has_no_columns() {
    let layout = ColumnLayout::new(0, 100.0);
    assert_eq!(layout.column_at(10.0), None);
    assert_eq!(layout.total_width(), 0.0);
}

// ============================================================================
// Scroll bridge
// ============================================================================

#[test]
fn test_huge_content_is_capped_and_rescaled() {
    let mut axis = ScrollAxis::default();
    axis.update(1e9, 600.0);
    assert_eq!(axis.physical_size, MAX_BROWSER_SIZE);
    assert!(axis.scale > 1.0);
    // The last physical position reaches the last virtual page.
    assert_eq!(axis.to_virtual(MAX_BROWSER_SIZE - 600.0), 1e9 - 600.0);
    assert_eq!(axis.to_virtual(0.0), 0.0);
}

#[test]
fn test_reveal_is_minimal() {
    // Above: align top
    assert_eq!(reveal(500.0, 300.0, 400.0, 25.0), 400.0);
    // Below: align bottom
    assert_eq!(reveal(0.0, 300.0, 400.0, 25.0), 125.0);
    // Visible: unchanged
    assert_eq!(reveal(100.0, 300.0, 200.0, 25.0), 100.0);
}

// ============================================================================
// Huge grids through GridCore
// ============================================================================

#[test]
fn test_forty_million_rows_scroll_to_the_end() {
    let mut core = huge(40_000_000, 3);
    let (_, virtual_height) = core.virtual_size();
    assert_eq!(virtual_height, 40_000_000.0 * ROW + HEADER);
    assert_eq!(core.physical_size().1, MAX_BROWSER_SIZE);

    assert!(core.on_scroll(0.0, MAX_BROWSER_SIZE - 600.0));
    assert_eq!(core.state().scroll_y(), virtual_height - 600.0);

    // The bottom of the viewport shows the last row.
    core.pointer_down(PointerInput::at(BAND + 50.0, 588.0));
    core.pointer_up();
    assert_eq!(core.selection().ranges, vec![SelectionRange::cell(39_999_999, 0)]);
}

#[test]
fn test_set_scroll_requests_physical_offset() {
    let mut core = huge(40_000_000, 3);
    core.set_scroll(0.0, 5e8);
    let (left, top) = core.take_scroll_request().unwrap();
    assert_eq!(left, 0.0);
    assert!(top < MAX_BROWSER_SIZE);
    assert!((top * (virtual_scale(&core)) - 5e8).abs() < 1.0);

    // Clamped to the content.
    core.set_scroll(-10.0, 1e12);
    assert_eq!(core.state().scroll_x(), 0.0);
    assert_eq!(core.state().scroll_y(), core.virtual_size().1 - 600.0);
}

fn virtual_scale(core: &GridCore) -> f64 {
    let (_, height) = core.virtual_size();
    (height - 600.0) / (core.physical_size().1 - 600.0)
}

#[test]
fn test_hit_test_while_scrolled_horizontally() {
    let mut core = huge(100, 10_000);
    core.set_scroll(500_000.0, 0.0);
    let target = hit_test(core.state(), core.config(), core.row_count(), BAND + 10.0, 60.0);
    assert_eq!(target, HitTarget::Cell { row: 0, index: 5000 });
}
