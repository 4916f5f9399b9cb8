//! Frame geometry: which rows and columns are drawn, and where.
//!
//! Everything here is viewport-space math over [`ViewportState`], kept
//! apart from the canvas calls so it runs in native tests.

use crate::layout::insertion_gap;
use crate::state::ViewportState;
use crate::types::{GridConfig, SelectionMode};

/// Width of the column-reorder insertion line.
pub const INSERTION_LINE_WIDTH: f64 = 4.0;

/// A column that intersects the viewport this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleColumn {
    /// Visual index
    pub index: usize,
    /// Column id
    pub col: u32,
    /// Left edge in viewport space
    pub x: f64,
    pub width: f64,
}

/// Rows and columns to draw for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    /// Row-number band width (0 when hidden)
    pub band: f64,
    pub header_height: f64,
    pub row_height: f64,
    pub width: f64,
    pub height: f64,
    pub scroll_y: f64,
    /// Inclusive displayed-row window, `None` when there are no rows
    pub rows: Option<(u32, u32)>,
    pub columns: Vec<VisibleColumn>,
}

impl FramePlan {
    pub fn new(state: &ViewportState, config: &GridConfig, row_count: usize) -> Self {
        let viewport = &state.viewport;
        let band = config.row_number_band();
        let layout = &state.columns;

        let mut columns = Vec::new();
        if viewport.scroll_x < layout.total_width() {
            if let Some(start) = layout.column_at(viewport.scroll_x.max(0.0)) {
                for (index, &col) in layout.order().iter().enumerate().skip(start) {
                    let x = band - viewport.scroll_x + layout.offset_of(index);
                    if x >= viewport.width {
                        break;
                    }
                    columns.push(VisibleColumn {
                        index,
                        col,
                        x,
                        width: layout.width_of(col),
                    });
                }
            }
        }

        Self {
            band,
            header_height: state.header_height,
            row_height: config.row_height,
            width: viewport.width,
            height: viewport.height,
            scroll_y: viewport.scroll_y,
            rows: viewport.visible_rows(row_count, config.row_height),
            columns,
        }
    }

    /// Displayed rows in the window, top to bottom.
    pub fn row_range(&self) -> impl Iterator<Item = u32> {
        let (start, end) = self.rows.map_or((1, 0), |(s, e)| (s, e));
        start..=end
    }

    /// Top edge of a row in viewport space, snapped to whole pixels.
    pub fn row_y(&self, row: u32) -> f64 {
        (f64::from(row) * self.row_height - self.scroll_y + self.header_height).floor()
    }

    /// Visible column being dragged, if it is on screen.
    pub fn column_at_index(&self, index: usize) -> Option<&VisibleColumn> {
        self.columns.iter().find(|c| c.index == index)
    }
}

/// Position of the reorder insertion line as (x, line height).
///
/// The line sits on the gap the dragged column will drop into and runs
/// down to the end of the content, never shorter than the header.
pub fn insertion_line(
    state: &ViewportState,
    config: &GridConfig,
    row_count: usize,
) -> Option<(f64, f64)> {
    let target = state.reordering_target?;
    let from = state.reordering_col.unwrap_or(target);
    let gap = insertion_gap(from, target);
    let x = config.row_number_band() + state.columns.offset_of(gap) - state.scroll_x();

    let rows = u32::try_from(row_count).unwrap_or(u32::MAX);
    let content = f64::from(rows) * config.row_height + state.header_height - state.scroll_y();
    let height = state
        .viewport
        .height
        .min(content.max(state.header_height));
    Some((x, height))
}

/// Translucent copy of the dragged column that follows the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostColumn {
    pub col: u32,
    pub x: f64,
    pub width: f64,
    /// Height of the body backdrop below the header, 0 when nothing to cover
    pub body_height: f64,
}

pub fn ghost_column(
    state: &ViewportState,
    config: &GridConfig,
    row_count: usize,
) -> Option<GhostColumn> {
    let index = state.reordering_col?;
    let pointer_x = state.reordering_x?;
    let col = state.columns.column_at_index(index)?;
    let width = state.columns.width_of(col);

    let rows = u32::try_from(row_count).unwrap_or(u32::MAX);
    let content = f64::from(rows) * config.row_height - state.scroll_y();
    let body_height = (state.viewport.height - state.header_height)
        .min(content)
        .max(0.0);
    Some(GhostColumn {
        col,
        x: pointer_x - width / 2.0,
        width,
        body_height,
    })
}

/// Whether a row number is drawn highlighted.
pub fn highlights_row_number(state: &ViewportState, row: u32) -> bool {
    let selection = &state.selection;
    matches!(selection.mode, SelectionMode::Row | SelectionMode::Cell)
        && selection.selected_rows.contains(&row)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn state(columns: usize) -> (ViewportState, GridConfig) {
        let config = GridConfig::default();
        let mut state = ViewportState::new(columns, 100.0, config.effective_header_height());
        state.viewport.resize(800.0, 600.0);
        (state, config)
    }

    #[test]
    fn test_visible_columns_from_scroll() {
        let (mut state, config) = state(50);
        state.viewport.scroll_x = 250.0;
        let plan = FramePlan::new(&state, &config, 100);

        let first = plan.columns[0];
        assert_eq!(first.index, 2);
        // 40 band - 250 scroll + 200 offset
        assert_eq!(first.x, -10.0);
        assert!(plan.columns.iter().all(|c| c.x < 800.0));
        assert_eq!(plan.columns.last().unwrap().index, 10);
    }

    #[test]
    fn test_visible_columns_follow_visual_order() {
        let (mut state, config) = state(3);
        state.columns.set_order(vec![2, 0, 1]);
        state.columns.set_width(2, 150.0);
        let plan = FramePlan::new(&state, &config, 1);
        let ids: Vec<u32> = plan.columns.iter().map(|c| c.col).collect();
        assert_eq!(ids, vec![2, 0, 1]);
        assert_eq!(plan.columns[1].x, 190.0);
    }

    #[test]
    fn test_empty_rows_plan() {
        let (state, config) = state(3);
        let plan = FramePlan::new(&state, &config, 0);
        assert_eq!(plan.rows, None);
        assert_eq!(plan.row_range().count(), 0);
    }

    #[test]
    fn test_row_y_snaps() {
        let (mut state, config) = state(3);
        state.viewport.scroll_y = 12.5;
        let plan = FramePlan::new(&state, &config, 100);
        assert_eq!(plan.rows, Some((0, 25)));
        // 25 - 12.5 + 40
        assert_eq!(plan.row_y(1), 52.0);
    }

    #[test]
    fn test_insertion_line_right_and_left() {
        let (mut state, config) = state(10);
        state.reordering_col = Some(1);
        state.reordering_target = Some(3);
        let (x, height) = insertion_line(&state, &config, 1000).unwrap();
        // Moving right lands after the target: gap 4.
        assert_eq!(x, 440.0);
        assert_eq!(height, 600.0);

        state.reordering_target = Some(0);
        let (x, _) = insertion_line(&state, &config, 1000).unwrap();
        assert_eq!(x, 40.0);
    }

    #[test]
    fn test_insertion_line_height_short_content() {
        let (mut state, config) = state(10);
        state.reordering_col = Some(0);
        state.reordering_target = Some(0);
        let (_, height) = insertion_line(&state, &config, 2).unwrap();
        assert_eq!(height, 90.0);

        let (_, height) = insertion_line(&state, &config, 0).unwrap();
        assert_eq!(height, 40.0);
    }

    #[test]
    fn test_ghost_column() {
        let (mut state, config) = state(5);
        assert!(ghost_column(&state, &config, 10).is_none());

        state.reordering_col = Some(1);
        state.reordering_x = Some(300.0);
        let ghost = ghost_column(&state, &config, 10).unwrap();
        assert_eq!(ghost.col, 1);
        assert_eq!(ghost.x, 250.0);
        assert_eq!(ghost.body_height, 250.0);

        let ghost = ghost_column(&state, &config, 0).unwrap();
        assert_eq!(ghost.body_height, 0.0);
    }

    #[test]
    fn test_row_number_highlight_modes() {
        let (mut state, _) = state(5);
        let size = (10, 5);
        state
            .selection
            .update(SelectionMode::Row, Some(3), None, false, false, size);
        assert!(highlights_row_number(&state, 3));
        assert!(!highlights_row_number(&state, 4));

        state
            .selection
            .update(SelectionMode::Column, None, Some(1), false, false, size);
        assert!(!highlights_row_number(&state, 3));
    }
}
