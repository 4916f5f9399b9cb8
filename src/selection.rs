//! Selection state machine.
//!
//! Ranges are authoritative. `selected_rows`/`selected_cols` are membership
//! caches rebuilt after every change and used only for render-time lookups.
//! Column coordinates are column ids, not visual indices.

use std::collections::HashSet;

use crate::types::{SelectionInfo, SelectionMode, SelectionRange};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub mode: SelectionMode,
    pub ranges: Vec<SelectionRange>,
    pub anchor_row: Option<u32>,
    pub anchor_col: Option<u32>,
    pub selected_rows: HashSet<u32>,
    pub selected_cols: HashSet<u32>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a selection action for a grid of `rows` x `cols`.
    ///
    /// `row` may be `None` only in column mode and `col` only in row mode;
    /// any other missing coordinate leaves the selection untouched and
    /// returns `None`. Otherwise returns the snapshot to hand to the
    /// selection-change hook.
    pub fn update(
        &mut self,
        mode: SelectionMode,
        row: Option<u32>,
        col: Option<u32>,
        ctrl: bool,
        shift: bool,
        (rows, cols): (usize, usize),
    ) -> Option<SelectionInfo> {
        let last_row = last_index(rows);
        let last_col = last_index(cols);

        if mode == SelectionMode::All {
            self.mode = mode;
            self.ranges = match (last_row, last_col) {
                (Some(r), Some(c)) => vec![SelectionRange::new(0, r, 0, c)],
                _ => Vec::new(),
            };
            self.anchor_row = Some(0);
            self.anchor_col = Some(0);
            self.rebuild_lookup();
            return Some(self.info());
        }

        if (row.is_none() && mode != SelectionMode::Column)
            || (col.is_none() && mode != SelectionMode::Row)
        {
            return None;
        }
        self.mode = mode;
        let row = row.unwrap_or(0);
        let col = col.unwrap_or(0);

        if !ctrl && !shift {
            self.ranges.clear();
        }

        match (shift, self.anchor_row, self.anchor_col) {
            (true, Some(anchor_row), Some(anchor_col)) => {
                let range = span(mode, (anchor_row, row), (anchor_col, col), last_row, last_col);
                if !ctrl {
                    self.ranges = vec![range];
                } else if let Some(last) = self.ranges.last_mut() {
                    *last = range;
                } else {
                    self.ranges.push(range);
                }
            }
            _ => {
                let range = span(mode, (row, row), (col, col), last_row, last_col);
                if ctrl {
                    match self.ranges.iter().position(|r| *r == range) {
                        Some(idx) => {
                            self.ranges.remove(idx);
                        }
                        None => self.ranges.push(range),
                    }
                } else {
                    self.ranges = vec![range];
                }
                self.anchor_row = Some(row);
                self.anchor_col = Some(col);
            }
        }

        self.rebuild_lookup();
        Some(self.info())
    }

    /// Drop all ranges and the anchor.
    pub fn clear(&mut self) {
        self.mode = SelectionMode::Cell;
        self.ranges.clear();
        self.anchor_row = None;
        self.anchor_col = None;
        self.rebuild_lookup();
    }

    fn rebuild_lookup(&mut self) {
        self.selected_rows.clear();
        self.selected_cols.clear();
        for range in &self.ranges {
            self.selected_rows.extend(range.start_row..=range.end_row);
            self.selected_cols.extend(range.start_col..=range.end_col);
        }
    }

    pub fn info(&self) -> SelectionInfo {
        SelectionInfo {
            mode: self.mode,
            ranges: self.ranges.clone(),
            anchor_row: self.anchor_row,
            anchor_col: self.anchor_col,
        }
    }

    /// Whether a right-click at this position should keep the current
    /// selection instead of collapsing it.
    ///
    /// `(Some(row), None)` is a row-number click, `(None, Some(col))` a
    /// header click and `(Some, Some)` a cell click.
    pub fn is_within_active_selection(&self, row: Option<u32>, col: Option<u32>) -> bool {
        if self.mode == SelectionMode::All && !self.ranges.is_empty() {
            return true;
        }
        match (row, col) {
            (Some(r), None) => self.mode == SelectionMode::Row && self.selected_rows.contains(&r),
            (None, Some(c)) => {
                self.mode == SelectionMode::Column && self.selected_cols.contains(&c)
            }
            (Some(r), Some(c)) => self.ranges.iter().any(|range| range.contains(r, c)),
            (None, None) => false,
        }
    }

    /// Whether a cell is highlighted by the current selection.
    pub fn contains_cell(&self, row: u32, col: u32) -> bool {
        self.mode == SelectionMode::All || self.ranges.iter().any(|r| r.contains(row, col))
    }

    /// Bounding box of all ranges as (min_row, max_row, min_col, max_col).
    pub fn bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let first = self.ranges.first()?;
        Some(self.ranges.iter().fold(
            (first.start_row, first.end_row, first.start_col, first.end_col),
            |(r0, r1, c0, c1), r| {
                (
                    r0.min(r.start_row),
                    r1.max(r.end_row),
                    c0.min(r.start_col),
                    c1.max(r.end_col),
                )
            },
        ))
    }
}

/// Range for a mode: row mode spans every column, column mode every row.
fn span(
    mode: SelectionMode,
    rows: (u32, u32),
    cols: (u32, u32),
    last_row: Option<u32>,
    last_col: Option<u32>,
) -> SelectionRange {
    let (r0, r1) = if mode == SelectionMode::Column {
        (0, last_row.unwrap_or(0))
    } else {
        rows
    };
    let (c0, c1) = if mode == SelectionMode::Row {
        (0, last_col.unwrap_or(0))
    } else {
        cols
    };
    SelectionRange::new(r0, r1, c0, c1)
}

fn last_index(count: usize) -> Option<u32> {
    count
        .checked_sub(1)
        .map(|last| u32::try_from(last).unwrap_or(u32::MAX))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn click(s: &mut SelectionState, row: u32, col: u32, ctrl: bool, shift: bool) {
        s.update(SelectionMode::Cell, Some(row), Some(col), ctrl, shift, (10, 10));
    }

    #[test]
    fn test_plain_click_is_idempotent() {
        let mut s = SelectionState::new();
        click(&mut s, 3, 4, false, false);
        click(&mut s, 3, 4, false, false);
        assert_eq!(s.ranges, vec![SelectionRange::cell(3, 4)]);
        assert_eq!((s.anchor_row, s.anchor_col), (Some(3), Some(4)));
    }

    #[test]
    fn test_ctrl_toggle() {
        let mut s = SelectionState::new();
        click(&mut s, 1, 1, true, false);
        assert_eq!(s.ranges, vec![SelectionRange::cell(1, 1)]);
        click(&mut s, 1, 1, true, false);
        assert!(s.ranges.is_empty());
        assert!(s.selected_rows.is_empty());
    }

    #[test]
    fn test_shift_keeps_anchor() {
        let mut s = SelectionState::new();
        click(&mut s, 0, 0, false, false);
        click(&mut s, 2, 2, false, true);
        assert_eq!(s.ranges, vec![SelectionRange::new(0, 2, 0, 2)]);
        assert_eq!((s.anchor_row, s.anchor_col), (Some(0), Some(0)));
        click(&mut s, 1, 5, false, true);
        assert_eq!(s.ranges, vec![SelectionRange::new(0, 1, 0, 5)]);
    }

    #[test]
    fn test_ctrl_shift_replaces_last_range() {
        let mut s = SelectionState::new();
        click(&mut s, 0, 0, false, false);
        click(&mut s, 5, 5, true, false);
        click(&mut s, 6, 7, true, true);
        assert_eq!(
            s.ranges,
            vec![SelectionRange::cell(0, 0), SelectionRange::new(5, 6, 5, 7)]
        );
    }

    #[test]
    fn test_shift_without_anchor_pivots() {
        let mut s = SelectionState::new();
        click(&mut s, 4, 4, false, true);
        assert_eq!(s.ranges, vec![SelectionRange::cell(4, 4)]);
        assert_eq!(s.anchor_row, Some(4));
    }

    #[test]
    fn test_missing_coordinate_is_noop() {
        let mut s = SelectionState::new();
        click(&mut s, 1, 1, false, false);
        let before = s.clone();
        assert!(s
            .update(SelectionMode::Cell, None, Some(1), false, false, (10, 10))
            .is_none());
        assert!(s
            .update(SelectionMode::Column, Some(1), None, false, false, (10, 10))
            .is_none());
        assert_eq!(s, before);
    }

    #[test]
    fn test_row_and_column_modes_span_grid() {
        let mut s = SelectionState::new();
        s.update(SelectionMode::Row, Some(2), None, false, false, (10, 10));
        assert_eq!(s.ranges, vec![SelectionRange::new(2, 2, 0, 9)]);
        assert_eq!(s.selected_cols.len(), 10);

        s.update(SelectionMode::Column, None, Some(3), false, false, (10, 10));
        assert_eq!(s.ranges, vec![SelectionRange::new(0, 9, 3, 3)]);
        assert!(s.is_within_active_selection(None, Some(3)));
        assert!(!s.is_within_active_selection(Some(3), None));
    }

    #[test]
    fn test_shift_extends_rows() {
        let mut s = SelectionState::new();
        s.update(SelectionMode::Row, Some(2), None, false, false, (10, 10));
        s.update(SelectionMode::Row, Some(5), None, false, true, (10, 10));
        assert_eq!(s.ranges, vec![SelectionRange::new(2, 5, 0, 9)]);
    }

    #[test]
    fn test_select_all_on_empty_grid() {
        let mut s = SelectionState::new();
        let info = s
            .update(SelectionMode::All, None, None, false, false, (0, 3))
            .unwrap();
        assert!(info.ranges.is_empty());
        assert_eq!(info.anchor_row, Some(0));
    }

    #[test]
    fn test_bounds() {
        let mut s = SelectionState::new();
        click(&mut s, 0, 0, false, false);
        click(&mut s, 0, 2, true, false);
        assert_eq!(s.bounds(), Some((0, 0, 0, 2)));
    }
}
