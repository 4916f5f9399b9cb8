use serde::{Deserialize, Serialize};

/// Which kind of selection the current ranges describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Standard cell selection (default)
    #[default]
    Cell,
    /// Entire row(s) selected
    Row,
    /// Entire column(s) selected
    Column,
    /// All cells selected (corner click)
    All,
}

/// A rectangular selection, inclusive on both axes, always normalized so
/// `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRange {
    pub start_row: u32,
    pub end_row: u32,
    pub start_col: u32,
    pub end_col: u32,
}

impl SelectionRange {
    /// Build a range from two corners in any order.
    pub fn new(row_a: u32, row_b: u32, col_a: u32, col_b: u32) -> Self {
        Self {
            start_row: row_a.min(row_b),
            end_row: row_a.max(row_b),
            start_col: col_a.min(col_b),
            end_col: col_a.max(col_b),
        }
    }

    /// A 1x1 range.
    pub fn cell(row: u32, col: u32) -> Self {
        Self::new(row, row, col, col)
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        self.contains_row(row) && self.contains_col(col)
    }

    pub fn contains_row(&self, row: u32) -> bool {
        row >= self.start_row && row <= self.end_row
    }

    pub fn contains_col(&self, col: u32) -> bool {
        col >= self.start_col && col <= self.end_col
    }

    pub fn row_count(&self) -> u32 {
        self.end_row - self.start_row + 1
    }

    pub fn col_count(&self) -> u32 {
        self.end_col - self.start_col + 1
    }
}

/// Snapshot delivered to the selection-change hook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionInfo {
    pub mode: SelectionMode,
    pub ranges: Vec<SelectionRange>,
    pub anchor_row: Option<u32>,
    pub anchor_col: Option<u32>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_range_normalizes_corners() {
        let range = SelectionRange::new(5, 2, 7, 1);
        assert_eq!(range.start_row, 2);
        assert_eq!(range.end_row, 5);
        assert_eq!(range.start_col, 1);
        assert_eq!(range.end_col, 7);
        assert_eq!(range.row_count(), 4);
        assert!(range.contains(3, 4));
        assert!(!range.contains(6, 4));
    }

    #[test]
    fn test_info_serializes_camel_case() {
        let info = SelectionInfo {
            mode: SelectionMode::Row,
            ranges: vec![SelectionRange::cell(1, 2)],
            anchor_row: Some(1),
            anchor_col: None,
        };
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("\"mode\":\"row\""));
        assert!(json.contains("\"startRow\":1"));
        assert!(json.contains("\"anchorCol\":null"));
    }
}
