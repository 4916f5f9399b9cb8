//! Data provider contract consumed by the grid.
//!
//! The provider is the source of truth. The grid never caches its answers
//! beyond a single render pass.

use crate::types::{CellValue, ColumnHeader};

/// Row/column data supplied by the host application.
///
/// The four required methods are all a read-only grid needs. Editing and
/// lazy loading are optional capabilities: the defaults report them as
/// absent, which disables the corresponding feature.
///
/// Passing an out-of-range row or column is a caller contract violation.
pub trait DataGridProvider {
    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;
    fn cell_data(&self, row: u32, col: u32) -> CellValue;
    fn header(&self, col: u32) -> ColumnHeader;

    /// Whether `set_cell_data` is supported.
    fn can_edit_cells(&self) -> bool {
        false
    }

    fn set_cell_data(&mut self, _row: u32, _col: u32, _value: CellValue) {}

    /// Whether `set_header` is supported.
    fn can_edit_headers(&self) -> bool {
        false
    }

    fn set_header(&mut self, _col: u32, _header: ColumnHeader) {}

    /// Called when the visible row window moves, with a prefetch margin.
    fn on_rows_needed(&mut self, _start: u32, _end: u32) {}
}

/// In-memory row-major provider.
#[derive(Debug, Clone, Default)]
pub struct VecProvider {
    headers: Vec<ColumnHeader>,
    rows: Vec<Vec<CellValue>>,
    editable: bool,
}

impl VecProvider {
    pub fn new(headers: Vec<ColumnHeader>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            headers,
            rows,
            editable: true,
        }
    }

    /// Build a provider from a cell generator, e.g. `|r, c| format!("{r}-{c}")`.
    pub fn from_fn<F, V>(row_count: usize, col_count: usize, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> V,
        V: Into<CellValue>,
    {
        let headers = (0..col_count)
            .map(|c| ColumnHeader::new(format!("Col {c}")))
            .collect();
        let rows = (0..row_count)
            .map(|r| {
                (0..col_count)
                    .map(|c| f(to_u32(r), to_u32(c)).into())
                    .collect()
            })
            .collect();
        Self::new(headers, rows)
    }

    /// Disable the editing capabilities.
    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    pub fn headers(&self) -> &[ColumnHeader] {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut [ColumnHeader] {
        &mut self.headers
    }
}

fn to_u32(v: usize) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

impl DataGridProvider for VecProvider {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.headers.len()
    }

    fn cell_data(&self, row: u32, col: u32) -> CellValue {
        self.rows
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .cloned()
            .unwrap_or_default()
    }

    fn header(&self, col: u32) -> ColumnHeader {
        self.headers.get(col as usize).cloned().unwrap_or_default()
    }

    fn can_edit_cells(&self) -> bool {
        self.editable
    }

    fn set_cell_data(&mut self, row: u32, col: u32, value: CellValue) {
        if !self.editable {
            return;
        }
        let (row, col) = (row as usize, col as usize);
        let Some(cells) = self.rows.get_mut(row) else {
            return;
        };
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        if let Some(cell) = cells.get_mut(col) {
            *cell = value;
        }
    }

    fn can_edit_headers(&self) -> bool {
        self.editable
    }

    fn set_header(&mut self, col: u32, header: ColumnHeader) {
        if !self.editable {
            return;
        }
        if let Some(slot) = self.headers.get_mut(col as usize) {
            *slot = header;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn() {
        let provider = VecProvider::from_fn(3, 2, |r, c| format!("{r}-{c}"));
        assert_eq!(provider.row_count(), 3);
        assert_eq!(provider.column_count(), 2);
        assert_eq!(provider.cell_data(2, 1), CellValue::from("2-1"));
        assert_eq!(provider.header(1).name, "Col 1");
    }

    #[test]
    fn test_read_only_ignores_writes() {
        let mut provider = VecProvider::from_fn(1, 1, |_, _| 1.0).read_only();
        assert!(!provider.can_edit_cells());
        provider.set_cell_data(0, 0, CellValue::Number(2.0));
        assert_eq!(provider.cell_data(0, 0), CellValue::Number(1.0));
    }

    #[test]
    fn test_out_of_range_reads_are_empty() {
        let provider = VecProvider::from_fn(1, 1, |_, _| 1.0);
        assert_eq!(provider.cell_data(5, 5), CellValue::Empty);
    }
}
