//! Persisted column state, clipboard text, CSV export and CSV/TSV import.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::layout::ColumnLayout;
use crate::provider::{DataGridProvider, VecProvider};
use crate::selection::SelectionState;
use crate::types::{CellValue, ColumnHeader, ColumnType};

/// Prefix of the storage key holding a grid's persisted state.
pub const STATE_KEY_PREFIX: &str = "scigrid_state_";

/// Column order and width overrides saved across sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub column_order: Vec<u32>,
    #[serde(default)]
    pub column_widths: HashMap<u32, f64>,
}

impl PersistedState {
    pub fn capture(columns: &ColumnLayout) -> Self {
        Self {
            column_order: columns.order().to_vec(),
            column_widths: columns.widths().clone(),
        }
    }

    /// Apply onto a layout. An order that doesn't match the current column
    /// count is ignored.
    pub fn apply(&self, columns: &mut ColumnLayout) {
        if self.column_order.len() == columns.len() && !columns.set_order(self.column_order.clone())
        {
            tracing::debug!("persisted column order rejected");
        }
        if !self.column_widths.is_empty() {
            columns.set_widths(self.column_widths.clone());
        }
    }
}

/// Key-value storage for persisted state (`localStorage` in the browser).
pub trait StateStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
}

/// In-process store, used natively and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

pub fn state_key(persistence_key: &str) -> String {
    format!("{STATE_KEY_PREFIX}{persistence_key}")
}

/// Load persisted state. Missing or malformed entries are `None`.
pub fn load_state(store: &dyn StateStore, persistence_key: &str) -> Option<PersistedState> {
    let raw = store.get_item(&state_key(persistence_key))?;
    match serde_json::from_str(&raw) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring malformed persisted grid state");
            None
        }
    }
}

pub fn save_state(store: &dyn StateStore, persistence_key: &str, state: &PersistedState) {
    match serde_json::to_string(state) {
        Ok(json) => store.set_item(&state_key(persistence_key), &json),
        Err(e) => tracing::warn!(error = %e, "failed to serialize grid state"),
    }
}

/// Wrap a value in double quotes, doubling any inner quotes.
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn quoted_cell(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        other => quote(&other.display_text()),
    }
}

/// Clipboard text for the current selection.
///
/// Covers the bounding box of all ranges, one line per row, cells joined by
/// tabs. Cells inside the box but outside every range are written as `""`.
/// Returns `None` when nothing is selected.
pub fn selection_text(selection: &SelectionState, provider: &dyn DataGridProvider) -> Option<String> {
    let (min_row, max_row, min_col, max_col) = selection.bounds()?;
    let mut out = String::new();
    for row in min_row..=max_row {
        let line: Vec<String> = (min_col..=max_col)
            .map(|col| {
                if selection.ranges.iter().any(|r| r.contains(row, col)) {
                    quoted_cell(&provider.cell_data(row, col))
                } else {
                    quote("")
                }
            })
            .collect();
        out.push_str(&line.join("\t"));
        out.push('\n');
    }
    Some(out)
}

/// Delimited export of every row in visual column order, with a quoted
/// header row. `rows` maps output rows to provider rows when a filtered
/// view is active.
pub fn export_delimited(
    provider: &dyn DataGridProvider,
    order: &[u32],
    rows: Option<&[u32]>,
    delimiter: &str,
) -> String {
    let mut out = String::new();
    if !order.is_empty() {
        let header: Vec<String> = order
            .iter()
            .map(|&c| quote(&provider.header(c).name))
            .collect();
        out.push_str(&header.join(delimiter));
        out.push('\n');
    }
    let mut write_row = |row: u32| {
        let line: Vec<String> = order
            .iter()
            .map(|&c| quoted_cell(&provider.cell_data(row, c)))
            .collect();
        out.push_str(&line.join(delimiter));
        out.push('\n');
    };
    match rows {
        Some(rows) => rows.iter().copied().for_each(&mut write_row),
        None => (0..provider.row_count())
            .map(|r| u32::try_from(r).unwrap_or(u32::MAX))
            .for_each(&mut write_row),
    }
    out
}

/// Field separator for delimited import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Tab => '\t',
        }
    }

    /// Guess from a file name: `.tsv`/`.tab` are tab separated.
    pub fn from_path(path: &str) -> Self {
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".tsv") || lower.ends_with(".tab") {
            Self::Tab
        } else {
            Self::Comma
        }
    }
}

/// Parse CSV/TSV text into a provider. The first non-empty line is the
/// header row. Columns whose values all parse as numbers become numeric.
pub fn parse_delimited(text: &str, delim: Delimiter) -> VecProvider {
    let sep = delim.as_char();
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let Some(header_line) = lines.next() else {
        return VecProvider::default();
    };
    let names = split_line(header_line, sep);
    let mut rows: Vec<Vec<CellValue>> = lines
        .map(|line| {
            split_line(line, sep)
                .into_iter()
                .map(|field| parse_field(&field))
                .collect()
        })
        .collect();

    let width = rows.iter().map(Vec::len).max().unwrap_or(0).max(names.len());
    for row in &mut rows {
        row.resize(width, CellValue::Empty);
    }
    let headers = (0..width)
        .map(|c| {
            let name = names.get(c).map_or_else(|| format!("Col {c}"), |n| n.trim().to_string());
            let numeric = rows.iter().any(|r| r.get(c).is_some_and(|v| !v.is_empty()))
                && rows.iter().all(|r| {
                    matches!(r.get(c), Some(CellValue::Number(_) | CellValue::Empty) | None)
                });
            let header = ColumnHeader::new(name);
            if numeric {
                header.with_type(ColumnType::Numeric)
            } else {
                header
            }
        })
        .collect();
    VecProvider::new(headers, rows)
}

fn parse_field(field: &str) -> CellValue {
    let value = field.trim();
    if value.is_empty() {
        CellValue::Empty
    } else if let Ok(n) = value.parse::<f64>() {
        CellValue::Number(n)
    } else {
        CellValue::Text(value.to_string())
    }
}

/// Split a delimited line respecting quoted fields.
pub(crate) fn split_line(line: &str, sep: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    // Escaped quote
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == sep {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_basic() {
        let provider = parse_delimited("Name,Age,City\nAlice,30,NYC\nBob,25,LA", Delimiter::Comma);
        assert_eq!(provider.row_count(), 2);
        assert_eq!(provider.column_count(), 3);
        assert_eq!(provider.header(1).name, "Age");
        assert_eq!(provider.header(1).column_type, ColumnType::Numeric);
        assert_eq!(provider.header(0).column_type, ColumnType::Text);
        assert_eq!(provider.cell_data(0, 0), CellValue::from("Alice"));
        assert_eq!(provider.cell_data(1, 1), CellValue::Number(25.0));
    }

    #[test]
    fn test_quoted_fields() {
        let provider = parse_delimited(
            "a,b\n\"Hello, World\",42\n\"She said \"\"hi\"\"\",0",
            Delimiter::Comma,
        );
        assert_eq!(provider.cell_data(0, 0), CellValue::from("Hello, World"));
        assert_eq!(provider.cell_data(1, 0), CellValue::from("She said \"hi\""));
    }

    #[test]
    fn test_parse_tsv_and_ragged_rows() {
        let provider = parse_delimited("A\tB\n1\t2\t3\n4", Delimiter::Tab);
        assert_eq!(provider.column_count(), 3);
        assert_eq!(provider.header(2).name, "Col 2");
        assert_eq!(provider.cell_data(1, 1), CellValue::Empty);
    }

    #[test]
    fn test_empty_input() {
        let provider = parse_delimited("", Delimiter::Comma);
        assert_eq!(provider.row_count(), 0);
        assert_eq!(provider.column_count(), 0);
    }

    #[test]
    fn test_malformed_state_is_none() {
        let store = MemoryStore::new();
        store.set_item("scigrid_state_grid", "{not json");
        assert!(load_state(&store, "grid").is_none());
        assert!(load_state(&store, "missing").is_none());
    }

    #[test]
    fn test_state_round_trip_through_store() {
        let store = MemoryStore::new();
        let mut columns = ColumnLayout::new(3, 100.0);
        columns.move_column(0, 2);
        columns.set_width(1, 55.0);
        save_state(&store, "grid", &PersistedState::capture(&columns));

        let raw = store.get_item("scigrid_state_grid").unwrap();
        assert!(raw.contains("\"columnOrder\":[1,2,0]"));

        let mut restored = ColumnLayout::new(3, 100.0);
        load_state(&store, "grid").unwrap().apply(&mut restored);
        assert_eq!(restored.order(), &[1, 2, 0]);
        assert_eq!(restored.width_of(1), 55.0);
    }

    #[test]
    fn test_stale_order_is_ignored() {
        let mut columns = ColumnLayout::new(2, 100.0);
        PersistedState {
            column_order: vec![2, 1, 0],
            column_widths: HashMap::new(),
        }
        .apply(&mut columns);
        assert_eq!(columns.order(), &[0, 1]);
    }

    #[test]
    fn test_export_quotes_and_orders() {
        let mut provider = VecProvider::from_fn(2, 2, |r, c| format!("{r}\"{c}"));
        provider.headers_mut()[0].name = "First".into();
        let csv = export_delimited(&provider, &[1, 0], None, ",");
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("\"Col 1\",\"First\""));
        assert_eq!(lines.next(), Some("\"0\"\"1\",\"0\"\"0\""));
    }
}
