//! Inline cell and header editors.
//!
//! `GridCore` owns at most one [`EditorSession`]; the viewer mirrors it with
//! a DOM overlay (`input`, wasm only) and reports the committed text back.

#[cfg(target_arch = "wasm32")]
pub(crate) mod input;

use serde::Serialize;

use crate::types::{CellValue, ColumnHeader, ColumnType};
use crate::units::parse_scientific_value;

/// What an editor writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum EditTarget {
    Cell { row: u32, col: u32 },
    /// Header band: 0 name, 1 units, 2 description
    Header { col: u32, sub: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EditorKind {
    Text,
    /// Pick one of the column's options
    Select(Vec<String>),
}

/// Viewport-relative placement in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EditorRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSession {
    pub target: EditTarget,
    pub kind: EditorKind,
    pub initial_value: String,
    pub rect: EditorRect,
}

/// Convert editor text into the value stored for a column.
///
/// Numeric columns accept SI-prefixed input ("10mA"); text that doesn't
/// parse is stored as typed.
pub fn parse_cell_input(input: &str, header: &ColumnHeader) -> CellValue {
    if header.column_type == ColumnType::Numeric {
        let parsed = parse_scientific_value(input);
        if !parsed.is_nan() {
            return CellValue::Number(parsed);
        }
    }
    CellValue::Text(input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_input_uses_prefixes() {
        let header = ColumnHeader::new("I").with_type(ColumnType::Numeric);
        assert_eq!(parse_cell_input("2k", &header), CellValue::Number(2000.0));
        assert_eq!(
            parse_cell_input("n/a", &header),
            CellValue::Text("n/a".to_string())
        );
    }

    #[test]
    fn test_text_input_is_kept() {
        let header = ColumnHeader::new("Name");
        assert_eq!(parse_cell_input("42", &header), CellValue::Text("42".into()));
    }
}
