//! Context menu model: entries, zone context and the built-in defaults.
//!
//! The DOM popup lives in the viewer; everything here is plain data so menu
//! resolution can be tested natively.

use serde::Serialize;
use serde_json::{json, Value};

use crate::selection::SelectionState;
use crate::types::SelectionRange;

pub const MENU_COPY: &str = "copy";
pub const MENU_EXPORT_CSV: &str = "export-csv";
pub const MENU_REFRESH: &str = "refresh";

/// A clickable menu item. Actions are resolved by `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenuItem {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub disabled: bool,
    pub checked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuEntry>,
}

impl ContextMenuItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }
}

/// One row of a menu.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry {
    Item(ContextMenuItem),
    Divider,
    /// Non-clickable label
    Section(String),
}

impl Serialize for MenuEntry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl MenuEntry {
    /// JS shape: `"divider"`, `{type: "section", label}` or an item object.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Divider => Value::String("divider".to_string()),
            Self::Section(label) => json!({ "type": "section", "label": label }),
            Self::Item(item) => serde_json::to_value(item).unwrap_or(Value::Null),
        }
    }

    /// Parse a host-supplied entry. Items without an id get `fallback_id`;
    /// anything unrecognizable is `None`.
    pub fn from_json(value: &Value, fallback_id: &str) -> Option<Self> {
        match value {
            Value::String(s) if s == "divider" => Some(Self::Divider),
            Value::Object(obj) => {
                let label = obj.get("label").and_then(Value::as_str)?.to_string();
                if obj.get("type").and_then(Value::as_str) == Some("section") {
                    return Some(Self::Section(label));
                }
                let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);
                let flag = |key: &str| obj.get(key).and_then(Value::as_bool).unwrap_or(false);
                let children = obj
                    .get("children")
                    .and_then(Value::as_array)
                    .map(|list| {
                        list.iter()
                            .enumerate()
                            .filter_map(|(i, v)| Self::from_json(v, &format!("{fallback_id}.{i}")))
                            .collect()
                    })
                    .unwrap_or_default();
                Some(Self::Item(ContextMenuItem {
                    id: text("id").unwrap_or_else(|| fallback_id.to_string()),
                    label,
                    icon: text("icon"),
                    disabled: flag("disabled"),
                    checked: flag("checked"),
                    shortcut: text("shortcut"),
                    children,
                }))
            }
            _ => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Item(item) => Some(item.id.as_str()),
            _ => None,
        }
    }
}

/// Built-in menu shown when the host doesn't customize it.
pub fn default_items() -> Vec<MenuEntry> {
    vec![
        MenuEntry::Item(ContextMenuItem::new(MENU_COPY, "Copy Selected")),
        MenuEntry::Item(ContextMenuItem::new(MENU_EXPORT_CSV, "Export as CSV")),
        MenuEntry::Divider,
        MenuEntry::Item(ContextMenuItem::new(MENU_REFRESH, "Refresh Grid")),
    ]
}

/// Where the menu was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContextZone {
    Header,
    RowNumber,
    Cell,
    /// A cell inside a selection covering more than one cell
    MultiCell,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenuContext {
    pub zone: ContextZone,
    pub row: Option<u32>,
    pub col: Option<u32>,
    pub selected_rows: Vec<u32>,
    pub selected_cols: Vec<u32>,
    pub selection_ranges: Vec<SelectionRange>,
}

impl ContextMenuContext {
    /// Build the context for a right-click target. `row`/`col` follow the
    /// same convention as [`SelectionState::is_within_active_selection`].
    pub fn new(row: Option<u32>, col: Option<u32>, selection: &SelectionState) -> Self {
        let multi = selection.ranges.len() > 1
            || selection
                .ranges
                .first()
                .is_some_and(|r| r.row_count() > 1 || r.col_count() > 1);
        let zone = match (row, col) {
            (None, Some(_)) => ContextZone::Header,
            (Some(_), None) => ContextZone::RowNumber,
            (Some(r), Some(c)) if multi && selection.contains_cell(r, c) => ContextZone::MultiCell,
            _ => ContextZone::Cell,
        };
        let mut selected_rows: Vec<u32> = selection.selected_rows.iter().copied().collect();
        selected_rows.sort_unstable();
        let mut selected_cols: Vec<u32> = selection.selected_cols.iter().copied().collect();
        selected_cols.sort_unstable();
        Self {
            zone,
            row,
            col,
            selected_rows,
            selected_cols,
            selection_ranges: selection.ranges.clone(),
        }
    }
}

/// A menu ready to be shown at viewport-relative `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenuRequest {
    pub x: f64,
    pub y: f64,
    pub entries: Vec<MenuEntry>,
    pub context: ContextMenuContext,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::SelectionMode;

    #[test]
    fn test_default_items() {
        let items = default_items();
        let ids: Vec<_> = items.iter().map(MenuEntry::id).collect();
        assert_eq!(
            ids,
            vec![Some("copy"), Some("export-csv"), None, Some("refresh")]
        );
        assert_eq!(items[2], MenuEntry::Divider);
    }

    #[test]
    fn test_json_shapes() {
        assert_eq!(MenuEntry::Divider.to_json(), json!("divider"));
        let section = MenuEntry::from_json(&json!({"type": "section", "label": "Edit"}), "x");
        assert_eq!(section, Some(MenuEntry::Section("Edit".into())));

        let item = MenuEntry::from_json(&json!({"label": "Pin", "checked": true}), "custom-0")
            .unwrap();
        let MenuEntry::Item(item) = item else {
            panic!("expected item");
        };
        assert_eq!(item.id, "custom-0");
        assert!(item.checked);
        assert!(MenuEntry::from_json(&json!(42), "x").is_none());
    }

    #[test]
    fn test_zone_detection() {
        let mut selection = SelectionState::new();
        selection.update(SelectionMode::Cell, Some(1), Some(1), false, false, (10, 10));
        assert_eq!(
            ContextMenuContext::new(Some(1), Some(1), &selection).zone,
            ContextZone::Cell
        );
        selection.update(SelectionMode::Cell, Some(3), Some(3), false, true, (10, 10));
        assert_eq!(
            ContextMenuContext::new(Some(2), Some(2), &selection).zone,
            ContextZone::MultiCell
        );
        assert_eq!(
            ContextMenuContext::new(None, Some(2), &selection).zone,
            ContextZone::Header
        );
        let ctx = ContextMenuContext::new(Some(4), None, &selection);
        assert_eq!(ctx.zone, ContextZone::RowNumber);
        assert_eq!(ctx.selected_rows, vec![1, 2, 3]);
    }
}
