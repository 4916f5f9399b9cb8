use serde::{Deserialize, Serialize};

/// How a column's values are rendered and edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Numeric,
    Date,
    Checkbox,
    Select,
    Progress,
    Sparkline,
}

/// Sort direction shown in a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Next state of the header sort cycle: unsorted -> asc -> desc -> unsorted.
    pub fn cycle(current: Option<SortOrder>) -> Option<SortOrder> {
        match current {
            None => Some(Self::Asc),
            Some(Self::Asc) => Some(Self::Desc),
            Some(Self::Desc) => None,
        }
    }
}

/// Horizontal alignment of cell text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Right,
    Center,
}

/// Column header metadata supplied by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnHeader {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub select_options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_editable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_resizable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_sortable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    /// Glyph drawn in the top-right corner of the header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
}

impl ColumnHeader {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }

    /// Text for a header band: 0 = name, 1 = units, 2 = description.
    pub fn line(&self, sub_index: usize) -> Option<&str> {
        match sub_index {
            0 => Some(self.name.as_str()),
            1 => self.units.as_deref(),
            2 => self.description.as_deref(),
            _ => None,
        }
    }

    /// Replace the text of a header band, returning the updated header.
    pub fn with_line(&self, sub_index: usize, value: String) -> Self {
        let mut next = self.clone();
        match sub_index {
            0 => next.name = value,
            1 => next.units = Some(value),
            _ => next.description = Some(value),
        }
        next
    }

    pub fn resizable(&self) -> bool {
        self.is_resizable != Some(false)
    }

    pub fn sortable(&self) -> bool {
        self.is_sortable != Some(false)
    }

    pub fn editable(&self) -> bool {
        self.is_editable != Some(false)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_cycle() {
        assert_eq!(SortOrder::cycle(None), Some(SortOrder::Asc));
        assert_eq!(SortOrder::cycle(Some(SortOrder::Asc)), Some(SortOrder::Desc));
        assert_eq!(SortOrder::cycle(Some(SortOrder::Desc)), None);
    }

    #[test]
    fn test_header_from_json() {
        let header: ColumnHeader = serde_json::from_str(
            r#"{"name":"Voltage","units":"V","type":"numeric","isSortable":false}"#,
        )
        .unwrap();
        assert_eq!(header.column_type, ColumnType::Numeric);
        assert_eq!(header.line(1), Some("V"));
        assert!(!header.sortable());
        assert!(header.resizable());
    }
}
