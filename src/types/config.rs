use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Font/color/opacity overrides for one header text band.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderLineStyle {
    pub font: Option<String>,
    pub color: Option<String>,
    pub alpha: Option<f64>,
}

/// A keyboard shortcut. `ctrl` matches either Ctrl or Meta.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBinding {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyBinding {
    pub fn plain(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Self::default()
        }
    }

    pub fn ctrl(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ctrl: true,
            ..Self::default()
        }
    }

    pub fn shift(key: &str) -> Self {
        Self {
            key: key.to_string(),
            shift: true,
            ..Self::default()
        }
    }
}

/// Minimum header heights by sub-text count when no explicit height is set.
const HEADER_HEIGHT_FLOORS: [f64; 3] = [40.0, 50.0, 70.0];

/// Recognized grid options.
///
/// Deserializes from a camelCase JS/JSON object; every field is optional
/// and falls back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    pub row_height: f64,
    /// Default width for columns without an override.
    pub column_width: f64,
    /// Explicit header height; `None` sizes the header from `header_sub_text_count`.
    pub header_height: Option<f64>,
    pub show_row_numbers: bool,
    pub row_numbers_width: f64,
    /// Number of header sub-lines (units, description), 0 to 2.
    pub header_sub_text_count: u8,
    /// Shown in empty header sub-lines.
    pub header_placeholder: String,
    pub allow_resizing: bool,
    pub allow_filtering: bool,

    // Theme
    pub background_color: String,
    pub grid_line_color: String,
    pub text_color: String,
    pub font: String,
    pub header_background: String,
    pub header_text_color: String,
    pub header_font: String,
    pub header_title_style: Option<HeaderLineStyle>,
    pub header_units_style: Option<HeaderLineStyle>,
    pub header_description_style: Option<HeaderLineStyle>,
    pub header_divider_color: Option<String>,
    pub header_divider_alpha: Option<f64>,
    pub selection_color: String,
    pub selected_text_color: String,
    pub alternate_row_color: Option<String>,
    pub cell_padding: f64,
    pub row_number_background: String,
    pub row_number_text_color: String,
    pub scrollbar_color: Option<String>,
    pub scrollbar_thumb_color: Option<String>,
    pub drag_handle_color: Option<String>,
    pub empty_state_color: Option<String>,
    pub empty_state_text: Option<String>,

    // Behavior
    /// Key under which column order and widths are persisted.
    pub persistence_key: Option<String>,
    pub mask_numeric_values: bool,
    pub mask_text_values: bool,
    pub text_mask_string: Option<String>,
    /// Per-action shortcut overrides; `None` disables the action.
    pub keyboard_shortcuts: HashMap<String, Option<KeyBinding>>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            row_height: 25.0,
            column_width: 100.0,
            header_height: None,
            show_row_numbers: true,
            row_numbers_width: 40.0,
            header_sub_text_count: 0,
            header_placeholder: "-".to_string(),
            allow_resizing: true,
            allow_filtering: true,
            background_color: "#ffffff".to_string(),
            grid_line_color: "#e0e0e0".to_string(),
            text_color: "#333333".to_string(),
            font: "12px Inter, sans-serif".to_string(),
            header_background: "#f3f3f3".to_string(),
            header_text_color: "#333333".to_string(),
            header_font: "bold 12px Inter, sans-serif".to_string(),
            header_title_style: None,
            header_units_style: None,
            header_description_style: None,
            header_divider_color: None,
            header_divider_alpha: None,
            selection_color: "rgba(0, 120, 215, 0.3)".to_string(),
            selected_text_color: "#000000".to_string(),
            alternate_row_color: None,
            cell_padding: 5.0,
            row_number_background: "#f9f9f9".to_string(),
            row_number_text_color: "#666666".to_string(),
            scrollbar_color: None,
            scrollbar_thumb_color: None,
            drag_handle_color: None,
            empty_state_color: None,
            empty_state_text: None,
            persistence_key: None,
            mask_numeric_values: false,
            mask_text_values: false,
            text_mask_string: None,
            keyboard_shortcuts: HashMap::new(),
        }
    }
}

impl GridConfig {
    /// Parse a config from a JSON value, filling unspecified fields with defaults.
    pub fn from_json(value: &serde_json::Value) -> crate::error::Result<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Apply a partial config object on top of this one.
    ///
    /// Keys present in `patch` replace the current values; the rest are kept.
    pub fn merged(&self, patch: &serde_json::Value) -> crate::error::Result<Self> {
        let mut base = serde_json::to_value(self)?;
        if let (Some(base_obj), Some(patch_obj)) = (base.as_object_mut(), patch.as_object()) {
            for (key, value) in patch_obj {
                base_obj.insert(key.clone(), value.clone());
            }
        }
        Ok(serde_json::from_value(base)?)
    }

    /// Header sub-line count clamped to the supported 0..=2.
    pub fn sub_text_count(&self) -> usize {
        usize::from(self.header_sub_text_count.min(2))
    }

    /// Effective header band height.
    pub fn effective_header_height(&self) -> f64 {
        match self.header_height {
            Some(h) => h,
            None => HEADER_HEIGHT_FLOORS
                .get(self.sub_text_count())
                .copied()
                .unwrap_or(40.0),
        }
    }

    /// Width of the row-number band, 0 when hidden.
    pub fn row_number_band(&self) -> f64 {
        if self.show_row_numbers {
            self.row_numbers_width
        } else {
            0.0
        }
    }

    pub fn empty_state_text(&self) -> &str {
        self.empty_state_text.as_deref().unwrap_or("No data")
    }

    pub fn text_mask(&self) -> &str {
        self.text_mask_string.as_deref().unwrap_or("...")
    }

    pub fn drag_handle_color(&self) -> &str {
        self.drag_handle_color.as_deref().unwrap_or("#4facfe")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_from_empty_object() {
        let config = GridConfig::from_json(&json!({})).unwrap();
        assert_eq!(config, GridConfig::default());
        assert_eq!(config.row_height, 25.0);
        assert_eq!(config.selection_color, "rgba(0, 120, 215, 0.3)");
    }

    #[test]
    fn test_header_height_grows_with_sub_text() {
        let mut config = GridConfig::default();
        assert_eq!(config.effective_header_height(), 40.0);
        config.header_sub_text_count = 1;
        assert!(config.effective_header_height() >= 50.0);
        config.header_sub_text_count = 2;
        assert!(config.effective_header_height() >= 70.0);
    }

    #[test]
    fn test_explicit_header_height_wins() {
        let config = GridConfig::default()
            .merged(&json!({ "headerSubTextCount": 2, "headerHeight": 120 }))
            .unwrap();
        assert_eq!(config.effective_header_height(), 120.0);
    }

    #[test]
    fn test_merge_keeps_untouched_fields() {
        let base = GridConfig {
            row_height: 18.0,
            ..GridConfig::default()
        };
        let merged = base.merged(&json!({ "columnWidth": 80 })).unwrap();
        assert_eq!(merged.row_height, 18.0);
        assert_eq!(merged.column_width, 80.0);
    }

    #[test]
    fn test_shortcut_override_can_disable() {
        let config =
            GridConfig::from_json(&json!({ "keyboardShortcuts": { "copy": null } })).unwrap();
        assert_eq!(config.keyboard_shortcuts.get("copy"), Some(&None));
    }

    #[test]
    fn test_invalid_patch_is_an_error() {
        assert!(GridConfig::default()
            .merged(&json!({ "rowHeight": "tall" }))
            .is_err());
    }
}
