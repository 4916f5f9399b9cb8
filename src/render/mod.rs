//! Rendering: the backend seam, frame planning and the Canvas 2D backend.
//!
//! Layout math for a frame lives in [`plan`] so it can be tested without
//! Canvas APIs; backends only draw what the plan describes.

pub mod backend;
pub mod canvas;
pub mod plan;

pub use backend::{RenderBackend, RenderParams};
pub use canvas::{CanvasRenderer, CanvasTextMeasure};
pub use plan::{FramePlan, VisibleColumn};

use crate::types::{CellValue, ColumnHeader, ColumnType, GridConfig};
use crate::units::format_scientific_value;

/// Resolved font, color and opacity for one header text band.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub font: String,
    pub color: String,
    pub alpha: f64,
}

/// Style for header band `sub` (0 title, 1 units, 2 description) in a
/// header of `height` pixels. Sub-lines default to a small italic font
/// scaled with the header.
pub fn header_line_style(config: &GridConfig, sub: usize, height: f64) -> LineStyle {
    let (custom, default_font, default_alpha) = match sub {
        0 => (&config.header_title_style, config.header_font.clone(), 1.0),
        1 => (
            &config.header_units_style,
            format!("italic {}px Inter, sans-serif", (height / 6.0).floor().max(6.0)),
            0.6,
        ),
        _ => (
            &config.header_description_style,
            format!("italic {}px Inter, sans-serif", (height / 8.0).floor().max(6.0)),
            0.6,
        ),
    };
    let custom = custom.as_ref();
    LineStyle {
        font: custom
            .and_then(|s| s.font.clone())
            .unwrap_or(default_font),
        color: custom
            .and_then(|s| s.color.clone())
            .unwrap_or_else(|| config.header_text_color.clone()),
        alpha: custom.and_then(|s| s.alpha).unwrap_or(default_alpha),
    }
}

/// Text drawn for a value: numbers in numeric columns with units get SI
/// prefixes ("1.5kV").
pub fn cell_text(value: &CellValue, header: &ColumnHeader) -> String {
    match (value, header.column_type, header.units.as_deref()) {
        (CellValue::Number(n), ColumnType::Numeric, Some(units)) if !units.is_empty() => {
            format_scientific_value(*n, units)
        }
        _ => value.display_text(),
    }
}

/// Replacement for text wider than its cell when masking is enabled.
pub fn mask_text<'a>(
    text: &'a str,
    overflows: bool,
    column_type: ColumnType,
    config: &'a GridConfig,
) -> &'a str {
    if !overflows {
        return text;
    }
    match column_type {
        ColumnType::Numeric if config.mask_numeric_values => "####",
        ColumnType::Numeric => text,
        _ if config.mask_text_values => config.text_mask(),
        _ => text,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::HeaderLineStyle;

    #[test]
    fn test_cell_text_formats_units() {
        let header = ColumnHeader::new("V")
            .with_type(ColumnType::Numeric)
            .with_units("V");
        assert_eq!(cell_text(&CellValue::Number(1500.0), &header), "1.5kV");
        assert_eq!(cell_text(&CellValue::from("n/a"), &header), "n/a");

        let plain = ColumnHeader::new("n").with_type(ColumnType::Numeric);
        assert_eq!(cell_text(&CellValue::Number(1500.0), &plain), "1500");
    }

    #[test]
    fn test_header_line_defaults() {
        let config = GridConfig::default();
        let title = header_line_style(&config, 0, 70.0);
        assert_eq!(title.font, config.header_font);
        assert_eq!(title.alpha, 1.0);

        let units = header_line_style(&config, 1, 70.0);
        assert_eq!(units.font, "italic 11px Inter, sans-serif");
        assert_eq!(units.alpha, 0.6);

        let desc = header_line_style(&config, 2, 30.0);
        assert_eq!(desc.font, "italic 6px Inter, sans-serif");
    }

    #[test]
    fn test_header_line_overrides() {
        let config = GridConfig {
            header_units_style: Some(HeaderLineStyle {
                font: Some("9px mono".into()),
                color: Some("#f00".into()),
                alpha: Some(0.9),
            }),
            ..GridConfig::default()
        };
        let units = header_line_style(&config, 1, 50.0);
        assert_eq!(units.font, "9px mono");
        assert_eq!(units.color, "#f00");
        assert_eq!(units.alpha, 0.9);
    }

    #[test]
    fn test_masking() {
        let mut config = GridConfig::default();
        assert_eq!(mask_text("123456", true, ColumnType::Numeric, &config), "123456");
        config.mask_numeric_values = true;
        config.mask_text_values = true;
        assert_eq!(mask_text("123456", true, ColumnType::Numeric, &config), "####");
        assert_eq!(mask_text("123456", false, ColumnType::Numeric, &config), "123456");
        assert_eq!(mask_text("long text", true, ColumnType::Text, &config), "...");
    }
}
