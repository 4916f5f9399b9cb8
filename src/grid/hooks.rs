//! Host callbacks and text measurement seams.

use serde::Serialize;

use crate::context_menu::{ContextMenuContext, MenuEntry};
use crate::types::{CellValue, SelectionInfo, SortOrder};

/// Payload of a committed cell edit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellEditEvent {
    /// Provider row
    pub row: u32,
    pub col: u32,
    pub old_value: CellValue,
    pub new_value: CellValue,
}

/// Callbacks into the host application. Every method defaults to a no-op,
/// so hosts implement only what they need.
pub trait GridHooks {
    fn on_selection_change(&mut self, _info: &SelectionInfo) {}

    /// A sortable header was clicked; `order` is the next state of the cycle.
    fn on_sort(&mut self, _col: u32, _order: Option<SortOrder>) {}

    /// Right-click on a cell. Return `true` to suppress the built-in menu.
    fn on_context_menu(&mut self, _row: u32, _col: u32) -> bool {
        false
    }

    fn on_header_context_menu(&mut self, _col: u32) -> bool {
        false
    }

    fn on_row_number_context_menu(&mut self, _row: u32) -> bool {
        false
    }

    /// Final menu entries. An empty list shows no menu.
    fn context_menu_items(
        &mut self,
        defaults: Vec<MenuEntry>,
        _context: &ContextMenuContext,
    ) -> Vec<MenuEntry> {
        defaults
    }

    /// A menu item was chosen. Return `true` if the host handled it; built-in
    /// ids fall back to the grid's own action otherwise.
    fn on_menu_action(&mut self, _id: &str, _context: &ContextMenuContext) -> bool {
        false
    }

    /// A custom keyboard shortcut fired.
    fn on_shortcut(&mut self, _action: &str) {}

    fn on_cell_edit(&mut self, _event: &CellEditEvent) {}

    /// Accept or reject an edit before it is written.
    fn validate(&mut self, _col: u32, _value: &CellValue, _row: u32) -> Result<(), String> {
        Ok(())
    }
}

/// Hooks that do nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl GridHooks for NoHooks {}

/// Measures rendered text width in CSS pixels.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font: &str) -> f64;
}

/// Estimate from the font's pixel size, for hosts without a canvas.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApproxMeasure;

/// Average glyph width as a fraction of the font size.
const AVG_GLYPH_RATIO: f64 = 0.6;

impl TextMeasure for ApproxMeasure {
    fn text_width(&self, text: &str, font: &str) -> f64 {
        let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        f64::from(chars) * font_px(font) * AVG_GLYPH_RATIO
    }
}

/// Pixel size from a CSS font shorthand ("bold 12px Inter"), default 12.
pub fn font_px(font: &str) -> f64 {
    font.split_whitespace()
        .find_map(|token| token.strip_suffix("px")?.parse::<f64>().ok())
        .unwrap_or(12.0)
}
