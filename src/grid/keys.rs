//! Keyboard dispatch.

use super::{GridCore, Response};
use crate::interaction::{navigate, KeyAction, KeyInput, Shortcuts};
use crate::types::SelectionMode;

/// Offset of a keyboard-opened menu from the anchor cell's top-left corner.
const MENU_OFFSET: (f64, f64) = (20.0, 10.0);

impl GridCore {
    /// A key press on the focused grid. Ignored while an editor is open; the
    /// editor handles its own keys.
    pub fn key_down(&mut self, input: &KeyInput) -> Response {
        if self.editor.is_some() {
            return Response::none();
        }
        if input.key == "Escape" && self.cancel_gesture() {
            return Response::handled();
        }

        let Some(action) = Shortcuts::new(&self.config).match_key(input) else {
            return Response::none();
        };
        tracing::trace!(action = action.name(), "shortcut");

        match action {
            KeyAction::Custom(name) => {
                self.hooks.on_shortcut(&name);
                Response::handled()
            }
            KeyAction::Copy => Response {
                clipboard: self.copy_selection(),
                ..Response::none()
            },
            KeyAction::SelectAll => {
                self.update_selection(SelectionMode::All, None, None, false, false);
                Response::handled()
            }
            KeyAction::Undo => {
                self.undo();
                Response::handled()
            }
            KeyAction::Redo => {
                self.redo();
                Response::handled()
            }
            KeyAction::ContextMenu => self.keyboard_context_menu(),
            nav => self.navigate_anchor(&nav, input),
        }
    }

    /// Anchor position as (displayed row, visual column index).
    fn anchor_position(&self) -> (u32, usize) {
        let selection = &self.state.selection;
        let row = selection.anchor_row.unwrap_or(0);
        let col = selection.anchor_col.unwrap_or(0);
        let index = self
            .state
            .columns
            .index_of(col)
            .unwrap_or_else(|| usize::try_from(col).unwrap_or(0));
        (row, index)
    }

    fn navigate_anchor(&mut self, action: &KeyAction, input: &KeyInput) -> Response {
        let from = self.anchor_position();
        let page = page_rows(self.state.viewport.height, self.config.row_height);
        let Some((row, index)) = navigate(action, from, self.grid_size(), page, input.command())
        else {
            return Response::none();
        };
        let Some(col) = self.state.columns.column_at_index(index) else {
            return Response::none();
        };
        self.update_selection(
            SelectionMode::Cell,
            Some(row),
            Some(col),
            input.command(),
            input.shift,
        );
        self.scroll_to_cell(row, col);
        Response::handled()
    }

    fn keyboard_context_menu(&mut self) -> Response {
        let (row, index) = self.anchor_position();
        let col = self.state.columns.column_at_index(index);
        let x = self.config.row_number_band() + self.state.columns.offset_of(index)
            - self.state.scroll_x()
            + MENU_OFFSET.0;
        let y = self.state.header_height + f64::from(row) * self.config.row_height
            - self.state.scroll_y()
            + MENU_OFFSET.1;
        let mut response = self.open_context_menu(Some(row), col, x, y);
        response.prevent_default = true;
        response
    }
}

/// Rows per page for a viewport height, at least one.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn page_rows(height: f64, row_height: f64) -> u32 {
    if row_height <= 0.0 {
        return 1;
    }
    let rows = (height / row_height).floor();
    if rows.is_finite() && rows >= 1.0 {
        rows.min(f64::from(u32::MAX)) as u32
    } else {
        1
    }
}
