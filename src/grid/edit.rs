//! Editor lifecycle, cell writes, undo/redo and column auto-sizing.

use super::{CellEditEvent, GridCore};
use crate::editor::{parse_cell_input, EditTarget, EditorKind, EditorRect, EditorSession};
use crate::interaction::band_heights;
use crate::layout::MIN_COLUMN_WIDTH;
use crate::render::{cell_text, header_line_style};
use crate::types::{CellValue, ColumnType};
use crate::undo::{CellChange, UndoAction, UndoKind};

/// Rows measured when sizing a column to its content.
pub const AUTO_RESIZE_SAMPLE_ROWS: usize = 1000;

impl GridCore {
    /// Open the inline editor on a displayed cell. No-op when the provider
    /// is read-only or the column opts out of editing.
    pub fn open_cell_editor(&mut self, row: u32, col: u32) -> bool {
        if !self.provider.can_edit_cells() {
            return false;
        }
        let header = self.provider.header(col);
        let Some(index) = self.state.columns.index_of(col) else {
            return false;
        };
        if !header.editable() || self.source_row(row).is_none() {
            return false;
        }

        let rect = EditorRect {
            x: self.config.row_number_band() + self.state.columns.offset_of(index)
                - self.state.scroll_x(),
            y: f64::from(row) * self.config.row_height - self.state.scroll_y()
                + self.state.header_height,
            width: self.state.columns.width_of(col),
            height: self.config.row_height,
        };
        let kind = if header.column_type == ColumnType::Select {
            EditorKind::Select(header.select_options.clone())
        } else {
            EditorKind::Text
        };
        self.editor = Some(EditorSession {
            target: EditTarget::Cell { row, col },
            kind,
            initial_value: self.cell_value(row, col).display_text(),
            rect,
        });
        tracing::debug!(row, col, "cell editor opened");
        self.dirty = true;
        true
    }

    /// Open the editor on a header band (0 name, 1 units, 2 description).
    pub fn open_header_editor(&mut self, col: u32, sub: usize) -> bool {
        if !self.provider.can_edit_headers() {
            return false;
        }
        let Some(index) = self.state.columns.index_of(col) else {
            return false;
        };
        let header = self.provider.header(col);
        let (title_h, sub_h) = band_heights(self.state.header_height, self.config.sub_text_count());
        let (y, height) = match sub {
            0 => (0.0, title_h),
            1 => (title_h, sub_h),
            _ => (title_h + sub_h, sub_h),
        };
        self.editor = Some(EditorSession {
            target: EditTarget::Header { col, sub },
            kind: EditorKind::Text,
            initial_value: header.line(sub).unwrap_or_default().to_string(),
            rect: EditorRect {
                x: self.config.row_number_band() + self.state.columns.offset_of(index)
                    - self.state.scroll_x(),
                y,
                width: self.state.columns.width_of(col),
                height,
            },
        });
        tracing::debug!(col, sub, "header editor opened");
        self.dirty = true;
        true
    }

    /// Discard the open editor without writing.
    pub fn close_editor(&mut self) {
        if self.editor.take().is_some() {
            self.dirty = true;
        }
    }

    /// Escape: same as closing, named for the editor's key handler.
    pub fn cancel_editor(&mut self) {
        self.close_editor();
    }

    /// Enter or blur: write the editor's text and close it. Returns whether
    /// a value was written.
    pub fn commit_editor(&mut self, text: &str) -> bool {
        let Some(session) = self.editor.take() else {
            return false;
        };
        self.dirty = true;
        match session.target {
            EditTarget::Cell { row, col } => {
                let value = parse_cell_input(text, &self.provider.header(col));
                self.edit_cell(row, col, value)
            }
            EditTarget::Header { col, sub } => {
                let header = self.provider.header(col).with_line(sub, text.to_string());
                self.provider.set_header(col, header);
                true
            }
        }
    }

    /// Write a value to a displayed cell through the validator, recording
    /// undo history and notifying the host.
    pub fn edit_cell(&mut self, row: u32, col: u32, value: CellValue) -> bool {
        if !self.provider.can_edit_cells() {
            return false;
        }
        let Some(source) = self.source_row(row) else {
            return false;
        };
        if let Err(reason) = self.hooks.validate(col, &value, source) {
            tracing::debug!(row = source, col, %reason, "edit rejected by validator");
            return false;
        }

        let old_value = self.provider.cell_data(source, col);
        self.provider.set_cell_data(source, col, value.clone());
        self.history
            .push(UndoAction::cell(source, col, old_value.clone(), value.clone()));
        self.hooks.on_cell_edit(&CellEditEvent {
            row: source,
            col,
            old_value,
            new_value: value,
        });
        self.after_write();
        true
    }

    /// Paste tab-separated text at the anchor as one undoable action.
    /// Returns the number of cells written.
    pub fn paste_text(&mut self, text: &str) -> usize {
        if !self.provider.can_edit_cells() {
            return 0;
        }
        let start_row = self.state.selection.anchor_row.unwrap_or(0);
        let start_index = self
            .state
            .selection
            .anchor_col
            .and_then(|c| self.state.columns.index_of(c))
            .unwrap_or(0);

        let mut changes = Vec::new();
        for (dr, line) in text.lines().enumerate() {
            let Some(row) = u32::try_from(dr).ok().and_then(|d| start_row.checked_add(d)) else {
                break;
            };
            let Some(source) = self.source_row(row) else {
                break;
            };
            for (dc, field) in crate::data::split_line(line, '\t').into_iter().enumerate() {
                let Some(col) = self.state.columns.column_at_index(start_index + dc) else {
                    break;
                };
                let header = self.provider.header(col);
                if !header.editable() {
                    continue;
                }
                let value = parse_cell_input(&field, &header);
                if self.hooks.validate(col, &value, source).is_err() {
                    continue;
                }
                let old_value = self.provider.cell_data(source, col);
                self.provider.set_cell_data(source, col, value.clone());
                changes.push(CellChange {
                    row: source,
                    col,
                    old_value,
                    new_value: value,
                });
            }
        }

        let written = changes.len();
        if written > 0 {
            for change in &changes {
                self.hooks.on_cell_edit(&CellEditEvent {
                    row: change.row,
                    col: change.col,
                    old_value: change.old_value.clone(),
                    new_value: change.new_value.clone(),
                });
            }
            self.history.push(UndoAction {
                kind: UndoKind::Paste,
                changes,
            });
            self.after_write();
        }
        tracing::debug!(written, "paste applied");
        written
    }

    /// Revert the most recent edit. Returns whether anything was undone.
    pub fn undo(&mut self) -> bool {
        let Some(action) = self.history.undo().cloned() else {
            return false;
        };
        for change in action.changes.iter().rev() {
            self.provider
                .set_cell_data(change.row, change.col, change.old_value.clone());
        }
        self.after_write();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(action) = self.history.redo().cloned() else {
            return false;
        };
        for change in &action.changes {
            self.provider
                .set_cell_data(change.row, change.col, change.new_value.clone());
        }
        self.after_write();
        true
    }

    fn after_write(&mut self) {
        if self.view.is_some() {
            self.refresh_view();
        }
        self.dirty = true;
    }

    /// Size a column to the widest of its shown header lines and sampled
    /// cell values.
    pub fn auto_resize_column(&mut self, col: u32) {
        let header = self.provider.header(col);
        let header_height = self.state.header_height;

        let mut widest: f64 = 0.0;
        for sub in 0..=self.config.sub_text_count() {
            let text = header
                .line(sub)
                .unwrap_or(self.config.header_placeholder.as_str());
            let style = header_line_style(&self.config, sub, header_height);
            widest = widest.max(self.measure.text_width(text, &style.font));
        }

        let rows = self.row_count().min(AUTO_RESIZE_SAMPLE_ROWS);
        let widest = self.with_data(|data| {
            (0..rows)
                .filter_map(|r| u32::try_from(r).ok())
                .map(|r| cell_text(&data.cell_data(r, col), &header))
                .map(|text| self.measure.text_width(&text, &self.config.font))
                .fold(widest, f64::max)
        });

        let width = (widest + self.config.cell_padding * 2.0 + 2.0).max(MIN_COLUMN_WIDTH);
        tracing::debug!(col, width, "auto-resized column");
        self.state.columns.set_width(col, width);
        self.update_virtual_size();
        self.save_state();
        self.dirty = true;
    }
}
