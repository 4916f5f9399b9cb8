//! Pointer handling: press dispatch, hover, drag gestures and the context menu.

use super::{GridCore, Response};
use crate::context_menu::{
    default_items, ContextMenuContext, ContextMenuRequest, ContextZone, MENU_COPY,
    MENU_EXPORT_CSV, MENU_REFRESH,
};
use crate::interaction::{
    hit_test, Cursor, Gesture, HitTarget, PointerButton, PointerInput, ReorderGesture,
    ResizeGesture, EDGE_TOLERANCE,
};
use crate::state::ResizeTarget;
use crate::types::{CellValue, ColumnType, SelectionMode, SortOrder};

impl GridCore {
    /// A press on the canvas. Any open editor is closed first; the browser
    /// layer commits its text before calling this.
    pub fn pointer_down(&mut self, input: PointerInput) -> Response {
        self.close_editor();
        let target = hit_test(
            &self.state,
            &self.config,
            self.row_count(),
            input.x,
            input.y,
        );
        tracing::trace!(?target, button = ?input.button, "pointer down");

        match target {
            HitTarget::RowNumberDivider => {
                self.begin_resize(ResizeTarget::RowNumbers, input.x);
                Response {
                    prevent_default: true,
                    capture_pointer: true,
                    ..Response::none()
                }
            }
            HitTarget::Corner => {
                self.update_selection(SelectionMode::All, None, None, false, false);
                Response::none()
            }
            HitTarget::HeaderEdge(index) => self.press_header_edge(index, input),
            HitTarget::HeaderHandle { index, sub } => self.press_header(index, sub, input),
            HitTarget::RowNumber(row) => {
                if input.is_secondary()
                    && self
                        .state
                        .selection
                        .is_within_active_selection(Some(row), None)
                {
                    return Response::none();
                }
                self.update_selection(SelectionMode::Row, Some(row), None, input.ctrl, input.shift);
                Response::none()
            }
            HitTarget::Cell { row, index } => self.press_cell(row, index, input),
            HitTarget::None => Response::none(),
        }
    }

    fn press_header_edge(&mut self, index: usize, input: PointerInput) -> Response {
        let Some(col) = self.state.columns.column_at_index(index) else {
            return Response::none();
        };
        if !(self.config.allow_resizing && self.provider.header(col).resizable()) {
            return Response::none();
        }
        if input.double {
            self.auto_resize_column(col);
            return Response::handled();
        }
        self.begin_resize(ResizeTarget::Column(col), input.x);
        Response {
            prevent_default: true,
            capture_pointer: true,
            ..Response::none()
        }
    }

    fn press_header(&mut self, index: usize, sub: usize, input: PointerInput) -> Response {
        let Some(col) = self.state.columns.column_at_index(index) else {
            return Response::none();
        };
        if input.double {
            self.open_header_editor(col, sub);
            return Response::handled();
        }
        if input.is_secondary()
            && self
                .state
                .selection
                .is_within_active_selection(None, Some(col))
        {
            return Response::none();
        }
        self.update_selection(SelectionMode::Column, None, Some(col), input.ctrl, input.shift);
        if input.button != PointerButton::Primary {
            return Response::none();
        }
        self.gesture = Some(Gesture::Reorder(ReorderGesture::new(index, input.x)));
        Response {
            prevent_default: true,
            capture_pointer: true,
            ..Response::none()
        }
    }

    fn press_cell(&mut self, row: u32, index: usize, input: PointerInput) -> Response {
        let Some(col) = self.state.columns.column_at_index(index) else {
            return Response::none();
        };
        let header = self.provider.header(col);

        if header.column_type == ColumnType::Checkbox
            && !input.double
            && self.provider.can_edit_cells()
        {
            let current = self.cell_value(row, col);
            self.edit_cell(row, col, CellValue::Bool(!current.is_truthy()));
        }

        if input.shift {
            self.update_selection(SelectionMode::Cell, Some(row), Some(col), input.ctrl, true);
            return Response::none();
        }
        if input.double {
            if !matches!(header.column_type, ColumnType::Progress | ColumnType::Checkbox) {
                self.open_cell_editor(row, col);
            }
            return Response::none();
        }
        if input.is_secondary()
            && self
                .state
                .selection
                .is_within_active_selection(Some(row), Some(col))
        {
            return Response::none();
        }
        self.update_selection(SelectionMode::Cell, Some(row), Some(col), input.ctrl, false);
        if input.is_secondary() {
            return Response::none();
        }
        self.gesture = Some(Gesture::Select);
        Response::capture()
    }

    /// Start a resize drag from viewport `x`.
    pub fn begin_resize(&mut self, target: ResizeTarget, x: f64) {
        let start_width = match target {
            ResizeTarget::RowNumbers => self.config.row_numbers_width,
            ResizeTarget::Column(col) => self.state.columns.width_of(col),
        };
        self.state.resizing_col = Some(target);
        self.gesture = Some(Gesture::Resize(ResizeGesture::new(target, x, start_width)));
        tracing::debug!(?target, start_width, "resize started");
    }

    /// Pointer moved with no button held. Tracks the hovered header and
    /// returns the cursor to show.
    pub fn hover(&mut self, x: f64, y: f64) -> Cursor {
        match self.gesture {
            Some(Gesture::Resize(_)) => return Cursor::ColResize,
            Some(Gesture::Reorder(g)) if g.dragging => return Cursor::Grabbing,
            _ => {}
        }

        let band = self.config.row_number_band();
        let in_header = y < self.state.header_height;
        let hovered = if in_header && x >= band {
            self.state
                .columns
                .column_at(x - band + self.state.scroll_x())
                .and_then(|i| self.state.columns.column_at_index(i))
        } else {
            None
        };
        if hovered != self.state.hovered_col {
            self.state.hovered_col = hovered;
            self.dirty = true;
        }

        if !in_header {
            return Cursor::Default;
        }
        if self.config.show_row_numbers && (x - band).abs() < EDGE_TOLERANCE {
            return Cursor::ColResize;
        }
        match hit_test(&self.state, &self.config, self.row_count(), x, y) {
            HitTarget::HeaderEdge(index) => {
                let resizable = self
                    .state
                    .columns
                    .column_at_index(index)
                    .is_some_and(|col| self.provider.header(col).resizable());
                if resizable && self.config.allow_resizing {
                    Cursor::ColResize
                } else {
                    Cursor::Grab
                }
            }
            HitTarget::HeaderHandle { .. } => Cursor::Grab,
            _ => Cursor::Default,
        }
    }

    /// Pointer moved during a captured gesture. Coordinates are viewport
    /// relative and may lie outside the canvas.
    pub fn drag_move(&mut self, input: PointerInput) {
        match self.gesture {
            Some(Gesture::Resize(gesture)) => {
                let width = gesture.width_at(input.x);
                match gesture.target {
                    ResizeTarget::RowNumbers => self.config.row_numbers_width = width,
                    ResizeTarget::Column(col) => self.state.columns.set_width(col, width),
                }
                self.update_virtual_size();
                self.dirty = true;
            }
            Some(Gesture::Reorder(mut gesture)) => {
                if !gesture.track(input.x) {
                    return;
                }
                self.gesture = Some(Gesture::Reorder(gesture));
                self.state.reordering_col = Some(gesture.index);
                self.state.reordering_x = Some(input.x);
                let content_x = input.x - self.config.row_number_band() + self.state.scroll_x();
                if let Some(target) = self.state.columns.column_at(content_x) {
                    self.state.reordering_target = Some(target);
                }
                self.dirty = true;
            }
            Some(Gesture::Select) => self.drag_select(input),
            None => {}
        }
    }

    /// Extend a live cell selection, clamping to the grid edges.
    fn drag_select(&mut self, input: PointerInput) {
        let rows = self.row_count();
        let Some(last_row) = rows.checked_sub(1).and_then(|r| u32::try_from(r).ok()) else {
            return;
        };
        let rh = self.config.row_height;
        if rh <= 0.0 {
            return;
        }
        let raw = ((input.y - self.state.header_height + self.state.scroll_y()) / rh).floor();
        let row = clamp_row(raw, last_row);

        let content_x = input.x - self.config.row_number_band() + self.state.scroll_x();
        let index = self.state.columns.column_at(content_x).unwrap_or(0);
        let Some(col) = self.state.columns.column_at_index(index) else {
            return;
        };
        self.update_selection(SelectionMode::Cell, Some(row), Some(col), input.ctrl, true);
    }

    /// Release ends the active gesture. Reorder drags commit, header clicks
    /// without movement cycle the sort order.
    pub fn pointer_up(&mut self) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        match gesture {
            Gesture::Resize(g) => {
                self.state.resizing_col = None;
                tracing::debug!(target = ?g.target, "resize committed");
                self.save_state();
            }
            Gesture::Reorder(g) if g.dragging => {
                if let Some(target) = self.state.reordering_target {
                    if let Some(moved) = self.state.columns.move_column(g.index, target) {
                        tracing::debug!(moved, from = g.index, target, "column reordered");
                        self.update_selection(SelectionMode::Column, None, Some(moved), false, false);
                    }
                }
                self.state.clear_reorder();
                self.save_state();
            }
            Gesture::Reorder(g) => self.click_header(g.index),
            Gesture::Select => {}
        }
        self.dirty = true;
    }

    fn click_header(&mut self, index: usize) {
        let Some(col) = self.state.columns.column_at_index(index) else {
            return;
        };
        let header = self.provider.header(col);
        if header.sortable() {
            let next: Option<SortOrder> = SortOrder::cycle(header.sort_order);
            tracing::debug!(col, ?next, "sort requested");
            self.hooks.on_sort(col, next);
        }
    }

    /// Abort the active gesture without committing it.
    pub fn cancel_gesture(&mut self) -> bool {
        let Some(gesture) = self.gesture.take() else {
            return false;
        };
        match gesture {
            Gesture::Resize(g) => {
                match g.target {
                    ResizeTarget::RowNumbers => self.config.row_numbers_width = g.start_width,
                    ResizeTarget::Column(col) => self.state.columns.set_width(col, g.start_width),
                }
                self.state.resizing_col = None;
                self.update_virtual_size();
            }
            Gesture::Reorder(_) => self.state.clear_reorder(),
            Gesture::Select => {}
        }
        tracing::debug!("gesture aborted");
        self.dirty = true;
        true
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    // ========================================================================
    // Context menu
    // ========================================================================

    /// Right-click at viewport `(x, y)`. The pointer-down for the same click
    /// has already adjusted the selection.
    pub fn context_menu(&mut self, x: f64, y: f64) -> Response {
        let target = hit_test(&self.state, &self.config, self.row_count(), x, y);
        let (row, col) = match target {
            HitTarget::HeaderHandle { index, .. } | HitTarget::HeaderEdge(index) => {
                (None, self.state.columns.column_at_index(index))
            }
            HitTarget::RowNumber(row) => (Some(row), None),
            HitTarget::Cell { row, index } => (Some(row), self.state.columns.column_at_index(index)),
            _ => (None, None),
        };
        if row.is_none() && col.is_none() {
            return Response::none();
        }
        self.open_context_menu(row, col, x, y)
    }

    pub(super) fn open_context_menu(
        &mut self,
        row: Option<u32>,
        col: Option<u32>,
        x: f64,
        y: f64,
    ) -> Response {
        let context = ContextMenuContext::new(row, col, &self.state.selection);
        let suppressed = match (context.zone, row, col) {
            (ContextZone::Header, _, Some(c)) => self.hooks.on_header_context_menu(c),
            (ContextZone::RowNumber, Some(r), _) => self.hooks.on_row_number_context_menu(r),
            (_, Some(r), Some(c)) => self.hooks.on_context_menu(r, c),
            _ => false,
        };
        if suppressed {
            return Response::handled();
        }

        let entries = self.hooks.context_menu_items(default_items(), &context);
        if entries.is_empty() {
            return Response::handled();
        }
        self.menu_context = Some(context.clone());
        Response {
            prevent_default: true,
            menu: Some(ContextMenuRequest {
                x,
                y,
                entries,
                context,
            }),
            ..Response::none()
        }
    }

    /// A menu item was chosen. The host gets first refusal; built-in ids
    /// fall back to the grid's own actions.
    pub fn activate_menu_item(&mut self, id: &str) -> Response {
        let Some(context) = self.menu_context.take() else {
            return Response::none();
        };
        if self.hooks.on_menu_action(id, &context) {
            return Response::none();
        }
        match id {
            MENU_COPY => Response {
                clipboard: self.copy_selection(),
                ..Response::none()
            },
            MENU_EXPORT_CSV => Response {
                download: Some(self.export_csv()),
                ..Response::none()
            },
            MENU_REFRESH => {
                self.invalidate();
                Response::none()
            }
            _ => Response::none(),
        }
    }

    pub fn dismiss_menu(&mut self) {
        self.menu_context = None;
    }
}

/// Row index from a fractional position, clamped to `[0, last]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_row(raw: f64, last: u32) -> u32 {
    if raw.is_nan() || raw <= 0.0 {
        0
    } else {
        raw.min(f64::from(last)) as u32
    }
}
