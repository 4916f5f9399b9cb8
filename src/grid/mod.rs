//! Platform-independent grid controller.
//!
//! `GridCore` owns the view state, config, provider and host hooks. Every
//! pointer, keyboard and scroll interaction is a method taking plain input
//! descriptors and returning a [`Response`] telling the browser layer what
//! to do with the originating event. Nothing here touches the DOM.

mod edit;
pub mod hooks;
mod keys;
mod pointer;

pub use hooks::{font_px, ApproxMeasure, CellEditEvent, GridHooks, NoHooks, TextMeasure};

use crate::context_menu::{ContextMenuContext, ContextMenuRequest};
use crate::data::{self, PersistedState, StateStore};
use crate::editor::EditorSession;
use crate::error::Result;
use crate::filter::{ColumnFilter, DataView, FilterEngine, SortState, ViewProvider, ViewSpec};
use crate::interaction::Gesture;
use crate::layout::ScrollBridge;
use crate::provider::DataGridProvider;
use crate::render::{RenderBackend, RenderParams};
use crate::state::ViewportState;
use crate::types::{CellValue, ColumnHeader, GridConfig, SelectionInfo, SelectionMode};
use crate::undo::UndoManager;

/// Rows requested beyond each side of the visible window.
pub const PREFETCH_ROWS: i64 = 50;

/// Visible-window movement, in rows, that triggers a new rows-needed call.
pub const ROWS_NEEDED_THRESHOLD: i64 = 5;

/// What the browser layer should do after an interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub prevent_default: bool,
    /// Track the pointer on the window until release
    pub capture_pointer: bool,
    /// Text to write to the system clipboard
    pub clipboard: Option<String>,
    /// CSV document to offer as a download
    pub download: Option<String>,
    pub menu: Option<ContextMenuRequest>,
}

impl Response {
    pub fn none() -> Self {
        Self::default()
    }

    fn handled() -> Self {
        Self {
            prevent_default: true,
            ..Self::default()
        }
    }

    fn capture() -> Self {
        Self {
            capture_pointer: true,
            ..Self::default()
        }
    }
}

pub struct GridCore {
    state: ViewportState,
    config: GridConfig,
    provider: Box<dyn DataGridProvider>,
    hooks: Box<dyn GridHooks>,
    measure: Box<dyn TextMeasure>,
    store: Option<Box<dyn StateStore>>,
    history: UndoManager,
    filters: FilterEngine,
    view_spec: ViewSpec,
    view: Option<DataView>,
    scroll: ScrollBridge,
    gesture: Option<Gesture>,
    editor: Option<EditorSession>,
    menu_context: Option<ContextMenuContext>,
    last_rows_range: Option<(i64, i64)>,
    pending_scroll: Option<(f64, f64)>,
    dirty: bool,
}

impl GridCore {
    pub fn new(provider: Box<dyn DataGridProvider>, config: GridConfig) -> Self {
        let state = ViewportState::new(
            provider.column_count(),
            config.column_width,
            config.effective_header_height(),
        );
        let mut core = Self {
            state,
            config,
            provider,
            hooks: Box::new(NoHooks),
            measure: Box::new(ApproxMeasure),
            store: None,
            history: UndoManager::default(),
            filters: FilterEngine::new(),
            view_spec: ViewSpec::default(),
            view: None,
            scroll: ScrollBridge::new(),
            gesture: None,
            editor: None,
            menu_context: None,
            last_rows_range: None,
            pending_scroll: None,
            dirty: true,
        };
        core.update_virtual_size();
        core
    }

    pub fn with_hooks(mut self, hooks: Box<dyn GridHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_measure(mut self, measure: Box<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    /// Attach persistent storage and restore any saved column layout.
    pub fn with_store(mut self, store: Box<dyn StateStore>) -> Self {
        self.store = Some(store);
        self.load_state();
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn hooks_mut(&mut self) -> &mut dyn GridHooks {
        self.hooks.as_mut()
    }

    pub fn set_hooks(&mut self, hooks: Box<dyn GridHooks>) {
        self.hooks = hooks;
    }

    pub fn editor(&self) -> Option<&EditorSession> {
        self.editor.as_ref()
    }

    pub fn view(&self) -> Option<&DataView> {
        self.view.as_ref()
    }

    pub fn view_spec(&self) -> &ViewSpec {
        &self.view_spec
    }

    pub fn history(&self) -> &UndoManager {
        &self.history
    }

    pub fn selection(&self) -> SelectionInfo {
        self.state.selection.info()
    }

    /// Displayed rows: the view's rows when filtering, sorting or grouping.
    pub fn row_count(&self) -> usize {
        match &self.view {
            Some(view) => view.visible_row_count,
            None => self.provider.row_count(),
        }
    }

    pub fn column_count(&self) -> usize {
        self.state.columns.len()
    }

    pub fn grid_size(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    /// Run `f` against the data as displayed.
    pub fn with_data<R>(&self, f: impl FnOnce(&dyn DataGridProvider) -> R) -> R {
        match &self.view {
            Some(view) => f(&ViewProvider::new(self.provider.as_ref(), view)),
            None => f(self.provider.as_ref()),
        }
    }

    /// Provider row behind a displayed row.
    pub fn source_row(&self, row: u32) -> Option<u32> {
        match &self.view {
            Some(view) => view.source_row(row),
            None => (usize::try_from(row).ok()? < self.provider.row_count()).then_some(row),
        }
    }

    /// Value at a displayed row.
    pub fn cell_value(&self, row: u32, col: u32) -> CellValue {
        self.source_row(row)
            .map(|r| self.provider.cell_data(r, col))
            .unwrap_or_default()
    }

    pub fn header(&self, col: u32) -> ColumnHeader {
        self.provider.header(col)
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Apply a selection action and notify the host. A missing coordinate
    /// the mode needs leaves the selection untouched.
    pub fn update_selection(
        &mut self,
        mode: SelectionMode,
        row: Option<u32>,
        col: Option<u32>,
        ctrl: bool,
        shift: bool,
    ) {
        let size = self.grid_size();
        let Some(info) = self
            .state
            .selection
            .update(mode, row, col, ctrl, shift, size)
        else {
            tracing::trace!(?mode, ?row, ?col, "selection update ignored");
            return;
        };
        tracing::trace!(?mode, ranges = info.ranges.len(), "selection changed");
        self.hooks.on_selection_change(&info);
        self.dirty = true;
    }

    pub fn clear_selection(&mut self) {
        self.state.selection.clear();
        let info = self.state.selection.info();
        self.hooks.on_selection_change(&info);
        self.dirty = true;
    }

    // ========================================================================
    // Size and scrolling
    // ========================================================================

    /// Full content extent in virtual pixels.
    pub fn virtual_size(&self) -> (f64, f64) {
        let rows = u32::try_from(self.row_count()).unwrap_or(u32::MAX);
        (
            self.config.row_number_band() + self.state.columns.total_width(),
            f64::from(rows) * self.config.row_height + self.state.header_height,
        )
    }

    /// Recompute both scroll axes. Returns the physical (shadow element) size.
    pub fn update_virtual_size(&mut self) -> (f64, f64) {
        let (width, height) = self.virtual_size();
        let viewport = self.state.viewport;
        self.scroll
            .update_virtual_size(width, height, viewport.width, viewport.height)
    }

    pub fn physical_size(&self) -> (f64, f64) {
        (self.scroll.x.physical_size, self.scroll.y.physical_size)
    }

    /// Viewport resized. Returns the new physical size.
    pub fn resize(&mut self, width: f64, height: f64) -> (f64, f64) {
        self.state.viewport.resize(width, height);
        self.dirty = true;
        self.update_virtual_size()
    }

    /// Native scroll event at physical offsets. Returns whether the virtual
    /// position changed; the caller renders immediately when it did.
    pub fn on_scroll(&mut self, left: f64, top: f64) -> bool {
        let Some((x, y)) = self.scroll.on_native_scroll(left, top) else {
            return false;
        };
        self.state.viewport.scroll_x = x;
        self.state.viewport.scroll_y = y;
        self.close_editor();
        self.dirty = true;
        true
    }

    /// Scroll to a virtual position, clamped to the content.
    pub fn set_scroll(&mut self, x: f64, y: f64) {
        let max_x = (self.scroll.x.virtual_size - self.scroll.x.viewport).max(0.0);
        let max_y = (self.scroll.y.virtual_size - self.scroll.y.viewport).max(0.0);
        let x = x.clamp(0.0, max_x);
        let y = y.clamp(0.0, max_y);
        self.state.viewport.scroll_x = x;
        self.state.viewport.scroll_y = y;
        self.pending_scroll = Some(self.scroll.physical_for(x, y));
        self.dirty = true;
    }

    /// Physical offsets the shadow container should be scrolled to, once.
    pub fn take_scroll_request(&mut self) -> Option<(f64, f64)> {
        self.pending_scroll.take()
    }

    /// Bring a displayed cell into view with the smallest scroll change.
    pub fn scroll_to_cell(&mut self, row: u32, col: u32) {
        let Some(index) = self.state.columns.index_of(col) else {
            return;
        };
        let x = self.state.columns.offset_of(index);
        let y = f64::from(row) * self.config.row_height;
        let width = self.state.columns.width_of(col);
        let (left, top) = self
            .scroll
            .physical_for(self.state.scroll_x(), self.state.scroll_y());
        if let Some((x, y)) = self.scroll.scroll_to_cell(
            left,
            top,
            (x, y, width, self.config.row_height),
            (self.config.row_number_band(), self.state.header_height),
        ) {
            self.set_scroll(x, y);
        }
    }

    // ========================================================================
    // Config and provider
    // ========================================================================

    /// Merge a partial config. An invalid patch leaves the config untouched.
    pub fn update_config(&mut self, patch: &serde_json::Value) -> Result<()> {
        let next = self.config.merged(patch)?;
        self.set_config(next);
        Ok(())
    }

    pub fn set_config(&mut self, config: GridConfig) {
        self.close_editor();
        self.config = config;
        self.state.header_height = self.config.effective_header_height();
        self.state.columns.set_default_width(self.config.column_width);
        self.update_virtual_size();
        self.dirty = true;
    }

    /// Swap the data source. Column order returns to identity, the undo
    /// history is dropped and any selection is cleared.
    pub fn update_provider(&mut self, provider: Box<dyn DataGridProvider>) {
        self.close_editor();
        self.provider = provider;
        self.state.columns.reset_order(self.provider.column_count());
        self.history.clear();
        if !self.state.selection.ranges.is_empty() || self.state.selection.anchor_row.is_some() {
            self.clear_selection();
        }
        self.last_rows_range = None;
        self.refresh_view();
    }

    // ========================================================================
    // Clipboard and export
    // ========================================================================

    /// Tab-separated text for the current selection.
    pub fn copy_selection(&self) -> Option<String> {
        self.with_data(|data| data::selection_text(&self.state.selection, data))
    }

    /// Displayed rows as CSV in visual column order.
    pub fn export_csv(&self) -> String {
        let rows = self.view.as_ref().map(|v| v.row_map.as_slice());
        data::export_delimited(self.provider.as_ref(), self.state.columns.order(), rows, ",")
    }

    // ========================================================================
    // Filtering, sorting, grouping
    // ========================================================================

    pub fn set_filters(&mut self, filters: Vec<ColumnFilter>) {
        self.view_spec.filters = filters;
        self.refresh_view();
    }

    pub fn set_sorts(&mut self, sorts: Vec<SortState>) {
        self.view_spec.sorts = sorts;
        self.refresh_view();
    }

    pub fn set_quick_filter(&mut self, text: &str) {
        self.view_spec.quick_filter = text.to_string();
        self.refresh_view();
    }

    pub fn set_group_by(&mut self, col: Option<u32>) {
        self.view_spec.group_by = col;
        self.refresh_view();
    }

    pub fn toggle_group(&mut self, value: &str) {
        self.filters.toggle_group(value);
        self.refresh_view();
    }

    /// Rebuild the data view from the provider.
    pub fn refresh_view(&mut self) {
        self.view = self
            .view_spec
            .is_active()
            .then(|| self.filters.build_view(self.provider.as_ref(), &self.view_spec));
        self.update_virtual_size();
        self.dirty = true;
    }

    // ========================================================================
    // Frames
    // ========================================================================

    /// Data changed outside the grid.
    pub fn invalidate(&mut self) {
        if self.view.is_some() {
            self.refresh_view();
        }
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear and return the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Draw one frame through `backend`.
    pub fn render(&mut self, backend: &mut dyn RenderBackend) -> Result<()> {
        self.check_rows_needed();
        self.dirty = false;
        let state = &self.state;
        let config = &self.config;
        self.with_data(|data| {
            backend.render(&RenderParams {
                state,
                config,
                data,
            })
        })
    }

    /// Notify the provider when the visible window has moved far enough.
    pub fn check_rows_needed(&mut self) {
        let rh = self.config.row_height;
        if rh <= 0.0 {
            return;
        }
        let viewport = self.state.viewport;
        let start = to_row(viewport.scroll_y / rh);
        let end = to_row(((viewport.scroll_y + viewport.height) / rh).ceil());
        if let Some((last_start, last_end)) = self.last_rows_range {
            if (start - last_start).abs() <= ROWS_NEEDED_THRESHOLD
                && (end - last_end).abs() <= ROWS_NEEDED_THRESHOLD
            {
                return;
            }
        }
        self.last_rows_range = Some((start, end));

        let rows = i64::try_from(self.provider.row_count()).unwrap_or(i64::MAX);
        if rows == 0 {
            return;
        }
        let from = (start - PREFETCH_ROWS).clamp(0, rows - 1);
        let to = (end + PREFETCH_ROWS).clamp(0, rows - 1);
        let (Ok(from), Ok(to)) = (u32::try_from(from), u32::try_from(to)) else {
            return;
        };
        tracing::trace!(from, to, "rows needed");
        self.provider.on_rows_needed(from, to);
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    pub fn save_state(&self) {
        let (Some(store), Some(key)) = (&self.store, &self.config.persistence_key) else {
            return;
        };
        data::save_state(store.as_ref(), key, &PersistedState::capture(&self.state.columns));
    }

    /// Restore column order and widths. Returns whether state was found.
    pub fn load_state(&mut self) -> bool {
        let (Some(store), Some(key)) = (&self.store, &self.config.persistence_key) else {
            return false;
        };
        let Some(saved) = data::load_state(store.as_ref(), key) else {
            return false;
        };
        saved.apply(&mut self.state.columns);
        self.update_virtual_size();
        self.dirty = true;
        tracing::debug!(columns = self.state.columns.len(), "restored grid state");
        true
    }
}

/// Whole rows from a fractional row position, saturating.
#[allow(clippy::cast_possible_truncation)]
fn to_row(value: f64) -> i64 {
    if value.is_finite() {
        value.floor().clamp(0.0, 1e15) as i64
    } else {
        0
    }
}
