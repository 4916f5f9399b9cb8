//! Main SciGrid struct - the browser entry point.
//!
//! This module provides the WASM-exported `SciGrid` struct that:
//! - mounts a canvas and a native scroll container inside a host element
//! - adapts the JS provider and config callbacks to `GridCore`
//! - turns DOM events into core interactions (see `events`)
//! - redraws on a `requestAnimationFrame` loop when the core is dirty
//!
//! Event handlers are registered when the grid is created; `destroy()`
//! removes them along with the DOM the grid added.

mod clipboard;
mod events;
mod hooks;
mod js_provider;
mod menu;
mod scroll;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlElement, MouseEvent, ResizeObserver};

use crate::editor::input::{EditorOutcome, EditorOverlay, OnDone};
use crate::error::{GridError, Result};
use crate::filter::{ColumnFilter, SortState};
use crate::grid::{GridCore, Response};
use crate::interaction::Cursor;
use crate::render::{CanvasRenderer, CanvasTextMeasure, RenderBackend};
use crate::types::GridConfig;

use clipboard::{copy_to_clipboard, download_csv, EXPORT_FILE_NAME};
use events::{DragCapture, Listener};
use hooks::{plain_config, to_js, EventSlot, HookFns, JsHooks, LocalStorageStore, Outbox};
use js_provider::JsProvider;
use menu::{MenuPopup, OnPick};
use scroll::ScrollShadow;

pub(crate) type Shared = Rc<RefCell<SharedState>>;

/// Everything the event handlers touch, behind one `RefCell`.
pub(crate) struct SharedState {
    pub(crate) core: GridCore,
    renderer: CanvasRenderer,
    canvas: HtmlCanvasElement,
    host: HtmlElement,
    pub(crate) shadow: ScrollShadow,
    editor: EditorOverlay,
    pub(crate) menu: MenuPopup,
    pub(crate) drag: Option<DragCapture>,
    outbox: Outbox,
    cursor: Cursor,
    /// Last (rows, cols) written to the ARIA attributes
    aria: Option<(usize, usize)>,
    self_ref: Weak<RefCell<SharedState>>,
    destroyed: bool,
}

/// Run `f` against the shared state, then bring the DOM in line with the
/// core and deliver queued host callbacks.
///
/// Returns `None` when the grid is destroyed or already borrowed, which
/// happens when a synchronous host callback calls back into the grid.
pub(crate) fn with_state<R>(state: &Shared, f: impl FnOnce(&mut SharedState) -> R) -> Option<R> {
    let (result, outbox) = {
        let Ok(mut s) = state.try_borrow_mut() else {
            tracing::debug!("grid busy; nested call ignored");
            return None;
        };
        if s.destroyed {
            return None;
        }
        let result = f(&mut s);
        s.sync();
        (result, s.outbox.clone())
    };
    outbox.flush();
    Some(result)
}

/// CSS pixels to whole buffer pixels.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u32(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.floor().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

impl SharedState {
    pub(crate) fn render(&mut self) {
        if let Err(err) = self.core.render(&mut self.renderer) {
            tracing::warn!(%err, "render failed");
        }
    }

    /// Match the canvas and core to the scroll container's client area.
    #[allow(clippy::cast_possible_truncation)]
    fn resize(&mut self) {
        let (width, height) = self.shadow.viewport_size();
        let (width, height) = (width.floor(), height.floor());
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        self.core.resize(width, height);
        self.renderer.resize(to_u32(width), to_u32(height), dpr as f32);
        tracing::trace!(width, height, dpr, "viewport resized");
        self.render();
    }

    /// Viewport-relative position of a mouse event.
    pub(crate) fn canvas_point(&self, event: &MouseEvent) -> (f64, f64) {
        let rect = self.canvas.get_bounding_client_rect();
        (
            f64::from(event.client_x()) - rect.left(),
            f64::from(event.client_y()) - rect.top(),
        )
    }

    /// Carry out the side effects a core interaction asked for.
    pub(crate) fn apply(&mut self, response: &Response) {
        if let Some(text) = &response.clipboard {
            copy_to_clipboard(text);
        }
        if let Some(csv) = &response.download {
            download_csv(csv, EXPORT_FILE_NAME);
        }
        if let Some(request) = &response.menu {
            let rect = self.canvas.get_bounding_client_rect();
            let on_pick = self.menu_callback();
            self.menu.show(
                rect.left() + request.x,
                rect.top() + request.y,
                &request.entries,
                self.core.config(),
                &on_pick,
            );
        }
        if response.capture_pointer {
            if let Some(drag) = &mut self.drag {
                drag.start();
            }
        }
    }

    pub(crate) fn menu_open(&self) -> bool {
        self.menu.is_open()
    }

    pub(crate) fn close_menu(&mut self) {
        if self.menu.is_open() {
            self.menu.close();
            self.core.dismiss_menu();
        }
    }

    /// Text of an open text editor, to commit before anything else happens.
    pub(crate) fn editor_text(&self) -> Option<String> {
        self.core.editor()?;
        self.editor.text_value()
    }

    fn menu_callback(&self) -> OnPick {
        let weak = self.self_ref.clone();
        Rc::new(move |id: String| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            with_state(&state, |s| {
                s.menu.close();
                let response = s.core.activate_menu_item(&id);
                s.apply(&response);
            });
        })
    }

    fn editor_callback(&self) -> OnDone {
        let weak = self.self_ref.clone();
        Rc::new(move |outcome: EditorOutcome| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            with_state(&state, |s| {
                match outcome {
                    EditorOutcome::Commit(text) => {
                        s.core.commit_editor(&text);
                    }
                    EditorOutcome::Cancel => s.core.cancel_editor(),
                }
                s.editor.hide();
                let _ = s.host.focus();
                s.render();
            });
        })
    }

    /// Reconcile the DOM with the core after an interaction.
    fn sync(&mut self) {
        let (width, height) = self.core.physical_size();
        self.shadow.set_physical_size(width, height);
        if let Some((left, top)) = self.core.take_scroll_request() {
            self.shadow.scroll_to(left, top);
        }

        let size = self.core.grid_size();
        if self.aria != Some(size) {
            self.aria = Some(size);
            let _ = self
                .host
                .set_attribute("aria-rowcount", &(size.0 + 1).to_string());
            let _ = self.host.set_attribute("aria-colcount", &size.1.to_string());
        }

        match self.core.editor() {
            None if self.editor.target().is_some() => self.editor.hide(),
            Some(session) if self.editor.target() != Some(session.target) => {
                let session = session.clone();
                let on_done = self.editor_callback();
                self.editor
                    .show(&session, self.core.config(), self.shadow.ui_layer(), &on_done);
            }
            _ => {}
        }

        if !self.core.is_gesture_active() {
            if let Some(drag) = &mut self.drag {
                drag.stop();
            }
        }
    }
}

/// Keeps a `requestAnimationFrame` callback re-arming itself.
struct FrameLoop {
    callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    handle: Rc<Cell<Option<i32>>>,
}

fn request_frame(callback: &Closure<dyn FnMut()>) -> Option<i32> {
    web_sys::window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .ok()
}

impl FrameLoop {
    /// Render on each frame while the core is dirty.
    fn start(state: &Shared) -> Self {
        let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::default();
        let handle: Rc<Cell<Option<i32>>> = Rc::default();

        let weak_state = Rc::downgrade(state);
        let weak_callback = Rc::downgrade(&callback);
        let next_handle = Rc::clone(&handle);
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            next_handle.set(None);
            let Some(state) = weak_state.upgrade() else {
                return;
            };
            with_state(&state, |s| {
                if s.core.is_dirty() {
                    s.render();
                }
            });
            if state.try_borrow().is_ok_and(|s| s.destroyed) {
                return;
            }
            if let Some(callback) = weak_callback.upgrade() {
                if let Some(callback) = callback.borrow().as_ref() {
                    next_handle.set(request_frame(callback));
                }
            }
        }) as Box<dyn FnMut()>));

        if let Some(first) = callback.borrow().as_ref() {
            handle.set(request_frame(first));
        }
        Self { callback, handle }
    }

    fn stop(&self) {
        if let (Some(id), Some(window)) = (self.handle.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

/// Install the console logger at `level` ("error" .. "trace").
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging_js(level: &str) -> bool {
    crate::logging::init_logging(level)
}

/// The main grid struct exported to JavaScript
#[wasm_bindgen]
pub struct SciGrid {
    state: Shared,
    hook_fns: Rc<RefCell<HookFns>>,
    outbox: Outbox,
    listeners: Vec<Listener>,
    frame: Option<FrameLoop>,
    resize_observer: Option<ResizeObserver>,
    resize_closure: Option<Closure<dyn FnMut(js_sys::Array)>>,
}

impl SciGrid {
    fn mount(host: HtmlElement, provider: JsValue, config: &JsValue) -> Result<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| GridError::Dom("No document".into()))?;

        let outbox = Outbox::default();
        let event: EventSlot = Rc::default();
        let hook_fns = Rc::new(RefCell::new(HookFns::default()));
        hook_fns.borrow_mut().apply(config);
        let grid_config = GridConfig::from_json(&plain_config(config)?)?;
        let provider = JsProvider::new(provider, outbox.clone())?;

        let canvas = document
            .create_element("canvas")
            .map_err(|_| GridError::Dom("Failed to create canvas".into()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| GridError::Dom("Failed to cast to HtmlCanvasElement".into()))?;
        let mut renderer = CanvasRenderer::new(canvas.clone())?;
        renderer.init()?;
        let measure = CanvasTextMeasure::new(renderer.context().clone());

        let shadow = ScrollShadow::mount(&document, &host, &canvas)?;
        shadow.apply_config(&grid_config);
        host.set_tab_index(0);
        let _ = host.set_attribute("role", "grid");
        let _ = host.set_attribute("aria-label", "Data Grid");
        let host_style = host.style();
        let _ = host_style.set_property("outline", "none");
        let _ = host_style.set_property("user-select", "none");
        let _ = host_style.set_property("-webkit-user-select", "none");

        let hooks = JsHooks::new(Rc::clone(&hook_fns), outbox.clone(), Rc::clone(&event));
        let mut core = GridCore::new(Box::new(provider), grid_config)
            .with_hooks(Box::new(hooks))
            .with_measure(Box::new(measure));
        match LocalStorageStore::open() {
            Ok(store) => core = core.with_store(Box::new(store)),
            Err(err) => tracing::debug!(%err, "grid state will not persist"),
        }

        let container = shadow.container().clone();
        let state = Rc::new(RefCell::new(SharedState {
            core,
            renderer,
            canvas,
            host: host.clone(),
            shadow,
            editor: EditorOverlay::new(),
            menu: MenuPopup::new(),
            drag: None,
            outbox: outbox.clone(),
            cursor: Cursor::Default,
            aria: None,
            self_ref: Weak::new(),
            destroyed: false,
        }));
        state.borrow_mut().self_ref = Rc::downgrade(&state);

        let listeners = events::attach(&state, &host, &container, &event);
        with_state(&state, SharedState::resize);

        let resize_closure = {
            let weak = Rc::downgrade(&state);
            Closure::wrap(Box::new(move |_entries: js_sys::Array| {
                if let Some(state) = weak.upgrade() {
                    with_state(&state, SharedState::resize);
                }
            }) as Box<dyn FnMut(js_sys::Array)>)
        };
        let resize_observer = ResizeObserver::new(resize_closure.as_ref().unchecked_ref()).ok();
        if let Some(observer) = &resize_observer {
            observer.observe(&host);
        }

        let frame = FrameLoop::start(&state);
        {
            let s = state.borrow();
            let (rows, cols) = s.core.grid_size();
            tracing::debug!(rows, cols, "grid mounted");
        }

        Ok(SciGrid {
            state,
            hook_fns,
            outbox,
            listeners,
            frame: Some(frame),
            resize_observer,
            resize_closure: Some(resize_closure),
        })
    }

    fn busy() -> GridError {
        GridError::Other("Grid is busy or destroyed".into())
    }
}

#[wasm_bindgen]
impl SciGrid {
    /// Mount a grid inside `container`.
    ///
    /// `provider` needs `getRowCount`, `getColumnCount`, `getCellData` and
    /// `getHeader`; `setCellData`, `setHeader` and `onRowsNeeded` are
    /// optional. `config` may be omitted.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        provider: JsValue,
        config: JsValue,
    ) -> std::result::Result<SciGrid, JsValue> {
        console_error_panic_hook::set_once();
        Ok(Self::mount(container, provider, &config)?)
    }

    /// Merge a partial config. Callback keys replace the current callbacks.
    #[wasm_bindgen(js_name = updateConfig)]
    pub fn update_config(&mut self, patch: JsValue) -> std::result::Result<(), JsValue> {
        let json = plain_config(&patch)?;
        self.hook_fns.borrow_mut().apply(&patch);
        with_state(&self.state, |s| {
            s.core.update_config(&json)?;
            s.shadow.apply_config(s.core.config());
            Ok::<(), GridError>(())
        })
        .ok_or_else(Self::busy)??;
        Ok(())
    }

    /// Swap the data source. Column order resets and undo history is dropped.
    #[wasm_bindgen(js_name = updateProvider)]
    pub fn update_provider(&mut self, provider: JsValue) -> std::result::Result<(), JsValue> {
        let provider = JsProvider::new(provider, self.outbox.clone())?;
        with_state(&self.state, |s| {
            s.close_menu();
            s.core.update_provider(Box::new(provider));
        })
        .ok_or_else(Self::busy)?;
        Ok(())
    }

    /// Draw immediately instead of on the next frame.
    #[wasm_bindgen(js_name = renderNow)]
    pub fn render_now(&mut self) {
        with_state(&self.state, SharedState::render);
    }

    /// Data changed outside the grid; redraw on the next frame.
    pub fn invalidate(&mut self) {
        with_state(&self.state, |s| s.core.invalidate());
    }

    #[wasm_bindgen(js_name = scrollToCell)]
    pub fn scroll_to_cell(&mut self, row: u32, col: u32) {
        with_state(&self.state, |s| s.core.scroll_to_cell(row, col));
    }

    /// Scroll to virtual pixel offsets.
    #[wasm_bindgen(js_name = setScroll)]
    pub fn set_scroll(&mut self, x: f64, y: f64) {
        with_state(&self.state, |s| s.core.set_scroll(x, y));
    }

    /// `{ mode, ranges, anchorRow, anchorCol }`
    #[wasm_bindgen(js_name = getSelection)]
    pub fn get_selection(&self) -> JsValue {
        with_state(&self.state, |s| to_js(&s.core.selection())).unwrap_or(JsValue::NULL)
    }

    /// Copy the selection to the clipboard and return the copied text.
    #[wasm_bindgen(js_name = copySelection)]
    pub fn copy_selection(&self) -> Option<String> {
        let text = with_state(&self.state, |s| s.core.copy_selection()).flatten()?;
        copy_to_clipboard(&text);
        Some(text)
    }

    /// Paste tab-separated text at the selection anchor. Returns the number
    /// of cells written.
    #[wasm_bindgen(js_name = pasteText)]
    pub fn paste_text(&mut self, text: &str) -> u32 {
        with_state(&self.state, |s| s.core.paste_text(text))
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0)
    }

    /// Displayed rows as CSV, in visual column order.
    #[wasm_bindgen(js_name = exportCsv)]
    pub fn export_csv(&self) -> String {
        with_state(&self.state, |s| s.core.export_csv()).unwrap_or_default()
    }

    /// Offer the CSV export as a file download.
    #[wasm_bindgen(js_name = downloadCsv)]
    pub fn download_csv(&self, file_name: Option<String>) {
        let csv = self.export_csv();
        download_csv(&csv, file_name.as_deref().unwrap_or(EXPORT_FILE_NAME));
    }

    pub fn undo(&mut self) -> bool {
        with_state(&self.state, |s| s.core.undo()).unwrap_or(false)
    }

    pub fn redo(&mut self) -> bool {
        with_state(&self.state, |s| s.core.redo()).unwrap_or(false)
    }

    /// Replace the column filters: `[{ col, operator, value, valueTo? }]`.
    #[wasm_bindgen(js_name = setFilters)]
    pub fn set_filters(&mut self, filters: JsValue) -> std::result::Result<(), JsValue> {
        let filters: Vec<ColumnFilter> =
            serde_wasm_bindgen::from_value(filters).map_err(GridError::from)?;
        with_state(&self.state, |s| s.core.set_filters(filters)).ok_or_else(Self::busy)?;
        Ok(())
    }

    /// Replace the sort keys: `[{ col, order: "asc" | "desc" }]`.
    #[wasm_bindgen(js_name = setSorts)]
    pub fn set_sorts(&mut self, sorts: JsValue) -> std::result::Result<(), JsValue> {
        let sorts: Vec<SortState> = serde_wasm_bindgen::from_value(sorts).map_err(GridError::from)?;
        with_state(&self.state, |s| s.core.set_sorts(sorts)).ok_or_else(Self::busy)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setQuickFilter)]
    pub fn set_quick_filter(&mut self, text: &str) {
        with_state(&self.state, |s| s.core.set_quick_filter(text));
    }

    #[wasm_bindgen(js_name = setGroupBy)]
    pub fn set_group_by(&mut self, col: Option<u32>) {
        with_state(&self.state, |s| s.core.set_group_by(col));
    }

    #[wasm_bindgen(js_name = toggleGroup)]
    pub fn toggle_group(&mut self, key: &str) {
        with_state(&self.state, |s| s.core.toggle_group(key));
    }

    /// Groups of the current view, empty when not grouping.
    #[wasm_bindgen(js_name = getGroups)]
    pub fn get_groups(&self) -> JsValue {
        with_state(&self.state, |s| {
            s.core
                .view()
                .map_or_else(|| js_sys::Array::new().into(), |view| to_js(&view.groups))
        })
        .unwrap_or(JsValue::NULL)
    }

    /// Write column order and widths to `localStorage` now.
    #[wasm_bindgen(js_name = saveState)]
    pub fn save_state(&self) {
        with_state(&self.state, |s| s.core.save_state());
    }

    #[wasm_bindgen(js_name = getColumnWidth)]
    pub fn get_column_width(&self, col: u32) -> f64 {
        with_state(&self.state, |s| s.core.state().columns.width_of(col)).unwrap_or(0.0)
    }

    /// Remove listeners and the grid's DOM. The grid is inert afterwards.
    pub fn destroy(&mut self) {
        if let Some(frame) = self.frame.take() {
            frame.stop();
        }
        if let Some(observer) = self.resize_observer.take() {
            observer.disconnect();
        }
        self.resize_closure = None;
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
        let Ok(mut s) = self.state.try_borrow_mut() else {
            return;
        };
        if s.destroyed {
            return;
        }
        s.destroyed = true;
        s.menu.close();
        s.editor.hide();
        if let Some(drag) = &mut s.drag {
            drag.stop();
        }
        s.shadow.unmount();
        tracing::debug!("grid destroyed");
    }
}

impl Drop for SciGrid {
    fn drop(&mut self) {
        self.destroy();
    }
}
