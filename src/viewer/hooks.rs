//! JS config callbacks as [`GridHooks`], plus `localStorage` persistence.
//!
//! Notification callbacks (`onSelectionChange`, `onSort`, `onShortcut`,
//! `onCellEdit`, `onRowsNeeded`, menu actions) are queued in an [`Outbox`]
//! and delivered once the grid has released its state, so a host may call
//! back into the grid from them. Callbacks whose result the grid needs
//! (context-menu suppression, menu items, validators) run synchronously.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use js_sys::{Array, Function, Object, Reflect};
use serde::Serialize;
use serde_json::{json, Map, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, Storage};

use crate::context_menu::{ContextMenuContext, MenuEntry};
use crate::data::StateStore;
use crate::error::{GridError, Result};
use crate::grid::{CellEditEvent, GridHooks};
use crate::types::{CellValue, SelectionInfo, SortOrder};

/// Config keys that hold functions rather than options.
const CALLBACK_KEYS: [&str; 9] = [
    "onSelectionChange",
    "onSort",
    "onContextMenu",
    "onHeaderContextMenu",
    "onRowNumberContextMenu",
    "getContextMenuItems",
    "onShortcut",
    "onCellEdit",
    "validators",
];

/// Deferred host calls, delivered in order by [`Outbox::flush`].
#[derive(Clone, Default)]
pub(crate) struct Outbox {
    queue: Rc<RefCell<Vec<(Function, Array)>>>,
}

impl Outbox {
    pub(crate) fn post(&self, func: &Function, args: Array) {
        self.queue.borrow_mut().push((func.clone(), args));
    }

    pub(crate) fn flush(&self) {
        loop {
            let batch = std::mem::take(&mut *self.queue.borrow_mut());
            if batch.is_empty() {
                return;
            }
            for (func, args) in batch {
                if let Err(err) = func.apply(&JsValue::NULL, &args) {
                    tracing::warn!("host callback threw: {err:?}");
                }
            }
        }
    }
}

/// The DOM event being dispatched, handed to callbacks that take one.
pub(crate) type EventSlot = Rc<RefCell<Option<Event>>>;

/// Callback functions read from the JS config object.
#[derive(Default)]
pub(crate) struct HookFns {
    on_selection_change: Option<Function>,
    on_sort: Option<Function>,
    on_context_menu: Option<Function>,
    on_header_context_menu: Option<Function>,
    on_row_number_context_menu: Option<Function>,
    get_context_menu_items: Option<Function>,
    on_shortcut: Option<Function>,
    on_cell_edit: Option<Function>,
    /// `{ [col]: (value, row, col) => true | string }`
    validators: Option<Object>,
}

impl HookFns {
    /// Replace the callbacks present in `config`; absent keys are kept.
    pub(crate) fn apply(&mut self, config: &JsValue) {
        if !config.is_object() {
            return;
        }
        for key in CALLBACK_KEYS {
            let key_js = JsValue::from_str(key);
            if !Reflect::has(config, &key_js).unwrap_or(false) {
                continue;
            }
            let value = Reflect::get(config, &key_js).unwrap_or(JsValue::UNDEFINED);
            let func = value.dyn_ref::<Function>().cloned();
            match key {
                "onSelectionChange" => self.on_selection_change = func,
                "onSort" => self.on_sort = func,
                "onContextMenu" => self.on_context_menu = func,
                "onHeaderContextMenu" => self.on_header_context_menu = func,
                "onRowNumberContextMenu" => self.on_row_number_context_menu = func,
                "getContextMenuItems" => self.get_context_menu_items = func,
                "onShortcut" => self.on_shortcut = func,
                "onCellEdit" => self.on_cell_edit = func,
                _ => self.validators = value.dyn_into::<Object>().ok(),
            }
        }
    }
}

/// Plain options of a JS config object as JSON, skipping callbacks.
pub(crate) fn plain_config(config: &JsValue) -> Result<Value> {
    let mut out = Map::new();
    if !config.is_object() {
        return Ok(Value::Object(out));
    }
    for entry in Object::entries(config.unchecked_ref::<Object>()).iter() {
        let pair: Array = entry.unchecked_into();
        let Some(key) = pair.get(0).as_string() else {
            continue;
        };
        let value = pair.get(1);
        if value.is_function() || CALLBACK_KEYS.contains(&key.as_str()) {
            continue;
        }
        let value: Value = serde_wasm_bindgen::from_value(value)?;
        out.insert(key, value);
    }
    Ok(Value::Object(out))
}

/// Serialize for JS as plain objects (maps become objects, `None` is null).
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::UNDEFINED)
}

pub(crate) struct JsHooks {
    fns: Rc<RefCell<HookFns>>,
    /// Actions of the host's last menu, by item id
    menu_actions: HashMap<String, Function>,
    outbox: Outbox,
    event: EventSlot,
}

impl JsHooks {
    pub(crate) fn new(fns: Rc<RefCell<HookFns>>, outbox: Outbox, event: EventSlot) -> Self {
        Self {
            fns,
            menu_actions: HashMap::new(),
            outbox,
            event,
        }
    }

    fn event_arg(&self) -> JsValue {
        self.event
            .borrow()
            .as_ref()
            .map_or(JsValue::UNDEFINED, |e| e.clone().into())
    }

    fn default_prevented(&self) -> bool {
        self.event
            .borrow()
            .as_ref()
            .is_some_and(Event::default_prevented)
    }

    /// Run a context-menu callback; `true` or `preventDefault()` suppresses
    /// the built-in menu.
    fn suppresses(&self, func: Option<Function>, args: &Array) -> bool {
        let Some(func) = func else {
            return false;
        };
        args.push(&self.event_arg());
        match func.apply(&JsValue::NULL, args) {
            Ok(result) => result.as_bool() == Some(true) || self.default_prevented(),
            Err(err) => {
                tracing::warn!("context menu callback threw: {err:?}");
                false
            }
        }
    }
}

impl GridHooks for JsHooks {
    fn on_selection_change(&mut self, info: &SelectionInfo) {
        if let Some(func) = self.fns.borrow().on_selection_change.as_ref() {
            self.outbox.post(func, Array::of1(&to_js(info)));
        }
    }

    fn on_sort(&mut self, col: u32, order: Option<SortOrder>) {
        if let Some(func) = self.fns.borrow().on_sort.as_ref() {
            let order = match order {
                Some(SortOrder::Asc) => JsValue::from_str("asc"),
                Some(SortOrder::Desc) => JsValue::from_str("desc"),
                None => JsValue::NULL,
            };
            self.outbox.post(func, Array::of2(&col.into(), &order));
        }
    }

    fn on_context_menu(&mut self, row: u32, col: u32) -> bool {
        let func = self.fns.borrow().on_context_menu.clone();
        self.suppresses(func, &Array::of2(&row.into(), &col.into()))
    }

    fn on_header_context_menu(&mut self, col: u32) -> bool {
        let func = self.fns.borrow().on_header_context_menu.clone();
        self.suppresses(func, &Array::of1(&col.into()))
    }

    fn on_row_number_context_menu(&mut self, row: u32) -> bool {
        let func = self.fns.borrow().on_row_number_context_menu.clone();
        self.suppresses(func, &Array::of1(&row.into()))
    }

    fn context_menu_items(
        &mut self,
        defaults: Vec<MenuEntry>,
        context: &ContextMenuContext,
    ) -> Vec<MenuEntry> {
        self.menu_actions.clear();
        let Some(func) = self.fns.borrow().get_context_menu_items.clone() else {
            return defaults;
        };
        let defaults_js: Array = defaults.iter().map(|e| to_js(&e.to_json())).collect();
        let result = match func.call2(&JsValue::NULL, &defaults_js, &to_js(context)) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!("getContextMenuItems threw: {err:?}");
                return defaults;
            }
        };
        let Some(items) = result.dyn_ref::<Array>() else {
            return defaults;
        };
        items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| {
                let fallback = format!("item-{i}");
                let value = entry_json(&item, &fallback, &mut self.menu_actions)?;
                MenuEntry::from_json(&value, &fallback)
            })
            .collect()
    }

    fn on_menu_action(&mut self, id: &str, context: &ContextMenuContext) -> bool {
        let Some(action) = self.menu_actions.get(id) else {
            return false;
        };
        self.outbox.post(action, Array::of1(&to_js(context)));
        true
    }

    fn on_shortcut(&mut self, action: &str) {
        if let Some(func) = self.fns.borrow().on_shortcut.as_ref() {
            self.outbox
                .post(func, Array::of2(&JsValue::from_str(action), &self.event_arg()));
        }
    }

    fn on_cell_edit(&mut self, event: &CellEditEvent) {
        if let Some(func) = self.fns.borrow().on_cell_edit.as_ref() {
            self.outbox.post(func, Array::of1(&to_js(event)));
        }
    }

    fn validate(&mut self, col: u32, value: &CellValue, row: u32) -> std::result::Result<(), String> {
        let Some(validator) = self
            .fns
            .borrow()
            .validators
            .as_ref()
            .and_then(|v| Reflect::get(v, &JsValue::from(col)).ok())
            .and_then(|f| f.dyn_into::<Function>().ok())
        else {
            return Ok(());
        };
        match validator.call3(&JsValue::NULL, &to_js(value), &row.into(), &col.into()) {
            Ok(result) if result.is_undefined() || result.as_bool() == Some(true) => Ok(()),
            Ok(result) => Err(result
                .as_string()
                .unwrap_or_else(|| "Invalid value".to_string())),
            Err(err) => Err(format!("{err:?}")),
        }
    }
}

/// Read one host menu entry into the JSON shape [`MenuEntry::from_json`]
/// accepts, registering item actions under their resolved ids.
fn entry_json(
    item: &JsValue,
    fallback_id: &str,
    actions: &mut HashMap<String, Function>,
) -> Option<Value> {
    if let Some(text) = item.as_string() {
        return Some(Value::String(text));
    }
    if !item.is_object() {
        return None;
    }
    let get = |key: &str| Reflect::get(item, &JsValue::from_str(key)).ok();
    let text = |key: &str| get(key).and_then(|v| v.as_string());
    let flag = |key: &str| get(key).and_then(|v| v.as_bool()).unwrap_or(false);

    let label = text("label")?;
    if text("type").as_deref() == Some("section") {
        return Some(json!({ "type": "section", "label": label }));
    }
    let id = text("id").unwrap_or_else(|| fallback_id.to_string());
    if let Some(action) = get("action").and_then(|a| a.dyn_into::<Function>().ok()) {
        actions.insert(id.clone(), action);
    }
    let children: Vec<Value> = get("children")
        .and_then(|c| c.dyn_into::<Array>().ok())
        .map(|list| {
            list.iter()
                .enumerate()
                .filter_map(|(i, child)| entry_json(&child, &format!("{id}.{i}"), actions))
                .collect()
        })
        .unwrap_or_default();

    Some(json!({
        "id": id,
        "label": label,
        "icon": text("icon"),
        "disabled": flag("disabled"),
        "checked": flag("checked"),
        "shortcut": text("shortcut"),
        "children": children,
    }))
}

/// Browser `localStorage`.
pub(crate) struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub(crate) fn open() -> Result<Self> {
        let storage = web_sys::window()
            .ok_or_else(|| GridError::Dom("No window".into()))?
            .local_storage()
            .map_err(|_| GridError::Dom("localStorage is not accessible".into()))?
            .ok_or_else(|| GridError::Dom("localStorage is not available".into()))?;
        Ok(Self { storage })
    }
}

impl StateStore for LocalStorageStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) {
        if self.storage.set_item(key, value).is_err() {
            tracing::warn!(key, "failed to persist grid state");
        }
    }
}
