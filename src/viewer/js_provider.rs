//! A JS provider object behind [`DataGridProvider`].

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::hooks::{to_js, Outbox};
use crate::error::{GridError, Result};
use crate::provider::DataGridProvider;
use crate::types::{CellValue, ColumnHeader};

pub(crate) struct JsProvider {
    target: JsValue,
    get_row_count: Function,
    get_column_count: Function,
    get_cell_data: Function,
    get_header: Function,
    set_cell_data: Option<Function>,
    set_header: Option<Function>,
    on_rows_needed: Option<Function>,
    outbox: Outbox,
}

fn method(target: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

fn required(target: &JsValue, name: &str) -> Result<Function> {
    method(target, name).ok_or_else(|| GridError::Provider(format!("provider has no {name}()")))
}

/// Non-negative whole count from a JS number; anything else is zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_count(value: &JsValue) -> usize {
    match value.as_f64() {
        Some(n) if n.is_finite() && n > 0.0 => n.floor().min(f64::from(u32::MAX)) as usize,
        _ => 0,
    }
}

impl JsProvider {
    pub(crate) fn new(target: JsValue, outbox: Outbox) -> Result<Self> {
        if !target.is_object() {
            return Err(GridError::Provider("provider must be an object".into()));
        }
        Ok(Self {
            get_row_count: required(&target, "getRowCount")?,
            get_column_count: required(&target, "getColumnCount")?,
            get_cell_data: required(&target, "getCellData")?,
            get_header: required(&target, "getHeader")?,
            set_cell_data: method(&target, "setCellData"),
            set_header: method(&target, "setHeader"),
            on_rows_needed: method(&target, "onRowsNeeded"),
            target,
            outbox,
        })
    }
}

impl DataGridProvider for JsProvider {
    fn row_count(&self) -> usize {
        self.get_row_count
            .call0(&self.target)
            .map_or(0, |v| to_count(&v))
    }

    fn column_count(&self) -> usize {
        self.get_column_count
            .call0(&self.target)
            .map_or(0, |v| to_count(&v))
    }

    fn cell_data(&self, row: u32, col: u32) -> CellValue {
        self.get_cell_data
            .call2(&self.target, &row.into(), &col.into())
            .ok()
            .and_then(|v| serde_wasm_bindgen::from_value(v).ok())
            .unwrap_or_default()
    }

    fn header(&self, col: u32) -> ColumnHeader {
        match self.get_header.call1(&self.target, &col.into()) {
            Ok(value) => serde_wasm_bindgen::from_value(value).unwrap_or_else(|err| {
                tracing::debug!(col, %err, "unreadable header");
                ColumnHeader::default()
            }),
            Err(_) => ColumnHeader::default(),
        }
    }

    fn can_edit_cells(&self) -> bool {
        self.set_cell_data.is_some()
    }

    fn set_cell_data(&mut self, row: u32, col: u32, value: CellValue) {
        let Some(func) = &self.set_cell_data else {
            return;
        };
        let args = Array::of3(&row.into(), &col.into(), &to_js(&value));
        if let Err(err) = func.apply(&self.target, &args) {
            tracing::warn!(row, col, "setCellData threw: {err:?}");
        }
    }

    fn can_edit_headers(&self) -> bool {
        self.set_header.is_some()
    }

    fn set_header(&mut self, col: u32, header: ColumnHeader) {
        let Some(func) = &self.set_header else {
            return;
        };
        if let Err(err) = func.call2(&self.target, &col.into(), &to_js(&header)) {
            tracing::warn!(col, "setHeader threw: {err:?}");
        }
    }

    fn on_rows_needed(&mut self, start: u32, end: u32) {
        if let Some(func) = &self.on_rows_needed {
            let bound = func.bind(&self.target);
            self.outbox.post(&bound, Array::of2(&start.into(), &end.into()));
        }
    }
}
