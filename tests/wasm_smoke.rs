//! Browser smoke tests for the mounted grid.
//!
//! Run with: wasm-pack test --headless --chrome

#![cfg(target_arch = "wasm32")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::HtmlElement;

use scigrid::SciGrid;

wasm_bindgen_test_configure!(run_in_browser);

fn host() -> HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let div = document
        .create_element("div")
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    div.style().set_property("width", "400px").unwrap();
    div.style().set_property("height", "300px").unwrap();
    document.body().unwrap().append_child(&div).unwrap();
    div
}

fn set(target: &Object, key: &str, value: &JsValue) {
    Reflect::set(target, &JsValue::from_str(key), value).unwrap();
}

/// 2x2 provider returning `"{row}-{col}"`.
fn provider() -> JsValue {
    let provider = Object::new();
    set(&provider, "getRowCount", &Function::new_no_args("return 2;"));
    set(&provider, "getColumnCount", &Function::new_no_args("return 2;"));
    set(
        &provider,
        "getCellData",
        &Function::new_with_args("r, c", "return r + '-' + c;"),
    );
    set(
        &provider,
        "getHeader",
        &Function::new_with_args("c", "return { name: 'Col ' + c };"),
    );
    provider.into()
}

#[wasm_bindgen_test]
fn test_mount_export_and_destroy() {
    let host = host();
    let mut grid = SciGrid::new(host.clone(), provider(), JsValue::UNDEFINED).unwrap();
    assert_eq!(host.get_attribute("role").as_deref(), Some("grid"));
    assert_eq!(
        grid.export_csv(),
        "\"Col 0\",\"Col 1\"\n\"0-0\",\"0-1\"\n\"1-0\",\"1-1\"\n"
    );

    grid.scroll_to_cell(1, 1);
    grid.render_now();
    grid.destroy();
    grid.destroy();
    assert_eq!(grid.export_csv(), "");
}

#[wasm_bindgen_test]
fn test_provider_without_required_methods_is_rejected() {
    let incomplete = Object::new();
    set(&incomplete, "getRowCount", &Function::new_no_args("return 1;"));
    assert!(SciGrid::new(host(), incomplete.into(), JsValue::UNDEFINED).is_err());
}

#[wasm_bindgen_test]
fn test_bad_config_patch_is_an_error() {
    let mut grid = SciGrid::new(host(), provider(), JsValue::UNDEFINED).unwrap();
    let patch = Object::new();
    set(&patch, "rowHeight", &JsValue::from_str("tall"));
    assert!(grid.update_config(patch.into()).is_err());
    grid.destroy();
}
