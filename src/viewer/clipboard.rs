//! Clipboard writes and CSV downloads.

use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

/// File name offered for grid exports.
pub(crate) const EXPORT_FILE_NAME: &str = "export.csv";

/// Write `text` to the system clipboard. Failures are ignored.
pub(crate) fn copy_to_clipboard(text: &str) {
    if let Some(window) = web_sys::window() {
        let clipboard = window.navigator().clipboard();
        let _ = clipboard.write_text(text);
    }
}

/// Offer `csv` as a file download through a temporary link.
pub(crate) fn download_csv(csv: &str, file_name: &str) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(body) = document.body() else {
        return;
    };
    let Some(link) = document
        .create_element("a")
        .ok()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    let encoded = String::from(js_sys::encode_uri_component(csv));
    let _ = link.set_attribute("href", &format!("data:text/csv;charset=utf-8,{encoded}"));
    let _ = link.set_attribute("download", file_name);
    let _ = link.style().set_property("display", "none");
    let _ = body.append_child(&link);
    link.click();
    link.remove();
    tracing::debug!(bytes = csv.len(), file_name, "csv download offered");
}
