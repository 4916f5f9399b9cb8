//! Native scrollbars for the canvas.
//!
//! A transparent scroll container sits on top of the canvas with a spacer
//! sized to the physical content extent. The canvas stays viewport-sized
//! behind it and is redrawn from the container's scroll offsets, mapped
//! back to virtual pixels by `ScrollBridge`.

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCanvasElement, HtmlDivElement, HtmlElement};

use crate::error::{GridError, Result};
use crate::types::GridConfig;

const DEFAULT_THUMB: &str = "rgba(155, 155, 155, 0.5)";
const DEFAULT_TRACK: &str = "transparent";

fn read_f64(element: &HtmlDivElement, name: &str) -> f64 {
    Reflect::get(element.as_ref(), &JsValue::from_str(name))
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

fn create_div(document: &Document) -> Result<HtmlDivElement> {
    document
        .create_element("div")
        .map_err(|_| GridError::Dom("Failed to create div".into()))?
        .dyn_into::<HtmlDivElement>()
        .map_err(|_| GridError::Dom("Failed to cast to HtmlDivElement".into()))
}

fn set_styles(element: &HtmlElement, styles: &[(&str, &str)]) {
    let style = element.style();
    for (name, value) in styles {
        let _ = style.set_property(name, value);
    }
}

pub(crate) struct ScrollShadow {
    /// Fills the host; parent of everything below
    wrapper: HtmlDivElement,
    container: HtmlDivElement,
    spacer: HtmlDivElement,
    /// Editors and other DOM overlays
    ui_layer: HtmlDivElement,
    style: Option<Element>,
    class_name: String,
    physical: (f64, f64),
}

impl ScrollShadow {
    /// Build the layers inside `host` around `canvas`.
    pub(crate) fn mount(
        document: &Document,
        host: &HtmlElement,
        canvas: &HtmlCanvasElement,
    ) -> Result<Self> {
        let wrapper = create_div(document)?;
        let container = create_div(document)?;
        let spacer = create_div(document)?;
        let ui_layer = create_div(document)?;

        if host
            .style()
            .get_property_value("position")
            .unwrap_or_default()
            .is_empty()
        {
            let _ = host.style().set_property("position", "relative");
        }

        set_styles(
            &wrapper,
            &[
                ("position", "absolute"),
                ("top", "0"),
                ("left", "0"),
                ("width", "100%"),
                ("height", "100%"),
                ("overflow", "hidden"),
            ],
        );
        set_styles(
            canvas,
            &[
                ("position", "absolute"),
                ("top", "0"),
                ("left", "0"),
                ("display", "block"),
                ("pointer-events", "none"),
                ("z-index", "0"),
            ],
        );
        set_styles(
            &container,
            &[
                ("position", "absolute"),
                ("top", "0"),
                ("left", "0"),
                ("width", "100%"),
                ("height", "100%"),
                ("overflow", "auto"),
                ("z-index", "1"),
                ("background", "transparent"),
            ],
        );
        let _ = container.set_attribute("data-scigrid-scroll", "");
        set_styles(
            &spacer,
            &[
                ("position", "absolute"),
                ("top", "0"),
                ("left", "0"),
                ("width", "1px"),
                ("height", "1px"),
                ("pointer-events", "none"),
            ],
        );
        set_styles(
            &ui_layer,
            &[
                ("position", "absolute"),
                ("top", "0"),
                ("left", "0"),
                ("width", "0"),
                ("height", "0"),
                ("overflow", "visible"),
                ("z-index", "2"),
                ("pointer-events", "none"),
            ],
        );

        let suffix = (js_sys::Math::random() * 1e9).floor();
        let class_name = format!("scigrid-scroll-{suffix}");
        container.set_class_name(&class_name);
        let style = document.create_element("style").ok();

        let _ = container.append_child(&spacer);
        let _ = wrapper.append_child(canvas);
        let _ = wrapper.append_child(&container);
        let _ = wrapper.append_child(&ui_layer);
        if let Some(style) = &style {
            let _ = wrapper.append_child(style);
        }
        host.append_child(&wrapper)
            .map_err(|_| GridError::Dom("Failed to attach grid to container".into()))?;

        let shadow = Self {
            wrapper,
            container,
            spacer,
            ui_layer,
            style,
            class_name,
            physical: (0.0, 0.0),
        };
        shadow.apply_scrollbar_style(None, None);
        Ok(shadow)
    }

    /// Scrolling element; receives all pointer input.
    pub(crate) fn container(&self) -> &HtmlDivElement {
        &self.container
    }

    pub(crate) fn ui_layer(&self) -> &HtmlElement {
        &self.ui_layer
    }

    /// Client area (excluding scrollbars) in CSS pixels.
    pub(crate) fn viewport_size(&self) -> (f64, f64) {
        (
            f64::from(self.container.client_width()),
            f64::from(self.container.client_height()),
        )
    }

    /// Current native scroll offsets.
    pub(crate) fn offsets(&self) -> (f64, f64) {
        (
            read_f64(&self.container, "scrollLeft"),
            read_f64(&self.container, "scrollTop"),
        )
    }

    pub(crate) fn scroll_to(&self, left: f64, top: f64) {
        self.container.set_scroll_left(to_px(left));
        self.container.set_scroll_top(to_px(top));
    }

    /// Size the spacer; unchanged sizes don't touch the DOM.
    pub(crate) fn set_physical_size(&mut self, width: f64, height: f64) {
        let (old_width, old_height) = self.physical;
        if (old_width - width).abs() < 0.5 && (old_height - height).abs() < 0.5 {
            return;
        }
        self.physical = (width, height);
        let style = self.spacer.style();
        let _ = style.set_property("width", &format!("{width}px"));
        let _ = style.set_property("height", &format!("{height}px"));
    }

    pub(crate) fn apply_config(&self, config: &GridConfig) {
        self.apply_scrollbar_style(
            config.scrollbar_thumb_color.as_deref(),
            config.scrollbar_color.as_deref(),
        );
    }

    fn apply_scrollbar_style(&self, thumb: Option<&str>, track: Option<&str>) {
        let Some(style) = &self.style else {
            return;
        };
        let thumb = thumb.unwrap_or(DEFAULT_THUMB);
        let track = track.unwrap_or(DEFAULT_TRACK);
        let class = &self.class_name;
        style.set_text_content(Some(&format!(
            ".{class} {{ scrollbar-width: thin; scrollbar-color: {thumb} {track}; }}\n\
             .{class}::-webkit-scrollbar {{ width: 10px; height: 10px; }}\n\
             .{class}::-webkit-scrollbar-track {{ background: {track}; }}\n\
             .{class}::-webkit-scrollbar-thumb {{ background-color: {thumb}; border-radius: 6px; \
             border: 2px solid {track}; background-clip: content-box; }}\n\
             .{class}::-webkit-scrollbar-corner {{ background: {track}; }}"
        )));
    }

    /// Detach every layer from the host.
    pub(crate) fn unmount(&self) {
        self.wrapper.remove();
    }
}

/// Whole pixels for `scrollLeft`/`scrollTop`.
#[allow(clippy::cast_possible_truncation)]
fn to_px(value: f64) -> i32 {
    if value.is_finite() {
        value.round().clamp(0.0, f64::from(i32::MAX)) as i32
    } else {
        0
    }
}
