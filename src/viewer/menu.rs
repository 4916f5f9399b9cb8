//! DOM popup for context menus.

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, Node};

use crate::context_menu::{ContextMenuItem, MenuEntry};
use crate::types::GridConfig;

const ITEM_HOVER: &str = "rgba(79, 172, 254, 0.2)";
const MIN_WIDTH: &str = "160px";

/// Receives the id of the chosen item.
pub(crate) type OnPick = Rc<dyn Fn(String)>;

pub(crate) struct MenuPopup {
    element: Option<HtmlElement>,
    closures: Vec<Closure<dyn FnMut(Event)>>,
    /// Closures of the previous popup; a click handler may still be running
    /// when the popup closes.
    retired: Vec<Closure<dyn FnMut(Event)>>,
}

impl MenuPopup {
    pub(crate) fn new() -> Self {
        Self {
            element: None,
            closures: Vec::new(),
            retired: Vec::new(),
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.element.is_some()
    }

    /// Whether `node` is inside the open popup.
    pub(crate) fn contains(&self, node: Option<&Node>) -> bool {
        self.element.as_ref().is_some_and(|el| el.contains(node))
    }

    /// Open at client coordinates `(x, y)`, flipped to stay on screen.
    pub(crate) fn show(
        &mut self,
        x: f64,
        y: f64,
        entries: &[MenuEntry],
        config: &GridConfig,
        on_pick: &OnPick,
    ) {
        self.close();
        self.retired.clear();
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(body) = document.body() else {
            return;
        };
        let Some(menu) = self.build_list(&document, entries, config, on_pick) else {
            return;
        };

        let style = menu.style();
        let _ = style.set_property("position", "fixed");
        let _ = style.set_property("left", &format!("{x}px"));
        let _ = style.set_property("top", &format!("{y}px"));
        let _ = style.set_property("z-index", "2000");
        let _ = body.append_child(&menu);

        let rect = menu.get_bounding_client_rect();
        let inner = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
            v.ok().and_then(|v| v.as_f64()).unwrap_or(f64::INFINITY)
        };
        if rect.right() > inner(window.inner_width()) {
            let _ = style.set_property("left", &format!("{}px", x - rect.width()));
        }
        if rect.bottom() > inner(window.inner_height()) {
            let _ = style.set_property("top", &format!("{}px", y - rect.height()));
        }
        self.element = Some(menu);
    }

    fn build_list(
        &mut self,
        document: &Document,
        entries: &[MenuEntry],
        config: &GridConfig,
        on_pick: &OnPick,
    ) -> Option<HtmlElement> {
        let list = create(document)?;
        let _ = list.set_attribute("role", "menu");
        let style = list.style();
        let _ = style.set_property("background-color", &config.header_background);
        let _ = style.set_property("color", &config.header_text_color);
        let _ = style.set_property("border", &format!("1px solid {}", config.grid_line_color));
        let _ = style.set_property("box-shadow", "0 4px 15px rgba(0,0,0,0.25)");
        let _ = style.set_property("border-radius", "6px");
        let _ = style.set_property("padding", "4px 0");
        let _ = style.set_property("min-width", MIN_WIDTH);
        let _ = style.set_property("font", &config.font);
        let _ = style.set_property("user-select", "none");

        for entry in entries {
            let row = match entry {
                MenuEntry::Divider => {
                    let div = create(document)?;
                    let _ = div.style().set_property("height", "1px");
                    let _ = div
                        .style()
                        .set_property("background-color", &config.grid_line_color);
                    let _ = div.style().set_property("margin", "4px 0");
                    div
                }
                MenuEntry::Section(label) => {
                    let div = create(document)?;
                    div.set_text_content(Some(label));
                    let _ = div.style().set_property("padding", "6px 16px 2px");
                    let _ = div.style().set_property("font-weight", "bold");
                    let _ = div.style().set_property("opacity", "0.6");
                    div
                }
                MenuEntry::Item(item) => self.build_item(document, item, config, on_pick)?,
            };
            let _ = list.append_child(&row);
        }
        Some(list)
    }

    fn build_item(
        &mut self,
        document: &Document,
        item: &ContextMenuItem,
        config: &GridConfig,
        on_pick: &OnPick,
    ) -> Option<HtmlElement> {
        let row = create(document)?;
        let _ = row.set_attribute("role", "menuitem");
        let style = row.style();
        let _ = style.set_property("display", "flex");
        let _ = style.set_property("gap", "16px");
        let _ = style.set_property("padding", "8px 16px");
        let _ = style.set_property("position", "relative");
        let _ = style.set_property("cursor", if item.disabled { "default" } else { "pointer" });
        if item.disabled {
            let _ = style.set_property("opacity", "0.4");
            let _ = row.set_attribute("aria-disabled", "true");
        }

        let label = create(document)?;
        let mut text = String::new();
        if item.checked {
            text.push_str("✓ ");
        }
        if let Some(icon) = &item.icon {
            text.push_str(icon);
            text.push(' ');
        }
        text.push_str(&item.label);
        label.set_text_content(Some(&text));
        let _ = label.style().set_property("flex", "1");
        let _ = row.append_child(&label);

        let hint = match (&item.shortcut, item.children.is_empty()) {
            (_, false) => Some("▸"),
            (Some(shortcut), true) => Some(shortcut.as_str()),
            (None, true) => None,
        };
        if let Some(hint) = hint {
            let span = create(document)?;
            span.set_text_content(Some(hint));
            let _ = span.style().set_property("opacity", "0.6");
            let _ = row.append_child(&span);
        }

        let submenu = if item.children.is_empty() {
            None
        } else {
            let sub = self.build_list(document, &item.children, config, on_pick)?;
            let sub_style = sub.style();
            let _ = sub_style.set_property("position", "absolute");
            let _ = sub_style.set_property("left", "100%");
            let _ = sub_style.set_property("top", "0");
            let _ = sub_style.set_property("display", "none");
            let _ = row.append_child(&sub);
            Some(sub)
        };

        {
            let hovered = row.clone();
            let sub = submenu.clone();
            let disabled = item.disabled;
            self.listen(&row, "mouseenter", move |_event: Event| {
                if !disabled {
                    let _ = hovered.style().set_property("background-color", ITEM_HOVER);
                }
                if let Some(sub) = &sub {
                    let _ = sub.style().set_property("display", "block");
                }
            });
        }
        {
            let left = row.clone();
            let sub = submenu;
            self.listen(&row, "mouseleave", move |_event: Event| {
                let _ = left.style().set_property("background-color", "transparent");
                if let Some(sub) = &sub {
                    let _ = sub.style().set_property("display", "none");
                }
            });
        }
        if !item.disabled && item.children.is_empty() {
            let on_pick = Rc::clone(on_pick);
            let id = item.id.clone();
            self.listen(&row, "click", move |event: Event| {
                event.stop_propagation();
                on_pick(id.clone());
            });
        }
        Some(row)
    }

    fn listen(&mut self, element: &HtmlElement, name: &str, handler: impl FnMut(Event) + 'static) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        element
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            .ok();
        self.closures.push(closure);
    }

    pub(crate) fn close(&mut self) {
        self.retired.append(&mut self.closures);
        if let Some(element) = self.element.take() {
            element.remove();
        }
    }
}

impl Drop for MenuPopup {
    fn drop(&mut self) {
        if let Some(element) = self.element.take() {
            element.remove();
        }
    }
}

fn create(document: &Document) -> Option<HtmlElement> {
    document
        .create_element("div")
        .ok()?
        .dyn_into::<HtmlElement>()
        .ok()
}
