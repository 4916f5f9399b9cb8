//! DOM overlay mirroring the open [`EditorSession`].
//!
//! Text sessions get an `<input>` positioned over the cell or header band;
//! select sessions get a focusable box with a dropdown list of options.
//! Enter or blur commits, Escape cancels, picking an option commits it.

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, HtmlInputElement, KeyboardEvent};

use super::{EditTarget, EditorKind, EditorSession};
use crate::types::GridConfig;

const BORDER: &str = "2px solid #4facfe";
const OPTION_HOVER: &str = "rgba(79, 172, 254, 0.2)";

/// How an overlay closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EditorOutcome {
    Commit(String),
    Cancel,
}

/// Receives the outcome of the shown editor.
pub(crate) type OnDone = Rc<dyn Fn(EditorOutcome)>;

pub(crate) struct EditorOverlay {
    element: Option<HtmlElement>,
    input: Option<HtmlInputElement>,
    target: Option<EditTarget>,
    closures: Vec<Closure<dyn FnMut(Event)>>,
    /// Closures of the previous editor; one may still be on the call stack
    /// when the editor is hidden.
    retired: Vec<Closure<dyn FnMut(Event)>>,
}

impl EditorOverlay {
    pub(crate) fn new() -> Self {
        Self {
            element: None,
            input: None,
            target: None,
            closures: Vec::new(),
            retired: Vec::new(),
        }
    }

    /// Target of the editor currently shown.
    pub(crate) fn target(&self) -> Option<EditTarget> {
        self.target
    }

    /// Text of a shown `<input>`; `None` for select editors.
    pub(crate) fn text_value(&self) -> Option<String> {
        self.input.as_ref().map(HtmlInputElement::value)
    }

    pub(crate) fn show(
        &mut self,
        session: &EditorSession,
        config: &GridConfig,
        parent: &HtmlElement,
        on_done: &OnDone,
    ) {
        self.hide();
        self.retired.clear();
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let shown = match &session.kind {
            EditorKind::Text => self.build_text(&document, session, config, on_done),
            EditorKind::Select(options) => {
                self.build_select(&document, session, options, config, on_done)
            }
        };
        let Some(element) = shown else {
            return;
        };

        let style = element.style();
        let rect = session.rect;
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("left", &format!("{}px", rect.x));
        let _ = style.set_property("top", &format!("{}px", rect.y));
        let _ = style.set_property("width", &format!("{}px", rect.width));
        let _ = style.set_property("height", &format!("{}px", rect.height));
        let _ = style.set_property("box-sizing", "border-box");
        let _ = style.set_property("pointer-events", "auto");
        let _ = style.set_property("z-index", "100");

        let _ = parent.append_child(&element);
        let _ = element.focus();
        if let Some(input) = &self.input {
            input.select();
        }
        self.target = Some(session.target);
        self.element = Some(element);
    }

    fn build_text(
        &mut self,
        document: &Document,
        session: &EditorSession,
        config: &GridConfig,
        on_done: &OnDone,
    ) -> Option<HtmlElement> {
        let input = document
            .create_element("input")
            .ok()?
            .dyn_into::<HtmlInputElement>()
            .ok()?;
        input.set_type("text");
        input.set_value(&session.initial_value);

        let header = matches!(session.target, EditTarget::Header { .. });
        let (background, color, font) = if header {
            (&config.header_background, &config.header_text_color, &config.header_font)
        } else {
            (&config.background_color, &config.text_color, &config.font)
        };
        let style = input.style();
        let _ = style.set_property("border", BORDER);
        let _ = style.set_property("outline", "none");
        let _ = style.set_property("border-radius", "2px");
        let _ = style.set_property("padding", &format!("0 {}px", config.cell_padding));
        let _ = style.set_property("background-color", background);
        let _ = style.set_property("color", color);
        let _ = style.set_property("font", font);
        let _ = style.set_property("box-shadow", "0 2px 8px rgba(0,0,0,0.15)");

        {
            let on_done = Rc::clone(on_done);
            let field = input.clone();
            self.listen(&input, "keydown", move |event: Event| {
                let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
                    return;
                };
                match key.as_str() {
                    "Enter" => {
                        event.prevent_default();
                        on_done(EditorOutcome::Commit(field.value()));
                    }
                    "Escape" => {
                        event.prevent_default();
                        on_done(EditorOutcome::Cancel);
                    }
                    _ => {}
                }
                event.stop_propagation();
            });
        }
        {
            let on_done = Rc::clone(on_done);
            let field = input.clone();
            self.listen(&input, "blur", move |_event: Event| {
                on_done(EditorOutcome::Commit(field.value()));
            });
        }

        self.input = Some(input.clone());
        Some(input.unchecked_into())
    }

    fn build_select(
        &mut self,
        document: &Document,
        session: &EditorSession,
        options: &[String],
        config: &GridConfig,
        on_done: &OnDone,
    ) -> Option<HtmlElement> {
        let container = document
            .create_element("div")
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()?;
        container.set_tab_index(0);
        let _ = container.set_attribute("data-value", &session.initial_value);
        let _ = container.style().set_property("outline", "none");

        let list = document
            .create_element("div")
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()?;
        let _ = list.set_attribute("role", "listbox");
        let style = list.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("top", "100%");
        let _ = style.set_property("left", "0");
        let _ = style.set_property("width", "100%");
        let _ = style.set_property("max-height", "200px");
        let _ = style.set_property("overflow-y", "auto");
        let _ = style.set_property("margin-top", "4px");
        let _ = style.set_property("padding", "4px 0");
        let _ = style.set_property("background-color", &config.header_background);
        let _ = style.set_property("color", &config.header_text_color);
        let _ = style.set_property("font", &config.font);
        let _ = style.set_property("border", &format!("1px solid {}", config.grid_line_color));
        let _ = style.set_property("box-shadow", "0 4px 12px rgba(0,0,0,0.3)");
        let _ = style.set_property("border-radius", "4px");

        for option in options {
            let Some(item) = document
                .create_element("div")
                .ok()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            else {
                continue;
            };
            item.set_text_content(Some(option));
            let _ = item.set_attribute("role", "option");
            let _ = item.style().set_property("padding", "6px 10px");
            let _ = item.style().set_property("cursor", "pointer");
            if *option == session.initial_value {
                let _ = item.style().set_property("font-weight", "bold");
            }

            let hovered = item.clone();
            self.listen(&item, "mouseenter", move |_event: Event| {
                let _ = hovered.style().set_property("background-color", OPTION_HOVER);
            });
            let left = item.clone();
            self.listen(&item, "mouseleave", move |_event: Event| {
                let _ = left.style().set_property("background-color", "transparent");
            });
            // Pick on mousedown so the grid's own press handler doesn't
            // close the editor first.
            let on_done = Rc::clone(on_done);
            let value = option.clone();
            self.listen(&item, "mousedown", move |event: Event| {
                event.prevent_default();
                event.stop_propagation();
                on_done(EditorOutcome::Commit(value.clone()));
            });
            let _ = list.append_child(&item);
        }
        let _ = container.append_child(&list);

        let on_done = Rc::clone(on_done);
        self.listen(&container, "keydown", move |event: Event| {
            if event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key).as_deref() == Some("Escape")
            {
                event.prevent_default();
                on_done(EditorOutcome::Cancel);
            }
            event.stop_propagation();
        });

        self.input = None;
        Some(container)
    }

    fn listen(
        &mut self,
        element: &HtmlElement,
        name: &str,
        handler: impl FnMut(Event) + 'static,
    ) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        element
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            .ok();
        self.closures.push(closure);
    }

    /// Remove the shown editor, if any.
    pub(crate) fn hide(&mut self) {
        self.target = None;
        self.input = None;
        self.retired.append(&mut self.closures);
        if let Some(element) = self.element.take() {
            element.remove();
        }
    }
}

impl Drop for EditorOverlay {
    fn drop(&mut self) {
        if let Some(element) = self.element.take() {
            element.remove();
        }
    }
}
