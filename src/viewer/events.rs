//! DOM listeners feeding `GridCore`.
//!
//! Pointer input arrives on the scroll container (it sits above the canvas),
//! keys on the focusable host. Captured gestures track the pointer on the
//! window until release.

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, ClipboardEvent, Event, EventTarget, HtmlElement, KeyboardEvent,
    MouseEvent, Node, Window,
};

use super::hooks::EventSlot;
use super::{with_state, Shared, SharedState};
use crate::interaction::{Cursor, KeyInput, PointerButton, PointerInput};

/// A registered listener, removable on teardown.
pub(crate) struct Listener {
    target: EventTarget,
    name: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub(crate) fn attach(
        target: &EventTarget,
        name: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Self {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            .ok();
        Self {
            target: target.clone(),
            name,
            closure,
        }
    }

    fn attach_passive(
        target: &EventTarget,
        name: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Self {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                name,
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .ok();
        Self {
            target: target.clone(),
            name,
            closure,
        }
    }

    pub(crate) fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.name, self.closure.as_ref().unchecked_ref());
    }
}

/// Window `mousemove`/`mouseup` listeners, attached only while a gesture
/// is captured.
pub(crate) struct DragCapture {
    window: Window,
    on_move: Closure<dyn FnMut(Event)>,
    on_up: Closure<dyn FnMut(Event)>,
    active: bool,
}

impl DragCapture {
    pub(crate) fn start(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        let _ = self
            .window
            .add_event_listener_with_callback("mousemove", self.on_move.as_ref().unchecked_ref());
        let _ = self
            .window
            .add_event_listener_with_callback("mouseup", self.on_up.as_ref().unchecked_ref());
    }

    pub(crate) fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        let _ = self.window.remove_event_listener_with_callback(
            "mousemove",
            self.on_move.as_ref().unchecked_ref(),
        );
        let _ = self
            .window
            .remove_event_listener_with_callback("mouseup", self.on_up.as_ref().unchecked_ref());
    }
}

fn pointer_input(event: &MouseEvent, (x, y): (f64, f64), double: bool) -> PointerInput {
    PointerInput {
        x,
        y,
        button: PointerButton::from_dom(event.button()),
        ctrl: event.ctrl_key() || event.meta_key(),
        shift: event.shift_key(),
        double,
    }
}

fn key_input(event: &KeyboardEvent) -> KeyInput {
    KeyInput {
        key: event.key(),
        ctrl: event.ctrl_key(),
        shift: event.shift_key(),
        alt: event.alt_key(),
        meta: event.meta_key(),
    }
}

/// Wire every listener. The returned listeners stay attached until detached.
pub(crate) fn attach(
    state: &Shared,
    host: &HtmlElement,
    container: &EventTarget,
    slot: &EventSlot,
) -> Vec<Listener> {
    let mut listeners = Vec::new();

    // Press: commit any open editor, then dispatch.
    {
        let weak = Rc::downgrade(state);
        listeners.push(Listener::attach(container, "mousedown", move |event: Event| {
            let (Some(state), Some(mouse)) = (weak.upgrade(), event.dyn_ref::<MouseEvent>())
            else {
                return;
            };
            let prevent = with_state(&state, |s| {
                s.close_menu();
                if let Some(text) = s.editor_text() {
                    s.core.commit_editor(&text);
                }
                let input = pointer_input(mouse, s.canvas_point(mouse), false);
                let response = s.core.pointer_down(input);
                s.apply(&response);
                s.focus_host();
                response.prevent_default
            });
            if prevent == Some(true) {
                event.prevent_default();
            }
        }));
    }

    {
        let weak = Rc::downgrade(state);
        listeners.push(Listener::attach(container, "dblclick", move |event: Event| {
            let (Some(state), Some(mouse)) = (weak.upgrade(), event.dyn_ref::<MouseEvent>())
            else {
                return;
            };
            let prevent = with_state(&state, |s| {
                let input = pointer_input(mouse, s.canvas_point(mouse), true);
                let response = s.core.pointer_down(input);
                s.apply(&response);
                response.prevent_default
            });
            if prevent == Some(true) {
                event.prevent_default();
            }
        }));
    }

    // Hover: cursor and header highlight. Captured gestures are handled by
    // the window listeners instead.
    {
        let weak = Rc::downgrade(state);
        listeners.push(Listener::attach(container, "mousemove", move |event: Event| {
            let (Some(state), Some(mouse)) = (weak.upgrade(), event.dyn_ref::<MouseEvent>())
            else {
                return;
            };
            with_state(&state, |s| {
                if s.core.is_gesture_active() {
                    return;
                }
                let (x, y) = s.canvas_point(mouse);
                let cursor = s.core.hover(x, y);
                s.set_cursor(cursor);
            });
        }));
    }

    {
        let weak = Rc::downgrade(state);
        listeners.push(Listener::attach(container, "mouseleave", move |_event: Event| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            with_state(&state, |s| {
                if !s.core.is_gesture_active() {
                    s.core.hover(-1.0, -1.0);
                    s.set_cursor(Cursor::Default);
                }
            });
        }));
    }

    {
        let weak = Rc::downgrade(state);
        let slot = Rc::clone(slot);
        listeners.push(Listener::attach(container, "contextmenu", move |event: Event| {
            let (Some(state), Some(mouse)) = (weak.upgrade(), event.dyn_ref::<MouseEvent>())
            else {
                return;
            };
            *slot.borrow_mut() = Some(event.clone());
            let prevent = with_state(&state, |s| {
                let (x, y) = s.canvas_point(mouse);
                let response = s.core.context_menu(x, y);
                s.apply(&response);
                response.prevent_default
            });
            slot.borrow_mut().take();
            if prevent == Some(true) {
                event.prevent_default();
            }
        }));
    }

    // Scroll renders immediately rather than on the next frame.
    {
        let weak = Rc::downgrade(state);
        listeners.push(Listener::attach_passive(container, "scroll", move |_event: Event| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            with_state(&state, |s| {
                let (left, top) = s.shadow.offsets();
                if s.core.on_scroll(left, top) {
                    s.render();
                }
            });
        }));
    }

    {
        let weak = Rc::downgrade(state);
        let slot = Rc::clone(slot);
        listeners.push(Listener::attach(host, "keydown", move |event: Event| {
            let (Some(state), Some(key)) = (weak.upgrade(), event.dyn_ref::<KeyboardEvent>())
            else {
                return;
            };
            let input = key_input(key);
            *slot.borrow_mut() = Some(event.clone());
            let prevent = with_state(&state, |s| {
                if input.key == "Escape" && s.menu_open() {
                    s.close_menu();
                    return true;
                }
                let response = s.core.key_down(&input);
                s.apply(&response);
                response.prevent_default
            });
            slot.borrow_mut().take();
            if prevent == Some(true) {
                event.prevent_default();
            }
        }));
    }

    // Tab-separated text pasted at the anchor. The editor input handles its
    // own paste.
    {
        let weak = Rc::downgrade(state);
        listeners.push(Listener::attach(host, "paste", move |event: Event| {
            let (Some(state), Some(clip)) = (weak.upgrade(), event.dyn_ref::<ClipboardEvent>())
            else {
                return;
            };
            let Some(text) = clip
                .clipboard_data()
                .and_then(|data| data.get_data("text/plain").ok())
            else {
                return;
            };
            let written = with_state(&state, |s| {
                if s.core.editor().is_some() {
                    return 0;
                }
                let written = s.core.paste_text(&text);
                if written > 0 {
                    s.render();
                }
                written
            });
            if written.unwrap_or(0) > 0 {
                event.prevent_default();
            }
        }));
    }

    let Some(window) = web_sys::window() else {
        return listeners;
    };

    // Presses elsewhere on the page close the menu and any editor.
    {
        let weak = Rc::downgrade(state);
        listeners.push(Listener::attach(&window, "mousedown", move |event: Event| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
            with_state(&state, |s| {
                if s.menu_open() && !s.menu.contains(target.as_ref()) {
                    s.close_menu();
                }
                if !s.host_contains(target.as_ref()) {
                    match s.editor_text() {
                        Some(text) => {
                            s.core.commit_editor(&text);
                        }
                        None => s.core.close_editor(),
                    }
                }
            });
        }));
    }

    let on_move = {
        let weak = Rc::downgrade(state);
        Closure::wrap(Box::new(move |event: Event| {
            let (Some(state), Some(mouse)) = (weak.upgrade(), event.dyn_ref::<MouseEvent>())
            else {
                return;
            };
            with_state(&state, |s| {
                let input = pointer_input(mouse, s.canvas_point(mouse), false);
                s.core.drag_move(input);
                if s.core.is_dirty() {
                    s.render();
                }
            });
        }) as Box<dyn FnMut(Event)>)
    };
    let on_up = {
        let weak = Rc::downgrade(state);
        Closure::wrap(Box::new(move |_event: Event| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            with_state(&state, |s| {
                s.core.pointer_up();
                s.render();
            });
        }) as Box<dyn FnMut(Event)>)
    };
    state.borrow_mut().drag = Some(DragCapture {
        window,
        on_move,
        on_up,
        active: false,
    });

    listeners
}

impl SharedState {
    fn host_contains(&self, node: Option<&Node>) -> bool {
        self.host.contains(node)
    }

    fn focus_host(&self) {
        let _ = self.host.focus();
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        if self.cursor == cursor {
            return;
        }
        self.cursor = cursor;
        let _ = self
            .shadow
            .container()
            .style()
            .set_property("cursor", cursor.as_css());
    }
}
