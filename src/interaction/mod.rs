//! Input descriptors and the pure parts of pointer/keyboard handling.
//!
//! Coordinates are canvas-relative CSS pixels. The browser layer converts
//! DOM events into these types; `GridCore` consumes them.

pub mod drag;
pub mod keyboard;

pub use drag::{Gesture, ReorderGesture, ResizeGesture, REORDER_THRESHOLD};
pub use hit_test::{band_heights, hit_test, sub_band_at, HitTarget};
pub use keyboard::{navigate, KeyAction, Shortcuts};

/// Distance from a column edge that still counts as grabbing it.
pub const EDGE_TOLERANCE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Auxiliary,
    Secondary,
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` value.
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A pointer press, move or release.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerInput {
    pub x: f64,
    pub y: f64,
    pub button: PointerButton,
    /// Ctrl or Meta
    pub ctrl: bool,
    pub shift: bool,
    /// Second press of a native double-click
    pub double: bool,
}

impl PointerInput {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn double_click(mut self) -> Self {
        self.double = true;
        self
    }

    pub fn secondary(mut self) -> Self {
        self.button = PointerButton::Secondary;
        self
    }

    pub fn is_secondary(&self) -> bool {
        self.button == PointerButton::Secondary
    }
}

/// A key press.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyInput {
    /// DOM `KeyboardEvent.key`
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyInput {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Ctrl or Meta held.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Canvas cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    ColResize,
    Grab,
    Grabbing,
}

impl Cursor {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::ColResize => "col-resize",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
        }
    }
}
