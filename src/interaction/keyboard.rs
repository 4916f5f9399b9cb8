//! Keyboard shortcut resolution and anchor navigation.

use std::collections::HashMap;

use super::KeyInput;
use crate::types::{GridConfig, KeyBinding};

/// Something a key press can trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Copy,
    SelectAll,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    PageUp,
    PageDown,
    MoveToStart,
    MoveToEnd,
    ContextMenu,
    Undo,
    Redo,
    /// Host-defined action, dispatched to the shortcut hook
    Custom(String),
}

/// Built-in actions in matching order.
const BUILT_IN: [KeyAction; 13] = [
    KeyAction::Copy,
    KeyAction::SelectAll,
    KeyAction::MoveUp,
    KeyAction::MoveDown,
    KeyAction::MoveLeft,
    KeyAction::MoveRight,
    KeyAction::PageUp,
    KeyAction::PageDown,
    KeyAction::MoveToStart,
    KeyAction::MoveToEnd,
    KeyAction::ContextMenu,
    KeyAction::Undo,
    KeyAction::Redo,
];

impl KeyAction {
    /// Name used in `keyboardShortcuts` and passed to the shortcut hook.
    pub fn name(&self) -> &str {
        match self {
            Self::Copy => "copy",
            Self::SelectAll => "selectAll",
            Self::MoveUp => "moveUp",
            Self::MoveDown => "moveDown",
            Self::MoveLeft => "moveLeft",
            Self::MoveRight => "moveRight",
            Self::PageUp => "pageUp",
            Self::PageDown => "pageDown",
            Self::MoveToStart => "moveToStart",
            Self::MoveToEnd => "moveToEnd",
            Self::ContextMenu => "contextMenu",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Custom(name) => name,
        }
    }

    /// Built-in action with this name.
    pub fn built_in(name: &str) -> Option<Self> {
        BUILT_IN.iter().find(|a| a.name() == name).cloned()
    }

    pub fn default_bindings(&self) -> Vec<KeyBinding> {
        match self {
            Self::Copy => vec![KeyBinding::ctrl("c")],
            Self::SelectAll => vec![KeyBinding::ctrl("a")],
            Self::MoveUp => vec![KeyBinding::plain("ArrowUp")],
            Self::MoveDown => vec![KeyBinding::plain("ArrowDown")],
            Self::MoveLeft => vec![KeyBinding::plain("ArrowLeft")],
            Self::MoveRight => vec![KeyBinding::plain("ArrowRight")],
            Self::PageUp => vec![KeyBinding::plain("PageUp")],
            Self::PageDown => vec![KeyBinding::plain("PageDown")],
            Self::MoveToStart => vec![KeyBinding::plain("Home")],
            Self::MoveToEnd => vec![KeyBinding::plain("End")],
            Self::ContextMenu => vec![KeyBinding::shift("F10")],
            Self::Undo => vec![KeyBinding::ctrl("z")],
            Self::Redo => vec![
                KeyBinding::ctrl("y"),
                KeyBinding {
                    shift: true,
                    ..KeyBinding::ctrl("z")
                },
            ],
            Self::Custom(_) => Vec::new(),
        }
    }

    /// Navigation keys also fire with Ctrl/Shift held (extend, jump).
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::MoveUp
                | Self::MoveDown
                | Self::MoveLeft
                | Self::MoveRight
                | Self::PageUp
                | Self::PageDown
                | Self::MoveToStart
                | Self::MoveToEnd
        )
    }
}

/// Effective bindings: defaults plus the config overrides.
#[derive(Debug, Clone, Copy)]
pub struct Shortcuts<'a> {
    overrides: &'a HashMap<String, Option<KeyBinding>>,
}

impl<'a> Shortcuts<'a> {
    pub fn new(config: &'a GridConfig) -> Self {
        Self {
            overrides: &config.keyboard_shortcuts,
        }
    }

    /// An override replaces every default binding; `None` disables the action.
    pub fn bindings_for(&self, action: &KeyAction) -> Vec<KeyBinding> {
        match self.overrides.get(action.name()) {
            Some(Some(binding)) => vec![binding.clone()],
            Some(None) => Vec::new(),
            None => action.default_bindings(),
        }
    }

    /// Action bound to a key press. Custom bindings are checked first, in
    /// name order.
    pub fn match_key(&self, input: &KeyInput) -> Option<KeyAction> {
        let mut custom: Vec<(&String, &KeyBinding)> = self
            .overrides
            .iter()
            .filter(|(name, _)| KeyAction::built_in(name).is_none())
            .filter_map(|(name, binding)| binding.as_ref().map(|b| (name, b)))
            .collect();
        custom.sort_by(|a, b| a.0.cmp(b.0));
        if let Some((name, _)) = custom.iter().find(|(_, b)| matches(b, input, false)) {
            return Some(KeyAction::Custom((*name).clone()));
        }

        BUILT_IN.iter().find_map(|action| {
            let loose = action.is_navigation();
            self.bindings_for(action)
                .iter()
                .any(|b| matches(b, input, loose))
                .then(|| action.clone())
        })
    }
}

/// Key comparison is case-insensitive; Ctrl and Meta are interchangeable.
/// With `loose`, Ctrl/Shift the binding doesn't ask for are ignored.
fn matches(binding: &KeyBinding, input: &KeyInput, loose: bool) -> bool {
    if binding.key != input.key && binding.key.to_lowercase() != input.key.to_lowercase() {
        return false;
    }
    let wants_ctrl = binding.ctrl || binding.meta;
    let ctrl_ok = if loose && !wants_ctrl {
        true
    } else {
        wants_ctrl == input.command()
    };
    let shift_ok = if loose && !binding.shift {
        true
    } else {
        binding.shift == input.shift
    };
    ctrl_ok && shift_ok && binding.alt == input.alt
}

/// New `(row, visual column index)` after a navigation action from the
/// anchor, clamped to the grid. `page_rows` is the page step; `ctrl` makes
/// Home/End jump to the first/last row too. `None` for non-navigation
/// actions or an empty grid.
pub fn navigate(
    action: &KeyAction,
    (row, index): (u32, usize),
    (rows, cols): (usize, usize),
    page_rows: u32,
    ctrl: bool,
) -> Option<(u32, usize)> {
    let last_row = u32::try_from(rows.checked_sub(1)?).unwrap_or(u32::MAX);
    let last_col = cols.checked_sub(1)?;
    let row = row.min(last_row);
    let index = index.min(last_col);
    let next = match action {
        KeyAction::MoveUp => (row.saturating_sub(1), index),
        KeyAction::MoveDown => ((row + 1).min(last_row), index),
        KeyAction::MoveLeft => (row, index.saturating_sub(1)),
        KeyAction::MoveRight => (row, (index + 1).min(last_col)),
        KeyAction::PageUp => (row.saturating_sub(page_rows), index),
        KeyAction::PageDown => (row.saturating_add(page_rows).min(last_row), index),
        KeyAction::MoveToStart => (if ctrl { 0 } else { row }, 0),
        KeyAction::MoveToEnd => (if ctrl { last_row } else { row }, last_col),
        _ => return None,
    };
    Some(next)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config_with(name: &str, binding: Option<KeyBinding>) -> GridConfig {
        let mut config = GridConfig::default();
        config.keyboard_shortcuts.insert(name.to_string(), binding);
        config
    }

    #[test]
    fn test_defaults() {
        let config = GridConfig::default();
        let shortcuts = Shortcuts::new(&config);
        assert_eq!(
            shortcuts.match_key(&KeyInput::new("C").with_ctrl()),
            Some(KeyAction::Copy)
        );
        assert_eq!(
            shortcuts.match_key(&KeyInput::new("ArrowDown")),
            Some(KeyAction::MoveDown)
        );
        assert_eq!(
            shortcuts.match_key(&KeyInput::new("F10").with_shift()),
            Some(KeyAction::ContextMenu)
        );
        assert_eq!(shortcuts.match_key(&KeyInput::new("c")), None);
    }

    #[test]
    fn test_meta_counts_as_ctrl() {
        let config = GridConfig::default();
        let input = KeyInput {
            meta: true,
            ..KeyInput::new("a")
        };
        assert_eq!(Shortcuts::new(&config).match_key(&input), Some(KeyAction::SelectAll));
    }

    #[test]
    fn test_undo_and_redo_bindings() {
        let config = GridConfig::default();
        let shortcuts = Shortcuts::new(&config);
        assert_eq!(
            shortcuts.match_key(&KeyInput::new("z").with_ctrl()),
            Some(KeyAction::Undo)
        );
        assert_eq!(
            shortcuts.match_key(&KeyInput::new("Z").with_ctrl().with_shift()),
            Some(KeyAction::Redo)
        );
        assert_eq!(
            shortcuts.match_key(&KeyInput::new("y").with_ctrl()),
            Some(KeyAction::Redo)
        );
    }

    #[test]
    fn test_navigation_ignores_extra_modifiers() {
        let config = GridConfig::default();
        let shortcuts = Shortcuts::new(&config);
        assert_eq!(
            shortcuts.match_key(&KeyInput::new("ArrowDown").with_shift()),
            Some(KeyAction::MoveDown)
        );
        assert_eq!(
            shortcuts.match_key(&KeyInput::new("Home").with_ctrl()),
            Some(KeyAction::MoveToStart)
        );
        let alt = KeyInput {
            alt: true,
            ..KeyInput::new("ArrowDown")
        };
        assert_eq!(shortcuts.match_key(&alt), None);
    }

    #[test]
    fn test_disable_and_override() {
        let config = config_with("copy", None);
        assert_eq!(Shortcuts::new(&config).match_key(&KeyInput::new("c").with_ctrl()), None);

        let config = config_with("moveDown", Some(KeyBinding::plain("j")));
        let shortcuts = Shortcuts::new(&config);
        assert_eq!(shortcuts.match_key(&KeyInput::new("j")), Some(KeyAction::MoveDown));
        assert_eq!(shortcuts.match_key(&KeyInput::new("ArrowDown")), None);
    }

    #[test]
    fn test_custom_action_wins() {
        let config = config_with("saveView", Some(KeyBinding::ctrl("c")));
        assert_eq!(
            Shortcuts::new(&config).match_key(&KeyInput::new("c").with_ctrl()),
            Some(KeyAction::Custom("saveView".into()))
        );
    }

    #[test]
    fn test_navigate_clamps() {
        let grid = (10, 5);
        assert_eq!(navigate(&KeyAction::MoveUp, (0, 0), grid, 20, false), Some((0, 0)));
        assert_eq!(navigate(&KeyAction::MoveDown, (9, 0), grid, 20, false), Some((9, 0)));
        assert_eq!(navigate(&KeyAction::MoveRight, (0, 4), grid, 20, false), Some((0, 4)));
        assert_eq!(navigate(&KeyAction::PageDown, (2, 1), grid, 20, false), Some((9, 1)));
        assert_eq!(navigate(&KeyAction::PageUp, (9, 1), grid, 4, false), Some((5, 1)));
        assert_eq!(navigate(&KeyAction::MoveToEnd, (3, 1), grid, 4, false), Some((3, 4)));
        assert_eq!(navigate(&KeyAction::MoveToEnd, (3, 1), grid, 4, true), Some((9, 4)));
        assert_eq!(navigate(&KeyAction::MoveToStart, (3, 3), grid, 4, true), Some((0, 0)));
        assert_eq!(navigate(&KeyAction::Copy, (0, 0), grid, 4, false), None);
        assert_eq!(navigate(&KeyAction::MoveDown, (0, 0), (0, 5), 4, false), None);
    }
}
