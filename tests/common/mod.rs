//! Common test utilities: grid builders, a recording hook implementation
//! and a deterministic text measure.
//!
//! Geometry with the default config: row-number band 40px, header 40px,
//! rows 25px, columns 100px.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use scigrid::context_menu::{ContextMenuContext, ContextMenuItem, MenuEntry};
use scigrid::grid::hooks::{CellEditEvent, TextMeasure};
use scigrid::{
    CellValue, ColumnHeader, GridConfig, GridCore, GridHooks, SelectionInfo, SortOrder,
    VecProvider,
};

pub const BAND: f64 = 40.0;
pub const HEADER: f64 = 40.0;
pub const ROW: f64 = 25.0;
pub const COL: f64 = 100.0;

// ============================================================================
// Geometry
// ============================================================================

/// Center of the cell at displayed row `row`, visual column `index`.
pub fn cell_point(row: u32, index: u32) -> (f64, f64) {
    (
        BAND + f64::from(index) * COL + COL / 2.0,
        HEADER + f64::from(row) * ROW + ROW / 2.0,
    )
}

/// Middle of the header at visual column `index`.
pub fn header_point(index: u32) -> (f64, f64) {
    (BAND + f64::from(index) * COL + COL / 2.0, HEADER / 2.0)
}

/// Right edge of the header at visual column `index`.
pub fn header_edge(index: u32) -> (f64, f64) {
    (BAND + f64::from(index + 1) * COL - 1.0, HEADER / 2.0)
}

// ============================================================================
// Builders
// ============================================================================

/// `rows` x `cols` of `"{row}-{col}"` text in an 800x600 viewport.
pub fn text_grid(rows: usize, cols: usize) -> GridCore {
    let provider = VecProvider::from_fn(rows, cols, |r, c| format!("{r}-{c}"));
    sized(GridCore::new(Box::new(provider), GridConfig::default()))
}

/// Same as [`text_grid`] with recording hooks attached.
pub fn recorded_grid(rows: usize, cols: usize) -> (GridCore, Recorder) {
    let provider = VecProvider::from_fn(rows, cols, |r, c| format!("{r}-{c}"));
    grid_with(provider, GridConfig::default())
}

pub fn grid_with(provider: VecProvider, config: GridConfig) -> (GridCore, Recorder) {
    let recorder = Recorder::default();
    let core = GridCore::new(Box::new(provider), config)
        .with_hooks(Box::new(recorder.hooks()))
        .with_measure(Box::new(CharMeasure));
    (sized(core), recorder)
}

pub fn sized(mut core: GridCore) -> GridCore {
    core.resize(800.0, 600.0);
    core
}

/// A small table of measurements: name (text), mass (numeric, g), ok (checkbox).
pub fn samples() -> VecProvider {
    let headers = vec![
        ColumnHeader::new("name"),
        ColumnHeader::new("mass")
            .with_units("g")
            .with_type(scigrid::ColumnType::Numeric),
        ColumnHeader::new("ok").with_type(scigrid::ColumnType::Checkbox),
    ];
    let rows = [("beta", 2.5, true), ("alpha", 10.0, false), ("gamma", 0.5, true)]
        .into_iter()
        .map(|(name, mass, ok)| vec![name.into(), mass.into(), ok.into()])
        .collect();
    VecProvider::new(headers, rows)
}

// ============================================================================
// Text measure
// ============================================================================

/// Ten pixels per character regardless of font.
#[derive(Debug, Clone, Copy)]
pub struct CharMeasure;

impl TextMeasure for CharMeasure {
    fn text_width(&self, text: &str, _font: &str) -> f64 {
        text.chars().count() as f64 * 10.0
    }
}

// ============================================================================
// Recording hooks
// ============================================================================

#[derive(Debug, Default)]
pub struct Recorded {
    pub selections: Vec<SelectionInfo>,
    pub sorts: Vec<(u32, Option<SortOrder>)>,
    pub edits: Vec<CellEditEvent>,
    pub shortcuts: Vec<String>,
    /// "cell r c", "header c" or "row r"
    pub menus: Vec<String>,
    pub menu_actions: Vec<String>,
    pub rejections: Vec<(u32, CellValue)>,
}

/// Behavior knobs shared with the hooks.
#[derive(Debug, Default)]
pub struct Knobs {
    /// Suppress the built-in context menu
    pub suppress_menu: bool,
    /// Replace menu items with these ids
    pub menu_items: Option<Vec<&'static str>>,
    /// Menu ids the host handles itself
    pub handled_actions: Vec<&'static str>,
    /// col -> reason; edits to these columns are rejected
    pub reject: HashMap<u32, String>,
}

#[derive(Clone, Default)]
pub struct Recorder {
    pub log: Rc<RefCell<Recorded>>,
    pub knobs: Rc<RefCell<Knobs>>,
}

impl Recorder {
    pub fn hooks(&self) -> RecordingHooks {
        RecordingHooks {
            log: Rc::clone(&self.log),
            knobs: Rc::clone(&self.knobs),
        }
    }

    pub fn last_selection(&self) -> SelectionInfo {
        self.log
            .borrow()
            .selections
            .last()
            .cloned()
            .expect("no selection change recorded")
    }
}

pub struct RecordingHooks {
    log: Rc<RefCell<Recorded>>,
    knobs: Rc<RefCell<Knobs>>,
}

impl GridHooks for RecordingHooks {
    fn on_selection_change(&mut self, info: &SelectionInfo) {
        self.log.borrow_mut().selections.push(info.clone());
    }

    fn on_sort(&mut self, col: u32, order: Option<SortOrder>) {
        self.log.borrow_mut().sorts.push((col, order));
    }

    fn on_context_menu(&mut self, row: u32, col: u32) -> bool {
        self.log.borrow_mut().menus.push(format!("cell {row} {col}"));
        self.knobs.borrow().suppress_menu
    }

    fn on_header_context_menu(&mut self, col: u32) -> bool {
        self.log.borrow_mut().menus.push(format!("header {col}"));
        self.knobs.borrow().suppress_menu
    }

    fn on_row_number_context_menu(&mut self, row: u32) -> bool {
        self.log.borrow_mut().menus.push(format!("row {row}"));
        self.knobs.borrow().suppress_menu
    }

    fn context_menu_items(
        &mut self,
        defaults: Vec<MenuEntry>,
        _context: &ContextMenuContext,
    ) -> Vec<MenuEntry> {
        match &self.knobs.borrow().menu_items {
            Some(ids) => ids
                .iter()
                .map(|id| MenuEntry::Item(ContextMenuItem::new(*id, id.to_uppercase())))
                .collect(),
            None => defaults,
        }
    }

    fn on_menu_action(&mut self, id: &str, _context: &ContextMenuContext) -> bool {
        self.log.borrow_mut().menu_actions.push(id.to_string());
        self.knobs.borrow().handled_actions.contains(&id)
    }

    fn on_shortcut(&mut self, action: &str) {
        self.log.borrow_mut().shortcuts.push(action.to_string());
    }

    fn on_cell_edit(&mut self, event: &CellEditEvent) {
        self.log.borrow_mut().edits.push(event.clone());
    }

    fn validate(&mut self, col: u32, value: &CellValue, _row: u32) -> Result<(), String> {
        match self.knobs.borrow().reject.get(&col) {
            Some(reason) => {
                self.log.borrow_mut().rejections.push((col, value.clone()));
                Err(reason.clone())
            }
            None => Ok(()),
        }
    }
}
