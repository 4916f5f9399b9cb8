//! scigrid - virtualized data grid for the web
//!
//! Renders large scientific tables in the browser via WebAssembly and Canvas 2D:
//! - Only the visible window is drawn; row and column counts are unbounded
//! - Multi-line headers with units, descriptions and physical-unit formatting
//! - Native scrollbars, even past the browser's maximum element size
//! - Range selection, column resize/reorder, sorting, filtering, grouping
//! - In-place editing with validation and undo/redo
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { SciGrid } from 'scigrid';
//! await init();
//! const grid = new SciGrid(container, {
//!   getRowCount: () => rows.length,
//!   getColumnCount: () => columns.length,
//!   getCellData: (row, col) => rows[row][col],
//!   getHeader: (col) => columns[col],
//! }, { rowHeight: 32 });
//! ```
//!
//! Everything except the `viewer` module is target independent; the grid
//! logic in [`GridCore`] can be driven and tested natively.

pub mod context_menu;
pub mod data;
pub mod editor;
pub mod error;
pub mod filter;
pub mod grid;
pub mod interaction;
pub mod layout;
pub mod logging;
pub mod provider;
pub mod render;
pub mod selection;
pub mod state;
pub mod types;
pub mod undo;
pub mod units;

#[cfg(target_arch = "wasm32")]
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use error::{GridError, Result};
pub use grid::{GridCore, GridHooks, NoHooks, Response};
pub use logging::init_logging;
pub use provider::{DataGridProvider, VecProvider};
pub use types::*;
#[cfg(target_arch = "wasm32")]
pub use viewer::SciGrid;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
