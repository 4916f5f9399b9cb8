//! Layout engine: column geometry, viewport windows and scroll mapping.
//!
//! This module handles:
//! - Pre-computing column offsets from widths and visual order
//! - Binary search for the column under a content-space x
//! - Visible row/column windows for the current scroll position
//! - Mapping virtual scroll offsets onto a bounded physical scroll surface

mod columns;
mod scroll;
mod viewport;

pub use columns::{insertion_gap, ColumnLayout, MIN_COLUMN_WIDTH};
pub use scroll::{reveal, ScrollAxis, ScrollBridge, MAX_BROWSER_SIZE};
pub use viewport::Viewport;
