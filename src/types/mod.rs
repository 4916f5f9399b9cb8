//! Data types shared by the grid core, renderer and JS bindings.

mod cell;
mod config;
mod header;
mod selection;

pub use cell::*;
pub use config::*;
pub use header::*;
pub use selection::*;
