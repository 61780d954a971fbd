//! Terminal User Interface module.
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background fetch tasks and their results
//! - `render` - Layout and overlay dispatch
//! - `sidebar` - Source checkboxes ("Filtros")
//! - `news` - Page header, source tabs and entry list
//! - `summary` - Rich-text summary layout
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay
//! - `plain` - Plain-text and JSON output for non-interactive runs

mod events;
mod help;
mod input;
mod loop_runner;
mod news;
pub mod plain;
mod render;
mod sidebar;
mod status;
mod summary;

pub use loop_runner::{run, Action};
