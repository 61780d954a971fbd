//! Terminal news radar: the latest items of a fixed set of RSS/Atom sources,
//! grouped by source.

pub mod app;
pub mod config;
pub mod feed;
pub mod page;
pub mod theme;
pub mod ui;
pub mod util;
