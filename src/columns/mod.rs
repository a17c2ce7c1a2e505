//! Column engines: runtime column layout, attribute resolution and the
//! column header menu.

mod attributes;
mod controller;
mod menu;

pub use controller::ColumnController;
pub use menu::{ColumnMenu, MenuAction, MenuItem};
