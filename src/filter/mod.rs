//! Row filtering: per-column filter model and global quick filter.

mod engine;
mod quick;

pub use engine::{passes, FilterEngine};
pub use quick::QuickFilter;
