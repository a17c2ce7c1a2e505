//! Layout engines: row virtualization and variable row offsets.
//!
//! This module handles:
//! - Computing the materialized row window for a scroll position
//! - Clamping scroll positions to the content height
//! - Binary search for rows at pixel offsets when heights vary

mod row_offsets;
mod virtual_scroller;

pub use row_offsets::RowOffsets;
pub use virtual_scroller::{VirtualScroller, DEFAULT_ROW_HEIGHT, DEFAULT_VIEWPORT_HEIGHT};
