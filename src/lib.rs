//! progrid - headless data grid core
//!
//! The engines behind a virtualized web data grid, free of any rendering:
//! - Row virtualization with uniform or variable row heights
//! - Column sizing, ordering, visibility and persistence
//! - Multi-column sorting, quick filter and per-column filters
//! - Pagination, selection, pinning, row drag and undo/redo
//! - Keyboard navigation with roving-tabindex focus
//!
//! Engines are plain structs with no knowledge of each other; [`GridState`]
//! runs them in the fixed filter, sort, paginate, virtualize order.
//!
//! # Usage (Rust)
//!
//! ```
//! use progrid::{ColumnDef, GridOptions, GridState, SortItem};
//! use serde_json::json;
//!
//! let mut grid = GridState::new(GridOptions::default());
//! grid.set_columns(&[ColumnDef::new("name").sortable()]);
//! let rows = json!([{"id": 1, "name": "b"}, {"id": 2, "name": "a"}]);
//! grid.set_rows(progrid::rows_from_value(rows).unwrap());
//! grid.set_sort_model(vec![SortItem::asc("name")]);
//! assert_eq!(grid.display_rows()[0]["name"], "a");
//! ```

// Shared types and boundaries
pub mod error;
pub mod options;
pub mod types;

// Engines
pub mod columns;
pub mod compare;
pub mod filter;
pub mod layout;
pub mod nav;
pub mod pagination;
pub mod rows;
pub mod selection;
pub mod sort;
pub mod status_bar;
pub mod undo;

// Orchestration
pub mod grid;
pub mod pipeline;

#[cfg(target_arch = "wasm32")]
pub mod bindings;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use bindings::ProGrid;
pub use error::{GridError, Result};
pub use grid::GridState;
pub use options::GridOptions;
pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
