use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Logical focus cursor within the grid.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub struct GridPosition {
    pub row_index: usize,
    pub col_index: usize,
}

impl GridPosition {
    pub fn new(row_index: usize, col_index: usize) -> Self {
        Self {
            row_index,
            col_index,
        }
    }

    /// Clamp into a `row_count x col_count` grid; empty dimensions pin to 0.
    pub fn clamped(self, row_count: usize, col_count: usize) -> Self {
        Self {
            row_index: self.row_index.min(row_count.saturating_sub(1)),
            col_index: self.col_index.min(col_count.saturating_sub(1)),
        }
    }
}

/// Inclusive window of materialized rows and its pixel offset.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct VisibleRange {
    pub start_index: usize,
    pub end_index: usize,
    pub start_offset: f64,
}

/// A single undoable cell edit.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CellChange {
    pub row_index: usize,
    pub field: String,
    pub old_value: Value,
    pub new_value: Value,
}

impl CellChange {
    pub fn new(
        row_index: usize,
        field: impl Into<String>,
        old_value: Value,
        new_value: Value,
    ) -> Self {
        Self {
            row_index,
            field: field.into(),
            old_value,
            new_value,
        }
    }

    /// The change that reverts this one.
    pub fn inverted(&self) -> Self {
        Self {
            row_index: self.row_index,
            field: self.field.clone(),
            old_value: self.new_value.clone(),
            new_value: self.old_value.clone(),
        }
    }
}
