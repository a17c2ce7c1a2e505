//! Rows pinned above or below the scrolling body.

use serde::Serialize;

use crate::types::{same_row, Row, DEFAULT_ROW_KEY};

/// Which pinned area holds a row.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PinnedPosition {
    Top,
    Bottom,
}

/// Two ordered, mutually exclusive lists of pinned rows.
///
/// Rows are matched by the configured key field. The lists are only
/// reachable through shared slices, so callers cannot mutate them.
#[derive(Debug, Clone)]
pub struct RowPinning {
    row_key: String,
    top: Vec<Row>,
    bottom: Vec<Row>,
}

impl Default for RowPinning {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_KEY)
    }
}

impl RowPinning {
    pub fn new(row_key: impl Into<String>) -> Self {
        Self {
            row_key: row_key.into(),
            top: Vec::new(),
            bottom: Vec::new(),
        }
    }

    /// Append to the top list, moving the row out of the bottom list if needed.
    pub fn pin_top(&mut self, row: Row) {
        self.pin(row, PinnedPosition::Top);
    }

    /// Append to the bottom list, moving the row out of the top list if needed.
    pub fn pin_bottom(&mut self, row: Row) {
        self.pin(row, PinnedPosition::Bottom);
    }

    /// Remove a row from whichever list holds it; returns whether anything was removed.
    pub fn unpin(&mut self, row: &Row) -> bool {
        let key = self.row_key.as_str();
        let before = self.top.len() + self.bottom.len();
        self.top.retain(|r| !same_row(r, row, key));
        self.bottom.retain(|r| !same_row(r, row, key));
        self.top.len() + self.bottom.len() != before
    }

    pub fn unpin_all(&mut self) {
        self.top.clear();
        self.bottom.clear();
    }

    pub fn is_pinned(&self, row: &Row) -> Option<PinnedPosition> {
        let key = self.row_key.as_str();
        if self.top.iter().any(|r| same_row(r, row, key)) {
            Some(PinnedPosition::Top)
        } else if self.bottom.iter().any(|r| same_row(r, row, key)) {
            Some(PinnedPosition::Bottom)
        } else {
            None
        }
    }

    pub fn top_rows(&self) -> &[Row] {
        &self.top
    }

    pub fn bottom_rows(&self) -> &[Row] {
        &self.bottom
    }

    fn pin(&mut self, row: Row, position: PinnedPosition) {
        if self.is_pinned(&row) == Some(position) {
            return;
        }
        self.unpin(&row);
        match position {
            PinnedPosition::Top => self.top.push(row),
            PinnedPosition::Bottom => self.bottom.push(row),
        }
    }
}
