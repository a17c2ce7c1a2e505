//! Row selection keyed by row identity.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{Row, RowId, DEFAULT_ROW_KEY};

/// How many rows may be selected at once.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SelectionMode {
    #[default]
    None,
    Single,
    Multiple,
}

/// Selected row ids, in selection order.
#[derive(Debug, Clone)]
pub struct SelectionManager {
    mode: SelectionMode,
    row_key: String,
    order: Vec<RowId>,
    selected: HashSet<RowId>,
}

impl Default for SelectionManager {
    fn default() -> Self {
        Self::new(SelectionMode::None)
    }
}

impl SelectionManager {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            row_key: DEFAULT_ROW_KEY.to_string(),
            order: Vec::new(),
            selected: HashSet::new(),
        }
    }

    pub fn with_row_key(mut self, row_key: impl Into<String>) -> Self {
        self.row_key = row_key.into();
        self
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn row_key(&self) -> &str {
        &self.row_key
    }

    /// Change mode. `None` clears; `Single` keeps only the latest selection.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        match mode {
            SelectionMode::None => self.clear(),
            SelectionMode::Single => {
                if let Some(last) = self.order.pop() {
                    self.clear();
                    self.insert(last);
                }
            }
            SelectionMode::Multiple => {}
        }
    }

    pub fn select(&mut self, id: RowId) {
        match self.mode {
            SelectionMode::None => {}
            SelectionMode::Single => {
                self.clear();
                self.insert(id);
            }
            SelectionMode::Multiple => self.insert(id),
        }
    }

    pub fn select_row(&mut self, row: &Row) {
        self.select(RowId::of(row, &self.row_key));
    }

    pub fn deselect(&mut self, id: &RowId) {
        if self.selected.remove(id) {
            self.order.retain(|x| x != id);
        }
    }

    /// Flip one row's selection; returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: RowId) -> bool {
        if self.selected.contains(&id) {
            self.deselect(&id);
            false
        } else {
            self.select(id.clone());
            self.selected.contains(&id)
        }
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.selected.clear();
    }

    /// Select every given id (multiple mode only).
    pub fn select_all(&mut self, ids: impl IntoIterator<Item = RowId>) {
        if self.mode != SelectionMode::Multiple {
            return;
        }
        for id in ids {
            self.insert(id);
        }
        debug!(count = self.order.len(), "select all");
    }

    /// Select the inclusive index range between `from` and `to` (multiple mode only).
    pub fn select_range(&mut self, rows: &[Row], from: usize, to: usize) {
        if self.mode != SelectionMode::Multiple || rows.is_empty() {
            return;
        }
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        let hi = hi.min(rows.len() - 1);
        let ids: Vec<RowId> = rows
            .iter()
            .skip(lo)
            .take(hi.saturating_add(1).saturating_sub(lo))
            .map(|row| RowId::of(row, &self.row_key))
            .collect();
        for id in ids {
            self.insert(id);
        }
    }

    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selected.contains(id)
    }

    pub fn is_row_selected(&self, row: &Row) -> bool {
        self.is_selected(&RowId::of(row, &self.row_key))
    }

    pub fn selected_count(&self) -> usize {
        self.order.len()
    }

    pub fn selected_ids(&self) -> &[RowId] {
        &self.order
    }

    /// Selected rows among `rows`, in row order.
    pub fn selected_rows<'a>(&self, rows: &'a [Row]) -> Vec<&'a Row> {
        rows.iter().filter(|row| self.is_row_selected(row)).collect()
    }

    fn insert(&mut self, id: RowId) {
        if self.selected.insert(id.clone()) {
            self.order.push(id);
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_none_mode_ignores_selection() {
        let mut sel = SelectionManager::new(SelectionMode::None);
        sel.select(RowId::from(1));
        assert_eq!(sel.selected_count(), 0);
        assert!(!sel.toggle(RowId::from(1)));
    }

    #[test]
    fn test_single_mode_replaces() {
        let mut sel = SelectionManager::new(SelectionMode::Single);
        sel.select(RowId::from(1));
        sel.select(RowId::from(2));
        assert_eq!(sel.selected_ids(), &[RowId::from(2)]);
    }

    #[test]
    fn test_switch_to_single_keeps_latest() {
        let mut sel = SelectionManager::new(SelectionMode::Multiple);
        sel.select(RowId::from(1));
        sel.select(RowId::from(2));
        sel.set_mode(SelectionMode::Single);
        assert_eq!(sel.selected_ids(), &[RowId::from(2)]);
        sel.set_mode(SelectionMode::None);
        assert_eq!(sel.selected_count(), 0);
    }
}
