//! Column width, visibility, order and position.

use tracing::debug;

use crate::types::{ColumnDef, ColumnState, ColumnStateSnapshot, SortItem};

/// Owns the ordered runtime state of every column.
///
/// After each mutation the `left` offsets are recomputed so that visible
/// columns sit edge to edge in array order.
#[derive(Debug, Clone, Default)]
pub struct ColumnController {
    columns: Vec<ColumnState>,
}

impl ColumnController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_defs(defs: &[ColumnDef]) -> Self {
        let mut controller = Self::new();
        controller.set_columns(defs);
        controller
    }

    /// Re-initialize from definitions. Sort indicators are reset.
    pub fn set_columns(&mut self, defs: &[ColumnDef]) {
        self.columns = defs.iter().cloned().map(ColumnState::from_def).collect();
        self.update_offsets();
        debug!(count = self.columns.len(), "columns set");
    }

    pub fn columns(&self) -> &[ColumnState] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, field: &str) -> Option<&ColumnState> {
        self.columns.iter().find(|c| c.field() == field)
    }

    pub fn visible_columns(&self) -> Vec<&ColumnState> {
        self.columns.iter().filter(|c| c.visible).collect()
    }

    pub fn visible_count(&self) -> usize {
        self.columns.iter().filter(|c| c.visible).count()
    }

    /// Sum of visible column widths.
    pub fn total_width(&self) -> f64 {
        self.columns
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.width)
            .sum()
    }

    /// Definitions with `hidden` reflecting the current runtime visibility.
    pub fn effective_defs(&self) -> Vec<ColumnDef> {
        self.columns
            .iter()
            .map(|c| {
                let mut def = c.def.clone();
                def.hidden = !c.visible;
                def
            })
            .collect()
    }

    /// Visible column under pixel `x`.
    pub fn column_at_offset(&self, x: f64) -> Option<&ColumnState> {
        self.columns
            .iter()
            .filter(|c| c.visible)
            .find(|c| x >= c.left && x < c.right())
    }

    pub fn apply_sort_model(&mut self, sort_model: &[SortItem]) {
        for column in &mut self.columns {
            let found = sort_model
                .iter()
                .enumerate()
                .find(|(_, item)| item.field == column.def.field);
            match found {
                Some((index, item)) => {
                    column.sort_direction = Some(item.direction);
                    column.sort_index = Some(index);
                }
                None => {
                    column.sort_direction = None;
                    column.sort_index = None;
                }
            }
        }
    }

    /// Resize a column, clamped to its `[min_width, max_width]`.
    pub fn resize_column(&mut self, field: &str, width: f64) {
        if width.is_nan() {
            return;
        }
        let Some(column) = self.columns.iter_mut().find(|c| c.def.field == field) else {
            return;
        };
        column.width = clamp_width(&column.def, width);
        self.update_offsets();
    }

    /// Show or hide a column. Columns with `lock_visible` are left untouched.
    pub fn set_column_visible(&mut self, field: &str, visible: bool) {
        let Some(column) = self.columns.iter_mut().find(|c| c.def.field == field) else {
            return;
        };
        if column.def.lock_visible {
            return;
        }
        column.visible = visible;
        self.update_offsets();
    }

    /// Move a column to `to_index` in the full column order.
    pub fn move_column(&mut self, field: &str, to_index: usize) {
        let Some(from) = self.columns.iter().position(|c| c.def.field == field) else {
            return;
        };
        if self.columns.get(from).is_some_and(|c| c.def.lock_position) {
            return;
        }
        let column = self.columns.remove(from);
        let to = to_index.min(self.columns.len());
        self.columns.insert(to, column);
        self.update_offsets();
        debug!(field, from, to, "column moved");
    }

    /// Distribute the space left by fixed columns among flex columns.
    pub fn size_columns_to_fit(&mut self, container_width: f64) {
        let fixed_width: f64 = self
            .columns
            .iter()
            .filter(|c| c.visible && c.def.flex_weight().is_none())
            .map(|c| c.width)
            .sum();
        let total_flex: f64 = self
            .columns
            .iter()
            .filter(|c| c.visible)
            .filter_map(|c| c.def.flex_weight())
            .sum();
        let remaining = container_width - fixed_width;
        if remaining <= 0.0 || total_flex <= 0.0 {
            return;
        }

        for column in self.columns.iter_mut().filter(|c| c.visible) {
            if let Some(flex) = column.def.flex_weight() {
                let share = remaining * flex / total_flex;
                column.width = share.max(column.def.effective_min_width());
            }
        }
        self.update_offsets();
    }

    /// Layout snapshot in display order, for persistence.
    pub fn column_state(&self) -> Vec<ColumnStateSnapshot> {
        self.columns
            .iter()
            .map(|c| ColumnStateSnapshot {
                field: c.def.field.clone(),
                width: c.width,
                visible: c.visible,
            })
            .collect()
    }

    /// Restore a layout snapshot.
    ///
    /// Listed columns take the listed order, width and visibility; columns not
    /// in the snapshot follow in their current relative order. Unknown fields
    /// are ignored.
    pub fn apply_column_state(&mut self, snapshot: &[ColumnStateSnapshot]) {
        let mut remaining = std::mem::take(&mut self.columns);
        let mut ordered = Vec::with_capacity(remaining.len());
        for entry in snapshot {
            let Some(pos) = remaining.iter().position(|c| c.def.field == entry.field) else {
                continue;
            };
            let mut column = remaining.remove(pos);
            if !entry.width.is_nan() {
                column.width = clamp_width(&column.def, entry.width);
            }
            column.visible = entry.visible;
            ordered.push(column);
        }
        ordered.extend(remaining);
        self.columns = ordered;
        self.update_offsets();
    }

    fn update_offsets(&mut self) {
        let mut left = 0.0;
        for column in &mut self.columns {
            column.left = left;
            if column.visible {
                left += column.width;
            }
        }
    }
}

fn clamp_width(def: &ColumnDef, width: f64) -> f64 {
    width
        .max(def.effective_min_width())
        .min(def.effective_max_width())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::SortDirection;

    fn defs() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("a").with_width(100.0),
            ColumnDef::new("b"),
            ColumnDef::new("c").with_width(80.0),
        ]
    }

    #[test]
    fn test_offsets_after_set() {
        let controller = ColumnController::from_defs(&defs());
        let lefts: Vec<f64> = controller.columns().iter().map(|c| c.left).collect();
        assert_eq!(lefts, vec![0.0, 100.0, 250.0]);
        assert_eq!(controller.total_width(), 330.0);
    }

    #[test]
    fn test_hidden_column_takes_no_space() {
        let mut controller = ColumnController::from_defs(&defs());
        controller.set_column_visible("b", false);
        assert_eq!(controller.column("c").unwrap().left, 100.0);
        assert_eq!(controller.total_width(), 180.0);
    }

    #[test]
    fn test_apply_sort_model() {
        let mut controller = ColumnController::from_defs(&defs());
        controller.apply_sort_model(&[SortItem::desc("c"), SortItem::asc("a")]);
        let c = controller.column("c").unwrap();
        assert_eq!(c.sort_direction, Some(SortDirection::Desc));
        assert_eq!(c.sort_index, Some(0));
        assert_eq!(controller.column("a").unwrap().sort_index, Some(1));
        assert_eq!(controller.column("b").unwrap().sort_direction, None);
    }

    #[test]
    fn test_column_at_offset() {
        let controller = ColumnController::from_defs(&defs());
        assert_eq!(controller.column_at_offset(0.0).unwrap().field(), "a");
        assert_eq!(controller.column_at_offset(249.0).unwrap().field(), "b");
        assert!(controller.column_at_offset(330.0).is_none());
    }
}
