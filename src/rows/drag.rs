//! Row drag gesture: `idle -> active -> idle`.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::types::{Row, RowId, DEFAULT_ROW_KEY};

type DragTextFn = dyn Fn(&[Row]) -> String + Send + Sync;

/// Row drag configuration.
#[derive(Clone)]
pub struct RowDragOptions {
    pub enabled: bool,
    /// Compute the reordered rows on drop instead of only reporting intent.
    pub managed: bool,
    /// Drag every row handed to `start_drag` rather than just the first.
    pub multi_row: bool,
    pub row_key: String,
    pub drag_text: Option<Arc<DragTextFn>>,
}

impl Default for RowDragOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            managed: true,
            multi_row: false,
            row_key: DEFAULT_ROW_KEY.to_string(),
            drag_text: None,
        }
    }
}

impl fmt::Debug for RowDragOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowDragOptions")
            .field("enabled", &self.enabled)
            .field("managed", &self.managed)
            .field("multi_row", &self.multi_row)
            .field("row_key", &self.row_key)
            .field("drag_text", &self.drag_text.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Transient state of an active drag.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DragState {
    pub active: bool,
    pub dragged_rows: Vec<Row>,
    pub source_index: usize,
    pub target_index: usize,
}

/// Result of dropping rows.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum DragOutcome {
    /// Drop intent only; row order is left to the caller.
    #[serde(rename_all = "camelCase")]
    Unmanaged {
        dragged_rows: Vec<Row>,
        target_index: usize,
    },
    /// The full reordered row list.
    #[serde(rename_all = "camelCase")]
    Managed {
        rows: Vec<Row>,
        from_indices: Vec<usize>,
        to_index: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RowDrag {
    options: RowDragOptions,
    state: Option<DragState>,
}

impl RowDrag {
    pub fn new(options: RowDragOptions) -> Self {
        Self {
            options,
            state: None,
        }
    }

    pub fn options(&self) -> &RowDragOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: RowDragOptions) {
        self.options = options;
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn drag_state(&self) -> Option<&DragState> {
        self.state.as_ref()
    }

    /// Begin dragging. The target starts at the source index.
    pub fn start_drag(&mut self, rows: Vec<Row>, source_index: usize) {
        if !self.options.enabled {
            return;
        }
        let dragged_rows = if self.options.multi_row {
            rows
        } else {
            rows.into_iter().take(1).collect()
        };
        debug!(rows = dragged_rows.len(), source_index, "drag started");
        self.state = Some(DragState {
            active: true,
            dragged_rows,
            source_index,
            target_index: source_index,
        });
    }

    pub fn update_target(&mut self, target_index: usize) {
        if let Some(state) = self.state.as_mut() {
            state.target_index = target_index;
        }
    }

    /// Drop the dragged rows. Always returns to idle.
    pub fn end_drag(&mut self, all_rows: &[Row]) -> Option<DragOutcome> {
        let state = self.state.take()?;
        let outcome = if self.options.managed {
            self.reorder(all_rows, state)
        } else {
            DragOutcome::Unmanaged {
                dragged_rows: state.dragged_rows,
                target_index: state.target_index,
            }
        };
        debug!(managed = self.options.managed, "drag ended");
        Some(outcome)
    }

    pub fn cancel_drag(&mut self) {
        if self.state.take().is_some() {
            debug!("drag cancelled");
        }
    }

    /// Label for the drag ghost.
    pub fn get_drag_text(&self) -> String {
        let rows = self
            .state
            .as_ref()
            .map(|s| s.dragged_rows.as_slice())
            .unwrap_or(&[]);
        if let Some(format) = &self.options.drag_text {
            return format(rows);
        }
        match rows.len() {
            1 => "1 row".to_string(),
            n => format!("{n} rows"),
        }
    }

    fn reorder(&self, all_rows: &[Row], state: DragState) -> DragOutcome {
        let key = self.options.row_key.as_str();
        let dragged: HashSet<RowId> = state
            .dragged_rows
            .iter()
            .map(|row| RowId::of(row, key))
            .collect();

        let mut from_indices = Vec::new();
        let mut remaining = Vec::with_capacity(all_rows.len());
        for (i, row) in all_rows.iter().enumerate() {
            if dragged.contains(&RowId::of(row, key)) {
                from_indices.push(i);
            } else {
                remaining.push(row.clone());
            }
        }

        let shift = from_indices
            .iter()
            .filter(|&&i| i < state.target_index)
            .count();
        let to_index = state
            .target_index
            .saturating_sub(shift)
            .min(remaining.len());

        let tail = remaining.split_off(to_index);
        remaining.extend(state.dragged_rows);
        remaining.extend(tail);

        DragOutcome::Managed {
            rows: remaining,
            from_indices,
            to_index,
        }
    }
}
