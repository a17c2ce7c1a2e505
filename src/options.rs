//! Grid configuration.
//!
//! Every field has a default so hosts can pass partial JSON objects.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::{DEFAULT_ROW_HEIGHT, DEFAULT_VIEWPORT_HEIGHT};
use crate::nav::DEFAULT_KEYBOARD_PAGE_SIZE;
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::rows::RowDragOptions;
use crate::selection::SelectionMode;
use crate::status_bar::StatusBarConfig;
use crate::types::DEFAULT_ROW_KEY;
use crate::undo::DEFAULT_UNDO_DEPTH;

/// Serializable part of [`RowDragOptions`].
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RowDragConfig {
    pub enabled: bool,
    pub managed: bool,
    pub multi_row: bool,
}

impl Default for RowDragConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            managed: true,
            multi_row: false,
        }
    }
}

impl RowDragConfig {
    pub fn to_drag_options(self, row_key: &str) -> RowDragOptions {
        RowDragOptions {
            enabled: self.enabled,
            managed: self.managed,
            multi_row: self.multi_row,
            row_key: row_key.to_string(),
            drag_text: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    pub row_key: String,
    pub row_height: f64,
    pub viewport_height: f64,
    pub buffer_multiplier: f64,
    pub pagination: bool,
    pub page_size: usize,
    pub multi_sort: bool,
    pub selection_mode: SelectionMode,
    pub undo_depth: usize,
    pub keyboard_page_size: usize,
    pub row_drag: RowDragConfig,
    pub status_bar: StatusBarConfig,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            row_key: DEFAULT_ROW_KEY.to_string(),
            row_height: DEFAULT_ROW_HEIGHT,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            buffer_multiplier: 1.0,
            pagination: false,
            page_size: DEFAULT_PAGE_SIZE,
            multi_sort: false,
            selection_mode: SelectionMode::None,
            undo_depth: DEFAULT_UNDO_DEPTH,
            keyboard_page_size: DEFAULT_KEYBOARD_PAGE_SIZE,
            row_drag: RowDragConfig::default(),
            status_bar: StatusBarConfig::default(),
        }
    }
}

impl GridOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_options_keep_defaults() {
        let options = GridOptions::from_json(
            r#"{"rowKey": "sku", "pageSize": 10, "rowDrag": {"enabled": true}}"#,
        )
        .unwrap();
        assert_eq!(options.row_key, "sku");
        assert_eq!(options.page_size, 10);
        assert_eq!(options.row_height, DEFAULT_ROW_HEIGHT);
        assert!(options.row_drag.enabled);
        assert!(options.row_drag.managed);
        assert!(options.status_bar.show_total_rows);
        assert_eq!(options.selection_mode, SelectionMode::None);
    }

    #[test]
    fn test_selection_mode_names() {
        let options = GridOptions::from_json(r#"{"selectionMode": "multiple"}"#).unwrap();
        assert_eq!(options.selection_mode, SelectionMode::Multiple);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(GridOptions::from_json("{").is_err());
    }

    #[test]
    fn test_drag_options_carry_row_key() {
        let drag = RowDragConfig::default().to_drag_options("sku");
        assert_eq!(drag.row_key, "sku");
        assert!(!drag.enabled);
    }
}
