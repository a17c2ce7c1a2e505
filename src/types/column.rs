use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::row::Row;
use super::sort::SortDirection;

/// Default column width in pixels.
pub const DEFAULT_COLUMN_WIDTH: f64 = 150.0;

/// Default minimum column width in pixels.
pub const DEFAULT_MIN_WIDTH: f64 = 50.0;

/// Declared value type of a column, driving comparison.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Date,
    Boolean,
}

impl ColumnType {
    /// Parse a `type` attribute; unknown names fall back to text.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "number" => Self::Number,
            "date" => Self::Date,
            "boolean" => Self::Boolean,
            _ => Self::Text,
        }
    }
}

/// Horizontal cell alignment.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" | "end" => Some(Self::Right),
            _ => None,
        }
    }
}

type CompareFn = dyn Fn(&Value, &Value, &Row, &Row, bool) -> Ordering + Send + Sync;

/// Custom comparator for a column.
///
/// Receives both raw values, both rows and the `desc` flag. Its result is
/// used as returned: the sort engine does not negate it for descending keys.
#[derive(Clone)]
pub struct Comparator(Arc<CompareFn>);

impl Comparator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value, &Row, &Row, bool) -> Ordering + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn compare(&self, a: &Value, b: &Value, row_a: &Row, row_b: &Row, desc: bool) -> Ordering {
        (self.0)(a, b, row_a, row_b, desc)
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Comparator(<fn>)")
    }
}

/// Declared column metadata, as resolved from column elements or JSON.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnDef {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex: Option<f64>,
    pub sortable: bool,
    pub filterable: bool,
    pub editable: bool,
    pub resizable: bool,
    pub hidden: bool,
    pub lock_position: bool,
    pub lock_visible: bool,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(skip)]
    pub comparator: Option<Comparator>,
}

impl ColumnDef {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_flex(mut self, flex: f64) -> Self {
        self.flex = Some(flex);
        self
    }

    pub fn with_comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = Some(comparator);
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Header text, falling back to the field name.
    pub fn header(&self) -> &str {
        self.header_name.as_deref().unwrap_or(&self.field)
    }

    pub fn effective_min_width(&self) -> f64 {
        self.min_width.unwrap_or(DEFAULT_MIN_WIDTH)
    }

    pub fn effective_max_width(&self) -> f64 {
        self.max_width.unwrap_or(f64::INFINITY)
    }

    /// Positive flex weight, if any.
    pub fn flex_weight(&self) -> Option<f64> {
        self.flex.filter(|f| *f > 0.0)
    }
}

/// Runtime state of a column owned by the column controller.
#[derive(Debug, Clone)]
pub struct ColumnState {
    pub def: ColumnDef,
    /// Current width in pixels.
    pub width: f64,
    /// Left offset among visible columns.
    pub left: f64,
    pub visible: bool,
    pub sort_direction: Option<SortDirection>,
    /// Position within the sort model.
    pub sort_index: Option<usize>,
}

impl ColumnState {
    pub fn from_def(def: ColumnDef) -> Self {
        Self {
            width: def.width.unwrap_or(DEFAULT_COLUMN_WIDTH),
            visible: !def.hidden,
            left: 0.0,
            sort_direction: None,
            sort_index: None,
            def,
        }
    }

    pub fn field(&self) -> &str {
        &self.def.field
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Persistable per-column layout, in display order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStateSnapshot {
    pub field: String,
    pub width: f64,
    pub visible: bool,
}
