//! Per-row class, style, height and full-width callbacks.

use std::collections::BTreeMap;

use crate::layout::RowOffsets;
use crate::types::Row;

/// CSS property -> value.
pub type RowStyle = BTreeMap<String, String>;

type ClassFn = Box<dyn Fn(&Row, usize) -> String>;
type StyleFn = Box<dyn Fn(&Row, usize) -> RowStyle>;
type HeightFn = Box<dyn Fn(&Row, usize) -> Option<f64>>;
type PredicateFn = Box<dyn Fn(&Row, usize) -> bool>;

/// Row presentation hooks supplied by configuration.
///
/// Every hook is optional and falls back to a neutral answer: no class, no
/// style, the default height, not full width.
#[derive(Default)]
pub struct RowStyling {
    row_class: Option<ClassFn>,
    row_style: Option<StyleFn>,
    row_height: Option<HeightFn>,
    full_width: Option<PredicateFn>,
    class_rules: Vec<(String, PredicateFn)>,
}

impl std::fmt::Debug for RowStyling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowStyling")
            .field("row_class", &self.row_class.is_some())
            .field("row_style", &self.row_style.is_some())
            .field("row_height", &self.row_height.is_some())
            .field("full_width", &self.full_width.is_some())
            .field("class_rules", &self.class_rules.len())
            .finish()
    }
}

impl RowStyling {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row_class(mut self, f: impl Fn(&Row, usize) -> String + 'static) -> Self {
        self.row_class = Some(Box::new(f));
        self
    }

    pub fn with_row_style(mut self, f: impl Fn(&Row, usize) -> RowStyle + 'static) -> Self {
        self.row_style = Some(Box::new(f));
        self
    }

    /// Height override; `None` from the callback means the default height.
    pub fn with_row_height(mut self, f: impl Fn(&Row, usize) -> Option<f64> + 'static) -> Self {
        self.row_height = Some(Box::new(f));
        self
    }

    pub fn with_full_width(mut self, f: impl Fn(&Row, usize) -> bool + 'static) -> Self {
        self.full_width = Some(Box::new(f));
        self
    }

    /// Add `class` to every row the predicate accepts.
    pub fn with_class_rule(
        mut self,
        class: impl Into<String>,
        predicate: impl Fn(&Row, usize) -> bool + 'static,
    ) -> Self {
        self.class_rules.push((class.into(), Box::new(predicate)));
        self
    }

    pub fn get_row_class(&self, row: &Row, index: usize) -> String {
        self.row_class
            .as_ref()
            .map(|f| f(row, index))
            .unwrap_or_default()
    }

    /// Callback class followed by matching rule classes, space separated.
    pub fn row_classes(&self, row: &Row, index: usize) -> String {
        let base = self.get_row_class(row, index);
        let rules = self
            .class_rules
            .iter()
            .filter(|(_, predicate)| predicate(row, index))
            .map(|(class, _)| class.as_str());
        std::iter::once(base.as_str())
            .chain(rules)
            .filter(|class| !class.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn get_row_style(&self, row: &Row, index: usize) -> RowStyle {
        self.row_style
            .as_ref()
            .map(|f| f(row, index))
            .unwrap_or_default()
    }

    pub fn get_row_height(&self, row: &Row, index: usize, default_height: f64) -> f64 {
        self.row_height
            .as_ref()
            .and_then(|f| f(row, index))
            .filter(|h| h.is_finite() && *h >= 0.0)
            .unwrap_or(default_height)
    }

    pub fn is_full_width_row(&self, row: &Row, index: usize) -> bool {
        self.full_width.as_ref().is_some_and(|f| f(row, index))
    }

    /// Whether any row can differ from the default height.
    pub fn has_variable_heights(&self) -> bool {
        self.row_height.is_some()
    }

    /// Cumulative top offsets for `rows`, in one forward pass.
    pub fn compute_row_offsets(&self, rows: &[Row], default_height: f64) -> RowOffsets {
        RowOffsets::from_heights(
            rows.iter()
                .enumerate()
                .map(|(i, row)| self.get_row_height(row, i, default_height)),
        )
    }
}
