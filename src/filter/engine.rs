//! Per-column filters combined with AND.

use std::borrow::Cow;
use std::cmp::Ordering;

use tracing::debug;

use crate::compare::parse_number;
use crate::types::{
    is_nullish, value_text, ColumnFilter, FilterCondition, FilterModel, NumberFilterOperator, Row,
    TextFilterOperator,
};

/// Holds the active column filter model and applies it to rows.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    model: FilterModel,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(&self) -> &[ColumnFilter] {
        &self.model
    }

    pub fn set_model(&mut self, model: FilterModel) {
        self.model = model;
        debug!(filters = self.model.len(), "filter model set");
    }

    /// Add a filter, replacing any existing filter on the same field.
    pub fn set_filter(&mut self, filter: ColumnFilter) {
        match self.model.iter_mut().find(|f| f.field == filter.field) {
            Some(existing) => *existing = filter,
            None => self.model.push(filter),
        }
    }

    /// Remove the filter on `field`; returns whether one existed.
    pub fn remove_filter(&mut self, field: &str) -> bool {
        let before = self.model.len();
        self.model.retain(|f| f.field != field);
        self.model.len() != before
    }

    pub fn clear(&mut self) {
        self.model.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.model.is_empty()
    }

    pub fn is_filtered(&self, field: &str) -> bool {
        self.model.iter().any(|f| f.field == field)
    }

    /// Rows passing every filter. An empty model returns the input itself.
    pub fn filter<'a>(&self, rows: &'a [Row]) -> Cow<'a, [Row]> {
        if self.model.is_empty() {
            return Cow::Borrowed(rows);
        }
        Cow::Owned(rows.iter().filter(|row| self.matches(row)).cloned().collect())
    }

    /// Keep only the row positions whose rows pass every filter.
    pub fn retain_matching(&self, rows: &[Row], positions: &mut Vec<usize>) {
        if self.model.is_empty() {
            return;
        }
        positions.retain(|&i| rows.get(i).is_some_and(|row| self.matches(row)));
    }

    pub fn matches(&self, row: &Row) -> bool {
        self.model.iter().all(|filter| passes(row, filter))
    }
}

/// Whether `row` passes a single column filter.
pub fn passes(row: &Row, filter: &ColumnFilter) -> bool {
    let value = row.get(&filter.field);
    match &filter.condition {
        FilterCondition::Blank => is_blank(value),
        FilterCondition::NotBlank => !is_blank(value),
        FilterCondition::Text { operator, value: needle } => {
            let text = value_text(value).to_lowercase();
            let needle = needle.to_lowercase();
            match operator {
                TextFilterOperator::Contains => text.contains(&needle),
                TextFilterOperator::NotContains => !text.contains(&needle),
                TextFilterOperator::Equals => text == needle,
                TextFilterOperator::NotEquals => text != needle,
                TextFilterOperator::StartsWith => text.starts_with(&needle),
                TextFilterOperator::EndsWith => text.ends_with(&needle),
            }
        }
        FilterCondition::Number { operator, value: target } => {
            let Some(n) = value.and_then(parse_number) else {
                return false;
            };
            let ord = n.partial_cmp(target);
            match operator {
                NumberFilterOperator::Equals => ord == Some(Ordering::Equal),
                NumberFilterOperator::NotEquals => ord != Some(Ordering::Equal),
                NumberFilterOperator::GreaterThan => ord == Some(Ordering::Greater),
                NumberFilterOperator::GreaterThanOrEqual => {
                    matches!(ord, Some(Ordering::Greater | Ordering::Equal))
                }
                NumberFilterOperator::LessThan => ord == Some(Ordering::Less),
                NumberFilterOperator::LessThanOrEqual => {
                    matches!(ord, Some(Ordering::Less | Ordering::Equal))
                }
            }
        }
        FilterCondition::InRange { from, to } => value
            .and_then(parse_number)
            .is_some_and(|n| n >= *from && n <= *to),
        FilterCondition::Set { values } => {
            let text = value_text(value);
            values.iter().any(|v| *v == text)
        }
    }
}

fn is_blank(value: Option<&serde_json::Value>) -> bool {
    is_nullish(value) || value_text(value).trim().is_empty()
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
    use serde_json::{json, Value};
    use test_case::test_case;

    fn row(v: Value) -> Row {
        v.as_object().cloned().unwrap()
    }

    #[test_case(TextFilterOperator::Contains, "LIC", true)]
    #[test_case(TextFilterOperator::NotContains, "lic", false)]
    #[test_case(TextFilterOperator::Equals, "alice", true)]
    #[test_case(TextFilterOperator::StartsWith, "al", true)]
    #[test_case(TextFilterOperator::EndsWith, "al", false)]
    fn test_text_operators(operator: TextFilterOperator, needle: &str, expected: bool) {
        let filter = ColumnFilter::new(
            "name",
            FilterCondition::Text {
                operator,
                value: needle.into(),
            },
        );
        assert_eq!(passes(&row(json!({"name": "Alice"})), &filter), expected);
    }

    #[test]
    fn test_number_filters_skip_non_numbers() {
        let filter = ColumnFilter::new(
            "age",
            FilterCondition::Number {
                operator: NumberFilterOperator::GreaterThan,
                value: 30.0,
            },
        );
        assert!(passes(&row(json!({"age": 31})), &filter));
        assert!(passes(&row(json!({"age": "42"})), &filter));
        assert!(!passes(&row(json!({"age": "old"})), &filter));
        assert!(!passes(&row(json!({})), &filter));
    }

    #[test]
    fn test_model_is_and_and_replaces_by_field() {
        let mut engine = FilterEngine::new();
        engine.set_filter(ColumnFilter::contains("name", "a"));
        engine.set_filter(ColumnFilter::new(
            "age",
            FilterCondition::InRange { from: 20.0, to: 30.0 },
        ));
        engine.set_filter(ColumnFilter::contains("name", "b"));
        assert_eq!(engine.model().len(), 2);

        let rows = vec![
            row(json!({"name": "bob", "age": 25})),
            row(json!({"name": "bob", "age": 35})),
            row(json!({"name": "ann", "age": 25})),
        ];
        assert_eq!(engine.filter(&rows).len(), 1);
        assert!(engine.remove_filter("age"));
        assert_eq!(engine.filter(&rows).len(), 2);
    }

    #[test]
    fn test_blank_and_set() {
        let blank = ColumnFilter::new("x", FilterCondition::Blank);
        assert!(passes(&row(json!({"x": null})), &blank));
        assert!(passes(&row(json!({"x": "  "})), &blank));
        assert!(!passes(&row(json!({"x": 0})), &blank));

        let set = ColumnFilter::new(
            "x",
            FilterCondition::Set {
                values: vec!["1".into(), "two".into()],
            },
        );
        assert!(passes(&row(json!({"x": 1})), &set));
        assert!(!passes(&row(json!({"x": "three"})), &set));
    }
}
