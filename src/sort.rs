//! Multi-key row sorting.
//!
//! Sorting never mutates its input. Items of the sort model are applied in
//! order; the first non-equal comparison decides. Null and missing values go
//! last in both directions.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::Value;
use tracing::debug;

use crate::compare::{compare_booleans, compare_dates, compare_numbers, compare_text, date_millis};
use crate::types::{is_nullish, ColumnDef, ColumnType, Row, SortDirection, SortItem, SortModel};

/// A sort item resolved against its column definition.
struct SortKey<'a> {
    field: &'a str,
    desc: bool,
    column: Option<&'a ColumnDef>,
}

impl SortKey<'_> {
    fn compare(&self, a: &Row, b: &Row) -> Ordering {
        let va = a.get(self.field);
        let vb = b.get(self.field);
        let (va, vb) = match (va, vb) {
            (Some(x), Some(y)) if !x.is_null() && !y.is_null() => (x, y),
            _ => return compare_nulls(va, vb),
        };

        if let Some(comparator) = self.column.and_then(|c| c.comparator.as_ref()) {
            return comparator.compare(va, vb, a, b, self.desc);
        }

        let column_type = self.column.map(|c| c.column_type).unwrap_or_default();
        // Unreadable dates stay last in both directions, like nulls.
        if matches!(column_type, ColumnType::Date) {
            let (ra, rb) = (date_millis(va).is_some(), date_millis(vb).is_some());
            if !(ra && rb) {
                return rb.cmp(&ra);
            }
        }
        let ord = compare_by_type(column_type, va, vb);
        if self.desc {
            ord.reverse()
        } else {
            ord
        }
    }
}

fn compare_nulls(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (is_nullish(a), is_nullish(b)) {
        (true, true) | (false, false) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
    }
}

fn compare_by_type(column_type: ColumnType, a: &Value, b: &Value) -> Ordering {
    match column_type {
        ColumnType::Number => compare_numbers(a, b),
        ColumnType::Date => compare_dates(a, b),
        ColumnType::Boolean => compare_booleans(a, b),
        ColumnType::Text => compare_text(a, b),
    }
}

fn resolve_keys<'a>(model: &'a [SortItem], columns: &'a [ColumnDef]) -> Vec<SortKey<'a>> {
    model
        .iter()
        .map(|item| SortKey {
            field: &item.field,
            desc: item.direction.is_desc(),
            column: columns.iter().find(|c| c.field == item.field),
        })
        .collect()
}

fn compare_with_keys(keys: &[SortKey<'_>], a: &Row, b: &Row) -> Ordering {
    keys.iter()
        .map(|key| key.compare(a, b))
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

pub struct SortEngine;

impl SortEngine {
    /// Sort rows by the model. An empty model returns the input itself.
    pub fn sort<'a>(rows: &'a [Row], model: &[SortItem], columns: &[ColumnDef]) -> Cow<'a, [Row]> {
        if model.is_empty() {
            return Cow::Borrowed(rows);
        }
        let order = Self::sort_indices(rows, model, columns);
        Cow::Owned(
            order
                .into_iter()
                .filter_map(|i| rows.get(i).cloned())
                .collect(),
        )
    }

    /// Permutation of `0..rows.len()` in sorted order.
    pub fn sort_indices(rows: &[Row], model: &[SortItem], columns: &[ColumnDef]) -> Vec<usize> {
        let mut positions: Vec<usize> = (0..rows.len()).collect();
        Self::sort_positions(rows, &mut positions, model, columns);
        positions
    }

    /// Reorder row positions in place (stable). Positions outside `rows` are dropped.
    pub fn sort_positions(
        rows: &[Row],
        positions: &mut Vec<usize>,
        model: &[SortItem],
        columns: &[ColumnDef],
    ) {
        if model.is_empty() {
            return;
        }
        let keys = resolve_keys(model, columns);
        let mut pairs: Vec<(usize, &Row)> = positions
            .iter()
            .filter_map(|&i| rows.get(i).map(|row| (i, row)))
            .collect();
        pairs.sort_by(|(_, a), (_, b)| compare_with_keys(&keys, a, b));
        *positions = pairs.into_iter().map(|(i, _)| i).collect();
    }

    /// Compare two rows under a sort model.
    pub fn compare_rows(a: &Row, b: &Row, model: &[SortItem], columns: &[ColumnDef]) -> Ordering {
        compare_with_keys(&resolve_keys(model, columns), a, b)
    }

    /// `None -> Asc -> Desc -> None`.
    pub fn next_sort_direction(current: Option<SortDirection>) -> Option<SortDirection> {
        match current {
            None => Some(SortDirection::Asc),
            Some(SortDirection::Asc) => Some(SortDirection::Desc),
            Some(SortDirection::Desc) => None,
        }
    }

    /// Model after the user activates sorting on `field`.
    ///
    /// Single-sort replaces the whole model (or clears it when the cycle ends).
    /// Multi-sort moves `field` to the end with its next direction, or drops it.
    pub fn update_sort_model(current: &[SortItem], field: &str, multi_sort: bool) -> SortModel {
        let existing = current
            .iter()
            .find(|item| item.field == field)
            .map(|item| item.direction);
        let next = Self::next_sort_direction(existing);

        let model: SortModel = if multi_sort {
            let mut model: SortModel = current
                .iter()
                .filter(|item| item.field != field)
                .cloned()
                .collect();
            if let Some(direction) = next {
                model.push(SortItem::new(field, direction));
            }
            model
        } else {
            next.map(|direction| vec![SortItem::new(field, direction)])
                .unwrap_or_default()
        };
        debug!(field, multi_sort, keys = model.len(), "sort model updated");
        model
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
    use serde_json::json;

    fn row(v: Value) -> Row {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_compare_rows_tie_break() {
        let cols = [ColumnDef::new("n").with_type(ColumnType::Number)];
        let a = row(json!({"g": "x", "n": 1}));
        let b = row(json!({"g": "x", "n": 2}));
        let model = [SortItem::asc("g"), SortItem::desc("n")];
        assert_eq!(SortEngine::compare_rows(&a, &b, &model, &cols), Ordering::Greater);
    }

    #[test]
    fn test_next_direction_cycles() {
        let mut dir = None;
        let mut seen = Vec::new();
        for _ in 0..3 {
            dir = SortEngine::next_sort_direction(dir);
            seen.push(dir);
        }
        assert_eq!(
            seen,
            vec![Some(SortDirection::Asc), Some(SortDirection::Desc), None]
        );
    }
}
