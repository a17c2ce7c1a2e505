//! Global text search across visible columns.

use std::borrow::Cow;
use std::collections::HashSet;

use serde_json::Value;
use tracing::trace;

use crate::types::{value_text, ColumnDef, Row};

/// Joins field values; never occurs in natural text, so terms cannot match across fields.
const FIELD_SEPARATOR: char = '\u{1f}';

#[derive(Debug, Clone)]
struct CompiledMatcher {
    key: String,
    terms: Vec<String>,
}

impl CompiledMatcher {
    fn compile(text: &str) -> Option<Self> {
        let lowered = text.trim().to_lowercase();
        let terms: Vec<String> = lowered.split_whitespace().map(str::to_string).collect();
        if terms.is_empty() {
            return None;
        }
        Some(Self {
            key: terms.join(" "),
            terms,
        })
    }

    fn matches(&self, row: &Row, columns: &[ColumnDef]) -> bool {
        let haystack = row_search_text(row, columns);
        self.terms.iter().all(|term| haystack.contains(term.as_str()))
    }
}

/// Lower-cased concatenation of a row's visible column values.
fn row_search_text(row: &Row, columns: &[ColumnDef]) -> String {
    let mut text = String::new();
    for (i, column) in columns.iter().filter(|c| !c.hidden).enumerate() {
        if i > 0 {
            text.push(FIELD_SEPARATOR);
        }
        text.push_str(&value_text(row.get(&column.field)));
    }
    text.to_lowercase()
}

fn normalized_key(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Case-insensitive search where every whitespace-separated term must match.
///
/// The last compiled matcher is cached by its normalized terms and reused
/// while the search text is unchanged.
#[derive(Debug, Clone, Default)]
pub struct QuickFilter {
    cached: Option<CompiledMatcher>,
}

impl QuickFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows matching `text`. Blank text returns the input itself.
    pub fn filter<'a>(
        &mut self,
        rows: &'a [Row],
        columns: &[ColumnDef],
        text: &str,
    ) -> Cow<'a, [Row]> {
        let Some(matcher) = self.matcher(text) else {
            return Cow::Borrowed(rows);
        };
        Cow::Owned(
            rows.iter()
                .filter(|row| matcher.matches(row, columns))
                .cloned()
                .collect(),
        )
    }

    /// Keep only the row positions whose rows match `text`.
    pub fn retain_matching(
        &mut self,
        rows: &[Row],
        positions: &mut Vec<usize>,
        columns: &[ColumnDef],
        text: &str,
    ) {
        let Some(matcher) = self.matcher(text) else {
            return;
        };
        positions.retain(|&i| rows.get(i).is_some_and(|row| matcher.matches(row, columns)));
    }

    /// Whether `row` matches `text` (blank text matches everything).
    pub fn matches(&mut self, row: &Row, columns: &[ColumnDef], text: &str) -> bool {
        self.matcher(text)
            .map_or(true, |matcher| matcher.matches(row, columns))
    }

    /// Whether the cached matcher was compiled for `text`.
    pub fn is_cached(&self, text: &str) -> bool {
        self.cached
            .as_ref()
            .is_some_and(|m| m.key == normalized_key(text))
    }

    /// Distinct values of `field` in first-occurrence order. Missing values count as `null`.
    pub fn unique_values(rows: &[Row], field: &str) -> Vec<Value> {
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for row in rows {
            let value = row.get(field).cloned().unwrap_or(Value::Null);
            if seen.insert(value.to_string()) {
                values.push(value);
            }
        }
        values
    }

    fn matcher(&mut self, text: &str) -> Option<&CompiledMatcher> {
        let key = normalized_key(text);
        if key.is_empty() {
            return None;
        }
        if self.cached.as_ref().map_or(true, |m| m.key != key) {
            self.cached = CompiledMatcher::compile(text);
            trace!(key = %key, "quick filter compiled");
        }
        self.cached.as_ref()
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

    #[test]
    fn test_terms_do_not_span_fields() {
        let columns = [ColumnDef::new("a"), ColumnDef::new("b")];
        let row = json!({"a": "foo", "b": "bar"}).as_object().cloned().unwrap();
        let mut qf = QuickFilter::new();
        assert!(qf.matches(&row, &columns, "foo bar"));
        assert!(!qf.matches(&row, &columns, "foobar"));
    }

    #[test]
    fn test_cache_tracks_normalized_text() {
        let mut qf = QuickFilter::new();
        let rows: Vec<Row> = Vec::new();
        let _ = qf.filter(&rows, &[], "  Alice   Active ");
        assert!(qf.is_cached("alice active"));
        assert!(!qf.is_cached("alice"));
    }

    #[test]
    fn test_unique_values_first_occurrence() {
        let rows: Vec<Row> = [json!({"c": "x"}), json!({"c": 1}), json!({"c": "x"}), json!({})]
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect();
        assert_eq!(
            QuickFilter::unique_values(&rows, "c"),
            vec![json!("x"), json!(1), Value::Null]
        );
    }
}
