//! Common test fixtures and helpers.
//!
//! Row and column builders shared by the integration tests.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use progrid::{ColumnDef, ColumnType, Row};
use serde_json::Value;

// ============================================================================
// Row Builders
// ============================================================================

/// Build a row from a JSON object literal.
pub fn row(value: Value) -> Row {
    value.as_object().cloned().expect("row must be a JSON object")
}

/// Build rows from JSON object literals.
pub fn rows(values: impl IntoIterator<Item = Value>) -> Vec<Row> {
    values.into_iter().map(row).collect()
}

/// Rows `{id: 0..n, name: "row i"}`.
pub fn numbered_rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| row(serde_json::json!({"id": i, "name": format!("row {i}")})))
        .collect()
}

/// A small people table used across suites.
pub fn people() -> Vec<Row> {
    let people = [
        (1, "Alice", Value::from(31), "New York", "active"),
        (2, "Bob", Value::from(25), "Boston", "inactive"),
        (3, "Carol", Value::from(42), "Chicago", "active"),
        (4, "Dave", Value::Null, "Denver", "active"),
    ];
    rows(people.map(|(id, name, age, city, status)| {
        serde_json::json!({"id": id, "name": name, "age": age, "city": city, "status": status})
    }))
}

// ============================================================================
// Column Builders
// ============================================================================

pub fn people_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("id").with_type(ColumnType::Number),
        ColumnDef::new("name").sortable(),
        ColumnDef::new("age").with_type(ColumnType::Number).sortable(),
        ColumnDef::new("city"),
        ColumnDef::new("status"),
    ]
}

// ============================================================================
// Assertions
// ============================================================================

/// The `field` value of each row as display text.
pub fn field_texts<'a>(rows: impl IntoIterator<Item = &'a Row>, field: &str) -> Vec<String> {
    rows.into_iter()
        .map(|r| match r.get(field) {
            Some(Value::String(s)) => s.clone(),
            Some(v) => v.to_string(),
            None => "<missing>".to_string(),
        })
        .collect()
}

/// Float comparison with a small tolerance.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
