use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GridError, Result};

/// A grid row: an open-ended mapping from field name to value.
pub type Row = Map<String, Value>;

/// Default identity field for rows.
pub const DEFAULT_ROW_KEY: &str = "id";

/// Hashable row identity.
///
/// Built from the JSON text of the key value, so `1` and `"1"` stay distinct
/// the same way strict equality keeps them apart in the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    /// Identity of an arbitrary key value.
    pub fn from_value(value: &Value) -> Self {
        Self(value.to_string())
    }

    /// Identity of `row` under `row_key`. Rows without the key share the `null` identity.
    pub fn of(row: &Row, row_key: &str) -> Self {
        Self::from_value(row.get(row_key).unwrap_or(&Value::Null))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        Self::from_value(&Value::String(s.to_string()))
    }
}

impl From<i64> for RowId {
    fn from(n: i64) -> Self {
        Self::from_value(&Value::from(n))
    }
}

/// Whether two rows share the same key value (strict equality).
pub fn same_row(a: &Row, b: &Row, row_key: &str) -> bool {
    a.get(row_key) == b.get(row_key)
}

/// Whether a value counts as empty for sorting and filtering (`null` or missing).
pub fn is_nullish(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Render a value as display text.
///
/// Integral numbers print without a fraction (`3`, not `3.0`); `null` and
/// missing values render as the empty string.
pub fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if n.is_f64() => format_js_number(f),
            _ => n.to_string(),
        },
        Some(other) => other.to_string(),
    }
}

fn format_js_number(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

/// Decode rows from a JSON array of objects.
///
/// # Errors
/// Returns an error if the text is not JSON or any element is not an object.
pub fn rows_from_json(text: &str) -> Result<Vec<Row>> {
    let value: Value = serde_json::from_str(text)?;
    rows_from_value(value)
}

/// Decode rows from an already-parsed JSON value.
///
/// # Errors
/// Returns an error if the value is not an array of objects.
pub fn rows_from_value(value: Value) -> Result<Vec<Row>> {
    let Value::Array(items) = value else {
        return Err(GridError::InvalidRows("expected an array of rows".into()));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(row) => Ok(row),
            other => Err(GridError::InvalidRows(format!(
                "row {i} is not an object: {other}"
            ))),
        })
        .collect()
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
    fn test_row_id_distinguishes_types() {
        assert_ne!(RowId::from(1), RowId::from("1"));
        assert_eq!(RowId::from_value(&json!(7)), RowId::from(7));
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(Some(&json!(3.0))), "3");
        assert_eq!(value_text(Some(&json!(2.5))), "2.5");
        assert_eq!(value_text(Some(&json!(true))), "true");
        assert_eq!(value_text(Some(&Value::Null)), "");
        assert_eq!(value_text(None), "");
    }

    #[test]
    fn test_rows_from_json_rejects_non_objects() {
        assert!(rows_from_json(r#"[{"id": 1}, {"id": 2}]"#).is_ok());
        assert!(matches!(
            rows_from_json(r#"[{"id": 1}, 3]"#),
            Err(GridError::InvalidRows(_))
        ));
        assert!(matches!(rows_from_json("{}"), Err(GridError::InvalidRows(_))));
        assert!(matches!(rows_from_json("not json"), Err(GridError::Json(_))));
    }
}
