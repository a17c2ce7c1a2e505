//! Value coercion and comparison used by sorting and filtering.
//!
//! Coercions are lenient: anything that cannot be read as the requested type
//! degrades to a neutral value instead of failing.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::types::value_text;

/// Numeric reading of a value; unreadable values become `0`.
pub fn coerce_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => 0.0,
    };
    if n.is_nan() {
        0.0
    } else {
        n
    }
}

/// Strict numeric reading: `None` unless the value is a number or numeric string.
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Millisecond timestamp of a date value.
///
/// Numbers are taken as timestamps. Strings are read as RFC 3339, as a
/// zone-less date-time (treated as UTC) or as a plain `YYYY-MM-DD` date.
pub fn date_millis(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_date_str(s.trim()).map(|ms| ms as f64),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Truthiness in the host's sense.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn compare_numbers(a: &Value, b: &Value) -> Ordering {
    coerce_number(a)
        .partial_cmp(&coerce_number(b))
        .unwrap_or(Ordering::Equal)
}

/// Dates compare by timestamp. Unreadable dates order after readable ones
/// and tie with each other.
pub fn compare_dates(a: &Value, b: &Value) -> Ordering {
    match (date_millis(a), date_millis(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (x, y) => x.is_none().cmp(&y.is_none()),
    }
}

/// `true` sorts after `false`.
pub fn compare_booleans(a: &Value, b: &Value) -> Ordering {
    truthy(a).cmp(&truthy(b))
}

pub fn compare_text(a: &Value, b: &Value) -> Ordering {
    natural_cmp(
        &fold_text(&value_text(Some(a))),
        &fold_text(&value_text(Some(b))),
    )
}

/// Lower-case and strip diacritics so `É` and `e` compare equal.
pub fn fold_text(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compare strings with digit runs ordered by numeric value (`item2` < `item10`).
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let run_a = take_digits(&mut left);
                let run_b = take_digits(&mut right);
                let ord = compare_digit_runs(&run_a, &run_b);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.cmp(&y);
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
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
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!(5), 5.0 ; "number")]
    #[test_case(json!(" 2.5 "), 2.5 ; "numeric string")]
    #[test_case(json!("abc"), 0.0 ; "text")]
    #[test_case(json!(""), 0.0 ; "empty string")]
    #[test_case(json!(true), 1.0 ; "boolean")]
    #[test_case(json!([1]), 0.0 ; "array")]
    fn test_coerce_number(value: Value, expected: f64) {
        assert_eq!(coerce_number(&value), expected);
    }

    #[test_case("item2", "item10", Ordering::Less ; "numeric runs")]
    #[test_case("Apple", "apple", Ordering::Equal ; "case")]
    #[test_case("café", "cafe", Ordering::Equal ; "accent")]
    #[test_case("b", "a10", Ordering::Greater ; "letters first")]
    #[test_case("x007", "x7", Ordering::Equal ; "leading zeros")]
    #[test_case("ab", "abc", Ordering::Less ; "prefix")]
    fn test_text_order(a: &str, b: &str, expected: Ordering) {
        assert_eq!(compare_text(&json!(a), &json!(b)), expected);
    }

    #[test]
    fn test_dates() {
        assert_eq!(
            compare_dates(&json!("2024-01-02"), &json!("2024-01-10")),
            Ordering::Less
        );
        assert_eq!(
            compare_dates(&json!("2024-01-02T10:00:00Z"), &json!("2024-01-02T09:00:00Z")),
            Ordering::Greater
        );
        assert_eq!(
            compare_dates(&json!("not a date"), &json!("2024-01-02")),
            Ordering::Greater
        );
        assert_eq!(
            compare_dates(&json!("2024-01-02"), &json!("soon")),
            Ordering::Less
        );
        assert_eq!(
            compare_dates(&json!("soon"), &json!("not a date")),
            Ordering::Equal
        );
        assert_eq!(date_millis(&json!("1970-01-02")), Some(86_400_000.0));
    }

    #[test]
    fn test_booleans() {
        assert_eq!(compare_booleans(&json!(true), &json!(false)), Ordering::Greater);
        assert_eq!(compare_booleans(&json!(false), &json!(false)), Ordering::Equal);
    }
}
