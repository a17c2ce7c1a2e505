use serde::{Deserialize, Serialize};

/// Text comparison operators (case-insensitive).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TextFilterOperator {
    #[default]
    Contains,
    NotContains,
    Equals,
    NotEquals,
    StartsWith,
    EndsWith,
}

/// Numeric comparison operators.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum NumberFilterOperator {
    #[default]
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

/// Condition applied to a single column.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FilterCondition {
    Text {
        operator: TextFilterOperator,
        value: String,
    },
    Number {
        operator: NumberFilterOperator,
        value: f64,
    },
    /// Inclusive numeric range.
    InRange { from: f64, to: f64 },
    /// Display text must be one of the listed values.
    Set { values: Vec<String> },
    Blank,
    NotBlank,
}

/// A filter on one column. A filter model combines these with AND.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnFilter {
    pub field: String,
    pub condition: FilterCondition,
}

impl ColumnFilter {
    pub fn new(field: impl Into<String>, condition: FilterCondition) -> Self {
        Self {
            field: field.into(),
            condition,
        }
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(
            field,
            FilterCondition::Text {
                operator: TextFilterOperator::Contains,
                value: value.into(),
            },
        )
    }
}

/// Active column filters.
pub type FilterModel = Vec<ColumnFilter>;
