//! Status bar panels assembled from grid counts and an optional aggregation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compare::parse_number;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PanelPosition {
    #[default]
    Left,
    Center,
    Right,
}

/// One rendered panel.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusPanel {
    pub id: String,
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub position: PanelPosition,
}

impl StatusPanel {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        value: impl Into<String>,
        position: PanelPosition,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: value.into(),
            position,
        }
    }
}

/// Which built-in panels to show, plus custom panels appended last.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusBarConfig {
    pub show_total_rows: bool,
    pub show_filtered_rows: bool,
    pub show_selected_rows: bool,
    pub show_aggregation: bool,
    pub custom_panels: Vec<StatusPanel>,
}

impl Default for StatusBarConfig {
    fn default() -> Self {
        Self {
            show_total_rows: true,
            show_filtered_rows: true,
            show_selected_rows: true,
            show_aggregation: false,
            custom_panels: Vec::new(),
        }
    }
}

/// Numeric summary over a set of cell values.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Aggregation {
    pub sum: f64,
    pub avg: f64,
    pub count: usize,
    pub min: f64,
    pub max: f64,
}

impl Aggregation {
    /// Aggregate the numeric values (numbers and numeric strings); other
    /// values are skipped. `None` when nothing numeric was seen.
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a Value>) -> Option<Self> {
        let mut sum = 0.0;
        let mut count = 0usize;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for n in values.into_iter().filter_map(parse_number) {
            sum += n;
            count += 1;
            min = min.min(n);
            max = max.max(n);
        }
        if count == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let avg = sum / count as f64;
        Some(Self {
            sum,
            avg,
            count,
            min,
            max,
        })
    }
}

/// Integers render bare, anything else with two decimals.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        format!("{n}")
    } else {
        format!("{n:.2}")
    }
}

/// Counts feeding [`StatusBar::panels`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatusBarInput {
    pub total_rows: usize,
    pub filtered_rows: usize,
    pub selected_rows: usize,
    pub aggregation: Option<Aggregation>,
}

#[derive(Debug, Clone, Default)]
pub struct StatusBar {
    config: StatusBarConfig,
}

impl StatusBar {
    pub fn new(config: StatusBarConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StatusBarConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: StatusBarConfig) {
        self.config = config;
    }

    pub fn panels(&self, input: &StatusBarInput) -> Vec<StatusPanel> {
        let config = &self.config;
        let mut panels = Vec::new();

        if config.show_total_rows {
            panels.push(StatusPanel::new(
                "totalRows",
                "Total Rows",
                input.total_rows.to_string(),
                PanelPosition::Left,
            ));
        }
        if config.show_filtered_rows && input.filtered_rows != input.total_rows {
            panels.push(StatusPanel::new(
                "filteredRows",
                "Filtered",
                input.filtered_rows.to_string(),
                PanelPosition::Left,
            ));
        }
        if config.show_selected_rows && input.selected_rows > 0 {
            panels.push(StatusPanel::new(
                "selectedRows",
                "Selected",
                input.selected_rows.to_string(),
                PanelPosition::Center,
            ));
        }
        if let Some(agg) = input
            .aggregation
            .filter(|agg| config.show_aggregation && agg.count > 0)
        {
            let entries = [
                ("sum", "Sum", format_number(agg.sum)),
                ("avg", "Avg", format_number(agg.avg)),
                ("count", "Count", agg.count.to_string()),
                ("min", "Min", format_number(agg.min)),
                ("max", "Max", format_number(agg.max)),
            ];
            for (id, label, value) in entries {
                panels.push(StatusPanel::new(id, label, value, PanelPosition::Right));
            }
        }

        panels.extend(config.custom_panels.iter().cloned());
        panels
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn ids(panels: &[StatusPanel]) -> Vec<&str> {
        panels.iter().map(|p| p.id.as_str()).collect()
    }

    #[test_case(3.0, "3" ; "integer")]
    #[test_case(2.5, "2.50" ; "fraction")]
    #[test_case(-1.0 / 3.0, "-0.33" ; "repeating")]
    #[test_case(0.0, "0" ; "zero")]
    fn test_format_number(n: f64, expected: &str) {
        assert_eq!(format_number(n), expected);
    }

    #[test]
    fn test_aggregation_skips_non_numeric() {
        let values = [json!(1), json!("2.5"), json!("n/a"), json!(null), json!(4)];
        let agg = Aggregation::from_values(&values).unwrap();
        assert_eq!(agg.count, 3);
        assert_eq!(agg.sum, 7.5);
        assert_eq!(agg.avg, 2.5);
        assert_eq!(agg.min, 1.0);
        assert_eq!(agg.max, 4.0);
    }

    #[test]
    fn test_aggregation_empty() {
        assert!(Aggregation::from_values(&[json!("x")]).is_none());
    }

    #[test]
    fn test_default_panels_hide_unchanged_counts() {
        let bar = StatusBar::default();
        let panels = bar.panels(&StatusBarInput {
            total_rows: 10,
            filtered_rows: 10,
            ..StatusBarInput::default()
        });
        assert_eq!(ids(&panels), ["totalRows"]);
    }

    #[test]
    fn test_filtered_and_selected_panels() {
        let bar = StatusBar::default();
        let panels = bar.panels(&StatusBarInput {
            total_rows: 10,
            filtered_rows: 4,
            selected_rows: 2,
            aggregation: None,
        });
        assert_eq!(ids(&panels), ["totalRows", "filteredRows", "selectedRows"]);
        assert_eq!(panels[2].position, PanelPosition::Center);
    }

    #[test]
    fn test_aggregation_panels_and_custom_last() {
        let bar = StatusBar::new(StatusBarConfig {
            show_total_rows: false,
            show_aggregation: true,
            custom_panels: vec![StatusPanel::new("ver", "Version", "1", PanelPosition::Right)],
            ..StatusBarConfig::default()
        });
        let panels = bar.panels(&StatusBarInput {
            aggregation: Aggregation::from_values(&[json!(1), json!(2)]),
            ..StatusBarInput::default()
        });
        assert_eq!(ids(&panels), ["sum", "avg", "count", "min", "max", "ver"]);
        assert_eq!(panels[1].value, "1.50");
    }
}
