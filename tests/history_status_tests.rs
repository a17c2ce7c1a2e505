//! Edit history and status bar tests
//!
//! Tests for undo/redo replay against real rows and for status bar panel
//! assembly from grid counts.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{assert_close, people};
use progrid::status_bar::{
    format_number, Aggregation, PanelPosition, StatusBar, StatusBarConfig, StatusBarInput,
    StatusPanel,
};
use progrid::undo::UndoRedoManager;
use progrid::{CellChange, Row};
use serde_json::{json, Value};
use test_case::test_case;

/// Apply a change the way a host would: write `new_value` into the row.
fn apply(rows: &mut [Row], change: &CellChange) {
    rows[change.row_index].insert(change.field.clone(), change.new_value.clone());
}

fn edit(rows: &mut [Row], history: &mut UndoRedoManager, index: usize, field: &str, value: Value) {
    let old = rows[index].get(field).cloned().unwrap_or(Value::Null);
    let change = CellChange::new(index, field, old, value);
    apply(rows, &change);
    history.push(change);
}

// ============================================================================
// Undo / Redo
// ============================================================================

#[test]
fn test_undo_restores_rows() {
    let original = people();
    let mut data = original.clone();
    let mut history = UndoRedoManager::default();
    edit(&mut data, &mut history, 0, "name", json!("Alicia"));
    edit(&mut data, &mut history, 2, "age", json!(43));
    edit(&mut data, &mut history, 0, "name", json!("Ally"));

    while let Some(change) = history.undo() {
        apply(&mut data, &change);
    }
    assert_eq!(data, original);
    assert_eq!(history.redo_size(), 3);
}

#[test]
fn test_redo_replays_rows() {
    let mut data = people();
    let mut history = UndoRedoManager::default();
    edit(&mut data, &mut history, 1, "city", json!("Austin"));
    edit(&mut data, &mut history, 3, "age", json!(50));
    let edited = data.clone();

    while let Some(change) = history.undo() {
        apply(&mut data, &change);
    }
    while let Some(change) = history.redo() {
        apply(&mut data, &change);
    }
    assert_eq!(data, edited);
    assert!(!history.can_redo());
}

#[test]
fn test_new_edit_discards_redo() {
    let mut data = people();
    let mut history = UndoRedoManager::default();
    edit(&mut data, &mut history, 0, "name", json!("A"));
    edit(&mut data, &mut history, 0, "name", json!("B"));
    let change = history.undo().unwrap();
    apply(&mut data, &change);
    assert!(history.can_redo());

    edit(&mut data, &mut history, 0, "name", json!("C"));
    assert!(!history.can_redo());
    assert_eq!(history.undo_size(), 2);
}

#[test]
fn test_edit_adds_missing_field_and_undo_writes_null() {
    let mut data = people();
    let mut history = UndoRedoManager::default();
    edit(&mut data, &mut history, 0, "nickname", json!("Al"));
    let change = history.undo().unwrap();
    assert_eq!(change.new_value, Value::Null);
    apply(&mut data, &change);
    assert_eq!(data[0]["nickname"], Value::Null);
}

#[test_case(1, 5, 1 ; "depth one")]
#[test_case(3, 10, 3 ; "evicts oldest")]
#[test_case(10, 4, 4 ; "under limit")]
fn test_depth_bounds_history(depth: usize, edits: usize, expected: usize) {
    let mut data = people();
    let mut history = UndoRedoManager::new(depth);
    for i in 0..edits {
        edit(&mut data, &mut history, 0, "age", json!(i));
    }
    assert_eq!(history.undo_size(), expected);

    // The oldest surviving entry restores the value it replaced
    let mut last = None;
    while let Some(change) = history.undo() {
        last = Some(change);
    }
    let oldest_kept = edits - expected;
    let restored = last.unwrap().new_value;
    if oldest_kept == 0 {
        assert_eq!(restored, json!(31));
    } else {
        assert_eq!(restored, json!(oldest_kept - 1));
    }
}

#[test]
fn test_shrinking_depth_trims() {
    let mut history = UndoRedoManager::new(10);
    for i in 0..6 {
        history.push(CellChange::new(i, "x", json!(null), json!(i)));
    }
    history.set_max_depth(2);
    assert_eq!(history.undo_size(), 2);
    assert_eq!(history.undo().unwrap().row_index, 5);
    assert_eq!(history.undo().unwrap().row_index, 4);
    assert!(history.undo().is_none());
}

#[test]
fn test_clear_empties_both_stacks() {
    let mut history = UndoRedoManager::default();
    history.push(CellChange::new(0, "x", json!(1), json!(2)));
    history.push(CellChange::new(0, "x", json!(2), json!(3)));
    history.undo();
    history.clear();
    assert!(!history.can_undo());
    assert!(!history.can_redo());
}

// ============================================================================
// Status Bar
// ============================================================================

fn values(panels: &[StatusPanel]) -> Vec<(&str, &str)> {
    panels
        .iter()
        .map(|p| (p.id.as_str(), p.value.as_str()))
        .collect()
}

#[test]
fn test_default_panels_unfiltered() {
    let bar = StatusBar::default();
    let panels = bar.panels(&StatusBarInput {
        total_rows: 1200,
        filtered_rows: 1200,
        ..StatusBarInput::default()
    });
    assert_eq!(values(&panels), [("totalRows", "1200")]);
    assert_eq!(panels[0].label, "Total Rows");
    assert_eq!(panels[0].position, PanelPosition::Left);
}

#[test]
fn test_filtered_and_selected_panels() {
    let bar = StatusBar::default();
    let panels = bar.panels(&StatusBarInput {
        total_rows: 100,
        filtered_rows: 12,
        selected_rows: 3,
        aggregation: None,
    });
    assert_eq!(
        values(&panels),
        [("totalRows", "100"), ("filteredRows", "12"), ("selectedRows", "3")]
    );
    assert_eq!(panels[2].position, PanelPosition::Center);
}

#[test]
fn test_aggregation_over_column() {
    let data = people();
    let agg = Aggregation::from_values(data.iter().filter_map(|r| r.get("age"))).unwrap();
    assert_eq!(agg.count, 3);
    assert_close(agg.sum, 98.0);
    assert_close(agg.min, 25.0);
    assert_close(agg.max, 42.0);

    let bar = StatusBar::new(StatusBarConfig {
        show_aggregation: true,
        ..StatusBarConfig::default()
    });
    let panels = bar.panels(&StatusBarInput {
        total_rows: 4,
        filtered_rows: 4,
        selected_rows: 0,
        aggregation: Some(agg),
    });
    assert_eq!(
        values(&panels),
        [
            ("totalRows", "4"),
            ("sum", "98"),
            ("avg", "32.67"),
            ("count", "3"),
            ("min", "25"),
            ("max", "42"),
        ]
    );
    assert!(panels[1..].iter().all(|p| p.position == PanelPosition::Right));
}

#[test]
fn test_aggregation_hidden_unless_enabled() {
    let agg = Aggregation::from_values([json!(1), json!(2)].iter());
    let panels = StatusBar::default().panels(&StatusBarInput {
        total_rows: 2,
        filtered_rows: 2,
        selected_rows: 0,
        aggregation: agg,
    });
    assert_eq!(panels.len(), 1);
}

#[test]
fn test_non_numeric_column_has_no_aggregation() {
    let data = people();
    assert!(Aggregation::from_values(data.iter().filter_map(|r| r.get("city"))).is_none());
}

#[test]
fn test_custom_panels_come_last() {
    let config: StatusBarConfig = serde_json::from_value(json!({
        "showTotalRows": false,
        "customPanels": [
            {"id": "build", "label": "Build", "value": "42", "position": "right"},
            {"id": "note", "label": "Note", "value": "draft"}
        ]
    }))
    .unwrap();
    let panels = StatusBar::new(config).panels(&StatusBarInput {
        total_rows: 10,
        filtered_rows: 5,
        ..StatusBarInput::default()
    });
    assert_eq!(
        values(&panels),
        [("filteredRows", "5"), ("build", "42"), ("note", "draft")]
    );
    assert_eq!(panels[2].position, PanelPosition::Left);
}

#[test_case(3.0, "3")]
#[test_case(-12.0, "-12")]
#[test_case(2.5, "2.50")]
#[test_case(1.0 / 3.0, "0.33" ; "repeating fraction")]
fn test_format_number(n: f64, expected: &str) {
    assert_eq!(format_number(n), expected);
}
