//! Browser tests for the wasm surface
//!
//! Tests for the `ProGrid` bindings, host event delivery and the DOM focus
//! host. Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use progrid::nav::{DomFocusHost, FocusManager};
use progrid::ProGrid;
use serde::Serialize;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Element, KeyboardEvent, KeyboardEventInit};

wasm_bindgen_test_configure!(run_in_browser);

fn js(value: Value) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap()
}

fn rust(value: JsValue) -> Value {
    serde_wasm_bindgen::from_value(value).unwrap()
}

fn names(rows: &Value) -> Vec<&str> {
    rows.as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect()
}

fn key(name: &str) -> KeyboardEvent {
    let init = KeyboardEventInit::new();
    init.set_key(name);
    init.set_cancelable(true);
    KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap()
}

/// Three rows, two per page, sortable names, multiple selection.
fn grid() -> ProGrid {
    let options = json!({"pagination": true, "pageSize": 2, "selectionMode": "multiple"});
    let mut grid = ProGrid::new(js(options)).unwrap();
    grid.set_columns(js(json!([
        {"field": "name", "sortable": true},
        {"field": "city"}
    ])))
    .unwrap();
    grid.set_rows(js(json!([
        {"id": 1, "name": "Carol", "city": "Chicago"},
        {"id": 2, "name": "Alice", "city": "Austin"},
        {"id": 3, "name": "Bob", "city": "Boston"}
    ])))
    .unwrap();
    grid
}

/// A connected container with `rows` x `cols` rendered cells.
fn container(rows: usize, cols: usize) -> Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let root = document.create_element("div").unwrap();
    let mut html = String::new();
    for r in 0..rows {
        for c in 0..cols {
            html.push_str(&format!(r#"<div data-row-index="{r}" data-col-index="{c}"></div>"#));
        }
    }
    root.set_inner_html(&html);
    document.body().unwrap().append_child(&root).unwrap();
    root
}

fn cell_tab_index(root: &Element, row: usize, col: usize) -> Option<String> {
    let selector = format!(r#"[data-row-index="{row}"][data-col-index="{col}"]"#);
    root.query_selector(&selector).unwrap().unwrap().get_attribute("tabindex")
}

// ============================================================================
// Bindings
// ============================================================================

#[wasm_bindgen_test]
fn test_sort_and_page_through_bindings() {
    let mut grid = grid();
    assert_eq!(names(&rust(grid.page_rows().unwrap())), ["Carol", "Alice"]);

    grid.toggle_sort("name");
    assert_eq!(names(&rust(grid.page_rows().unwrap())), ["Alice", "Bob"]);
    assert_eq!(rust(grid.sort_model().unwrap()), json!([{"field": "name", "direction": "asc"}]));

    grid.next_page();
    assert_eq!(names(&rust(grid.page_rows().unwrap())), ["Carol"]);
    let state = rust(grid.pagination_state().unwrap());
    assert_eq!(state["currentPage"], 2);
    assert_eq!(state["totalPages"], 2);
}

#[wasm_bindgen_test]
fn test_undefined_options_use_defaults() {
    let grid = ProGrid::new(JsValue::UNDEFINED).unwrap();
    assert_eq!(grid.total_rows(), 0);
    assert_eq!(rust(grid.visible_range().unwrap())["endIndex"], 0);
}

#[wasm_bindgen_test]
fn test_bad_input_is_rejected() {
    assert!(ProGrid::new(js(json!({"pageSize": "many"}))).is_err());

    let mut grid = grid();
    assert!(grid.set_columns(js(json!([{"headerName": "No field"}]))).is_err());
    assert!(grid.set_rows(js(json!([1, 2]))).is_err());
    assert_eq!(grid.total_rows(), 3);
}

#[wasm_bindgen_test]
fn test_edit_and_undo_through_bindings() {
    let mut grid = ProGrid::new(JsValue::UNDEFINED).unwrap();
    grid.set_columns(js(json!([{"field": "name", "editable": true}]))).unwrap();
    grid.set_rows(js(json!([{"id": 1, "name": "Ann"}]))).unwrap();

    assert!(grid.edit_cell(0, "name", js(json!("Anna"))).unwrap());
    let undone = rust(grid.undo().unwrap());
    assert_eq!(undone["newValue"], "Ann");
    assert_eq!(names(&rust(grid.visible_rows().unwrap())), ["Ann"]);
    assert_eq!(rust(grid.undo().unwrap()), Value::Null);
}

// ============================================================================
// Host Events
// ============================================================================

type Listener = Closure<dyn FnMut(JsValue, JsValue)>;

/// Attach a listener that records every event kind. Keep the closure alive
/// for as long as events are expected.
fn record_events(grid: &mut ProGrid) -> (Rc<RefCell<Vec<String>>>, Listener) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let callback = Listener::new(move |kind: JsValue, _: JsValue| {
        sink.borrow_mut().push(kind.as_string().unwrap());
    });
    grid.set_event_listener(Some(callback.as_ref().unchecked_ref::<Function>().clone()));
    (seen, callback)
}

#[wasm_bindgen_test]
fn test_listener_receives_grid_events() {
    let mut grid = grid();
    let (seen, _callback) = record_events(&mut grid);

    grid.toggle_sort("name");
    grid.set_quick_filter("");
    grid.next_page();
    grid.next_page();
    grid.toggle_row_selection(0);
    grid.toggle_row_selection(0);
    grid.resize_column("city", 220.0);

    assert_eq!(
        *seen.borrow(),
        [
            "sortChanged",
            "filterChanged",
            "pageChanged",
            "selectionChanged",
            "selectionChanged",
            "columnChanged",
        ]
    );
}

#[wasm_bindgen_test]
fn test_listener_can_be_removed() {
    let mut grid = grid();
    let (seen, _callback) = record_events(&mut grid);
    grid.set_event_listener(None);
    grid.toggle_sort("name");
    assert!(seen.borrow().is_empty());
}

// ============================================================================
// Keyboard
// ============================================================================

#[wasm_bindgen_test]
fn test_key_down_moves_and_prevents_default() {
    let mut grid = grid();
    let event = key("ArrowDown");
    assert!(grid.handle_key_down(&event));
    assert!(event.default_prevented());
    assert_eq!(rust(grid.active_cell().unwrap()), json!({"rowIndex": 1, "colIndex": 0}));

    let other = key("q");
    assert!(!grid.handle_key_down(&other));
    assert!(!other.default_prevented());
}

#[wasm_bindgen_test]
fn test_space_selects_and_notifies() {
    let mut grid = grid();
    let (seen, _callback) = record_events(&mut grid);
    assert!(grid.handle_key_down(&key(" ")));
    assert_eq!(rust(grid.selected_ids().unwrap()), json!(["1"]));
    assert_eq!(*seen.borrow(), ["selectionChanged"]);
}

#[wasm_bindgen_test]
fn test_arrow_keys_move_dom_focus() {
    let root = container(2, 2);
    let mut grid = grid();
    grid.attach_container(root.clone());

    grid.handle_key_down(&key("ArrowDown"));
    assert_eq!(cell_tab_index(&root, 1, 0).as_deref(), Some("0"));
    assert_eq!(cell_tab_index(&root, 0, 0).as_deref(), Some("-1"));

    grid.detach_container();
    grid.handle_key_down(&key("ArrowRight"));
    assert_eq!(cell_tab_index(&root, 1, 1).as_deref(), Some("-1"));
    root.remove();
}

// ============================================================================
// DOM Focus Host
// ============================================================================

#[wasm_bindgen_test]
fn test_dom_focus_single_tab_stop() {
    let root = container(3, 2);
    let mut focus = FocusManager::new();
    focus.attach(DomFocusHost::new(root.clone()));

    assert!(focus.focus_cell(2, 1));
    assert_eq!(cell_tab_index(&root, 2, 1).as_deref(), Some("0"));
    let stops = root.query_selector_all(r#"[tabindex="0"]"#).unwrap().length();
    assert_eq!(stops, 1);

    let document = web_sys::window().unwrap().document().unwrap();
    let active = document.active_element().unwrap();
    assert_eq!(active.get_attribute("data-row-index").as_deref(), Some("2"));
    root.remove();
}

#[wasm_bindgen_test]
fn test_dom_focus_missing_cell_clears_stops() {
    let root = container(2, 2);
    let mut focus = FocusManager::new();
    focus.attach(DomFocusHost::new(root.clone()));
    focus.focus_cell(0, 0);

    assert!(!focus.focus_cell(7, 7));
    assert_eq!(root.query_selector_all(r#"[tabindex="0"]"#).unwrap().length(), 0);
    assert_eq!(cell_tab_index(&root, 0, 0).as_deref(), Some("-1"));
    root.remove();
}

#[wasm_bindgen_test]
fn test_dom_container_focusable_once() {
    let root = container(1, 1);
    let mut focus = FocusManager::new();
    focus.attach(DomFocusHost::new(root.clone()));
    focus.ensure_grid_focusable();
    assert_eq!(root.get_attribute("tabindex").as_deref(), Some("0"));

    root.set_attribute("tabindex", "-1").unwrap();
    focus.ensure_grid_focusable();
    assert_eq!(root.get_attribute("tabindex").as_deref(), Some("-1"));
    root.remove();
}

#[wasm_bindgen_test]
fn test_disconnected_container_is_inert() {
    let document = web_sys::window().unwrap().document().unwrap();
    let root = document.create_element("div").unwrap();
    root.set_inner_html(r#"<div data-row-index="0" data-col-index="0"></div>"#);
    let mut focus = FocusManager::new();
    focus.attach(DomFocusHost::new(root.clone()));

    assert!(!focus.focus_cell(0, 0));
    focus.ensure_grid_focusable();
    assert!(root.get_attribute("tabindex").is_none());
}
