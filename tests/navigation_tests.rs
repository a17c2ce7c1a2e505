//! Keyboard navigation and focus tests
//!
//! Tests for the keyboard cursor state machine, its callbacks and the
//! roving tabindex focus manager.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use progrid::nav::{FocusManager, HeadlessCell, HeadlessFocusHost, KeyPress, KeyboardNav};
use progrid::GridPosition;
use test_case::test_case;

fn pos(row: usize, col: usize) -> GridPosition {
    GridPosition::new(row, col)
}

fn nav_at(rows: usize, cols: usize, at: GridPosition) -> KeyboardNav {
    let mut nav = KeyboardNav::new(rows, cols);
    nav.set_position(at);
    nav
}

fn press(nav: &mut KeyboardNav, key: KeyPress) -> bool {
    nav.handle_key_down(&key)
}

// ============================================================================
// Cursor Movement
// ============================================================================

#[test]
fn test_arrow_down_clamps_at_last_row() {
    let mut nav = KeyboardNav::new(5, 5);
    for _ in 0..5 {
        assert!(press(&mut nav, KeyPress::new("ArrowDown")));
    }
    assert_eq!(nav.position(), pos(4, 0));
}

#[test_case("ArrowUp", pos(1, 2) ; "up")]
#[test_case("ArrowDown", pos(3, 2) ; "down")]
#[test_case("ArrowLeft", pos(2, 1) ; "left")]
#[test_case("ArrowRight", pos(2, 3) ; "right")]
#[test_case("Home", pos(2, 0) ; "home")]
#[test_case("End", pos(2, 4) ; "end")]
fn test_single_key_moves(key: &str, expected: GridPosition) {
    let mut nav = nav_at(5, 5, pos(2, 2));
    assert!(press(&mut nav, KeyPress::new(key)));
    assert_eq!(nav.position(), expected);
}

#[test]
fn test_ctrl_home_end_jump_to_corners() {
    let mut nav = nav_at(5, 4, pos(2, 2));
    press(&mut nav, KeyPress::new("End").ctrl());
    assert_eq!(nav.position(), pos(4, 3));
    press(&mut nav, KeyPress::new("Home").meta());
    assert_eq!(nav.position(), pos(0, 0));
}

#[test]
fn test_page_keys_move_by_page_size() {
    let mut nav = nav_at(100, 3, pos(50, 1));
    nav.set_page_size(20);
    press(&mut nav, KeyPress::new("PageDown"));
    assert_eq!(nav.position(), pos(70, 1));
    press(&mut nav, KeyPress::new("PageUp"));
    press(&mut nav, KeyPress::new("PageUp"));
    press(&mut nav, KeyPress::new("PageUp"));
    assert_eq!(nav.position(), pos(10, 1));
    press(&mut nav, KeyPress::new("PageUp"));
    assert_eq!(nav.position(), pos(0, 1));
    for _ in 0..10 {
        press(&mut nav, KeyPress::new("PageDown"));
    }
    assert_eq!(nav.position(), pos(99, 1));
}

#[test]
fn test_tab_wraps_to_next_row() {
    let mut nav = nav_at(3, 3, pos(0, 2));
    press(&mut nav, KeyPress::new("Tab"));
    assert_eq!(nav.position(), pos(1, 0));
    press(&mut nav, KeyPress::new("Tab").shift());
    assert_eq!(nav.position(), pos(0, 2));
}

#[test]
fn test_tab_stops_at_grid_edges() {
    let mut nav = nav_at(3, 3, pos(2, 2));
    assert!(press(&mut nav, KeyPress::new("Tab")));
    assert_eq!(nav.position(), pos(2, 2));

    nav.set_position(pos(0, 0));
    assert!(press(&mut nav, KeyPress::new("Tab").shift()));
    assert_eq!(nav.position(), pos(0, 0));
}

#[test]
fn test_handled_keys_prevent_default() {
    let mut nav = KeyboardNav::new(3, 3);
    let key = KeyPress::new("ArrowRight");
    assert!(nav.handle_key_down(&key));
    assert!(key.default_prevented());

    let other = KeyPress::new("a");
    assert!(!nav.handle_key_down(&other));
    assert!(!other.default_prevented());
    assert_eq!(nav.position(), pos(0, 1));
}

#[test]
fn test_shift_space_is_unhandled() {
    let mut nav = KeyboardNav::new(3, 3);
    assert!(!press(&mut nav, KeyPress::new(" ").shift()));
}

#[test]
fn test_empty_grid_stays_at_origin() {
    let mut nav = KeyboardNav::new(0, 0);
    for key in ["ArrowDown", "ArrowRight", "End", "PageDown", "Tab"] {
        assert!(press(&mut nav, KeyPress::new(key)));
        assert_eq!(nav.position(), pos(0, 0));
    }
}

#[test]
fn test_bounds_update_reclamps() {
    let mut nav = nav_at(10, 10, pos(9, 9));
    nav.update_bounds(4, 2);
    assert_eq!(nav.position(), pos(3, 1));
    nav.set_position(pos(50, 50));
    assert_eq!(nav.position(), pos(3, 1));
}

// ============================================================================
// Callbacks
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Navigate(GridPosition),
    Activate(GridPosition),
    Select(GridPosition),
    Escape,
}

fn recording_nav(rows: usize, cols: usize) -> (KeyboardNav, Rc<RefCell<Vec<Event>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let (nav_log, act_log, sel_log, esc_log) = (log.clone(), log.clone(), log.clone(), log.clone());
    let nav = KeyboardNav::new(rows, cols)
        .on_navigate(move |p| nav_log.borrow_mut().push(Event::Navigate(p)))
        .on_activate(move |p| act_log.borrow_mut().push(Event::Activate(p)))
        .on_select(move |p| sel_log.borrow_mut().push(Event::Select(p)))
        .on_escape(move || esc_log.borrow_mut().push(Event::Escape));
    (nav, log)
}

#[test]
fn test_callbacks_fire_in_order() {
    let (mut nav, log) = recording_nav(3, 3);
    for key in ["ArrowDown", "Enter", " ", "F2", "Escape"] {
        press(&mut nav, KeyPress::new(key));
    }
    assert_eq!(
        *log.borrow(),
        [
            Event::Navigate(pos(1, 0)),
            Event::Activate(pos(1, 0)),
            Event::Select(pos(1, 0)),
            Event::Activate(pos(1, 0)),
            Event::Escape,
        ]
    );
}

#[test]
fn test_clamped_move_still_notifies() {
    let (mut nav, log) = recording_nav(1, 1);
    press(&mut nav, KeyPress::new("ArrowUp"));
    assert_eq!(*log.borrow(), [Event::Navigate(pos(0, 0))]);
}

#[test]
fn test_unhandled_key_is_silent() {
    let (mut nav, log) = recording_nav(3, 3);
    press(&mut nav, KeyPress::new("x"));
    press(&mut nav, KeyPress::new("Shift"));
    assert!(log.borrow().is_empty());
}

// ============================================================================
// Focus Manager
// ============================================================================

fn attached(rows: usize, cols: usize) -> FocusManager<HeadlessFocusHost> {
    let mut focus = FocusManager::new();
    focus.attach(HeadlessFocusHost::with_grid(rows, cols));
    focus
}

#[test]
fn test_focus_cell_single_tab_stop() {
    let mut focus = attached(3, 3);
    assert!(focus.focus_cell(1, 2));
    let host = focus.host().unwrap();
    assert_eq!(host.focused_position(), Some(pos(1, 2)));
    assert_eq!(host.tab_index_at(pos(1, 2)), Some(0));
    let stops = host.cells.iter().filter(|c| c.tab_index == Some(0)).count();
    assert_eq!(stops, 1);
}

#[test]
fn test_refocus_moves_tab_stop() {
    let mut focus = attached(3, 3);
    focus.focus_cell(0, 0);
    focus.focus_cell(2, 1);
    let host = focus.host().unwrap();
    assert_eq!(host.tab_index_at(pos(0, 0)), Some(-1));
    assert_eq!(host.tab_index_at(pos(2, 1)), Some(0));
}

#[test]
fn test_missing_cell_clears_all_stops() {
    let mut focus = attached(2, 2);
    focus.focus_cell(0, 0);
    assert!(!focus.focus_cell(5, 5));
    let host = focus.host().unwrap();
    assert!(host.cells.iter().all(|c| c.tab_index == Some(-1)));
    assert_eq!(host.focused_position(), Some(pos(0, 0)));
}

#[test]
fn test_partial_render_window() {
    // Only rows 10..12 are rendered
    let mut host = HeadlessFocusHost::default();
    host.cells = (10..12)
        .map(|r| HeadlessCell {
            position: pos(r, 0),
            tab_index: None,
        })
        .collect();
    let mut focus = FocusManager::new();
    focus.attach(host);
    assert!(focus.focus_cell(11, 0));
    assert!(!focus.focus_cell(0, 0));
}

#[test]
fn test_detached_manager_is_inert() {
    let mut focus: FocusManager<HeadlessFocusHost> = FocusManager::new();
    assert!(!focus.focus_cell(0, 0));
    focus.ensure_grid_focusable();
    assert!(focus.host().is_none());

    let mut focus = attached(1, 1);
    let host = focus.detach().unwrap();
    assert!(host.focused_position().is_none());
    assert!(!focus.focus_cell(0, 0));
}

#[test]
fn test_ensure_grid_focusable() {
    let mut focus = attached(1, 1);
    focus.ensure_grid_focusable();
    assert_eq!(focus.host().unwrap().tab_index, Some(0));

    let mut host = HeadlessFocusHost::with_grid(1, 1);
    host.tab_index = Some(-1);
    let mut focus = FocusManager::new();
    focus.attach(host);
    focus.ensure_grid_focusable();
    assert_eq!(focus.host().unwrap().tab_index, Some(-1));
}
