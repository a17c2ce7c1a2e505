//! Keyboard-driven cursor over a `row_count x col_count` grid.
//!
//! The navigator only moves its position and reports through callbacks;
//! scrolling, focusing and editing are left to whoever installs them.

use std::cell::Cell;

use tracing::trace;

use crate::types::GridPosition;

/// Default number of rows moved by PageUp / PageDown.
pub const DEFAULT_KEYBOARD_PAGE_SIZE: usize = 10;

/// The parts of a keydown event the navigator reads.
pub trait NavKeyEvent {
    /// `KeyboardEvent.key` value (`"ArrowDown"`, `"Tab"`, `" "`, ...).
    fn key(&self) -> String;
    fn shift_key(&self) -> bool;
    fn ctrl_key(&self) -> bool;
    fn meta_key(&self) -> bool;
    fn prevent_default(&self);
}

/// A synthetic key press, for non-DOM hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct KeyPress {
    pub key: String,
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
    prevented: Cell<bool>,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn default_prevented(&self) -> bool {
        self.prevented.get()
    }
}

impl NavKeyEvent for KeyPress {
    fn key(&self) -> String {
        self.key.clone()
    }

    fn shift_key(&self) -> bool {
        self.shift
    }

    fn ctrl_key(&self) -> bool {
        self.ctrl
    }

    fn meta_key(&self) -> bool {
        self.meta
    }

    fn prevent_default(&self) {
        self.prevented.set(true);
    }
}

#[cfg(target_arch = "wasm32")]
impl NavKeyEvent for web_sys::KeyboardEvent {
    fn key(&self) -> String {
        web_sys::KeyboardEvent::key(self)
    }

    fn shift_key(&self) -> bool {
        web_sys::KeyboardEvent::shift_key(self)
    }

    fn ctrl_key(&self) -> bool {
        web_sys::KeyboardEvent::ctrl_key(self)
    }

    fn meta_key(&self) -> bool {
        web_sys::KeyboardEvent::meta_key(self)
    }

    fn prevent_default(&self) {
        web_sys::Event::prevent_default(self);
    }
}

type PositionCallback = Box<dyn FnMut(GridPosition)>;
type ActionCallback = Box<dyn FnMut()>;

enum Outcome {
    Navigate(GridPosition),
    Activate,
    Select,
    Escape,
    Unhandled,
}

/// Position state machine driven by key events.
pub struct KeyboardNav {
    position: GridPosition,
    row_count: usize,
    col_count: usize,
    page_size: usize,
    on_navigate: Option<PositionCallback>,
    on_activate: Option<PositionCallback>,
    on_select: Option<PositionCallback>,
    on_escape: Option<ActionCallback>,
}

impl Default for KeyboardNav {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl std::fmt::Debug for KeyboardNav {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyboardNav")
            .field("position", &self.position)
            .field("row_count", &self.row_count)
            .field("col_count", &self.col_count)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl KeyboardNav {
    pub fn new(row_count: usize, col_count: usize) -> Self {
        Self {
            position: GridPosition::default(),
            row_count,
            col_count,
            page_size: DEFAULT_KEYBOARD_PAGE_SIZE,
            on_navigate: None,
            on_activate: None,
            on_select: None,
            on_escape: None,
        }
    }

    pub fn on_navigate(mut self, f: impl FnMut(GridPosition) + 'static) -> Self {
        self.on_navigate = Some(Box::new(f));
        self
    }

    pub fn on_activate(mut self, f: impl FnMut(GridPosition) + 'static) -> Self {
        self.on_activate = Some(Box::new(f));
        self
    }

    pub fn on_select(mut self, f: impl FnMut(GridPosition) + 'static) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    pub fn on_escape(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_escape = Some(Box::new(f));
        self
    }

    pub fn position(&self) -> GridPosition {
        self.position
    }

    /// Move the cursor directly (e.g. on click), clamped to the bounds.
    pub fn set_position(&mut self, position: GridPosition) {
        self.position = position.clamped(self.row_count, self.col_count);
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn col_count(&self) -> usize {
        self.col_count
    }

    /// New dataset dimensions; the cursor is re-clamped.
    pub fn update_bounds(&mut self, row_count: usize, col_count: usize) {
        self.row_count = row_count;
        self.col_count = col_count;
        self.position = self.position.clamped(row_count, col_count);
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }

    /// Apply a keydown. Returns whether the key was handled; handled keys
    /// have their default action prevented.
    pub fn handle_key_down(&mut self, event: &dyn NavKeyEvent) -> bool {
        let key = event.key();
        let outcome = self.transition(
            &key,
            event.shift_key(),
            event.ctrl_key() || event.meta_key(),
        );
        if matches!(outcome, Outcome::Unhandled) {
            return false;
        }
        event.prevent_default();

        let position = self.position;
        match outcome {
            Outcome::Navigate(next) => {
                self.position = next;
                trace!(key = %key, row = next.row_index, col = next.col_index, "navigate");
                if let Some(cb) = self.on_navigate.as_mut() {
                    cb(next);
                }
            }
            Outcome::Activate => {
                if let Some(cb) = self.on_activate.as_mut() {
                    cb(position);
                }
            }
            Outcome::Select => {
                if let Some(cb) = self.on_select.as_mut() {
                    cb(position);
                }
            }
            Outcome::Escape => {
                if let Some(cb) = self.on_escape.as_mut() {
                    cb();
                }
            }
            Outcome::Unhandled => {}
        }
        true
    }

    fn transition(&self, key: &str, shift: bool, ctrl: bool) -> Outcome {
        let GridPosition {
            row_index: row,
            col_index: col,
        } = self.position;
        let last_row = self.row_count.saturating_sub(1);
        let last_col = self.col_count.saturating_sub(1);
        let at = |row: usize, col: usize| {
            Outcome::Navigate(GridPosition::new(row, col).clamped(self.row_count, self.col_count))
        };

        match key {
            "ArrowUp" => at(row.saturating_sub(1), col),
            "ArrowDown" => at(row.saturating_add(1), col),
            "ArrowLeft" => at(row, col.saturating_sub(1)),
            "ArrowRight" => at(row, col.saturating_add(1)),
            "Home" if ctrl => at(0, 0),
            "Home" => at(row, 0),
            "End" if ctrl => at(last_row, last_col),
            "End" => at(row, last_col),
            "PageUp" => at(row.saturating_sub(self.page_size), col),
            "PageDown" => at(row.saturating_add(self.page_size), col),
            "Enter" | "F2" => Outcome::Activate,
            " " | "Spacebar" if !shift => Outcome::Select,
            "Escape" => Outcome::Escape,
            "Tab" if shift => {
                if col > 0 {
                    at(row, col - 1)
                } else if row > 0 {
                    at(row - 1, last_col)
                } else {
                    at(row, col)
                }
            }
            "Tab" => {
                if col < last_col {
                    at(row, col + 1)
                } else if row < last_row {
                    at(row + 1, 0)
                } else {
                    at(row, col)
                }
            }
            _ => Outcome::Unhandled,
        }
    }
}
