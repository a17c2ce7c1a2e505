//! Keyboard navigation and DOM focus.

mod focus;
mod keyboard;

#[cfg(target_arch = "wasm32")]
pub use focus::DomFocusHost;
pub use focus::{FocusHost, FocusManager, HeadlessCell, HeadlessFocusHost};
pub use keyboard::{KeyPress, KeyboardNav, NavKeyEvent, DEFAULT_KEYBOARD_PAGE_SIZE};
