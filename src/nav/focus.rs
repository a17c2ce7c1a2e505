//! Roving tabindex over rendered grid cells.
//!
//! Exactly one cell carries `tabindex=0`; every other cell gets `-1`. The
//! element tree is reached through [`FocusHost`], so non-DOM hosts can plug
//! in [`HeadlessFocusHost`] or their own focus model.

use crate::types::GridPosition;

/// Access to the rendered cells of a grid container.
pub trait FocusHost {
    /// Whether the container is attached to a live document.
    fn is_attached(&self) -> bool {
        true
    }

    /// Snapshot the rendered cells and return their positions, in order.
    /// Cell indices in the other methods refer to this snapshot.
    fn cell_positions(&mut self) -> Vec<Option<GridPosition>>;

    fn set_cell_tab_index(&mut self, index: usize, tab_index: i32);

    fn focus_cell(&mut self, index: usize);

    /// Whether the container itself has a tabindex attribute.
    fn has_tab_index(&self) -> bool;

    fn set_tab_index(&mut self, tab_index: i32);
}

impl FocusHost for Box<dyn FocusHost> {
    fn is_attached(&self) -> bool {
        (**self).is_attached()
    }

    fn cell_positions(&mut self) -> Vec<Option<GridPosition>> {
        (**self).cell_positions()
    }

    fn set_cell_tab_index(&mut self, index: usize, tab_index: i32) {
        (**self).set_cell_tab_index(index, tab_index);
    }

    fn focus_cell(&mut self, index: usize) {
        (**self).focus_cell(index);
    }

    fn has_tab_index(&self) -> bool {
        (**self).has_tab_index()
    }

    fn set_tab_index(&mut self, tab_index: i32) {
        (**self).set_tab_index(tab_index);
    }
}

/// Roving tabindex controller bound to an optional container.
#[derive(Debug, Default)]
pub struct FocusManager<H: FocusHost> {
    host: Option<H>,
}

impl<H: FocusHost> FocusManager<H> {
    pub fn new() -> Self {
        Self { host: None }
    }

    pub fn attach(&mut self, host: H) {
        self.host = Some(host);
    }

    pub fn detach(&mut self) -> Option<H> {
        self.host.take()
    }

    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    /// Make the cell at `(row, col)` the single focusable cell and focus it.
    ///
    /// Every cell loses its tab stop even when no cell matches; returns whether
    /// the target was found.
    pub fn focus_cell(&mut self, row: usize, col: usize) -> bool {
        let Some(host) = self.host.as_mut().filter(|h| h.is_attached()) else {
            return false;
        };
        let target = GridPosition::new(row, col);
        let positions = host.cell_positions();
        let mut found = None;
        for (index, position) in positions.iter().enumerate() {
            host.set_cell_tab_index(index, -1);
            if found.is_none() && *position == Some(target) {
                found = Some(index);
            }
        }
        let Some(index) = found else {
            return false;
        };
        host.set_cell_tab_index(index, 0);
        host.focus_cell(index);
        true
    }

    /// Give the container a tab stop unless it already declares one.
    pub fn ensure_grid_focusable(&mut self) {
        let Some(host) = self.host.as_mut().filter(|h| h.is_attached()) else {
            return;
        };
        if !host.has_tab_index() {
            host.set_tab_index(0);
        }
    }
}

/// A rendered cell of a [`HeadlessFocusHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessCell {
    pub position: GridPosition,
    pub tab_index: Option<i32>,
}

/// In-memory focus host for targets without a DOM.
#[derive(Debug, Clone, Default)]
pub struct HeadlessFocusHost {
    pub cells: Vec<HeadlessCell>,
    pub tab_index: Option<i32>,
    focused: Option<usize>,
}

impl HeadlessFocusHost {
    /// A fully rendered `rows x cols` grid.
    pub fn with_grid(rows: usize, cols: usize) -> Self {
        let cells = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| GridPosition::new(r, c)))
            .map(|position| HeadlessCell {
                position,
                tab_index: None,
            })
            .collect();
        Self {
            cells,
            ..Self::default()
        }
    }

    pub fn focused_position(&self) -> Option<GridPosition> {
        self.focused
            .and_then(|i| self.cells.get(i))
            .map(|cell| cell.position)
    }

    pub fn tab_index_at(&self, position: GridPosition) -> Option<i32> {
        self.cells
            .iter()
            .find(|cell| cell.position == position)
            .and_then(|cell| cell.tab_index)
    }
}

impl FocusHost for HeadlessFocusHost {
    fn cell_positions(&mut self) -> Vec<Option<GridPosition>> {
        self.cells.iter().map(|cell| Some(cell.position)).collect()
    }

    fn set_cell_tab_index(&mut self, index: usize, tab_index: i32) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.tab_index = Some(tab_index);
        }
    }

    fn focus_cell(&mut self, index: usize) {
        if index < self.cells.len() {
            self.focused = Some(index);
        }
    }

    fn has_tab_index(&self) -> bool {
        self.tab_index.is_some()
    }

    fn set_tab_index(&mut self, tab_index: i32) {
        self.tab_index = Some(tab_index);
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::DomFocusHost;

#[cfg(target_arch = "wasm32")]
mod dom {
    use wasm_bindgen::JsCast;
    use web_sys::{Element, HtmlElement};

    use super::FocusHost;
    use crate::types::GridPosition;

    /// Selector matching rendered cells.
    const CELL_SELECTOR: &str = "[data-row-index][data-col-index]";

    /// Focus host over a grid container element. Cells carry
    /// `data-row-index` / `data-col-index` attributes.
    pub struct DomFocusHost {
        container: Element,
        cells: Vec<HtmlElement>,
    }

    impl DomFocusHost {
        pub fn new(container: Element) -> Self {
            Self {
                container,
                cells: Vec::new(),
            }
        }
    }

    fn index_attr(el: &HtmlElement, name: &str) -> Option<usize> {
        el.get_attribute(name)?.trim().parse().ok()
    }

    impl FocusHost for DomFocusHost {
        fn is_attached(&self) -> bool {
            self.container.is_connected()
        }

        fn cell_positions(&mut self) -> Vec<Option<GridPosition>> {
            self.cells.clear();
            if let Ok(list) = self.container.query_selector_all(CELL_SELECTOR) {
                for i in 0..list.length() {
                    if let Some(el) = list.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
                        self.cells.push(el);
                    }
                }
            }
            self.cells
                .iter()
                .map(|el| {
                    Some(GridPosition::new(
                        index_attr(el, "data-row-index")?,
                        index_attr(el, "data-col-index")?,
                    ))
                })
                .collect()
        }

        fn set_cell_tab_index(&mut self, index: usize, tab_index: i32) {
            if let Some(el) = self.cells.get(index) {
                el.set_tab_index(tab_index);
            }
        }

        fn focus_cell(&mut self, index: usize) {
            if let Some(el) = self.cells.get(index) {
                let _ = el.focus();
            }
        }

        fn has_tab_index(&self) -> bool {
            self.container.has_attribute("tabindex")
        }

        fn set_tab_index(&mut self, tab_index: i32) {
            let _ = self
                .container
                .set_attribute("tabindex", &tab_index.to_string());
        }
    }
}
