//! JavaScript surface of the grid core.
//!
//! ```javascript
//! import init, { ProGrid } from 'progrid';
//! await init();
//! const grid = new ProGrid({ pagination: true, pageSize: 50 });
//! grid.setColumns([{ field: 'name', sortable: true }]);
//! grid.setRows(rows);
//! grid.attachContainer(element);
//! element.addEventListener('keydown', (e) => grid.handleKeyDown(e));
//! grid.setEventListener((kind, payload) => console.log(kind, payload));
//! ```
//!
//! Listener events: `columnChanged`, `sortChanged`, `filterChanged`,
//! `pageChanged`, `selectionChanged` and `rowReorder`.

use js_sys::Function;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::{Element, KeyboardEvent};

use crate::columns::MenuAction;
use crate::error::{GridError, Result};
use crate::grid::GridState;
use crate::nav::DomFocusHost;
use crate::options::GridOptions;
use crate::pagination::DEFAULT_MAX_VISIBLE_PAGES;
use crate::types::{
    rows_from_value, ColumnDef, ColumnFilter, ColumnStateSnapshot, GridPosition, RowId,
    SortModel,
};

/// Plain JSON-shaped JS values (objects, not `Map`s).
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T> {
    Ok(serde_wasm_bindgen::from_value(value)?)
}

#[wasm_bindgen]
pub struct ProGrid {
    state: GridState,
    listener: Option<Function>,
}

#[wasm_bindgen]
impl ProGrid {
    /// Create a grid. `options` may be `undefined` or a partial options object.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> std::result::Result<ProGrid, JsValue> {
        console_error_panic_hook::set_once();
        let options: GridOptions = if options.is_undefined() || options.is_null() {
            GridOptions::default()
        } else {
            from_js(options)?
        };
        Ok(Self {
            state: GridState::new(options),
            listener: None,
        })
    }

    /// Register `(kind, payload) => void`, or pass `undefined` to remove it.
    #[wasm_bindgen(js_name = "setEventListener")]
    pub fn set_event_listener(&mut self, callback: Option<Function>) {
        self.listener = callback;
    }

    #[wasm_bindgen(js_name = "setRows")]
    pub fn set_rows(&mut self, rows: JsValue) -> std::result::Result<(), JsValue> {
        let value: serde_json::Value = from_js(rows)?;
        self.state.set_rows(rows_from_value(value)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = "setColumns")]
    pub fn set_columns(&mut self, columns: JsValue) -> std::result::Result<(), JsValue> {
        let defs: Vec<ColumnDef> = from_js(columns)?;
        if let Some(def) = defs.iter().find(|d| d.field.is_empty()) {
            let message = format!("missing field in {:?}", def.header());
            return Err(GridError::InvalidColumn(message).into());
        }
        self.state.set_columns(&defs);
        self.column_changed();
        Ok(())
    }

    #[wasm_bindgen(js_name = "attachContainer")]
    pub fn attach_container(&mut self, container: Element) {
        self.state
            .attach_focus_host(Box::new(DomFocusHost::new(container)));
    }

    #[wasm_bindgen(js_name = "detachContainer")]
    pub fn detach_container(&mut self) {
        self.state.detach_focus_host();
    }

    // ---- rows out ----

    #[wasm_bindgen(js_name = "visibleRange")]
    pub fn visible_range(&self) -> std::result::Result<JsValue, JsValue> {
        Ok(to_js(&self.state.visible_range())?)
    }

    #[wasm_bindgen(js_name = "visibleRows")]
    pub fn visible_rows(&self) -> std::result::Result<JsValue, JsValue> {
        Ok(to_js(&self.state.visible_rows())?)
    }

    #[wasm_bindgen(js_name = "pageRows")]
    pub fn page_rows(&self) -> std::result::Result<JsValue, JsValue> {
        Ok(to_js(&self.state.page_rows())?)
    }

    #[wasm_bindgen(js_name = "totalRows")]
    pub fn total_rows(&self) -> usize {
        self.state.total_rows()
    }

    #[wasm_bindgen(js_name = "filteredCount")]
    pub fn filtered_count(&self) -> usize {
        self.state.filtered_count()
    }

    #[wasm_bindgen(js_name = "contentHeight")]
    pub fn content_height(&self) -> f64 {
        self.state.scroller().total_content_height()
    }

    // ---- scrolling ----

    #[wasm_bindgen(js_name = "setScrollTop")]
    pub fn set_scroll_top(&mut self, scroll_top: f64) {
        self.state.set_scroll_top(scroll_top);
    }

    #[wasm_bindgen(js_name = "setViewportHeight")]
    pub fn set_viewport_height(&mut self, height: f64) {
        self.state.set_viewport_height(height);
    }

    #[wasm_bindgen(js_name = "scrollToRow")]
    pub fn scroll_to_row(&mut self, index: usize) -> f64 {
        self.state.scroll_to_row(index)
    }

    // ---- columns ----

    #[wasm_bindgen(js_name = "columnState")]
    pub fn column_state(&self) -> std::result::Result<JsValue, JsValue> {
        Ok(to_js(&self.state.column_state())?)
    }

    #[wasm_bindgen(js_name = "applyColumnState")]
    pub fn apply_column_state(&mut self, snapshot: JsValue) -> std::result::Result<(), JsValue> {
        let snapshot: Vec<ColumnStateSnapshot> = from_js(snapshot)?;
        self.state.apply_column_state(&snapshot);
        self.column_changed();
        Ok(())
    }

    #[wasm_bindgen(js_name = "resizeColumn")]
    pub fn resize_column(&mut self, field: &str, width: f64) {
        self.state.resize_column(field, width);
        self.column_changed();
    }

    #[wasm_bindgen(js_name = "setColumnVisible")]
    pub fn set_column_visible(&mut self, field: &str, visible: bool) {
        self.state.set_column_visible(field, visible);
        self.column_changed();
    }

    #[wasm_bindgen(js_name = "moveColumn")]
    pub fn move_column(&mut self, field: &str, to_index: usize) {
        self.state.move_column(field, to_index);
        self.column_changed();
    }

    #[wasm_bindgen(js_name = "sizeColumnsToFit")]
    pub fn size_columns_to_fit(&mut self, container_width: f64) {
        self.state.size_columns_to_fit(container_width);
        self.column_changed();
    }

    #[wasm_bindgen(js_name = "columnMenu")]
    pub fn column_menu(&self, field: &str) -> std::result::Result<JsValue, JsValue> {
        Ok(to_js(&self.state.column_menu(field))?)
    }

    #[wasm_bindgen(js_name = "applyMenuAction")]
    pub fn apply_menu_action(&mut self, action: JsValue) -> std::result::Result<(), JsValue> {
        let action: MenuAction = from_js(action)?;
        self.state.apply_menu_action(&action);
        self.column_changed();
        self.sort_changed();
        Ok(())
    }

    // ---- sort and filter ----

    #[wasm_bindgen(js_name = "toggleSort")]
    pub fn toggle_sort(&mut self, field: &str) {
        self.state.toggle_sort(field);
        self.sort_changed();
    }

    #[wasm_bindgen(js_name = "sortModel")]
    pub fn sort_model(&self) -> std::result::Result<JsValue, JsValue> {
        Ok(to_js(self.state.sort_model())?)
    }

    #[wasm_bindgen(js_name = "setSortModel")]
    pub fn set_sort_model(&mut self, model: JsValue) -> std::result::Result<(), JsValue> {
        let model: SortModel = from_js(model)?;
        self.state.set_sort_model(model);
        self.sort_changed();
        Ok(())
    }

    #[wasm_bindgen(js_name = "setQuickFilter")]
    pub fn set_quick_filter(&mut self, text: &str) {
        self.state.set_quick_filter(text);
        self.filter_changed();
    }

    #[wasm_bindgen(js_name = "setColumnFilter")]
    pub fn set_column_filter(&mut self, filter: JsValue) -> std::result::Result<(), JsValue> {
        let filter: ColumnFilter = from_js(filter)?;
        self.state.set_column_filter(filter);
        self.filter_changed();
        Ok(())
    }

    #[wasm_bindgen(js_name = "removeColumnFilter")]
    pub fn remove_column_filter(&mut self, field: &str) {
        self.state.remove_column_filter(field);
        self.filter_changed();
    }

    #[wasm_bindgen(js_name = "clearFilters")]
    pub fn clear_filters(&mut self) {
        self.state.clear_filters();
        self.filter_changed();
    }

    // ---- pagination ----

    #[wasm_bindgen(js_name = "paginationState")]
    pub fn pagination_state(&self) -> std::result::Result<JsValue, JsValue> {
        Ok(to_js(&self.state.pagination().state())?)
    }

    /// Page links with `-1` marking elided gaps.
    #[wasm_bindgen(js_name = "pageNumbers")]
    pub fn page_numbers(
        &self,
        max_visible: Option<usize>,
    ) -> std::result::Result<JsValue, JsValue> {
        let links = self
            .state
            .pagination()
            .get_page_numbers(max_visible.unwrap_or(DEFAULT_MAX_VISIBLE_PAGES));
        Ok(to_js(&links)?)
    }

    #[wasm_bindgen(js_name = "goToPage")]
    pub fn go_to_page(&mut self, page: usize) {
        let before = self.state.pagination().current_page();
        self.state.go_to_page(page);
        self.page_changed(before);
    }

    #[wasm_bindgen(js_name = "nextPage")]
    pub fn next_page(&mut self) {
        let before = self.state.pagination().current_page();
        self.state.next_page();
        self.page_changed(before);
    }

    #[wasm_bindgen(js_name = "prevPage")]
    pub fn prev_page(&mut self) {
        let before = self.state.pagination().current_page();
        self.state.prev_page();
        self.page_changed(before);
    }

    // ---- selection ----

    #[wasm_bindgen(js_name = "toggleRowSelection")]
    pub fn toggle_row_selection(&mut self, page_row: usize) -> bool {
        let before = self.state.selection().selected_ids().to_vec();
        let selected = self.state.toggle_row_selection(page_row);
        self.selection_changed(&before);
        selected
    }

    #[wasm_bindgen(js_name = "selectedIds")]
    pub fn selected_ids(&self) -> std::result::Result<JsValue, JsValue> {
        Ok(to_js(self.state.selection().selected_ids())?)
    }

    // ---- keyboard ----

    #[wasm_bindgen(js_name = "handleKeyDown")]
    pub fn handle_key_down(&mut self, event: &KeyboardEvent) -> bool {
        let before = self.state.selection().selected_ids().to_vec();
        let handled = self.state.handle_key_down(event);
        self.selection_changed(&before);
        handled
    }

    #[wasm_bindgen(js_name = "setActiveCell")]
    pub fn set_active_cell(&mut self, row: usize, col: usize) {
        self.state.set_active_cell(GridPosition::new(row, col));
    }

    #[wasm_bindgen(js_name = "activeCell")]
    pub fn active_cell(&self) -> std::result::Result<JsValue, JsValue> {
        Ok(to_js(&self.state.keyboard().position())?)
    }

    // ---- editing ----

    #[wasm_bindgen(js_name = "editCell")]
    pub fn edit_cell(
        &mut self,
        row_index: usize,
        field: &str,
        value: JsValue,
    ) -> std::result::Result<bool, JsValue> {
        let value: serde_json::Value = from_js(value)?;
        Ok(self.state.edit_cell(row_index, field, value).is_some())
    }

    pub fn undo(&mut self) -> std::result::Result<JsValue, JsValue> {
        Ok(to_js(&self.state.undo())?)
    }

    pub fn redo(&mut self) -> std::result::Result<JsValue, JsValue> {
        Ok(to_js(&self.state.redo())?)
    }

    // ---- row drag ----

    #[wasm_bindgen(js_name = "startRowDrag")]
    pub fn start_row_drag(&mut self, source_index: usize, extra: Vec<usize>) {
        self.state.start_row_drag(source_index, &extra);
    }

    #[wasm_bindgen(js_name = "updateRowDragTarget")]
    pub fn update_row_drag_target(&mut self, target_index: usize) {
        self.state.update_row_drag_target(target_index);
    }

    #[wasm_bindgen(js_name = "dragText")]
    pub fn drag_text(&self) -> String {
        self.state.row_drag().get_drag_text()
    }

    #[wasm_bindgen(js_name = "endRowDrag")]
    pub fn end_row_drag(&mut self) -> std::result::Result<JsValue, JsValue> {
        let outcome = self.state.end_row_drag();
        if let Some(outcome) = &outcome {
            self.emit("rowReorder", outcome);
        }
        Ok(to_js(&outcome)?)
    }

    #[wasm_bindgen(js_name = "cancelRowDrag")]
    pub fn cancel_row_drag(&mut self) {
        self.state.cancel_row_drag();
    }

    // ---- status bar ----

    #[wasm_bindgen(js_name = "statusPanels")]
    pub fn status_panels(
        &self,
        aggregate_field: Option<String>,
    ) -> std::result::Result<JsValue, JsValue> {
        Ok(to_js(&self.state.status_panels(aggregate_field.as_deref()))?)
    }
}

impl ProGrid {
    fn emit<T: Serialize + ?Sized>(&self, kind: &str, payload: &T) {
        let Some(listener) = &self.listener else {
            return;
        };
        if let Ok(payload) = to_js(payload) {
            let _ = listener.call2(&JsValue::NULL, &JsValue::from_str(kind), &payload);
        }
    }

    fn column_changed(&self) {
        self.emit("columnChanged", &self.state.column_state());
    }

    fn sort_changed(&self) {
        self.emit("sortChanged", self.state.sort_model());
    }

    fn filter_changed(&self) {
        self.emit("filterChanged", &self.state.filtered_count());
    }

    fn selection_changed(&self, before: &[RowId]) {
        if self.state.selection().selected_ids() != before {
            self.emit("selectionChanged", self.state.selection().selected_ids());
        }
    }

    fn page_changed(&self, before: usize) {
        let state = self.state.pagination().state();
        if state.current_page != before {
            self.emit("pageChanged", &state);
        }
    }
}
