//! Headless grid orchestrator.
//!
//! [`GridState`] owns one of every engine together with the row data and
//! keeps them consistent: every mutation that can change row order or row
//! count reruns [`pipeline::recompute`], and keyboard moves are followed by
//! scrolling and focus.

use std::cell::Cell;
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use crate::columns::{ColumnController, ColumnMenu, MenuAction, MenuItem};
use crate::filter::{FilterEngine, QuickFilter};
use crate::layout::VirtualScroller;
use crate::nav::{FocusHost, FocusManager, KeyboardNav, NavKeyEvent};
use crate::options::GridOptions;
use crate::pagination::Pagination;
use crate::pipeline::{self, PipelineInput, PipelineOutput, PipelineStages};
use crate::rows::{DragOutcome, RowDrag, RowPinning, RowStyling};
use crate::selection::SelectionManager;
use crate::sort::SortEngine;
use crate::status_bar::{Aggregation, StatusBar, StatusBarInput, StatusPanel};
use crate::types::{
    CellChange, ColumnDef, ColumnFilter, ColumnStateSnapshot, GridPosition, Row, RowId,
    SortDirection, SortItem, SortModel, VisibleRange,
};
use crate::undo::UndoRedoManager;

/// What the last handled key asked for, recorded by the navigator callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavSignal {
    Navigate(GridPosition),
    Activate(GridPosition),
    Select(GridPosition),
    Escape,
}

pub struct GridState {
    options: GridOptions,
    rows: Vec<Row>,
    columns: ColumnController,
    sort_model: SortModel,
    quick_filter: QuickFilter,
    quick_filter_text: String,
    filter: FilterEngine,
    pagination: Pagination,
    scroller: VirtualScroller,
    selection: SelectionManager,
    pinning: RowPinning,
    drag: RowDrag,
    styling: RowStyling,
    keyboard: KeyboardNav,
    nav_signal: Rc<Cell<Option<NavSignal>>>,
    focus: FocusManager<Box<dyn FocusHost>>,
    undo: UndoRedoManager,
    status_bar: StatusBar,
    editing: Option<GridPosition>,
    output: PipelineOutput,
}

impl std::fmt::Debug for GridState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridState")
            .field("rows", &self.rows.len())
            .field("columns", &self.columns.len())
            .field("sort_model", &self.sort_model)
            .field("quick_filter_text", &self.quick_filter_text)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl Default for GridState {
    fn default() -> Self {
        Self::new(GridOptions::default())
    }
}

impl GridState {
    pub fn new(options: GridOptions) -> Self {
        let nav_signal = Rc::new(Cell::new(None));
        let mut keyboard = KeyboardNav::new(0, 0)
            .on_navigate(signal_to(&nav_signal, NavSignal::Navigate))
            .on_activate(signal_to(&nav_signal, NavSignal::Activate))
            .on_select(signal_to(&nav_signal, NavSignal::Select))
            .on_escape({
                let signal = Rc::clone(&nav_signal);
                move || signal.set(Some(NavSignal::Escape))
            });
        keyboard.set_page_size(options.keyboard_page_size);

        let mut scroller = VirtualScroller::new(options.row_height, options.viewport_height);
        scroller.set_buffer_multiplier(options.buffer_multiplier);

        let row_key = options.row_key.clone();
        let mut grid = Self {
            columns: ColumnController::new(),
            rows: Vec::new(),
            sort_model: SortModel::new(),
            quick_filter: QuickFilter::new(),
            quick_filter_text: String::new(),
            filter: FilterEngine::new(),
            pagination: Pagination::new(options.page_size),
            scroller,
            selection: SelectionManager::new(options.selection_mode).with_row_key(row_key.clone()),
            pinning: RowPinning::new(row_key.clone()),
            drag: RowDrag::new(options.row_drag.to_drag_options(&row_key)),
            styling: RowStyling::new(),
            keyboard,
            nav_signal,
            focus: FocusManager::new(),
            undo: UndoRedoManager::new(options.undo_depth),
            status_bar: StatusBar::new(options.status_bar.clone()),
            editing: None,
            output: PipelineOutput::default(),
            options,
        };
        grid.recompute();
        grid
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    // ---- data ----

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.undo.clear();
        self.editing = None;
        self.recompute();
    }

    pub fn set_columns(&mut self, defs: &[ColumnDef]) {
        self.columns.set_columns(defs);
        let known: SortModel = self
            .sort_model
            .iter()
            .filter(|item| self.columns.column(&item.field).is_some())
            .cloned()
            .collect();
        self.sort_model = known;
        self.columns.apply_sort_model(&self.sort_model);
        self.recompute();
    }

    pub fn columns(&self) -> &ColumnController {
        &self.columns
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn filtered_count(&self) -> usize {
        self.output.filtered_count()
    }

    pub fn output(&self) -> &PipelineOutput {
        &self.output
    }

    /// Every row passing the filters, in display order.
    pub fn display_rows(&self) -> Vec<&Row> {
        self.rows_at(&self.output.display_indices)
    }

    /// Rows of the current page (all filtered rows when pagination is off).
    pub fn page_rows(&self) -> Vec<&Row> {
        self.rows_at(&self.output.page_indices)
    }

    /// Rows inside the virtualized window.
    pub fn visible_rows(&self) -> Vec<&Row> {
        self.rows_at(self.output.visible_indices())
    }

    pub fn visible_range(&self) -> VisibleRange {
        self.output.visible_range
    }

    fn rows_at(&self, indices: &[usize]) -> Vec<&Row> {
        indices.iter().filter_map(|&i| self.rows.get(i)).collect()
    }

    /// Source index of the row shown at `page_row` of the current page.
    fn source_index(&self, page_row: usize) -> Option<usize> {
        self.output.page_indices.get(page_row).copied()
    }

    // ---- sorting ----

    pub fn sort_model(&self) -> &[SortItem] {
        &self.sort_model
    }

    pub fn set_sort_model(&mut self, model: SortModel) {
        self.sort_model = model;
        self.columns.apply_sort_model(&self.sort_model);
        self.recompute();
    }

    /// Advance the sort cycle of a sortable column.
    pub fn toggle_sort(&mut self, field: &str) {
        if !self.columns.column(field).is_some_and(|c| c.def.sortable) {
            return;
        }
        let model = SortEngine::update_sort_model(&self.sort_model, field, self.options.multi_sort);
        self.set_sort_model(model);
    }

    /// Sort one column in a fixed direction, or drop it from the model.
    fn sort_by(&mut self, field: &str, direction: Option<SortDirection>) {
        let mut model: SortModel = if self.options.multi_sort || direction.is_none() {
            self.sort_model
                .iter()
                .filter(|item| item.field != field)
                .cloned()
                .collect()
        } else {
            SortModel::new()
        };
        if let Some(direction) = direction {
            model.push(SortItem::new(field, direction));
        }
        self.set_sort_model(model);
    }

    // ---- filtering ----

    pub fn quick_filter_text(&self) -> &str {
        &self.quick_filter_text
    }

    pub fn set_quick_filter(&mut self, text: impl Into<String>) {
        self.quick_filter_text = text.into();
        self.pagination.first_page();
        self.recompute();
    }

    pub fn filter_model(&self) -> &[ColumnFilter] {
        self.filter.model()
    }

    pub fn set_column_filter(&mut self, filter: ColumnFilter) {
        self.filter.set_filter(filter);
        self.pagination.first_page();
        self.recompute();
    }

    pub fn remove_column_filter(&mut self, field: &str) {
        if self.filter.remove_filter(field) {
            self.recompute();
        }
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.quick_filter_text.clear();
        self.recompute();
    }

    /// Distinct values of a column, for set filters.
    pub fn unique_values(&self, field: &str) -> Vec<Value> {
        QuickFilter::unique_values(&self.rows, field)
    }

    // ---- pagination ----

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.pagination.go_to_page(page);
        self.recompute();
    }

    pub fn next_page(&mut self) {
        self.pagination.next_page();
        self.recompute();
    }

    pub fn prev_page(&mut self) {
        self.pagination.prev_page();
        self.recompute();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.pagination.set_page_size(page_size);
        self.recompute();
    }

    // ---- scrolling ----

    pub fn scroller(&self) -> &VirtualScroller {
        &self.scroller
    }

    pub fn set_scroll_top(&mut self, scroll_top: f64) {
        self.scroller.set_scroll_top(scroll_top);
        self.output.visible_range = self.scroller.get_visible_range();
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.scroller.set_viewport_height(height);
        self.output.visible_range = self.scroller.get_visible_range();
    }

    /// Scroll a row of the current page into view; returns the new scroll top.
    pub fn scroll_to_row(&mut self, page_row: usize) -> f64 {
        let top = self.scroller.scroll_to_row(page_row);
        self.output.visible_range = self.scroller.get_visible_range();
        top
    }

    // ---- columns ----

    pub fn resize_column(&mut self, field: &str, width: f64) {
        self.columns.resize_column(field, width);
    }

    pub fn set_column_visible(&mut self, field: &str, visible: bool) {
        self.columns.set_column_visible(field, visible);
        self.recompute();
    }

    pub fn move_column(&mut self, field: &str, to_index: usize) {
        self.columns.move_column(field, to_index);
    }

    pub fn size_columns_to_fit(&mut self, container_width: f64) {
        self.columns.size_columns_to_fit(container_width);
    }

    pub fn column_state(&self) -> Vec<ColumnStateSnapshot> {
        self.columns.column_state()
    }

    pub fn apply_column_state(&mut self, snapshot: &[ColumnStateSnapshot]) {
        self.columns.apply_column_state(snapshot);
        self.recompute();
    }

    pub fn column_menu(&self, field: &str) -> Option<Vec<MenuItem>> {
        let column = self.columns.column(field)?;
        Some(ColumnMenu::items(column, self.columns.columns()))
    }

    pub fn apply_menu_action(&mut self, action: &MenuAction) {
        debug!(?action, "menu action");
        match action {
            MenuAction::SortAsc(field) => self.sort_by(field, Some(SortDirection::Asc)),
            MenuAction::SortDesc(field) => self.sort_by(field, Some(SortDirection::Desc)),
            MenuAction::ClearSort(field) => self.sort_by(field, None),
            MenuAction::HideColumn(field) => self.set_column_visible(field, false),
            MenuAction::ToggleColumn(field) => {
                let visible = self.columns.column(field).is_some_and(|c| c.visible);
                self.set_column_visible(field, !visible);
            }
        }
    }

    // ---- selection and pinning ----

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionManager {
        &mut self.selection
    }

    /// Toggle the selection of a row of the current page.
    pub fn toggle_row_selection(&mut self, page_row: usize) -> bool {
        let Some(row) = self.source_index(page_row).and_then(|i| self.rows.get(i)) else {
            return false;
        };
        let id = RowId::of(row, &self.options.row_key);
        self.selection.toggle(id)
    }

    pub fn pinning(&self) -> &RowPinning {
        &self.pinning
    }

    pub fn pinning_mut(&mut self) -> &mut RowPinning {
        &mut self.pinning
    }

    // ---- row drag ----

    pub fn row_drag(&self) -> &RowDrag {
        &self.drag
    }

    /// Start dragging source rows. `source_index` addresses [`Self::rows`].
    pub fn start_row_drag(&mut self, source_index: usize, extra: &[usize]) {
        let picked: Vec<Row> = std::iter::once(source_index)
            .chain(extra.iter().copied())
            .filter_map(|i| self.rows.get(i).cloned())
            .collect();
        if picked.is_empty() {
            return;
        }
        self.drag.start_drag(picked, source_index);
    }

    pub fn update_row_drag_target(&mut self, target_index: usize) {
        self.drag.update_target(target_index);
    }

    pub fn cancel_row_drag(&mut self) {
        self.drag.cancel_drag();
    }

    /// Drop the dragged rows. A managed drop replaces the row order.
    pub fn end_row_drag(&mut self) -> Option<DragOutcome> {
        let outcome = self.drag.end_drag(&self.rows)?;
        if let DragOutcome::Managed { rows, .. } = &outcome {
            self.rows.clone_from(rows);
            self.undo.clear();
            self.recompute();
        }
        Some(outcome)
    }

    // ---- styling ----

    pub fn styling(&self) -> &RowStyling {
        &self.styling
    }

    pub fn set_row_styling(&mut self, styling: RowStyling) {
        self.styling = styling;
        self.recompute();
    }

    // ---- editing ----

    /// Write a value into an editable column and record it for undo.
    ///
    /// `row_index` addresses [`Self::rows`]. Returns the recorded change, or
    /// `None` when the column is unknown, not editable or the value is unchanged.
    pub fn edit_cell(&mut self, row_index: usize, field: &str, value: Value) -> Option<CellChange> {
        if !self.columns.column(field).is_some_and(|c| c.def.editable) {
            return None;
        }
        let row = self.rows.get_mut(row_index)?;
        let old_value = row.get(field).cloned().unwrap_or(Value::Null);
        if old_value == value {
            return None;
        }
        row.insert(field.to_string(), value.clone());
        let change = CellChange::new(row_index, field, old_value, value);
        self.undo.push(change.clone());
        self.recompute();
        Some(change)
    }

    /// Revert the last edit. Returns the change that was applied.
    pub fn undo(&mut self) -> Option<CellChange> {
        let change = self.undo.undo()?;
        self.apply_change(&change);
        Some(change)
    }

    /// Re-apply the last undone edit. Returns the change that was applied.
    pub fn redo(&mut self) -> Option<CellChange> {
        let change = self.undo.redo()?;
        self.apply_change(&change);
        Some(change)
    }

    pub fn history(&self) -> &UndoRedoManager {
        &self.undo
    }

    fn apply_change(&mut self, change: &CellChange) {
        if let Some(row) = self.rows.get_mut(change.row_index) {
            row.insert(change.field.clone(), change.new_value.clone());
            self.recompute();
        }
    }

    /// Cell opened for editing by Enter / F2, cleared by Escape.
    pub fn editing_cell(&self) -> Option<GridPosition> {
        self.editing
    }

    // ---- keyboard and focus ----

    pub fn keyboard(&self) -> &KeyboardNav {
        &self.keyboard
    }

    pub fn attach_focus_host(&mut self, host: Box<dyn FocusHost>) {
        self.focus.attach(host);
        self.focus.ensure_grid_focusable();
    }

    pub fn detach_focus_host(&mut self) -> Option<Box<dyn FocusHost>> {
        self.focus.detach()
    }

    /// Move the cursor directly (e.g. on click).
    pub fn set_active_cell(&mut self, position: GridPosition) {
        self.keyboard.set_position(position);
    }

    /// Route a keydown through the navigator and act on the result:
    /// movement scrolls the row into view and moves focus, Space toggles
    /// selection, Enter / F2 opens the cell and Escape closes it.
    pub fn handle_key_down(&mut self, event: &dyn NavKeyEvent) -> bool {
        self.nav_signal.set(None);
        let handled = self.keyboard.handle_key_down(event);
        match self.nav_signal.take() {
            Some(NavSignal::Navigate(position)) => {
                self.scroll_to_row(position.row_index);
                self.focus.focus_cell(position.row_index, position.col_index);
            }
            Some(NavSignal::Select(position)) => {
                self.toggle_row_selection(position.row_index);
            }
            Some(NavSignal::Activate(position)) => self.editing = Some(position),
            Some(NavSignal::Escape) => self.editing = None,
            None => {}
        }
        handled
    }

    fn sync_keyboard_bounds(&mut self) {
        self.keyboard
            .update_bounds(self.output.page_indices.len(), self.columns.visible_count());
    }

    // ---- status bar ----

    pub fn status_bar(&self) -> &StatusBar {
        &self.status_bar
    }

    /// Panels for the current counts, aggregating `aggregate_field` over
    /// the filtered rows when given.
    pub fn status_panels(&self, aggregate_field: Option<&str>) -> Vec<StatusPanel> {
        let aggregation = aggregate_field.and_then(|field| {
            Aggregation::from_values(
                self.output
                    .display_indices
                    .iter()
                    .filter_map(|&i| self.rows.get(i))
                    .filter_map(|row| row.get(field)),
            )
        });
        self.status_bar.panels(&StatusBarInput {
            total_rows: self.rows.len(),
            filtered_rows: self.output.filtered_count(),
            selected_rows: self.selection.selected_count(),
            aggregation,
        })
    }

    // ---- recompute ----

    /// Rerun filter, sort, paginate and virtualize.
    pub fn recompute(&mut self) {
        let columns = self.columns.effective_defs();
        self.output = pipeline::recompute(
            &self.rows,
            PipelineInput {
                columns: &columns,
                quick_filter_text: &self.quick_filter_text,
                sort_model: &self.sort_model,
            },
            PipelineStages {
                filter: &self.filter,
                quick_filter: &mut self.quick_filter,
                pagination: self.options.pagination.then_some(&mut self.pagination),
                scroller: &mut self.scroller,
                styling: Some(&self.styling),
            },
        );
        self.sync_keyboard_bounds();
    }
}

fn signal_to(
    signal: &Rc<Cell<Option<NavSignal>>>,
    wrap: fn(GridPosition) -> NavSignal,
) -> impl FnMut(GridPosition) + 'static {
    let signal = Rc::clone(signal);
    move |position| signal.set(Some(wrap(position)))
}
