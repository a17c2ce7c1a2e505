//! Row virtualization: which rows must be materialized for a scroll position.

use tracing::trace;

use super::RowOffsets;
use crate::types::VisibleRange;

/// Default row height in pixels.
pub const DEFAULT_ROW_HEIGHT: f64 = 32.0;

/// Default viewport height in pixels.
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 400.0;

/// Viewport and row-window math for a vertically scrolling row list.
///
/// Rows have a uniform `row_height` unless variable offsets are installed
/// with [`VirtualScroller::set_row_offsets`]. `scroll_top` is always kept in
/// `[0, max(0, total_content_height - viewport_height)]`.
#[derive(Debug, Clone)]
pub struct VirtualScroller {
    row_height: f64,
    viewport_height: f64,
    total_rows: usize,
    buffer_multiplier: f64,
    scroll_top: f64,
    row_offsets: Option<RowOffsets>,
}

impl Default for VirtualScroller {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_HEIGHT, DEFAULT_VIEWPORT_HEIGHT)
    }
}

impl VirtualScroller {
    pub fn new(row_height: f64, viewport_height: f64) -> Self {
        Self {
            row_height: sanitize_row_height(row_height),
            viewport_height: non_negative(viewport_height),
            total_rows: 0,
            buffer_multiplier: 1.0,
            scroll_top: 0.0,
            row_offsets: None,
        }
    }

    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    pub fn set_row_height(&mut self, row_height: f64) {
        self.row_height = sanitize_row_height(row_height);
        self.reclamp();
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn set_viewport_height(&mut self, viewport_height: f64) {
        self.viewport_height = non_negative(viewport_height);
        self.reclamp();
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Update the row count. Any installed variable offsets no longer match and are dropped.
    pub fn set_total_rows(&mut self, total_rows: usize) {
        if self
            .row_offsets
            .as_ref()
            .is_some_and(|offsets| offsets.len() != total_rows)
        {
            self.row_offsets = None;
        }
        self.total_rows = total_rows;
        self.reclamp();
    }

    pub fn buffer_multiplier(&self) -> f64 {
        self.buffer_multiplier
    }

    pub fn set_buffer_multiplier(&mut self, buffer_multiplier: f64) {
        self.buffer_multiplier = non_negative(buffer_multiplier);
    }

    /// Switch to variable-height rows (or back to uniform rows with `None`).
    pub fn set_row_offsets(&mut self, row_offsets: Option<RowOffsets>) {
        if let Some(offsets) = &row_offsets {
            self.total_rows = offsets.len();
        }
        self.row_offsets = row_offsets;
        self.reclamp();
    }

    pub fn row_offsets(&self) -> Option<&RowOffsets> {
        self.row_offsets.as_ref()
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Set the scroll position, clamped to the scrollable range.
    pub fn set_scroll_top(&mut self, scroll_top: f64) {
        let max = self.max_scroll_top();
        self.scroll_top = if scroll_top.is_nan() {
            0.0
        } else {
            scroll_top.clamp(0.0, max)
        };
    }

    pub fn total_content_height(&self) -> f64 {
        match &self.row_offsets {
            Some(offsets) => offsets.total_height,
            None => self.total_rows as f64 * self.row_height,
        }
    }

    pub fn max_scroll_top(&self) -> f64 {
        (self.total_content_height() - self.viewport_height).max(0.0)
    }

    /// Rows needed to fill the viewport at the uniform row height.
    pub fn visible_row_count(&self) -> usize {
        to_count((self.viewport_height / self.row_height).ceil())
    }

    /// Extra rows materialized on each side of the viewport.
    pub fn buffer_row_count(&self) -> usize {
        to_count((self.visible_row_count() as f64 * self.buffer_multiplier).ceil())
    }

    /// Inclusive row window to materialize for the current scroll position.
    pub fn get_visible_range(&self) -> VisibleRange {
        if self.total_rows == 0 {
            return VisibleRange::default();
        }
        let last_row = self.total_rows - 1;
        let buffer = self.buffer_row_count();

        let (first, last) = match &self.row_offsets {
            Some(offsets) => {
                let first = offsets.row_at_offset(self.scroll_top).unwrap_or(0);
                let last = offsets
                    .row_at_offset(self.scroll_top + self.viewport_height)
                    .unwrap_or(last_row);
                (first, last)
            }
            None => {
                let first = to_count((self.scroll_top / self.row_height).floor());
                (first, first.saturating_add(self.visible_row_count()))
            }
        };
        let first = first.min(last_row);

        let start_index = first.saturating_sub(buffer);
        let end_index = last.saturating_add(buffer).min(last_row);
        let range = VisibleRange {
            start_index,
            end_index,
            start_offset: self.get_row_offset(start_index),
        };
        trace!(
            scroll_top = self.scroll_top,
            start = range.start_index,
            end = range.end_index,
            "visible range"
        );
        range
    }

    /// Scroll position that brings `index` fully into view with the least movement.
    ///
    /// Returns the current position when the row is already fully visible.
    pub fn get_scroll_top_for_row(&self, index: usize) -> f64 {
        let top = self.get_row_offset(index);
        let bottom = top + self.row_height_at(index);
        let view_bottom = self.scroll_top + self.viewport_height;

        if top >= self.scroll_top && bottom <= view_bottom {
            self.scroll_top
        } else if top < self.scroll_top {
            top
        } else {
            bottom - self.viewport_height
        }
    }

    /// Scroll `index` into view and return the new scroll position.
    pub fn scroll_to_row(&mut self, index: usize) -> f64 {
        let target = self.get_scroll_top_for_row(index);
        self.set_scroll_top(target);
        self.scroll_top
    }

    pub fn get_row_index_at_offset(&self, offset: f64) -> usize {
        match &self.row_offsets {
            Some(offsets) => offsets.row_at_offset(offset).unwrap_or(0),
            None => to_count((offset / self.row_height).floor()),
        }
    }

    pub fn get_row_offset(&self, index: usize) -> f64 {
        match &self.row_offsets {
            Some(offsets) => offsets.offset(index),
            None => index as f64 * self.row_height,
        }
    }

    fn row_height_at(&self, index: usize) -> f64 {
        match &self.row_offsets {
            Some(offsets) => offsets.height(index),
            None => self.row_height,
        }
    }

    fn reclamp(&mut self) {
        self.set_scroll_top(self.scroll_top);
    }
}

fn sanitize_row_height(row_height: f64) -> f64 {
    if row_height.is_finite() {
        row_height.max(1.0)
    } else {
        DEFAULT_ROW_HEIGHT
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Convert a non-negative, already-rounded float to a count.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_count(value: f64) -> usize {
    if value.is_finite() && value > 0.0 {
        value as usize
    } else {
        0
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn scroller(rows: usize) -> VirtualScroller {
        let mut s = VirtualScroller::new(20.0, 100.0);
        s.set_total_rows(rows);
        s
    }

    #[test]
    fn test_counts() {
        let s = scroller(1000);
        assert_eq!(s.visible_row_count(), 5);
        assert_eq!(s.buffer_row_count(), 5);
    }

    #[test]
    fn test_range_at_top() {
        let s = scroller(1000);
        let range = s.get_visible_range();
        assert_eq!(range.start_index, 0);
        assert_eq!(range.end_index, 10);
        assert_eq!(range.start_offset, 0.0);
    }

    #[test]
    fn test_range_mid_scroll() {
        let mut s = scroller(1000);
        s.set_scroll_top(400.0);
        let range = s.get_visible_range();
        // first visible row 20, buffer 5
        assert_eq!(range.start_index, 15);
        assert_eq!(range.end_index, 30);
        assert_eq!(range.start_offset, 300.0);
    }

    #[test]
    fn test_empty_range() {
        let s = scroller(0);
        assert_eq!(s.get_visible_range(), VisibleRange::default());
    }

    #[test]
    fn test_buffer_multiplier_scales() {
        let mut s = scroller(1000);
        s.set_buffer_multiplier(0.5);
        assert_eq!(s.buffer_row_count(), 3);
        s.set_buffer_multiplier(0.0);
        assert_eq!(s.get_visible_range().end_index, 5);
    }

    #[test]
    fn test_shrinking_rows_reclamps_scroll() {
        let mut s = scroller(1000);
        s.set_scroll_top(5000.0);
        s.set_total_rows(10);
        assert_eq!(s.scroll_top(), 100.0);
        s.set_total_rows(2);
        assert_eq!(s.scroll_top(), 0.0);
    }
}
