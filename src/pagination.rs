//! Page windowing over a row count.

use std::ops::Range;

use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Default number of page links shown by a pager.
pub const DEFAULT_MAX_VISIBLE_PAGES: usize = 7;

/// Snapshot of the pager, as handed to the renderer.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub current_page: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub total_pages: usize,
}

/// One entry of a pager: a 1-based page number or an elided gap.
///
/// Serializes as the page number, with gaps as the `-1` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(usize),
    Gap,
}

impl PageLink {
    pub fn as_sentinel(self) -> i64 {
        match self {
            Self::Page(n) => i64::try_from(n).unwrap_or(i64::MAX),
            Self::Gap => -1,
        }
    }
}

impl Serialize for PageLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_sentinel())
    }
}

/// Current page, page size and row count, with `current_page` always in
/// `[1, max(total_pages, 1)]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
    page_size: usize,
    total_rows: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total_rows: 0,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn total_pages(&self) -> usize {
        self.total_rows.div_ceil(self.page_size)
    }

    pub fn set_current_page(&mut self, page: usize) {
        self.current_page = page;
        self.clamp();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.clamp();
    }

    pub fn set_total_rows(&mut self, total_rows: usize) {
        self.total_rows = total_rows;
        self.clamp();
    }

    /// First row index of the current page.
    pub fn start_row(&self) -> usize {
        (self.current_page - 1).saturating_mul(self.page_size)
    }

    /// One past the last row index of the current page.
    pub fn end_row(&self) -> usize {
        self.start_row()
            .saturating_add(self.page_size)
            .min(self.total_rows)
    }

    pub fn page_range(&self) -> Range<usize> {
        let start = self.start_row().min(self.total_rows);
        start..self.end_row()
    }

    /// Rows of the current page.
    pub fn get_page_rows<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let Range { start, end } = self.page_range();
        let end = end.min(rows.len());
        rows.get(start..end).unwrap_or(&[])
    }

    pub fn next_page(&mut self) {
        if self.current_page < self.total_pages() {
            self.set_current_page(self.current_page + 1);
        }
    }

    pub fn prev_page(&mut self) {
        if self.current_page > 1 {
            self.set_current_page(self.current_page - 1);
        }
    }

    pub fn first_page(&mut self) {
        self.set_current_page(1);
    }

    pub fn last_page(&mut self) {
        self.set_current_page(self.total_pages());
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.set_current_page(page);
    }

    pub fn state(&self) -> PaginationState {
        PaginationState {
            current_page: self.current_page,
            page_size: self.page_size,
            total_rows: self.total_rows,
            total_pages: self.total_pages(),
        }
    }

    /// Page links for a pager showing at most `max_visible` page numbers.
    ///
    /// The first and last pages are always present; the window in between is
    /// centred on the current page as far as the boundaries allow, with a
    /// [`PageLink::Gap`] wherever pages are elided.
    pub fn get_page_numbers(&self, max_visible: usize) -> Vec<PageLink> {
        let total = self.total_pages();
        let max_visible = max_visible.max(3);
        if total <= max_visible {
            return (1..=total).map(PageLink::Page).collect();
        }

        let inner = max_visible - 2;
        let mut start = self.current_page.saturating_sub(inner / 2).max(2);
        let end = (start + inner - 1).min(total - 1);
        start = (end + 1).saturating_sub(inner).max(2);

        let mut links = vec![PageLink::Page(1)];
        if start > 2 {
            links.push(PageLink::Gap);
        }
        links.extend((start..=end).map(PageLink::Page));
        if end < total - 1 {
            links.push(PageLink::Gap);
        }
        links.push(PageLink::Page(total));
        links
    }

    fn clamp(&mut self) {
        let max_page = self.total_pages().max(1);
        let clamped = self.current_page.clamp(1, max_page);
        if clamped != self.current_page {
            debug!(from = self.current_page, to = clamped, "page clamped");
        }
        self.current_page = clamped;
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use PageLink::{Gap, Page};

    fn pager(total_rows: usize, page_size: usize) -> Pagination {
        let mut p = Pagination::new(page_size);
        p.set_total_rows(total_rows);
        p
    }

    #[test]
    fn test_page_size_coerced() {
        let p = Pagination::new(0);
        assert_eq!(p.page_size(), 1);
    }

    #[test]
    fn test_window_in_middle() {
        let mut p = pager(200, 10);
        p.go_to_page(10);
        assert_eq!(
            p.get_page_numbers(7),
            vec![Page(1), Gap, Page(8), Page(9), Page(10), Page(11), Page(12), Gap, Page(20)]
        );
    }

    #[test]
    fn test_window_at_edges() {
        let mut p = pager(200, 10);
        assert_eq!(
            p.get_page_numbers(7),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Page(6), Gap, Page(20)]
        );
        p.last_page();
        assert_eq!(
            p.get_page_numbers(7),
            vec![Page(1), Gap, Page(15), Page(16), Page(17), Page(18), Page(19), Page(20)]
        );
    }

    #[test]
    fn test_gap_serializes_as_sentinel() {
        let json = serde_json::to_string(&vec![Page(1), Gap, Page(9)]).unwrap();
        assert_eq!(json, "[1,-1,9]");
    }
}
