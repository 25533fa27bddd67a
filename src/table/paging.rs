//! PagingState: the page index and page size of one paged table.
//!
//! `page_index` is the offset of the first visible row, not a page number.
//! Changing the page size leaves it where it is, so it may stop falling on a
//! page boundary; nothing renormalizes it. Bounds are applied lazily, by
//! [`PagingState::range`], against whatever length the collection has when
//! it is sliced.

use std::cell::Cell;
use std::ops::Range;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Mutable paging state, shared by a paged table's slice getter and its
/// navigation controls.
#[derive(Debug)]
pub struct PagingState {
    page_index: Cell<usize>,
    page_size: Cell<usize>,
}

impl Default for PagingState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl PagingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A state on the first page with `size` rows per page (at least 1).
    pub fn with_page_size(size: usize) -> Self {
        Self {
            page_index: Cell::new(0),
            page_size: Cell::new(size.max(1)),
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index.get()
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    /// Step back one page, stopping at 0.
    pub fn previous(&self) {
        let index = self.page_index();
        if index > 0 {
            self.page_index.set(index.saturating_sub(self.page_size()));
        }
    }

    /// Step forward one page unless the next page would start at or past
    /// `len`.
    pub fn next(&self, len: usize) {
        let index = self.page_index();
        let size = self.page_size();
        if index + size < len {
            self.page_index.set((index + size).min(len));
        }
    }

    /// Jump to the 1-based `page`. Out-of-range pages are accepted and show
    /// an empty slice.
    pub fn go_to_page(&self, page: usize) {
        self.page_index
            .set(page.saturating_sub(1).saturating_mul(self.page_size()));
    }

    /// Overwrite the page size (at least 1) without touching the page index.
    pub fn set_page_size(&self, size: usize) {
        self.page_size.set(size.max(1));
    }

    /// The 1-based number of the current page.
    pub fn page_number(&self) -> usize {
        self.page_index().div_ceil(self.page_size()) + 1
    }

    /// Number of pages needed for `len` rows.
    pub fn page_count(&self, len: usize) -> usize {
        len.div_ceil(self.page_size())
    }

    /// The visible rows of a `len`-row collection, clamped to `0..len`.
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = self.page_index().min(len);
        let end = self.page_index().saturating_add(self.page_size()).min(len);
        start..end
    }
}

// ===========================================================================
// Tests
// ===========================================================================
