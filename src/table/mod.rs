//! Tables built from list reconcilers.
//!
//! - [`Table`] — header cells and body rows, each a [`ForEach`](crate::reconcile::ForEach).
//! - [`PagingState`] — page index and size with lazy clamping.
//! - [`PagedTable`] — a `Table` over one page plus navigation controls.

pub mod paged;
pub mod paging;
#[allow(clippy::module_inception)]
pub mod table;

pub use paged::PagedTable;
pub use paging::{PagingState, DEFAULT_PAGE_SIZE};
pub use table::Table;
