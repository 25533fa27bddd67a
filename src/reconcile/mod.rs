//! List reconciliation: one slot per collection element, matched by index.
//!
//! - [`ForEach`] — the reconciler node.
//! - [`RowContext`] — the per-slot current row its loop body reads.

pub mod foreach;
pub mod row;

pub use foreach::ForEach;
pub use row::RowContext;
