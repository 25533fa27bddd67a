//! RowContext: the per-slot "current row" of a list reconciler.
//!
//! Every slot owns its own context, so the loop body built for slot `i` always
//! reads slot `i`'s row, even though one body factory serves every slot. The
//! reconciler writes the row before synchronizing the slot and again, from a
//! fresh read of the collection, before running a task dispatched from it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use futures::future;

use crate::error::{Error, Result};
use crate::property::Getter;

/// The positional index and current row of one reconciler slot.
pub struct RowContext<T> {
    index: usize,
    row: Rc<RefCell<Option<T>>>,
}

impl<T> Clone for RowContext<T> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            row: Rc::clone(&self.row),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RowContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowContext")
            .field("index", &self.index)
            .field("row", &self.row.borrow())
            .finish()
    }
}

impl<T: Clone + 'static> RowContext<T> {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            row: Rc::new(RefCell::new(None)),
        }
    }

    /// The slot's fixed position in the list.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The row last assigned to this slot, if any.
    pub fn current(&self) -> Option<T> {
        self.row.borrow().clone()
    }

    pub(crate) fn set(&self, row: Option<T>) {
        *self.row.borrow_mut() = row;
    }

    /// Read `f` of the current row, failing with [`Error::RowUnavailable`]
    /// while the slot holds no row.
    pub fn project<U>(&self, f: impl FnOnce(&T) -> U) -> Result<U> {
        self.row
            .borrow()
            .as_ref()
            .map(f)
            .ok_or(Error::RowUnavailable { index: self.index })
    }

    /// A getter yielding the current row.
    pub fn getter(&self) -> Getter<T> {
        self.map(T::clone)
    }

    /// A getter yielding `f` of the current row.
    pub fn map<U: 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Getter<U> {
        let ctx = self.clone();
        Getter::new(move || future::ready(ctx.project(&f)))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
