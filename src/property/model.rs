//! Model: a shared handle the application's accessors close over.
//!
//! The engine never owns or copies the model. `Model<M>` is only a convenience
//! for the common case of a single in-memory state value: it mints getters,
//! setters and actions that borrow the state for the duration of one
//! synchronous access and never across a suspension point.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::accessor::{Action, Getter, Property, Setter};

/// Shared, single-threaded model state.
pub struct Model<M> {
    state: Rc<RefCell<M>>,
}

impl<M> Clone for Model<M> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<M: fmt::Debug> fmt::Debug for Model<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Model").field(&self.state.borrow()).finish()
    }
}

impl<M: 'static> Model<M> {
    pub fn new(state: M) -> Self {
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Borrow the state immutably for the duration of `f`.
    pub fn read<R>(&self, f: impl FnOnce(&M) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Borrow the state mutably for the duration of `f`.
    pub fn update<R>(&self, f: impl FnOnce(&mut M) -> R) -> R {
        f(&mut self.state.borrow_mut())
    }

    /// A getter projecting the state through `f`.
    pub fn getter<T: 'static>(&self, f: impl Fn(&M) -> T + 'static) -> Getter<T> {
        let state = Rc::clone(&self.state);
        Getter::from_fn(move || f(&state.borrow()))
    }

    /// A setter writing into the state through `f`.
    pub fn setter<T: 'static>(&self, f: impl Fn(&mut M, T) + 'static) -> Setter<T> {
        let state = Rc::clone(&self.state);
        Setter::from_fn(move |value| f(&mut state.borrow_mut(), value))
    }

    pub fn property<T: 'static>(
        &self,
        get: impl Fn(&M) -> T + 'static,
        set: impl Fn(&mut M, T) + 'static,
    ) -> Property<T> {
        Property::new(self.getter(get), self.setter(set))
    }

    /// The whole state as a property; pair it with a lens to reach fields.
    pub fn whole(&self) -> Property<M>
    where
        M: Clone,
    {
        self.property(M::clone, |m, value| *m = value)
    }

    /// A mutation task applying `f` to the state.
    pub fn action(&self, f: impl Fn(&mut M) + 'static) -> Action {
        let state = Rc::clone(&self.state);
        Action::from_fn(move || f(&mut state.borrow_mut()))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
