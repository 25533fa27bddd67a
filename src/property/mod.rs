//! Property algebra: typed, possibly-asynchronous access into the model.
//!
//! - [`Getter`] / [`Setter`] / [`Property`] — accessor pairs nodes bind to.
//! - [`Action`] — a zero-argument mutation task run by the control cycle.
//! - [`constant`], [`read_only`], [`map_getter`], [`map_setter`],
//!   [`map_property`], [`lens`] — pure combinators.
//! - [`Model`] — a shared state handle that mints accessors.

pub mod accessor;
pub mod lens;
pub mod model;

pub use accessor::{Action, Getter, Property, Setter};
pub use lens::{constant, lens, map_getter, map_property, map_setter, read_only, Lens};
pub use model::Model;
