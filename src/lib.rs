//! # bindview
//!
//! A declarative view-binding engine: a tree of view nodes bound to a model
//! through getters, setters and lenses, kept in sync with a host render
//! surface by an explicit control/feed cycle.
//!
//! A user event runs a mutation task against the model, then the whole tree
//! re-reads the model and writes only what differs. Input fields never
//! overwrite a focused primitive; lists reconcile by position and keep their
//! slots (and the focus inside them) across growth and shrink.
//!
//! ## Core Systems
//!
//! - **[`property`]** — Getter, Setter, Property, Action, Lens, Model
//! - **[`target`]** — The `RenderTarget` interface the engine draws through
//! - **[`view`]** — `ViewNode` trait; Text, Element, InputField, Button, Culled
//! - **[`reconcile`]** — `ForEach` list reconciler with per-slot row contexts
//! - **[`table`]** — Table, PagingState, PagedTable
//! - **[`driver`]** — Mounting, the control/feed cycle, the host event loop
//! - **[`testing`]** — In-memory render target and snapshot rendering
//! - **[`error`]** — Error types

// Foundation
pub mod error;
pub mod property;
pub mod target;

// Nodes
pub mod reconcile;
pub mod table;
pub mod view;

// Cycle
pub mod driver;

// Test support
pub mod testing;

pub use driver::{Driver, DriverConfig, HostEvent};
pub use error::{BindingError, Error, ParseError, Result};
pub use property::{constant, Action, Getter, Lens, Model, Property, Setter};
pub use reconcile::{ForEach, RowContext};
pub use table::{PagedTable, PagingState, Table};
pub use target::{Handle, RenderTarget, Renderable};
pub use view::{Dispatch, Node, SharedTarget, ViewNode, ViewNodeExt};
