//! Render target: the host surface view nodes draw into.
//!
//! The engine never creates visual primitives itself. It goes through
//! [`RenderTarget`], which a host implements over its real surface (a browser
//! document, a retained terminal tree, ...). [`crate::testing::MemoryTarget`]
//! is the in-process implementation used by tests.
//!
//! All methods take `&self`: event handlers fire while nodes still hold the
//! target, so implementations are expected to use interior mutability.

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use slotmap::new_key_type;

use crate::error::Result;

new_key_type! {
    /// Opaque identifier of one primitive on the render target. Copy, lightweight (u64).
    pub struct Handle;
}

/// Future returned by an event handler: one full control cycle.
pub type EventFuture = LocalBoxFuture<'static, Result<()>>;

/// Callback registered for an event on a handle.
pub type EventHandler = Rc<dyn Fn() -> EventFuture>;

// ---------------------------------------------------------------------------
// Value types
// ---------------------------------------------------------------------------

/// User events a node can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Text-like inputs, fired on every edit.
    Input,
    /// Checkboxes, fired when toggled.
    Change,
    /// Buttons.
    Click,
}

/// Flavor of an input primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Text,
    Number,
    Checkbox,
}

impl InputKind {
    /// The event an input of this kind reports edits through.
    pub fn edit_event(self) -> EventKind {
        match self {
            Self::Checkbox => EventKind::Change,
            Self::Text | Self::Number => EventKind::Input,
        }
    }
}

/// The displayed state of an input primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    Checked(bool),
}

impl RawValue {
    /// The text this value would display; checkboxes render as `true`/`false`.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Checked(checked) => checked.to_string(),
        }
    }
}

impl Default for RawValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

// ---------------------------------------------------------------------------
// RenderTarget
// ---------------------------------------------------------------------------

/// Capability set the engine consumes from its host.
pub trait RenderTarget {
    /// A text-bearing primitive.
    fn create_leaf(&self) -> Handle;

    /// A container primitive with the given tag (`div`, `tr`, `input`, ...).
    fn create_container(&self, tag: &str) -> Handle;

    /// An invisible structural placeholder (a comment node on the web).
    fn create_marker(&self, label: &str) -> Handle;

    /// Append `child` as the last child of `parent`, detaching it first.
    fn append_child(&self, parent: Handle, child: Handle);

    /// Insert `node` just before `reference` in `reference`'s parent.
    /// No-op when `reference` has no parent.
    fn insert_before(&self, node: Handle, reference: Handle);

    /// Detach `handle` from its parent. No-op when already detached.
    fn remove(&self, handle: Handle);

    fn read_text(&self, handle: Handle) -> String;
    fn write_text(&self, handle: Handle, text: &str);

    fn read_placeholder(&self, handle: Handle) -> String;
    fn write_placeholder(&self, handle: Handle, text: &str);

    fn set_input_kind(&self, handle: Handle, kind: InputKind);
    fn read_input_value(&self, handle: Handle) -> RawValue;
    fn write_input_value(&self, handle: Handle, value: RawValue);

    /// Whether `handle` currently holds keyboard focus.
    fn is_focused(&self, handle: Handle) -> bool;

    /// Whether `handle` is on or near the viewport.
    fn is_visible(&self, handle: Handle) -> bool;

    /// Register `handler` for `kind` on `handle`, replacing any earlier one.
    fn subscribe(&self, handle: Handle, kind: EventKind, handler: EventHandler);
}

// ---------------------------------------------------------------------------
// Renderable
// ---------------------------------------------------------------------------

/// What a node contributes to its parent: one primitive, or an ordered group
/// of sibling primitives (a list reconciler's markers and rows).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Renderable {
    Node(Handle),
    Group(Vec<Handle>),
}

impl Renderable {
    /// The top-level handles, in document order.
    pub fn handles(&self) -> &[Handle] {
        match self {
            Self::Node(handle) => std::slice::from_ref(handle),
            Self::Group(handles) => handles,
        }
    }

    /// Append every handle under `parent`, preserving order.
    pub fn append_to(&self, target: &dyn RenderTarget, parent: Handle) {
        for &handle in self.handles() {
            target.append_child(parent, handle);
        }
    }

    /// Insert every handle before `reference`, preserving order.
    pub fn insert_before(&self, target: &dyn RenderTarget, reference: Handle) {
        for &handle in self.handles() {
            target.insert_before(handle, reference);
        }
    }

    /// Detach every handle.
    pub fn remove(&self, target: &dyn RenderTarget) {
        for &handle in self.handles() {
            target.remove(handle);
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
