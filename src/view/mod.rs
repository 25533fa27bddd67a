//! View nodes: the capability trait and its built-in variants.
//!
//! - [`ViewNode`] / [`ViewNodeExt`] — produce, detach, synchronize, bind control.
//! - [`Text`] — text leaf; [`Element`] — tagged composite; [`labelled`].
//! - [`InputField`] — focus-preserving input over a [`ValueCodec`].
//! - [`Button`] — action trigger.
//! - [`Culled`] — viewport culling wrapper for any node.

pub mod button;
pub mod culled;
pub mod element;
pub mod input;
pub mod node;
pub mod text;

pub use button::Button;
pub use culled::Culled;
pub use element::{labelled, Element};
pub use input::{
    checkbox, number_input, text_input, CheckboxCodec, InputField, NumberCodec, TextCodec,
    ValueCodec,
};
pub use node::{sync_if_eligible, Dispatch, Node, SharedTarget, ViewNode, ViewNodeExt};
pub use text::Text;
