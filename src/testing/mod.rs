//! Headless testing support: an in-memory render target and snapshot helpers.
//!
//! Use [`MemoryTarget`] as the render target of a tree under test: it counts
//! value writes, tracks focus and visibility, and lets a test fire user events
//! and await the resulting control cycle. Use [`render_to_string`] to capture
//! the rendered tree as text.

pub mod memory;
pub mod snapshot;

pub use memory::{MemoryTarget, Primitive, PrimitiveKind};
pub use snapshot::render_to_string;
