//! Text: a leaf that displays one string getter.

use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};
use tracing::trace;

use crate::error::Result;
use crate::property::Getter;
use crate::target::{Handle, RenderTarget, Renderable};

use super::node::{SharedTarget, ViewNode};

/// Overwrite the text of `handle` iff it differs from `desired`.
pub(crate) fn write_text_if_changed(target: &dyn RenderTarget, handle: Handle, desired: &str) {
    if target.read_text(handle) == desired {
        trace!(?handle, "text unchanged");
        return;
    }
    trace!(?handle, text = desired, "writing text");
    target.write_text(handle, desired);
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// A text display bound to a `Getter<String>`.
///
/// # Examples
///
/// ```ignore
/// let greeting = Text::new(&target, model.getter(|m| format!("Hi {}", m.name)));
/// let heading = Text::paragraph(&target, constant("Totals".to_string()));
/// ```
pub struct Text {
    target: SharedTarget,
    handle: Handle,
    get: Getter<String>,
}

impl Text {
    /// A bare text primitive.
    pub fn new(target: &SharedTarget, get: Getter<String>) -> Self {
        Self {
            target: Rc::clone(target),
            handle: target.create_leaf(),
            get,
        }
    }

    /// A `p` element whose text is bound to `get`.
    pub fn paragraph(target: &SharedTarget, get: Getter<String>) -> Self {
        Self {
            target: Rc::clone(target),
            handle: target.create_container("p"),
            get,
        }
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }
}

impl ViewNode for Text {
    fn renderable(&self) -> Renderable {
        Renderable::Node(self.handle)
    }

    fn detach(&self) {
        self.target.remove(self.handle);
    }

    fn synchronize(&self) -> LocalBoxFuture<'_, Result<()>> {
        async move {
            let text = self.get.get().await?;
            write_text_if_changed(self.target.as_ref(), self.handle, &text);
            Ok(())
        }
        .boxed_local()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use tokio_test::block_on;

    use super::*;
    use crate::error::{BindingError, Error};
    use crate::property::{constant, Model};
    use crate::testing::MemoryTarget;

    #[test]
    fn synchronize_writes_text() {
        let mem = MemoryTarget::shared();
        let target: SharedTarget = mem.clone();
        let text = Text::new(&target, constant("hello".to_string()));
        block_on(text.synchronize()).unwrap();
        assert_eq!(mem.read_text(text.handle()), "hello");
        assert_eq!(mem.writes(), 1);
    }

    #[test]
    fn second_synchronize_writes_nothing() {
        let mem = MemoryTarget::shared();
        let target: SharedTarget = mem.clone();
        let text = Text::new(&target, constant("same".to_string()));
        block_on(text.synchronize()).unwrap();
        block_on(text.synchronize()).unwrap();
        assert_eq!(mem.writes(), 1);
    }

    #[test]
    fn follows_model_changes() {
        let mem = MemoryTarget::shared();
        let target: SharedTarget = mem.clone();
        let model = Model::new(1_u32);
        let text = Text::paragraph(&target, model.getter(|n| format!("n = {n}")));
        block_on(text.synchronize()).unwrap();
        model.update(|n| *n = 2);
        block_on(text.synchronize()).unwrap();
        assert_eq!(mem.read_text(text.handle()), "n = 2");
        assert_eq!(mem.get(text.handle()).unwrap().tag(), Some("p"));
    }

    #[test]
    fn getter_failure_propagates() {
        let mem = MemoryTarget::shared();
        let target: SharedTarget = mem.clone();
        let text = Text::new(
            &target,
            Getter::new(|| async { Err(BindingError::new("boom").into()) }),
        );
        let err = block_on(text.synchronize()).unwrap_err();
        assert_eq!(err, Error::Binding(BindingError::new("boom")));
        assert_eq!(mem.writes(), 0);
    }

    #[test]
    fn detach_never_attached_is_safe() {
        let mem = MemoryTarget::shared();
        let target: SharedTarget = mem.clone();
        let text = Text::new(&target, constant(String::new()));
        text.detach();
        assert!(mem.removals().is_empty());
    }
}
