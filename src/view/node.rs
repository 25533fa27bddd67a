//! ViewNode trait: produce, detach, synchronize, bind control.
//!
//! `ViewNode` is the one capability interface every node variant implements.
//! It is object-safe: nodes are stored as [`Node`] (`Rc<dyn ViewNode>`) so a
//! list reconciler can keep a slot alive while a synchronize pass is still
//! running against it. The `ViewNodeExt` extension trait adds builder-style
//! helpers that need `Self: Sized`.

use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures::future::{self, FutureExt, LocalBoxFuture};

use crate::error::Result;
use crate::property::Action;
use crate::target::{RenderTarget, Renderable};

use super::culled::Culled;

/// A shared, type-erased view node.
pub type Node = Rc<dyn ViewNode>;

/// The render target as nodes hold it.
pub type SharedTarget = Rc<dyn RenderTarget>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Runs a mutation task and then resynchronizes the tree.
///
/// The driver creates the root dispatch; list reconcilers wrap it per slot.
/// Nodes that emit user events capture a clone in their event handlers.
pub struct Dispatch {
    run: Rc<dyn Fn(Action) -> LocalBoxFuture<'static, Result<()>>>,
}

impl Clone for Dispatch {
    fn clone(&self) -> Self {
        Self {
            run: Rc::clone(&self.run),
        }
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dispatch(<fn>)")
    }
}

impl Dispatch {
    pub fn new<F, Fut>(run: F) -> Self
    where
        F: Fn(Action) -> Fut + 'static,
        Fut: Future<Output = Result<()>> + 'static,
    {
        Self {
            run: Rc::new(move |task| run(task).boxed_local()),
        }
    }

    /// Submit `task` for one control cycle.
    pub fn dispatch(&self, task: Action) -> LocalBoxFuture<'static, Result<()>> {
        (self.run)(task)
    }
}

// ---------------------------------------------------------------------------
// ViewNode
// ---------------------------------------------------------------------------

/// Core trait implemented by every view node.
pub trait ViewNode {
    /// The primitive (or ordered group of primitives) this node contributes
    /// to its parent. Pure and repeatable.
    fn renderable(&self) -> Renderable;

    /// Remove this node's primitives from their parent. Safe on a node that
    /// was never attached.
    fn detach(&self);

    /// Read the model through this node's getters and update the render
    /// target where the displayed value differs from the desired one.
    fn synchronize(&self) -> LocalBoxFuture<'_, Result<()>>;

    /// Wire user events to `dispatch`.
    ///
    /// Defaults to doing nothing. Composites forward to every child.
    fn bind_control(&self, _dispatch: &Dispatch) {}

    /// Whether this node takes part in the current synchronize pass.
    ///
    /// Defaults to `true`. Parents ask once per pass, before synchronizing.
    fn is_eligible_for_sync(&self) -> bool {
        true
    }
}

/// Synchronize `node` if it is eligible for this pass.
pub fn sync_if_eligible(node: &dyn ViewNode) -> LocalBoxFuture<'_, Result<()>> {
    if node.is_eligible_for_sync() {
        node.synchronize()
    } else {
        future::ready(Ok(())).boxed_local()
    }
}

// ---------------------------------------------------------------------------
// ViewNodeExt
// ---------------------------------------------------------------------------

/// Builder helpers available on every sized node.
pub trait ViewNodeExt: ViewNode + Sized + 'static {
    /// Erase the type into a shared [`Node`].
    fn into_node(self) -> Node {
        Rc::new(self)
    }

    /// Skip this node's synchronization while it is off-screen.
    fn culled(self, target: &SharedTarget) -> Culled<Self> {
        Culled::new(target, self)
    }
}

// Blanket implementation: every ViewNode gets ViewNodeExt for free.
impl<T: ViewNode + 'static> ViewNodeExt for T {}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use tokio_test::block_on;

    use super::*;
    use crate::testing::MemoryTarget;

    struct Counting {
        handle: crate::target::Handle,
        eligible: bool,
        syncs: Cell<usize>,
    }

    impl ViewNode for Counting {
        fn renderable(&self) -> Renderable {
            Renderable::Node(self.handle)
        }

        fn detach(&self) {}

        fn synchronize(&self) -> LocalBoxFuture<'_, Result<()>> {
            self.syncs.set(self.syncs.get() + 1);
            future::ready(Ok(())).boxed_local()
        }

        fn is_eligible_for_sync(&self) -> bool {
            self.eligible
        }
    }

    fn counting(eligible: bool) -> Counting {
        Counting {
            handle: MemoryTarget::new().create_leaf(),
            eligible,
            syncs: Cell::new(0),
        }
    }

    #[test]
    fn dispatch_runs_task() {
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        let dispatch = Dispatch::new(|task: Action| task.run());
        block_on(dispatch.dispatch(Action::from_fn(move || flag.set(true)))).unwrap();
        assert!(ran.get());
    }

    #[test]
    fn sync_if_eligible_skips_ineligible() {
        let on = counting(true);
        let off = counting(false);
        block_on(sync_if_eligible(&on)).unwrap();
        block_on(sync_if_eligible(&off)).unwrap();
        assert_eq!(on.syncs.get(), 1);
        assert_eq!(off.syncs.get(), 0);
    }

    #[test]
    fn into_node_erases_type() {
        let node: Node = counting(true).into_node();
        assert!(node.is_eligible_for_sync());
        assert!(matches!(node.renderable(), Renderable::Node(_)));
    }
}
