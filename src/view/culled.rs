//! Culled: viewport culling for any node.
//!
//! Wrapping a node makes its eligibility for a synchronize pass depend on the
//! render target reporting at least one of its primitives as visible. Parents
//! ask once per pass, so an off-screen subtree costs nothing until it scrolls
//! back into view and the next pass runs.

use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::error::Result;
use crate::target::Renderable;

use super::node::{Dispatch, SharedTarget, ViewNode};

/// A node that skips synchronization while off-screen.
pub struct Culled<N> {
    target: SharedTarget,
    inner: N,
}

impl<N: ViewNode> Culled<N> {
    pub fn new(target: &SharedTarget, inner: N) -> Self {
        Self {
            target: Rc::clone(target),
            inner,
        }
    }

    pub fn inner(&self) -> &N {
        &self.inner
    }
}

impl<N: ViewNode> ViewNode for Culled<N> {
    fn renderable(&self) -> Renderable {
        self.inner.renderable()
    }

    fn detach(&self) {
        self.inner.detach();
    }

    fn synchronize(&self) -> LocalBoxFuture<'_, Result<()>> {
        self.inner.synchronize()
    }

    fn bind_control(&self, dispatch: &Dispatch) {
        self.inner.bind_control(dispatch);
    }

    fn is_eligible_for_sync(&self) -> bool {
        self.inner.is_eligible_for_sync()
            && self
                .inner
                .renderable()
                .handles()
                .iter()
                .any(|&handle| self.target.is_visible(handle))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
