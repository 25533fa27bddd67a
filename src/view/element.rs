//! Element: a tagged composite with ordered children.
//!
//! Children are attached once, at construction. Synchronization fans out to
//! every eligible child concurrently and completes when all of them have; the
//! first failing child aborts the join.

use std::rc::Rc;

use futures::future::{try_join_all, FutureExt, LocalBoxFuture};

use crate::error::Result;
use crate::property::Getter;
use crate::target::{Handle, Renderable};

use super::node::{sync_if_eligible, Dispatch, Node, SharedTarget, ViewNode, ViewNodeExt};
use super::text::Text;

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// A container primitive holding child nodes in document order.
///
/// # Examples
///
/// ```ignore
/// let row = Element::new(&target, "tr", vec![
///     Element::new(&target, "td", vec![name_input.into_node()]).into_node(),
///     Element::new(&target, "td", vec![age_input.into_node()]).into_node(),
/// ]);
/// ```
pub struct Element {
    target: SharedTarget,
    handle: Handle,
    children: Vec<Node>,
}

impl Element {
    /// Create a `tag` container and append every child's renderable to it.
    pub fn new(target: &SharedTarget, tag: &str, children: Vec<Node>) -> Self {
        let handle = target.create_container(tag);
        for child in &children {
            child.renderable().append_to(target.as_ref(), handle);
        }
        Self {
            target: Rc::clone(target),
            handle,
            children,
        }
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

impl ViewNode for Element {
    fn renderable(&self) -> Renderable {
        Renderable::Node(self.handle)
    }

    fn detach(&self) {
        self.target.remove(self.handle);
    }

    fn synchronize(&self) -> LocalBoxFuture<'_, Result<()>> {
        let pending = self.children.iter().map(|child| sync_if_eligible(child.as_ref()));
        try_join_all(pending).map(|joined| joined.map(drop)).boxed_local()
    }

    fn bind_control(&self, dispatch: &Dispatch) {
        for child in &self.children {
            child.bind_control(dispatch);
        }
    }
}

/// `div[label, value]`: a caption in front of a value node.
pub fn labelled(target: &SharedTarget, label: Getter<String>, value: Node) -> Element {
    Element::new(target, "div", vec![Text::new(target, label).into_node(), value])
}

// ===========================================================================
// Tests
// ===========================================================================
