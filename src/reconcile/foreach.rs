//! ForEach: the positional list reconciler.
//!
//! A `ForEach` renders one slot per element of a collection between two
//! marker primitives. Slots are matched by index, not by identity: growing
//! from 3 to 7 rows keeps slots 0..3 (and whatever focus or text state their
//! primitives carry) and builds or reuses four more; shrinking detaches the
//! tail. Detached slots stay pooled and are reattached on the next growth.
//!
//! ```text
//!   <!--foreach-->  slot 0  slot 1  ...  slot n-1  <!--/foreach-->
//!        open       ^-- active slots, in index order --^   close
//! ```
//!
//! Each slot owns a [`RowContext`]. A synchronize pass assigns `rows[i]` to
//! slot `i` before synchronizing it, and a task dispatched from inside slot
//! `i` first re-reads the collection so it mutates the row that is current
//! *now*, not the one that was current when the slot was last synchronized.
//!
//! Shrinking leaves a detached slot's row in place. An older pass suspended
//! inside that slot resumes against its own row and writes to a primitive
//! that is no longer attached.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use futures::future::{try_join_all, FutureExt, LocalBoxFuture};
use tracing::{debug, trace};

use crate::error::Result;
use crate::property::{Action, Getter};
use crate::target::{Handle, Renderable};
use crate::view::{sync_if_eligible, Dispatch, Node, SharedTarget, ViewNode};

use super::row::RowContext;

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

struct Slot<T> {
    node: Node,
    row: RowContext<T>,
}

struct State<T> {
    /// Every slot ever built; `slots[..active]` are attached.
    slots: Vec<Slot<T>>,
    active: usize,
    dispatch: Option<Dispatch>,
}

// ---------------------------------------------------------------------------
// ForEach
// ---------------------------------------------------------------------------

/// Renders `body` once per element of `collection`.
///
/// # Examples
///
/// ```ignore
/// let names = ForEach::new(&target, model.getter(|m| m.names.clone()), move |row| {
///     Text::new(&target, row.map(String::clone)).into_node()
/// });
/// ```
pub struct ForEach<T> {
    target: SharedTarget,
    open: Handle,
    close: Handle,
    collection: Getter<Vec<T>>,
    body: Rc<dyn Fn(RowContext<T>) -> Node>,
    state: RefCell<State<T>>,
    /// Last pass ticket handed out.
    issued: Cell<u64>,
    /// Ticket of the newest pass whose snapshot has been applied.
    applied: Cell<u64>,
}

impl<T> fmt::Debug for ForEach<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ForEach")
            .field("active", &state.active)
            .field("pooled", &state.slots.len())
            .field("bound", &state.dispatch.is_some())
            .finish()
    }
}

impl<T: Clone + 'static> ForEach<T> {
    pub fn new(
        target: &SharedTarget,
        collection: Getter<Vec<T>>,
        body: impl Fn(RowContext<T>) -> Node + 'static,
    ) -> Self {
        Self {
            target: Rc::clone(target),
            open: target.create_marker("foreach"),
            close: target.create_marker("/foreach"),
            collection,
            body: Rc::new(body),
            state: RefCell::new(State {
                slots: Vec::new(),
                active: 0,
                dispatch: None,
            }),
            issued: Cell::new(0),
            applied: Cell::new(0),
        }
    }

    /// Number of attached slots.
    pub fn len(&self) -> usize {
        self.state.borrow().active
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots built so far, attached or pooled.
    pub fn pooled(&self) -> usize {
        self.state.borrow().slots.len()
    }

    /// The attached slot at `index`.
    pub fn slot(&self, index: usize) -> Option<Node> {
        let state = self.state.borrow();
        state.slots[..state.active]
            .get(index)
            .map(|slot| Rc::clone(&slot.node))
    }

    /// The opening and closing markers delimiting the slots.
    pub fn markers(&self) -> (Handle, Handle) {
        (self.open, self.close)
    }

    /// Wrap the outer dispatch so a task submitted from slot `index` runs
    /// against the row currently at that index.
    fn slot_dispatch(&self, outer: &Dispatch, row: &RowContext<T>) -> Dispatch {
        let collection = self.collection.clone();
        let outer = outer.clone();
        let row = row.clone();
        Dispatch::new(move |task: Action| {
            let collection = collection.clone();
            let row = row.clone();
            let scoped = Action::new(move || {
                let pending = collection.get();
                let row = row.clone();
                let task = task.clone();
                async move {
                    let rows = pending.await?;
                    let current = rows.into_iter().nth(row.index());
                    if current.is_none() {
                        debug!(index = row.index(), "row vanished before dispatch");
                    }
                    row.set(current);
                    task.run().await
                }
            });
            outer.dispatch(scoped)
        })
    }

    /// Attach or detach slots until exactly `len` are active.
    fn resize(&self, len: usize) {
        let mut state = self.state.borrow_mut();
        let old = state.active;
        if len < old {
            debug!(from = old, to = len, "shrinking list");
            // Highest index first.
            // Rows stay assigned so a pass still reading a detached slot
            // finishes against the row it started with.
            for slot in state.slots[len..old].iter().rev() {
                slot.node.detach();
            }
        } else if len > old {
            debug!(from = old, to = len, pooled = state.slots.len(), "growing list");
            while state.slots.len() < len {
                let row = RowContext::new(state.slots.len());
                let node = (self.body)(row.clone());
                if let Some(dispatch) = &state.dispatch {
                    node.bind_control(&self.slot_dispatch(dispatch, &row));
                }
                state.slots.push(Slot { node, row });
            }
            for slot in &state.slots[old..len] {
                slot.node
                    .renderable()
                    .insert_before(self.target.as_ref(), self.close);
            }
        }
        state.active = len;
    }
}

impl<T: Clone + 'static> ViewNode for ForEach<T> {
    fn renderable(&self) -> Renderable {
        let state = self.state.borrow();
        let mut handles = vec![self.open];
        for slot in &state.slots[..state.active] {
            handles.extend_from_slice(slot.node.renderable().handles());
        }
        handles.push(self.close);
        Renderable::Group(handles)
    }

    fn detach(&self) {
        self.target.remove(self.open);
        let state = self.state.borrow();
        for slot in &state.slots[..state.active] {
            slot.node.detach();
        }
        self.target.remove(self.close);
    }

    fn synchronize(&self) -> LocalBoxFuture<'_, Result<()>> {
        async move {
            let ticket = self.issued.get() + 1;
            self.issued.set(ticket);

            let rows = self.collection.get().await?;
            if ticket < self.applied.get() {
                trace!(ticket, applied = self.applied.get(), "dropping stale snapshot");
                return Ok(());
            }
            self.applied.set(ticket);

            self.resize(rows.len());
            let nodes: Vec<Node> = {
                let state = self.state.borrow();
                state
                    .slots
                    .iter()
                    .zip(rows)
                    .map(|(slot, row)| {
                        slot.row.set(Some(row));
                        Rc::clone(&slot.node)
                    })
                    .collect()
            };
            try_join_all(nodes.iter().map(|node| sync_if_eligible(node.as_ref()))).await?;
            Ok(())
        }
        .boxed_local()
    }

    /// # Panics
    ///
    /// When called twice: a list is bound to exactly one dispatch.
    fn bind_control(&self, dispatch: &Dispatch) {
        let mut state = self.state.borrow_mut();
        assert!(
            state.dispatch.is_none(),
            "list reconciler control bound twice"
        );
        for slot in &state.slots {
            slot.node.bind_control(&self.slot_dispatch(dispatch, &slot.row));
        }
        state.dispatch = Some(dispatch.clone());
    }
}

// ===========================================================================
// Tests
// ===========================================================================
