//! Table: a header reconciler over column names and a body reconciler over
//! rows.
//!
//! ```text
//! table
//! ├── thead
//! │   └── ForEach(cols) ── th ── Text
//! └── tbody
//!     └── ForEach(rows) ── tr ── td ── <cell>
//!                              └─ td ── <cell>
//! ```

use std::rc::Rc;

use futures::future::{try_join, FutureExt, LocalBoxFuture};

use crate::error::Result;
use crate::property::Getter;
use crate::reconcile::{ForEach, RowContext};
use crate::target::{Handle, Renderable};
use crate::view::{Dispatch, Element, Node, SharedTarget, Text, ViewNode, ViewNodeExt};

/// A table with reconciled header cells and body rows.
pub struct Table<R> {
    target: SharedTarget,
    handle: Handle,
    head: ForEach<String>,
    body: ForEach<R>,
}

impl<R: Clone + 'static> Table<R> {
    /// `cells` builds the cells of one row; each is wrapped in a `td`.
    pub fn new(
        target: &SharedTarget,
        columns: Getter<Vec<String>>,
        rows: Getter<Vec<R>>,
        cells: impl Fn(RowContext<R>) -> Vec<Node> + 'static,
    ) -> Self {
        let handle = target.create_container("table");
        let thead = target.create_container("thead");
        let tbody = target.create_container("tbody");
        target.append_child(handle, thead);
        target.append_child(handle, tbody);

        let th_target = Rc::clone(target);
        let head = ForEach::new(target, columns, move |column: RowContext<String>| {
            let label = Text::new(&th_target, column.getter()).into_node();
            Element::new(&th_target, "th", vec![label]).into_node()
        });
        head.renderable().append_to(target.as_ref(), thead);

        let tr_target = Rc::clone(target);
        let body = ForEach::new(target, rows, move |row| {
            let tds = cells(row)
                .into_iter()
                .map(|cell| Element::new(&tr_target, "td", vec![cell]).into_node())
                .collect();
            Element::new(&tr_target, "tr", tds).into_node()
        });
        body.renderable().append_to(target.as_ref(), tbody);

        Self {
            target: Rc::clone(target),
            handle,
            head,
            body,
        }
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// The header reconciler.
    pub fn columns(&self) -> &ForEach<String> {
        &self.head
    }

    /// The body reconciler.
    pub fn rows(&self) -> &ForEach<R> {
        &self.body
    }
}

impl<R: Clone + 'static> ViewNode for Table<R> {
    fn renderable(&self) -> Renderable {
        Renderable::Node(self.handle)
    }

    fn detach(&self) {
        self.target.remove(self.handle);
    }

    fn synchronize(&self) -> LocalBoxFuture<'_, Result<()>> {
        try_join(self.head.synchronize(), self.body.synchronize())
            .map(|outcome| outcome.map(|_| ()))
            .boxed_local()
    }

    fn bind_control(&self, dispatch: &Dispatch) {
        self.head.bind_control(dispatch);
        self.body.bind_control(dispatch);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
