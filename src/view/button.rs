//! Button: an action trigger with a bound label.

use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};

use crate::error::Result;
use crate::property::{Action, Getter};
use crate::target::{EventFuture, EventKind, Handle, Renderable};

use super::node::{Dispatch, SharedTarget, ViewNode};
use super::text::write_text_if_changed;

/// A button whose click dispatches `action` unconditionally.
///
/// # Examples
///
/// ```ignore
/// let add = Button::new(&target, constant("Add row".into()), model.action(|m| m.rows.push(Row::default())));
/// ```
pub struct Button {
    target: SharedTarget,
    handle: Handle,
    label: Getter<String>,
    action: Action,
}

impl Button {
    pub fn new(target: &SharedTarget, label: Getter<String>, action: Action) -> Self {
        Self {
            target: Rc::clone(target),
            handle: target.create_container("button"),
            label,
            action,
        }
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }
}

impl ViewNode for Button {
    fn renderable(&self) -> Renderable {
        Renderable::Node(self.handle)
    }

    fn detach(&self) {
        self.target.remove(self.handle);
    }

    fn synchronize(&self) -> LocalBoxFuture<'_, Result<()>> {
        async move {
            let label = self.label.get().await?;
            write_text_if_changed(self.target.as_ref(), self.handle, &label);
            Ok(())
        }
        .boxed_local()
    }

    fn bind_control(&self, dispatch: &Dispatch) {
        let action = self.action.clone();
        let dispatch = dispatch.clone();
        let on_click = move || -> EventFuture { dispatch.dispatch(action.clone()) };
        self.target
            .subscribe(self.handle, EventKind::Click, Rc::new(on_click));
    }
}

// ===========================================================================
// Tests
// ===========================================================================
