//! MemoryTarget: an in-process render target backed by a slotmap arena.
//!
//! Primitives live in a single `SlotMap`; parent/child links live in secondary
//! maps, so detaching is O(siblings) and lookup is O(1). Detached primitives
//! stay in the arena and can be reattached, like DOM nodes removed from their
//! parent. The target counts every value write the engine performs, which is
//! how tests observe the "no visible mutation when nothing changed" contract.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use slotmap::{SecondaryMap, SlotMap};

use crate::target::{
    EventFuture, EventHandler, EventKind, Handle, InputKind, RawValue, RenderTarget,
};

// ---------------------------------------------------------------------------
// Primitive
// ---------------------------------------------------------------------------

/// What kind of primitive a handle refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// Bare text.
    Leaf,
    /// Tagged element.
    Container(String),
    /// Invisible placeholder.
    Marker(String),
}

/// Data stored for one primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub kind: PrimitiveKind,
    pub text: String,
    pub placeholder: String,
    pub input_kind: Option<InputKind>,
    pub value: RawValue,
    pub visible: bool,
}

impl Primitive {
    fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            text: String::new(),
            placeholder: String::new(),
            input_kind: None,
            value: RawValue::default(),
            visible: true,
        }
    }

    /// The tag of a container, `None` for leaves and markers.
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            PrimitiveKind::Container(tag) => Some(tag),
            PrimitiveKind::Leaf | PrimitiveKind::Marker(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Arena
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Arena {
    nodes: SlotMap<Handle, Primitive>,
    children: SecondaryMap<Handle, Vec<Handle>>,
    parent: SecondaryMap<Handle, Handle>,
}

impl Arena {
    fn insert(&mut self, primitive: Primitive) -> Handle {
        let id = self.nodes.insert(primitive);
        self.children.insert(id, Vec::new());
        id
    }

    /// Unlink `id` from its parent, if any.
    fn detach(&mut self, id: Handle) -> bool {
        match self.parent.remove(id) {
            Some(parent) => {
                if let Some(siblings) = self.children.get_mut(parent) {
                    siblings.retain(|&child| child != id);
                }
                true
            }
            None => false,
        }
    }

    fn children(&self, id: Handle) -> &[Handle] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// MemoryTarget
// ---------------------------------------------------------------------------

/// An in-memory [`RenderTarget`] with write counting, a focus cell, and event
/// simulation.
#[derive(Default)]
pub struct MemoryTarget {
    arena: RefCell<Arena>,
    handlers: RefCell<HashMap<(Handle, EventKind), EventHandler>>,
    focused: Cell<Option<Handle>>,
    writes: Cell<usize>,
    removals: RefCell<Vec<Handle>>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh, shareable target.
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// A detached `body` container to mount a tree under.
    pub fn create_host(&self) -> Handle {
        self.create_container("body")
    }

    // ── Counters ─────────────────────────────────────────────────────

    /// Number of text, placeholder and input-value writes so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn reset_writes(&self) {
        self.writes.set(0);
    }

    /// Handles passed to `remove` while attached, in call order.
    pub fn removals(&self) -> Vec<Handle> {
        self.removals.borrow().clone()
    }

    pub fn clear_removals(&self) {
        self.removals.borrow_mut().clear();
    }

    // ── Focus and visibility ─────────────────────────────────────────

    pub fn focus(&self, handle: Handle) {
        self.focused.set(Some(handle));
    }

    pub fn blur(&self) {
        self.focused.set(None);
    }

    pub fn set_visible(&self, handle: Handle, visible: bool) {
        if let Some(node) = self.arena.borrow_mut().nodes.get_mut(handle) {
            node.visible = visible;
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// A snapshot of the primitive's data.
    pub fn get(&self, handle: Handle) -> Option<Primitive> {
        self.arena.borrow().nodes.get(handle).cloned()
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.arena.borrow().nodes.contains_key(handle)
    }

    /// Number of primitives ever created.
    pub fn len(&self) -> usize {
        self.arena.borrow().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.borrow().nodes.is_empty()
    }

    pub fn parent(&self, handle: Handle) -> Option<Handle> {
        self.arena.borrow().parent.get(handle).copied()
    }

    pub fn children(&self, handle: Handle) -> Vec<Handle> {
        self.arena.borrow().children(handle).to_vec()
    }

    /// Children that are not markers.
    pub fn element_children(&self, handle: Handle) -> Vec<Handle> {
        let arena = self.arena.borrow();
        arena
            .children(handle)
            .iter()
            .copied()
            .filter(|&child| !matches!(arena.nodes[child].kind, PrimitiveKind::Marker(_)))
            .collect()
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: Handle) -> Vec<Handle> {
        let arena = self.arena.borrow();
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !arena.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in arena.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// All containers with `tag` under `start` (inclusive), in document order.
    pub fn find_by_tag(&self, start: Handle, tag: &str) -> Vec<Handle> {
        self.walk_depth_first(start)
            .into_iter()
            .filter(|&h| self.get(h).is_some_and(|p| p.tag() == Some(tag)))
            .collect()
    }

    /// Concatenated text of `start` and all its descendants.
    pub fn text_content(&self, start: Handle) -> String {
        let arena = self.arena.borrow();
        self.walk_depth_first(start)
            .into_iter()
            .map(|h| arena.nodes[h].text.as_str())
            .collect()
    }

    // ── Event simulation ─────────────────────────────────────────────

    /// Fire `kind` on `handle`, returning the handler's control cycle.
    ///
    /// `None` when nothing is subscribed.
    pub fn fire(&self, handle: Handle, kind: EventKind) -> Option<EventFuture> {
        let handler = self.handlers.borrow().get(&(handle, kind)).cloned()?;
        Some(handler())
    }

    /// Whether a handler is registered for `kind` on `handle`.
    pub fn is_subscribed(&self, handle: Handle, kind: EventKind) -> bool {
        self.handlers.borrow().contains_key(&(handle, kind))
    }

    /// Simulate the user replacing an input's text, then fire `Input`.
    pub fn type_text(&self, handle: Handle, text: &str) -> Option<EventFuture> {
        if let Some(node) = self.arena.borrow_mut().nodes.get_mut(handle) {
            node.value = RawValue::Text(text.to_owned());
        }
        self.fire(handle, EventKind::Input)
    }

    /// Simulate the user toggling a checkbox, then fire `Change`.
    pub fn toggle(&self, handle: Handle) -> Option<EventFuture> {
        if let Some(node) = self.arena.borrow_mut().nodes.get_mut(handle) {
            let checked = matches!(node.value, RawValue::Checked(true));
            node.value = RawValue::Checked(!checked);
        }
        self.fire(handle, EventKind::Change)
    }

    pub fn click(&self, handle: Handle) -> Option<EventFuture> {
        self.fire(handle, EventKind::Click)
    }

    fn count_write(&self) {
        self.writes.set(self.writes.get() + 1);
    }

    fn with_node<R>(&self, handle: Handle, f: impl FnOnce(&mut Primitive) -> R) -> Option<R> {
        self.arena.borrow_mut().nodes.get_mut(handle).map(f)
    }
}

impl RenderTarget for MemoryTarget {
    fn create_leaf(&self) -> Handle {
        self.arena.borrow_mut().insert(Primitive::new(PrimitiveKind::Leaf))
    }

    fn create_container(&self, tag: &str) -> Handle {
        self.arena
            .borrow_mut()
            .insert(Primitive::new(PrimitiveKind::Container(tag.to_owned())))
    }

    fn create_marker(&self, label: &str) -> Handle {
        self.arena
            .borrow_mut()
            .insert(Primitive::new(PrimitiveKind::Marker(label.to_owned())))
    }

    fn append_child(&self, parent: Handle, child: Handle) {
        let mut arena = self.arena.borrow_mut();
        debug_assert!(arena.nodes.contains_key(parent), "parent does not exist");
        arena.detach(child);
        arena.parent.insert(child, parent);
        if let Some(kids) = arena.children.get_mut(parent) {
            kids.push(child);
        }
    }

    fn insert_before(&self, node: Handle, reference: Handle) {
        let mut arena = self.arena.borrow_mut();
        let Some(parent) = arena.parent.get(reference).copied() else {
            return;
        };
        arena.detach(node);
        arena.parent.insert(node, parent);
        if let Some(kids) = arena.children.get_mut(parent) {
            let at = kids.iter().position(|&k| k == reference).unwrap_or(kids.len());
            kids.insert(at, node);
        }
    }

    fn remove(&self, handle: Handle) {
        if self.arena.borrow_mut().detach(handle) {
            self.removals.borrow_mut().push(handle);
        }
    }

    fn read_text(&self, handle: Handle) -> String {
        self.with_node(handle, |n| n.text.clone()).unwrap_or_default()
    }

    fn write_text(&self, handle: Handle, text: &str) {
        self.count_write();
        self.with_node(handle, |n| n.text = text.to_owned());
    }

    fn read_placeholder(&self, handle: Handle) -> String {
        self.with_node(handle, |n| n.placeholder.clone())
            .unwrap_or_default()
    }

    fn write_placeholder(&self, handle: Handle, text: &str) {
        self.count_write();
        self.with_node(handle, |n| n.placeholder = text.to_owned());
    }

    fn set_input_kind(&self, handle: Handle, kind: InputKind) {
        self.with_node(handle, |n| {
            n.input_kind = Some(kind);
            if kind == InputKind::Checkbox {
                n.value = RawValue::Checked(false);
            }
        });
    }

    fn read_input_value(&self, handle: Handle) -> RawValue {
        self.with_node(handle, |n| n.value.clone()).unwrap_or_default()
    }

    fn write_input_value(&self, handle: Handle, value: RawValue) {
        self.count_write();
        self.with_node(handle, |n| n.value = value);
    }

    fn is_focused(&self, handle: Handle) -> bool {
        self.focused.get() == Some(handle)
    }

    fn is_visible(&self, handle: Handle) -> bool {
        self.with_node(handle, |n| n.visible).unwrap_or(false)
    }

    fn subscribe(&self, handle: Handle, kind: EventKind, handler: EventHandler) {
        self.handlers.borrow_mut().insert((handle, kind), handler);
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use futures::FutureExt;
    use tokio_test::block_on;

    use super::*;

    /// Build a small tree:
    /// ```text
    ///       root
    ///      /    \
    ///    a        b
    ///   / \
    ///  c   d
    /// ```
    fn build_tree() -> (MemoryTarget, Handle, Handle, Handle, Handle, Handle) {
        let target = MemoryTarget::new();
        let root = target.create_container("div");
        let a = target.create_container("ul");
        let b = target.create_container("p");
        let c = target.create_leaf();
        let d = target.create_leaf();
        target.append_child(root, a);
        target.append_child(root, b);
        target.append_child(a, c);
        target.append_child(a, d);
        (target, root, a, b, c, d)
    }

    // ── Structure ────────────────────────────────────────────────────

    #[test]
    fn append_links_parent_and_children() {
        let (target, root, a, b, c, d) = build_tree();
        assert_eq!(target.children(root), vec![a, b]);
        assert_eq!(target.children(a), vec![c, d]);
        assert_eq!(target.parent(c), Some(a));
        assert_eq!(target.parent(root), None);
        assert_eq!(target.len(), 5);
    }

    #[test]
    fn append_moves_existing_child() {
        let (target, _root, a, b, c, d) = build_tree();
        target.append_child(b, c);
        assert_eq!(target.children(a), vec![d]);
        assert_eq!(target.children(b), vec![c]);
    }

    #[test]
    fn insert_before_reference() {
        let (target, _root, a, _b, c, d) = build_tree();
        let e = target.create_leaf();
        target.insert_before(e, d);
        assert_eq!(target.children(a), vec![c, e, d]);
    }

    #[test]
    fn insert_before_detached_reference_is_noop() {
        let target = MemoryTarget::new();
        let loose = target.create_marker("end");
        let e = target.create_leaf();
        target.insert_before(e, loose);
        assert_eq!(target.parent(e), None);
    }

    #[test]
    fn remove_detaches_but_keeps_node() {
        let (target, root, a, b, ..) = build_tree();
        target.remove(a);
        assert_eq!(target.children(root), vec![b]);
        assert!(target.contains(a));
        assert_eq!(target.removals(), vec![a]);
    }

    #[test]
    fn remove_detached_is_noop() {
        let target = MemoryTarget::new();
        let leaf = target.create_leaf();
        target.remove(leaf);
        assert!(target.removals().is_empty());
    }

    #[test]
    fn walk_depth_first() {
        let (target, root, a, b, c, d) = build_tree();
        assert_eq!(target.walk_depth_first(root), vec![root, a, c, d, b]);
        assert_eq!(target.find_by_tag(root, "p"), vec![b]);
    }

    #[test]
    fn element_children_skip_markers() {
        let target = MemoryTarget::new();
        let list = target.create_container("tbody");
        let open = target.create_marker("foreach");
        let row = target.create_container("tr");
        target.append_child(list, open);
        target.append_child(list, row);
        assert_eq!(target.element_children(list), vec![row]);
    }

    // ── Values ───────────────────────────────────────────────────────

    #[test]
    fn writes_are_counted() {
        let (target, _root, _a, b, c, _d) = build_tree();
        target.write_text(c, "one");
        target.write_placeholder(b, "hint");
        target.write_input_value(b, RawValue::Text("x".into()));
        assert_eq!(target.writes(), 3);
        assert_eq!(target.read_text(c), "one");
        target.reset_writes();
        assert_eq!(target.writes(), 0);
    }

    #[test]
    fn text_content_concatenates() {
        let (target, root, _a, b, c, d) = build_tree();
        target.write_text(c, "x");
        target.write_text(d, "y");
        target.write_text(b, "z");
        assert_eq!(target.text_content(root), "xyz");
    }

    #[test]
    fn checkbox_kind_starts_unchecked() {
        let target = MemoryTarget::new();
        let input = target.create_container("input");
        target.set_input_kind(input, InputKind::Checkbox);
        assert_eq!(target.read_input_value(input), RawValue::Checked(false));
    }

    #[test]
    fn focus_and_visibility() {
        let (target, _root, a, b, ..) = build_tree();
        target.focus(a);
        assert!(target.is_focused(a));
        assert!(!target.is_focused(b));
        target.blur();
        assert!(!target.is_focused(a));
        target.set_visible(b, false);
        assert!(!target.is_visible(b));
        assert!(target.is_visible(a));
    }

    // ── Events ───────────────────────────────────────────────────────

    #[test]
    fn fire_runs_latest_handler() {
        let target = MemoryTarget::new();
        let button = target.create_container("button");
        let hits = Rc::new(Cell::new(0));
        for weight in [1, 10] {
            let hits = Rc::clone(&hits);
            target.subscribe(
                button,
                EventKind::Click,
                Rc::new(move || {
                    hits.set(hits.get() + weight);
                    async { Ok::<(), crate::error::Error>(()) }.boxed_local()
                }),
            );
        }
        block_on(target.click(button).unwrap()).unwrap();
        assert_eq!(hits.get(), 10);
        assert!(target.fire(button, EventKind::Input).is_none());
    }

    #[test]
    fn type_text_sets_value_without_counting() {
        let target = MemoryTarget::new();
        let input = target.create_container("input");
        assert!(target.type_text(input, "abc").is_none());
        assert_eq!(target.read_input_value(input), RawValue::Text("abc".into()));
        assert_eq!(target.writes(), 0);
    }

    #[test]
    fn toggle_flips_checked() {
        let target = MemoryTarget::new();
        let input = target.create_container("input");
        target.set_input_kind(input, InputKind::Checkbox);
        let _ = target.toggle(input);
        assert_eq!(target.read_input_value(input), RawValue::Checked(true));
        let _ = target.toggle(input);
        assert_eq!(target.read_input_value(input), RawValue::Checked(false));
    }
}
