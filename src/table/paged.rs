//! PagedTable: a [`Table`] over one page of a backing collection, followed by
//! navigation controls.
//!
//! ```text
//! div
//! ├── table            rows[range(len)]
//! ├── "page:"
//! ├── button "prev"
//! ├── input  (1-based page number)
//! ├── "/N "            page count
//! ├── button "next"
//! ├── "page size:"
//! ├── input  (page size)
//! └── "/len "          total rows
//! ```
//!
//! The table's row getter slices the backing collection through the shared
//! [`PagingState`]; the controls mutate that same state through the normal
//! dispatch cycle, so the next synchronize pass shows the new page.

use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::error::Result;
use crate::property::{constant, Action, Getter, Property, Setter};
use crate::reconcile::RowContext;
use crate::target::{Handle, Renderable};
use crate::view::{
    Button, Dispatch, Element, InputField, Node, NumberCodec, SharedTarget, Text, ViewNode,
    ViewNodeExt,
};

use super::paging::PagingState;
use super::table::Table;

/// A table showing one page of `rows` at a time.
pub struct PagedTable<R> {
    root: Element,
    table: Rc<Table<R>>,
    state: Rc<PagingState>,
}

impl<R: Clone + 'static> PagedTable<R> {
    /// A paged table with its own default [`PagingState`].
    pub fn new(
        target: &SharedTarget,
        columns: Getter<Vec<String>>,
        rows: Getter<Vec<R>>,
        cells: impl Fn(RowContext<R>) -> Vec<Node> + 'static,
    ) -> Self {
        Self::with_state(target, Rc::new(PagingState::new()), columns, rows, cells)
    }

    /// A paged table driven by `state`.
    pub fn with_state(
        target: &SharedTarget,
        state: Rc<PagingState>,
        columns: Getter<Vec<String>>,
        rows: Getter<Vec<R>>,
        cells: impl Fn(RowContext<R>) -> Vec<Node> + 'static,
    ) -> Self {
        let table = Rc::new(Table::new(
            target,
            columns,
            page_of(&rows, &state),
            cells,
        ));
        let lengths = rows.clone().map(|all: Vec<R>| all.len());

        let previous = {
            let state = Rc::clone(&state);
            Action::from_fn(move || state.previous())
        };
        let next = {
            let state = Rc::clone(&state);
            let lengths = lengths.clone();
            Action::new(move || {
                let state = Rc::clone(&state);
                let pending = lengths.get();
                async move {
                    state.next(pending.await?);
                    Ok(())
                }
            })
        };

        let page_number = Property::new(
            {
                let state = Rc::clone(&state);
                Getter::from_fn(move || state.page_number())
            },
            {
                let state = Rc::clone(&state);
                Setter::from_fn(move |page| state.go_to_page(page))
            },
        );
        let page_size = Property::new(
            {
                let state = Rc::clone(&state);
                Getter::from_fn(move || state.page_size())
            },
            {
                let state = Rc::clone(&state);
                Setter::from_fn(move |size| state.set_page_size(size))
            },
        );
        let page_count = {
            let state = Rc::clone(&state);
            lengths
                .clone()
                .map(move |len| format!("/{} ", state.page_count(len)))
        };
        let total = lengths.map(|len| format!("/{len} "));

        let label = |text: &str| Text::new(target, constant(text.to_owned())).into_node();
        let at_least_one = || NumberCodec::new().with_min(1_usize);
        let table_node: Node = table.clone();
        let root = Element::new(
            target,
            "div",
            vec![
                table_node,
                label("page:"),
                Button::new(target, constant("prev".into()), previous).into_node(),
                InputField::new(target, constant("page".into()), page_number, at_least_one())
                    .into_node(),
                Text::new(target, page_count).into_node(),
                Button::new(target, constant("next".into()), next).into_node(),
                label("page size:"),
                InputField::new(target, constant("page size".into()), page_size, at_least_one())
                    .into_node(),
                Text::new(target, total).into_node(),
            ],
        );

        Self { root, table, state }
    }

    pub fn handle(&self) -> Handle {
        self.root.handle()
    }

    pub fn table(&self) -> &Table<R> {
        &self.table
    }

    pub fn state(&self) -> &Rc<PagingState> {
        &self.state
    }
}

/// The current page of `rows`, clamped to the collection's length at read
/// time.
fn page_of<R: Clone + 'static>(rows: &Getter<Vec<R>>, state: &Rc<PagingState>) -> Getter<Vec<R>> {
    let state = Rc::clone(state);
    rows.clone().map(move |all: Vec<R>| {
        let range = state.range(all.len());
        all[range].to_vec()
    })
}

impl<R: Clone + 'static> ViewNode for PagedTable<R> {
    fn renderable(&self) -> Renderable {
        self.root.renderable()
    }

    fn detach(&self) {
        self.root.detach();
    }

    fn synchronize(&self) -> LocalBoxFuture<'_, Result<()>> {
        self.root.synchronize()
    }

    fn bind_control(&self, dispatch: &Dispatch) {
        self.root.bind_control(dispatch);
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokio_test::block_on;

    use super::*;
    use crate::property::Model;
    use crate::target::RenderTarget;
    use crate::testing::MemoryTarget;

    fn numbered(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    fn paged(target: &SharedTarget, model: &Model<Vec<usize>>) -> PagedTable<usize> {
        let cell_target = Rc::clone(target);
        PagedTable::new(
            target,
            constant(vec!["#".to_string()]),
            model.getter(Vec::clone),
            move |row| {
                vec![Text::new(&cell_target, row.map(|n: &usize| n.to_string())).into_node()]
            },
        )
    }

    /// Bind with a dispatch that runs the task and resynchronizes `node`.
    fn bind(node: &Rc<PagedTable<usize>>) {
        let weak = Rc::downgrade(node);
        node.bind_control(&Dispatch::new(move |task: Action| {
            let weak = weak.clone();
            async move {
                task.run().await?;
                match weak.upgrade() {
                    Some(node) => node.synchronize().await,
                    None => Ok(()),
                }
            }
        }));
    }

    fn shown_rows(mem: &MemoryTarget, paged: &PagedTable<usize>) -> Vec<String> {
        mem.find_by_tag(paged.table().handle(), "td")
            .into_iter()
            .map(|td| mem.text_content(td))
            .collect()
    }

    fn buttons(mem: &MemoryTarget, paged: &PagedTable<usize>) -> (Handle, Handle) {
        let found = mem.find_by_tag(paged.handle(), "button");
        (found[0], found[1])
    }

    fn inputs(mem: &MemoryTarget, paged: &PagedTable<usize>) -> (Handle, Handle) {
        let found = mem.find_by_tag(paged.handle(), "input");
        (found[0], found[1])
    }

    #[test]
    fn first_page_and_counts() {
        let mem = MemoryTarget::shared();
        let target: SharedTarget = mem.clone();
        let model = Model::new(numbered(12));
        let table = paged(&target, &model);
        block_on(table.synchronize()).unwrap();

        assert_eq!(shown_rows(&mem, &table), vec!["0", "1", "2", "3", "4"]);
        let (page, size) = inputs(&mem, &table);
        assert_eq!(mem.read_input_value(page).to_text(), "1");
        assert_eq!(mem.read_input_value(size).to_text(), "5");
        let text = mem.text_content(table.handle());
        assert!(text.contains("/3 "), "{text}");
        assert!(text.contains("/12 "), "{text}");
    }

    #[test]
    fn next_twice_then_noop() {
        let mem = MemoryTarget::shared();
        let target: SharedTarget = mem.clone();
        let model = Model::new(numbered(12));
        let table = Rc::new(paged(&target, &model));
        bind(&table);
        block_on(table.synchronize()).unwrap();
        let (_, next) = buttons(&mem, &table);

        block_on(mem.click(next).unwrap()).unwrap();
        block_on(mem.click(next).unwrap()).unwrap();
        assert_eq!(table.state().page_index(), 10);
        assert_eq!(shown_rows(&mem, &table), vec!["10", "11"]);

        block_on(mem.click(next).unwrap()).unwrap();
        assert_eq!(table.state().page_index(), 10);
        assert_eq!(shown_rows(&mem, &table), vec!["10", "11"]);
    }

    #[test]
    fn previous_returns_to_first_page() {
        let mem = MemoryTarget::shared();
        let target: SharedTarget = mem.clone();
        let model = Model::new(numbered(12));
        let table = Rc::new(paged(&target, &model));
        bind(&table);
        block_on(table.synchronize()).unwrap();
        let (prev, next) = buttons(&mem, &table);

        block_on(mem.click(next).unwrap()).unwrap();
        block_on(mem.click(prev).unwrap()).unwrap();
        block_on(mem.click(prev).unwrap()).unwrap();
        assert_eq!(table.state().page_index(), 0);
        assert_eq!(shown_rows(&mem, &table).len(), 5);
    }

    #[test]
    fn page_input_jumps_and_rejects_zero() {
        let mem = MemoryTarget::shared();
        let target: SharedTarget = mem.clone();
        let model = Model::new(numbered(12));
        let table = Rc::new(paged(&target, &model));
        bind(&table);
        block_on(table.synchronize()).unwrap();
        let (page, _) = inputs(&mem, &table);

        block_on(mem.type_text(page, "2").unwrap()).unwrap();
        assert_eq!(table.state().page_index(), 5);
        assert_eq!(shown_rows(&mem, &table), vec!["5", "6", "7", "8", "9"]);

        block_on(mem.type_text(page, "0").unwrap()).unwrap();
        assert_eq!(table.state().page_index(), 5);

        // Past the end: an empty page, not an error.
        block_on(mem.type_text(page, "9").unwrap()).unwrap();
        assert!(shown_rows(&mem, &table).is_empty());
    }

    #[test]
    fn page_size_input_keeps_offset() {
        let mem = MemoryTarget::shared();
        let target: SharedTarget = mem.clone();
        let model = Model::new(numbered(12));
        let table = Rc::new(paged(&target, &model));
        bind(&table);
        block_on(table.synchronize()).unwrap();
        let (page, size) = inputs(&mem, &table);

        block_on(mem.type_text(page, "2").unwrap()).unwrap();
        block_on(mem.type_text(size, "3").unwrap()).unwrap();
        assert_eq!(shown_rows(&mem, &table), vec!["5", "6", "7"]);
        assert!(mem.text_content(table.handle()).contains("/4 "));
        assert_eq!(mem.read_input_value(page).to_text(), "3");
    }

    #[test]
    fn tables_page_independently() {
        let mem = MemoryTarget::shared();
        let target: SharedTarget = mem.clone();
        let model = Model::new(numbered(12));
        let first = Rc::new(paged(&target, &model));
        let second = Rc::new(paged(&target, &model));
        bind(&first);
        bind(&second);
        block_on(first.synchronize()).unwrap();
        block_on(second.synchronize()).unwrap();

        let (_, next) = buttons(&mem, &first);
        block_on(mem.click(next).unwrap()).unwrap();
        block_on(second.synchronize()).unwrap();
        assert_eq!(first.state().page_index(), 5);
        assert_eq!(second.state().page_index(), 0);
        assert_eq!(shown_rows(&mem, &second)[0], "0");
    }

    #[test]
    fn shrinking_backing_collection_clamps_the_slice() {
        let mem = MemoryTarget::shared();
        let target: SharedTarget = mem.clone();
        let model = Model::new(numbered(12));
        let table = paged(&target, &model);
        table.state().go_to_page(3);
        model.update(|rows| rows.truncate(7));
        block_on(table.synchronize()).unwrap();
        assert!(shown_rows(&mem, &table).is_empty());

        model.update(|rows| *rows = numbered(12));
        block_on(table.synchronize()).unwrap();
        assert_eq!(shown_rows(&mem, &table), vec!["10", "11"]);
    }
}
