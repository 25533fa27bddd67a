//! Getter, Setter, Property, Action: the accessor types every node binds to.
//!
//! All accessors are cheap to clone (`Rc` inside) and produce `!Send` boxed
//! futures, since the whole engine runs on one cooperative task queue. A getter
//! must not write the model; a setter performs exactly one mutation.

use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures::future::{self, FutureExt, LocalBoxFuture};

use crate::error::Result;

// ---------------------------------------------------------------------------
// Getter
// ---------------------------------------------------------------------------

/// A possibly-asynchronous, side-effect-free read of a `T`.
///
/// May be called any number of times per cycle; it must return equal values
/// while the model is unchanged, or the equality skip in `synchronize()` stops
/// being meaningful.
pub struct Getter<T> {
    read: Rc<dyn Fn() -> LocalBoxFuture<'static, Result<T>>>,
}

impl<T> Clone for Getter<T> {
    fn clone(&self) -> Self {
        Self {
            read: Rc::clone(&self.read),
        }
    }
}

impl<T> fmt::Debug for Getter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Getter(<fn>)")
    }
}

impl<T: 'static> Getter<T> {
    /// Wrap an async read.
    pub fn new<F, Fut>(read: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<T>> + 'static,
    {
        Self {
            read: Rc::new(move || read().boxed_local()),
        }
    }

    /// Wrap a synchronous, infallible read.
    pub fn from_fn(read: impl Fn() -> T + 'static) -> Self {
        Self::new(move || future::ready(Ok(read())))
    }

    /// Start a read.
    pub fn get(&self) -> LocalBoxFuture<'static, Result<T>> {
        (self.read)()
    }

    /// Covariant transform: `getter.map(f).map(g)` reads the same as
    /// `getter.map(|x| g(f(x)))`.
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Getter<U> {
        let f = Rc::new(f);
        Getter::new(move || {
            let pending = self.get();
            let f = Rc::clone(&f);
            async move { Ok(f(pending.await?)) }
        })
    }
}

// ---------------------------------------------------------------------------
// Setter
// ---------------------------------------------------------------------------

/// A possibly-asynchronous write of a `T` into the model it closes over.
pub struct Setter<T> {
    write: Rc<dyn Fn(T) -> LocalBoxFuture<'static, Result<()>>>,
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            write: Rc::clone(&self.write),
        }
    }
}

impl<T> fmt::Debug for Setter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Setter(<fn>)")
    }
}

impl<T: 'static> Setter<T> {
    /// Wrap an async write.
    pub fn new<F, Fut>(write: F) -> Self
    where
        F: Fn(T) -> Fut + 'static,
        Fut: Future<Output = Result<()>> + 'static,
    {
        Self {
            write: Rc::new(move |value| write(value).boxed_local()),
        }
    }

    /// Wrap a synchronous, infallible write.
    pub fn from_fn(write: impl Fn(T) + 'static) -> Self {
        Self::new(move |value| {
            write(value);
            future::ready(Ok(()))
        })
    }

    /// A setter that discards every value without signalling failure.
    pub fn discard() -> Self {
        Self::from_fn(|_| {})
    }

    /// Start a write.
    pub fn set(&self, value: T) -> LocalBoxFuture<'static, Result<()>> {
        (self.write)(value)
    }

    /// Contravariant transform: the returned setter converts with `f` and then
    /// writes through `self`.
    pub fn contramap<U: 'static>(self, f: impl Fn(U) -> T + 'static) -> Setter<U> {
        Setter::new(move |value| self.set(f(value)))
    }

    /// Freeze a value into a zero-argument mutation task.
    pub fn to_action(&self, value: T) -> Action
    where
        T: Clone,
    {
        let setter = self.clone();
        Action::new(move || setter.set(value.clone()))
    }
}

// ---------------------------------------------------------------------------
// Property
// ---------------------------------------------------------------------------

/// A getter/setter pair: the unit of bidirectional binding.
pub struct Property<T> {
    pub get: Getter<T>,
    pub set: Setter<T>,
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            get: self.get.clone(),
            set: self.set.clone(),
        }
    }
}

impl<T> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("get", &self.get)
            .field("set", &self.set)
            .finish()
    }
}

impl<T: 'static> Property<T> {
    pub fn new(get: Getter<T>, set: Setter<T>) -> Self {
        Self { get, set }
    }

    /// Read the current value.
    pub fn read(&self) -> LocalBoxFuture<'static, Result<T>> {
        self.get.get()
    }

    /// Write a new value.
    pub fn write(&self, value: T) -> LocalBoxFuture<'static, Result<()>> {
        self.set.set(value)
    }

    /// Transform both directions. `from` must invert `to` on every value the
    /// getter can produce for reads-after-writes to round-trip.
    pub fn map<U: 'static>(
        self,
        to: impl Fn(T) -> U + 'static,
        from: impl Fn(U) -> T + 'static,
    ) -> Property<U> {
        Property {
            get: self.get.map(to),
            set: self.set.contramap(from),
        }
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// A zero-argument mutation task.
///
/// Button clicks run one directly; input fields build one from their setter
/// and the parsed value. Only the control cycle runs actions.
pub struct Action {
    run: Rc<dyn Fn() -> LocalBoxFuture<'static, Result<()>>>,
}

impl Clone for Action {
    fn clone(&self) -> Self {
        Self {
            run: Rc::clone(&self.run),
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(<fn>)")
    }
}

impl Action {
    pub fn new<F, Fut>(run: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<()>> + 'static,
    {
        Self {
            run: Rc::new(move || run().boxed_local()),
        }
    }

    /// Wrap a synchronous, infallible mutation.
    pub fn from_fn(run: impl Fn() + 'static) -> Self {
        Self::new(move || {
            run();
            future::ready(Ok(()))
        })
    }

    /// Run the task once.
    pub fn run(&self) -> LocalBoxFuture<'static, Result<()>> {
        (self.run)()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use tokio_test::block_on;

    use super::*;
    use crate::error::{BindingError, Error};

    // ── Getter ───────────────────────────────────────────────────────

    #[test]
    fn from_fn_reads_current_value() {
        let cell = Rc::new(Cell::new(3));
        let reader = Rc::clone(&cell);
        let getter = Getter::from_fn(move || reader.get());
        assert_eq!(block_on(getter.get()), Ok(3));
        cell.set(9);
        assert_eq!(block_on(getter.get()), Ok(9));
    }

    #[test]
    fn async_getter_can_fail() {
        let getter: Getter<u32> =
            Getter::new(|| async { Err(BindingError::new("offline").into()) });
        let err = block_on(getter.get()).unwrap_err();
        assert_eq!(err, Error::Binding(BindingError::new("offline")));
    }

    #[test]
    fn map_composes() {
        let getter = Getter::from_fn(|| 4);
        let chained = getter.clone().map(|x| x + 1).map(|x| x * 10);
        let fused = getter.map(|x| (x + 1) * 10);
        assert_eq!(block_on(chained.get()), block_on(fused.get()));
    }

    // ── Setter ───────────────────────────────────────────────────────

    #[test]
    fn contramap_converts_before_writing() {
        let written = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&written);
        let setter = Setter::from_fn(move |v: i64| sink.borrow_mut().push(v));
        let from_text = setter.contramap(|s: String| s.len() as i64);
        block_on(from_text.set("four".to_string())).unwrap();
        assert_eq!(*written.borrow(), vec![4]);
    }

    #[test]
    fn discard_never_fails() {
        let setter: Setter<String> = Setter::discard();
        assert_eq!(block_on(setter.set("ignored".into())), Ok(()));
    }

    #[test]
    fn to_action_replays_the_same_value() {
        let last = Rc::new(Cell::new(0));
        let sink = Rc::clone(&last);
        let action = Setter::from_fn(move |v| sink.set(v)).to_action(7);
        block_on(action.run()).unwrap();
        assert_eq!(last.get(), 7);
        last.set(0);
        block_on(action.run()).unwrap();
        assert_eq!(last.get(), 7);
    }

    // ── Property ─────────────────────────────────────────────────────

    #[test]
    fn property_map_round_trips() {
        let cell = Rc::new(Cell::new(0_i32));
        let (r, w) = (Rc::clone(&cell), Rc::clone(&cell));
        let prop = Property::new(
            Getter::from_fn(move || r.get()),
            Setter::from_fn(move |v| w.set(v)),
        );
        let text = prop.map(|n| n.to_string(), |s: String| s.parse().unwrap_or_default());
        block_on(text.write("42".into())).unwrap();
        assert_eq!(block_on(text.read()), Ok("42".to_string()));
        assert_eq!(cell.get(), 42);
    }

    // ── Action ───────────────────────────────────────────────────────

    #[test]
    fn action_runs_each_time() {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let action = Action::from_fn(move || c.set(c.get() + 1));
        block_on(action.run()).unwrap();
        block_on(action.clone().run()).unwrap();
        assert_eq!(count.get(), 2);
    }
}
