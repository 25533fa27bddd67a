//! Property algebra: constants, read-only pairs, maps, and lenses.
//!
//! These are pure combinators with no runtime state. The free functions mirror
//! the curried shapes `map_getter(f)(getter)` and `lens(outer)(inner)`; the
//! methods on [`Getter`], [`Setter`] and [`Property`] are the direct forms.

use std::fmt;
use std::rc::Rc;

use super::accessor::{Getter, Property, Setter};

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// A getter that ignores the model and always yields `value`.
pub fn constant<T: Clone + 'static>(value: T) -> Getter<T> {
    Getter::from_fn(move || value.clone())
}

/// Pair `get` with a setter that silently discards writes.
pub fn read_only<T: 'static>(get: Getter<T>) -> Property<T> {
    Property::new(get, Setter::discard())
}

/// Lift `f` over getters.
pub fn map_getter<T, U>(f: impl Fn(T) -> U + 'static) -> impl Fn(Getter<T>) -> Getter<U>
where
    T: 'static,
    U: 'static,
{
    let f = Rc::new(f);
    move |getter: Getter<T>| {
        let f = Rc::clone(&f);
        getter.map(move |value| f(value))
    }
}

/// Lift `f` contravariantly over setters.
pub fn map_setter<T, U>(f: impl Fn(U) -> T + 'static) -> impl Fn(Setter<T>) -> Setter<U>
where
    T: 'static,
    U: 'static,
{
    let f = Rc::new(f);
    move |setter: Setter<T>| {
        let f = Rc::clone(&f);
        setter.contramap(move |value| f(value))
    }
}

/// `map_getter(to)` on the read half and `map_setter(from)` on the write half.
pub fn map_property<T, U>(
    to: impl Fn(T) -> U + 'static,
    from: impl Fn(U) -> T + 'static,
) -> impl Fn(Property<T>) -> Property<U>
where
    T: 'static,
    U: 'static,
{
    let to = map_getter(to);
    let from = map_setter(from);
    move |prop: Property<T>| Property::new(to(prop.get), from(prop.set))
}

// ---------------------------------------------------------------------------
// Lens
// ---------------------------------------------------------------------------

/// A pure accessor into a sub-value `B` of an owned `A`.
///
/// Unlike [`Property`], a lens does not close over any model: it is given the
/// outer value explicitly, which is what lets [`lens`] do a single
/// read-modify-write of the outer property.
pub struct Lens<A, B> {
    view: Rc<dyn Fn(&A) -> B>,
    update: Rc<dyn Fn(&mut A, B)>,
}

impl<A, B> Clone for Lens<A, B> {
    fn clone(&self) -> Self {
        Self {
            view: Rc::clone(&self.view),
            update: Rc::clone(&self.update),
        }
    }
}

impl<A, B> fmt::Debug for Lens<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Lens(<fn>)")
    }
}

impl<A: 'static, B: 'static> Lens<A, B> {
    pub fn new(view: impl Fn(&A) -> B + 'static, update: impl Fn(&mut A, B) + 'static) -> Self {
        Self {
            view: Rc::new(view),
            update: Rc::new(update),
        }
    }

    /// Read the focused sub-value.
    pub fn view(&self, outer: &A) -> B {
        (self.view)(outer)
    }

    /// Overwrite the focused sub-value in place.
    pub fn update(&self, outer: &mut A, value: B) {
        (self.update)(outer, value)
    }

    /// Focus further into `B`.
    pub fn then<C: 'static>(self, inner: Lens<B, C>) -> Lens<A, C> {
        let outer = self.clone();
        let inner_view = inner.clone();
        Lens::new(
            move |a: &A| inner_view.view(&self.view(a)),
            move |a: &mut A, c: C| {
                let mut b = outer.view(a);
                inner.update(&mut b, c);
                outer.update(a, b);
            },
        )
    }
}

/// Compose an outer property with a lens on the value it selects.
///
/// Writing through the result reads the outer value once, updates it with the
/// lens, and writes it back once; readers never observe a partial update.
pub fn lens<A, B>(outer: Property<A>) -> impl Fn(Lens<A, B>) -> Property<B>
where
    A: 'static,
    B: 'static,
{
    move |inner: Lens<A, B>| {
        let viewer = inner.clone();
        let get = outer.get.clone().map(move |a| viewer.view(&a));

        let outer = outer.clone();
        let set = Setter::new(move |value: B| {
            let read = outer.read();
            let write = outer.set.clone();
            let inner = inner.clone();
            async move {
                let mut whole = read.await?;
                inner.update(&mut whole, value);
                write.set(whole).await
            }
        });
        Property::new(get, set)
    }
}

impl<A: 'static> Property<A> {
    /// Method form of [`lens`].
    pub fn focus<B: 'static>(&self, inner: Lens<A, B>) -> Property<B> {
        lens(self.clone())(inner)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
