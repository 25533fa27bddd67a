//! InputField: a focus-preserving, two-way bound input.
//!
//! The field is parameterized by a [`ValueCodec`] instead of being specialized
//! per value type. On synchronize, the model value is shown only when the field
//! is not focused and the shown text differs from what is displayed, so a field
//! being edited is never overwritten mid-edit. On a user edit, the displayed
//! state is parsed; a parse failure simply drops the edit.

use std::fmt::Display;
use std::marker::PhantomData;
use std::rc::Rc;
use std::str::FromStr;

use futures::future::{self, FutureExt, LocalBoxFuture};
use tracing::{debug, trace};

use crate::error::{ParseError, Result};
use crate::property::{Getter, Property};
use crate::target::{EventFuture, Handle, InputKind, RawValue, Renderable};

use super::node::{Dispatch, SharedTarget, ViewNode};

// ---------------------------------------------------------------------------
// ValueCodec
// ---------------------------------------------------------------------------

/// Converts between a model value and the displayed state of an input.
pub trait ValueCodec<T> {
    /// The input flavor this codec displays through.
    fn kind(&self) -> InputKind;

    /// The displayed state for `value`.
    fn show(&self, value: &T) -> RawValue;

    /// Read the displayed state back as a model value.
    fn parse(&self, raw: &RawValue) -> Result<T, ParseError>;
}

/// Free text. Never rejects.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl ValueCodec<String> for TextCodec {
    fn kind(&self) -> InputKind {
        InputKind::Text
    }

    fn show(&self, value: &String) -> RawValue {
        RawValue::Text(value.clone())
    }

    fn parse(&self, raw: &RawValue) -> Result<String, ParseError> {
        Ok(raw.to_text())
    }
}

/// Numbers of any `FromStr + Display` type, with an optional lower bound.
///
/// Empty text, unparsable text, NaN, and values below the bound are rejected.
#[derive(Debug, Clone, Copy)]
pub struct NumberCodec<N> {
    min: Option<N>,
    _marker: PhantomData<N>,
}

impl<N> NumberCodec<N> {
    pub fn new() -> Self {
        Self {
            min: None,
            _marker: PhantomData,
        }
    }

    /// Reject values below `min` (builder).
    pub fn with_min(mut self, min: N) -> Self {
        self.min = Some(min);
        self
    }
}

impl<N> Default for NumberCodec<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> ValueCodec<N> for NumberCodec<N>
where
    N: FromStr + Display + PartialOrd,
{
    fn kind(&self) -> InputKind {
        InputKind::Number
    }

    fn show(&self, value: &N) -> RawValue {
        RawValue::Text(value.to_string())
    }

    fn parse(&self, raw: &RawValue) -> Result<N, ParseError> {
        let RawValue::Text(text) = raw else {
            return Err(ParseError::new(raw.to_text(), "number"));
        };
        let value: N = text
            .trim()
            .parse()
            .map_err(|_| ParseError::new(text.as_str(), "number"))?;
        // NaN is unordered even against itself.
        if value.partial_cmp(&value).is_none() {
            return Err(ParseError::new(text.as_str(), "number"));
        }
        match &self.min {
            Some(min) if value < *min => Err(ParseError::new(text.as_str(), "number in range")),
            _ => Ok(value),
        }
    }
}

/// A checkbox bound to a `bool`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckboxCodec;

impl ValueCodec<bool> for CheckboxCodec {
    fn kind(&self) -> InputKind {
        InputKind::Checkbox
    }

    fn show(&self, value: &bool) -> RawValue {
        RawValue::Checked(*value)
    }

    fn parse(&self, raw: &RawValue) -> Result<bool, ParseError> {
        match raw {
            RawValue::Checked(checked) => Ok(*checked),
            RawValue::Text(text) => Err(ParseError::new(text.as_str(), "checkbox state")),
        }
    }
}

// ---------------------------------------------------------------------------
// InputField
// ---------------------------------------------------------------------------

/// An input primitive bound to a `Property<T>` through codec `C`.
///
/// # Examples
///
/// ```ignore
/// let name = InputField::new(&target, constant("name".into()), name_prop, TextCodec);
/// let age = InputField::new(&target, constant("age".into()), age_prop, NumberCodec::<u32>::new());
/// ```
pub struct InputField<T, C> {
    target: SharedTarget,
    handle: Handle,
    placeholder: Getter<String>,
    property: Property<T>,
    codec: Rc<C>,
}

/// Text input over a `String` property.
pub fn text_input(
    target: &SharedTarget,
    placeholder: Getter<String>,
    property: Property<String>,
) -> InputField<String, TextCodec> {
    InputField::new(target, placeholder, property, TextCodec)
}

/// Number input over any numeric property.
pub fn number_input<N>(
    target: &SharedTarget,
    placeholder: Getter<String>,
    property: Property<N>,
) -> InputField<N, NumberCodec<N>>
where
    N: FromStr + Display + PartialOrd + Clone + 'static,
{
    InputField::new(target, placeholder, property, NumberCodec::new())
}

/// Checkbox over a `bool` property.
pub fn checkbox(
    target: &SharedTarget,
    property: Property<bool>,
) -> InputField<bool, CheckboxCodec> {
    InputField::new(target, Getter::from_fn(String::new), property, CheckboxCodec)
}

impl<T, C> InputField<T, C>
where
    T: Clone + 'static,
    C: ValueCodec<T> + 'static,
{
    pub fn new(
        target: &SharedTarget,
        placeholder: Getter<String>,
        property: Property<T>,
        codec: C,
    ) -> Self {
        let handle = target.create_container("input");
        target.set_input_kind(handle, codec.kind());
        Self {
            target: Rc::clone(target),
            handle,
            placeholder,
            property,
            codec: Rc::new(codec),
        }
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }
}

impl<T, C> ViewNode for InputField<T, C>
where
    T: Clone + 'static,
    C: ValueCodec<T> + 'static,
{
    fn renderable(&self) -> Renderable {
        Renderable::Node(self.handle)
    }

    fn detach(&self) {
        self.target.remove(self.handle);
    }

    fn synchronize(&self) -> LocalBoxFuture<'_, Result<()>> {
        async move {
            let value = self.property.read().await?;
            if self.target.is_focused(self.handle) {
                trace!(handle = ?self.handle, "input focused; leaving value alone");
            } else {
                let shown = self.codec.show(&value);
                if shown != self.target.read_input_value(self.handle) {
                    trace!(handle = ?self.handle, ?shown, "writing input value");
                    self.target.write_input_value(self.handle, shown);
                }
            }

            let placeholder = self.placeholder.get().await?;
            if placeholder != self.target.read_placeholder(self.handle) {
                self.target.write_placeholder(self.handle, &placeholder);
            }
            Ok(())
        }
        .boxed_local()
    }

    fn bind_control(&self, dispatch: &Dispatch) {
        let target = Rc::downgrade(&self.target);
        let handle = self.handle;
        let codec = Rc::clone(&self.codec);
        let setter = self.property.set.clone();
        let dispatch = dispatch.clone();

        let on_edit = move || -> EventFuture {
            let Some(target) = target.upgrade() else {
                return future::ready(Ok(())).boxed_local();
            };
            match codec.parse(&target.read_input_value(handle)) {
                Ok(value) => dispatch.dispatch(setter.to_action(value)),
                Err(err) => {
                    debug!(?handle, %err, "edit rejected; model left unchanged");
                    future::ready(Ok(())).boxed_local()
                }
            }
        };
        self.target
            .subscribe(handle, self.codec.kind().edit_event(), Rc::new(on_edit));
    }
}

// ===========================================================================
// Tests
// ===========================================================================
