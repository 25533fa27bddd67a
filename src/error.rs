//! Error types: binding failures, parse rejections.
//!
//! The engine never catches a [`BindingError`]: it propagates out of
//! `synchronize()` and `dispatch`, aborting the rest of that pass. A
//! [`ParseError`] never leaves an input field; it only suppresses the dispatch
//! for the keystroke that produced it.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// BindingError
// ---------------------------------------------------------------------------

/// A getter or setter rejected.
///
/// Application code returns this from its accessors; the engine only forwards it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BindingError {
    message: String,
}

impl BindingError {
    /// Create a binding error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message this error was created with.
    pub fn message(&self) -> &str {
        &self.message
    }
}

// ---------------------------------------------------------------------------
// ParseError
// ---------------------------------------------------------------------------

/// The displayed state of an input could not be read back as a model value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot read {raw:?} as {expected}")]
pub struct ParseError {
    /// Displayed text (or checkbox state) that failed to parse.
    pub raw: String,
    /// Human-readable name of the expected value.
    pub expected: &'static str,
}

impl ParseError {
    pub fn new(raw: impl Into<String>, expected: &'static str) -> Self {
        Self {
            raw: raw.into(),
            expected,
        }
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors surfaced by `synchronize()` and `dispatch`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A bound getter or setter failed.
    #[error("binding failed: {0}")]
    Binding(#[from] BindingError),
    /// A row getter was read while its slot held no row.
    #[error("row {index} is not available")]
    RowUnavailable { index: usize },
    /// A dispatch outlived the tree it was bound to.
    #[error("view tree was dropped before the cycle could run")]
    Detached,
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_error_display() {
        let err = BindingError::new("backend offline");
        assert_eq!(err.to_string(), "backend offline");
        assert_eq!(err.message(), "backend offline");
    }

    #[test]
    fn binding_error_converts_into_error() {
        let err: Error = BindingError::new("nope").into();
        assert_eq!(err.to_string(), "binding failed: nope");
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::new("abc", "number");
        assert_eq!(err.to_string(), "cannot read \"abc\" as number");
    }

    #[test]
    fn row_unavailable_display() {
        let err = Error::RowUnavailable { index: 4 };
        assert_eq!(err.to_string(), "row 4 is not available");
    }
}
