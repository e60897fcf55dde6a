//! The binding file deserialization seam.
//!
//! Mapping the binding XML onto typed actions belongs to the consumer. The
//! tracker only needs something that turns file contents into a value it can
//! hand out, which is what [`BindingsParser`] describes.

use std::error::Error as StdError;

use camino::Utf8Path;

/// Error returned by a [`BindingsParser`].
#[derive(Debug, thiserror::Error)]
#[error("failed to parse bindings: {message}")]
pub struct ParseError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ParseError {
    /// Creates a parse error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an underlying deserializer error.
    pub fn from_source(source: impl StdError + Send + Sync + 'static) -> Self {
        Self {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Turns binding file contents into a bindings value.
///
/// Closures of the form `Fn(&str) -> Result<B, ParseError>` implement this
/// trait directly.
///
/// # Examples
///
/// ```
/// use kb_tracker::{BindingsParser, ParseError};
/// use camino::Utf8Path;
///
/// let count_lines = |contents: &str| -> Result<usize, ParseError> {
///     Ok(contents.lines().count())
/// };
/// let lines = count_lines.parse(Utf8Path::new("a.binds"), "<Root>\n</Root>").unwrap();
/// assert_eq!(lines, 2);
/// ```
pub trait BindingsParser: Send + Sync + 'static {
    /// The deserialized binding map.
    type Bindings: Send + Sync + 'static;

    /// Parses the contents of the binding file at `source`.
    fn parse(&self, source: &Utf8Path, contents: &str) -> Result<Self::Bindings, ParseError>;
}

impl<F, B> BindingsParser for F
where
    F: Fn(&str) -> Result<B, ParseError> + Send + Sync + 'static,
    B: Send + Sync + 'static,
{
    type Bindings = B;

    fn parse(&self, _source: &Utf8Path, contents: &str) -> Result<B, ParseError> {
        self(contents)
    }
}

/// Binding file contents kept as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBindings {
    text: String,
}

impl RawBindings {
    /// Returns the document text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the document length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` if the document is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Pass-through parser that keeps the document as [`RawBindings`].
///
/// Rejects documents that do not start with a markup element, which is
/// what a half-written file usually looks like.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawBindingsParser;

impl BindingsParser for RawBindingsParser {
    type Bindings = RawBindings;

    fn parse(&self, source: &Utf8Path, contents: &str) -> Result<RawBindings, ParseError> {
        let text = contents.trim_start_matches('\u{feff}').trim();
        if !text.starts_with('<') {
            return Err(ParseError::new(format!("{source} is not a markup document")));
        }
        Ok(RawBindings {
            text: text.to_owned(),
        })
    }
}
