//! Front-end trait for turning source text into a [`Program`].
//!
//! `SourceParser` is the extension point for languages: the analyzer picks
//! the first registered parser whose extensions match a discovered file.

use crate::ast::Program;
use thiserror::Error;

/// Source text could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    /// Line of the first error (1-indexed).
    pub line: usize,
    /// Column of the first error (1-indexed).
    pub column: usize,
    /// Description of the problem.
    pub message: String,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Language front end.
pub trait SourceParser: Send + Sync {
    /// Language identifier (e.g., `"typescript"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this parser handles, with leading dot (e.g., `&[".ts"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Parses a whole file. `extension` selects a dialect where the
    /// language has several (e.g., `.tsx`).
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the source is not syntactically valid.
    fn parse(&self, source: &str, extension: &str) -> Result<Program, ParseError>;

    /// Returns true if this parser handles the given extension.
    fn handles(&self, extension: &str) -> bool {
        self.extensions().contains(&extension)
    }
}

/// Type alias for boxed parser trait objects.
pub type ParserBox = Box<dyn SourceParser>;
