//! Parser error types.

use crate::lexer::Span;

/// Maximum number of characters of statement text quoted in an error.
const FRAGMENT_LEN: usize = 60;

/// A DDL parse error.
///
/// Fatal to the whole comparison: no diff is computed from a file that
/// failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The location of the error.
    pub span: Span,
    /// A short excerpt of the offending statement, if the error is tied
    /// to one.
    pub fragment: Option<String>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            fragment: None,
        }
    }

    /// Creates an error located inside a statement, quoting the start of
    /// the statement text.
    #[must_use]
    pub fn in_statement(message: impl Into<String>, span: Span, statement: &str) -> Self {
        Self {
            message: message.into(),
            span,
            fragment: Some(fragment_of(statement)),
        }
    }

    /// Creates the top-level error for input without any `CREATE TABLE`.
    #[must_use]
    pub fn no_tables(input_len: usize) -> Self {
        Self::new(
            "No CREATE TABLE statement found in DDL input",
            Span::new(0, input_len),
        )
    }
}

/// Collapses whitespace and truncates statement text for display.
fn fragment_of(statement: &str) -> String {
    let collapsed = statement.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > FRAGMENT_LEN {
        let head: String = collapsed.chars().take(FRAGMENT_LEN).collect();
        format!("{head}...")
    } else {
        collapsed
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at position {}..{}",
            self.message, self.span.start, self.span.end
        )?;
        if let Some(fragment) = &self.fragment {
            write!(f, " in `{fragment}`")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}
