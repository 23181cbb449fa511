//! Statement splitting.
//!
//! A statement ends at a `;` that sits outside every parenthesis. Quoting is
//! handled by the lexer, so a `;` inside a string or quoted identifier never
//! reaches this level as a separator.

use crate::lexer::{Lexer, Span, Token, TokenKind};

use super::ParseError;

/// One statement of the input, without its terminating `;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStatement<'a> {
    /// Verbatim text from the first to the last token.
    pub text: &'a str,
    /// Location of `text` in the input.
    pub span: Span,
    /// Tokens of the statement (no terminating `;`, no EOF).
    pub tokens: Vec<Token>,
}

impl RawStatement<'_> {
    /// Returns the first token of the statement.
    #[must_use]
    pub fn head(&self) -> Option<&Token> {
        self.tokens.first()
    }
}

/// Splits DDL text into statements.
///
/// Statements consisting only of comments produce nothing. The last
/// statement does not need a terminating `;`.
///
/// # Errors
///
/// Returns a [`ParseError`] for an unterminated string or quoted
/// identifier, a `)` without a matching `(`, or a `(` that is still open at
/// the end of input.
pub fn split_statements(input: &str) -> Result<Vec<RawStatement<'_>>, ParseError> {
    let mut statements = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    let mut open_parens: Vec<Span> = Vec::new();

    for token in Lexer::new(input).tokenize() {
        match &token.kind {
            TokenKind::Error(message) => {
                let start = statement_start(&current, &token);
                return Err(ParseError::in_statement(
                    message.clone(),
                    token.span,
                    &input[start..token.span.end],
                ));
            }
            TokenKind::LeftParen => {
                open_parens.push(token.span);
                current.push(token);
            }
            TokenKind::RightParen => {
                if open_parens.pop().is_none() {
                    let start = statement_start(&current, &token);
                    return Err(ParseError::in_statement(
                        "Unbalanced closing parenthesis",
                        token.span,
                        &input[start..token.span.end],
                    ));
                }
                current.push(token);
            }
            TokenKind::Semicolon if open_parens.is_empty() => {
                flush(input, &mut current, &mut statements);
            }
            TokenKind::Eof => {
                if let Some(open) = open_parens.first() {
                    let start = statement_start(&current, &token);
                    return Err(ParseError::in_statement(
                        "Unterminated parenthesis",
                        Span::new(open.start, input.len()),
                        &input[start..],
                    ));
                }
                flush(input, &mut current, &mut statements);
            }
            _ => current.push(token),
        }
    }

    Ok(statements)
}

/// Byte offset where the statement under construction begins.
fn statement_start(current: &[Token], fallback: &Token) -> usize {
    current.first().map_or(fallback.span.start, |t| t.span.start)
}

/// Moves the collected tokens into a new statement, if there are any.
fn flush<'a>(input: &'a str, current: &mut Vec<Token>, statements: &mut Vec<RawStatement<'a>>) {
    let (Some(first), Some(last)) = (current.first(), current.last()) else {
        return;
    };
    let span = first.span.merge(last.span);
    statements.push(RawStatement {
        text: span.slice(input),
        span,
        tokens: std::mem::take(current),
    });
}
