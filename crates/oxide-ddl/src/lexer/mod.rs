//! MySQL Lexer/Tokenizer
//!
//! A hand-written lexer that turns DDL text into tokens carrying byte spans,
//! so the parser can always recover the verbatim source of any clause.

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::Lexer;
