//! Token types for the MySQL DDL lexer.

use super::Span;

/// Keywords the DDL parser cares about.
///
/// Every other word is lexed as an [`TokenKind::Identifier`]; the parser
/// only needs to recognise statement heads and the clauses that open index
/// or constraint definitions inside a column list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    // Statement heads
    Create,
    Table,
    Temporary,
    If,
    Not,
    Exists,
    Like,

    // Index and constraint clauses
    Primary,
    Unique,
    Key,
    Index,
    Constraint,
    Foreign,
    Fulltext,
    Spatial,
    Check,
}

impl Keyword {
    /// Attempts to parse a keyword from a string (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CREATE" => Some(Self::Create),
            "TABLE" => Some(Self::Table),
            "TEMPORARY" => Some(Self::Temporary),
            "IF" => Some(Self::If),
            "NOT" => Some(Self::Not),
            "EXISTS" => Some(Self::Exists),
            "LIKE" => Some(Self::Like),
            "PRIMARY" => Some(Self::Primary),
            "UNIQUE" => Some(Self::Unique),
            "KEY" => Some(Self::Key),
            "INDEX" => Some(Self::Index),
            "CONSTRAINT" => Some(Self::Constraint),
            "FOREIGN" => Some(Self::Foreign),
            "FULLTEXT" => Some(Self::Fulltext),
            "SPATIAL" => Some(Self::Spatial),
            "CHECK" => Some(Self::Check),
            _ => None,
        }
    }

    /// Returns the keyword as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Table => "TABLE",
            Self::Temporary => "TEMPORARY",
            Self::If => "IF",
            Self::Not => "NOT",
            Self::Exists => "EXISTS",
            Self::Like => "LIKE",
            Self::Primary => "PRIMARY",
            Self::Unique => "UNIQUE",
            Self::Key => "KEY",
            Self::Index => "INDEX",
            Self::Constraint => "CONSTRAINT",
            Self::Foreign => "FOREIGN",
            Self::Fulltext => "FULLTEXT",
            Self::Spatial => "SPATIAL",
            Self::Check => "CHECK",
        }
    }

    /// Returns true if a column-list clause starting with this keyword
    /// declares an index or constraint rather than a column.
    #[must_use]
    pub const fn opens_table_constraint(&self) -> bool {
        matches!(
            self,
            Self::Primary
                | Self::Unique
                | Self::Key
                | Self::Index
                | Self::Constraint
                | Self::Foreign
                | Self::Fulltext
                | Self::Spatial
                | Self::Check
        )
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    /// Numeric literal, kept as written (e.g. `10`, `2.5e-3`)
    Number(String),
    /// String literal with escapes resolved (e.g. `'it''s'`)
    String(String),

    // Identifiers and keywords
    /// Bare identifier (e.g. `users`)
    Identifier(String),
    /// Backtick-quoted identifier with quoting stripped (e.g. `` `user name` ``)
    QuotedIdentifier(String),
    /// DDL keyword
    Keyword(Keyword),

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// =
    Eq,
    /// != or <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// ||
    Concat,
    /// &
    BitAnd,
    /// |
    BitOr,
    /// ~
    BitNot,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// :
    Colon,
    /// ?
    Question,
    /// @
    At,

    /// MySQL executable comment body (e.g. `/*!80023 INVISIBLE */`)
    ExecutableComment(String),

    /// Any other punctuation; kept so unrelated statements still lex.
    Symbol(char),

    // Special
    /// End of input
    Eof,
    /// Unterminated literal or identifier
    Error(String),
}

/// A token with its span in the source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    /// Returns true if this token is the given keyword.
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.as_keyword() == Some(keyword)
    }

    /// Returns the identifier name this token denotes, if any.
    ///
    /// Quoted identifiers yield their unquoted content. Keywords that are
    /// not reserved in a name position (e.g. a table called `check`) yield
    /// their source spelling.
    #[must_use]
    pub fn identifier<'a>(&'a self, source: &'a str) -> Option<&'a str> {
        match &self.kind {
            TokenKind::Identifier(name) | TokenKind::QuotedIdentifier(name) => Some(name),
            TokenKind::Keyword(_) => Some(self.span.slice(source)),
            _ => None,
        }
    }
}
