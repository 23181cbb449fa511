//! MySQL tokenizer implementation.

use super::{Keyword, Span, Token, TokenKind};

/// A lexer that tokenizes MySQL DDL input.
///
/// The lexer never fails outright: unterminated literals come back as
/// [`TokenKind::Error`] tokens and unknown punctuation as
/// [`TokenKind::Symbol`], leaving the decision to the parser.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Returns the character after the next one without advancing.
    fn peek_third(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips the rest of the current line.
    fn skip_line(&mut self) {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
    }

    /// Skips whitespace and comments.
    ///
    /// MySQL only treats `--` as a comment when it is followed by
    /// whitespace or the end of input; `#` always starts a comment.
    /// Executable comments (`/*!40101 ... */`) are code to MySQL and are
    /// left for [`Self::scan_executable_comment`].
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            if self.peek() == Some('-')
                && self.peek_next() == Some('-')
                && self.peek_third().is_none_or(char::is_whitespace)
            {
                self.skip_line();
                continue;
            }

            if self.peek() == Some('#') {
                self.skip_line();
                continue;
            }

            if self.peek() == Some('/')
                && self.peek_next() == Some('*')
                && self.peek_third() != Some('!')
            {
                self.advance(); // /
                self.advance(); // *
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => break,
                        _ => {}
                    }
                }
                continue;
            }

            break;
        }
    }

    /// Creates a span from start to current position.
    const fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    /// Creates a token with the current span.
    const fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    /// Returns true for characters allowed inside a bare identifier.
    fn is_word_char(c: char) -> bool {
        c.is_alphanumeric() || c == '_' || c == '$'
    }

    /// Scans an identifier or keyword.
    fn scan_word(&mut self) -> Token {
        while self.peek().is_some_and(Self::is_word_char) {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];

        if let Some(keyword) = Keyword::from_str(text) {
            self.make_token(TokenKind::Keyword(keyword))
        } else {
            self.make_token(TokenKind::Identifier(String::from(text)))
        }
    }

    /// Scans a backtick-quoted identifier. A doubled backtick stands for a
    /// literal backtick.
    fn scan_quoted_identifier(&mut self) -> Token {
        self.advance(); // consume opening backtick
        let mut name = String::new();

        loop {
            match self.peek() {
                Some('`') => {
                    if self.peek_next() == Some('`') {
                        name.push('`');
                        self.advance();
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(c) => {
                    name.push(c);
                    self.advance();
                }
                None => {
                    return self.make_token(TokenKind::Error(String::from(
                        "Unterminated quoted identifier",
                    )));
                }
            }
        }

        self.advance(); // consume closing backtick
        self.make_token(TokenKind::QuotedIdentifier(name))
    }

    /// Scans a number. Text is kept verbatim; a digit run directly followed
    /// by word characters is an identifier (`1st_col` is legal in MySQL).
    fn scan_number(&mut self) -> Token {
        if self.peek() == Some('0')
            && matches!(self.peek_next(), Some('x' | 'X'))
            && self.peek_third().is_some_and(|c| c.is_ascii_hexdigit())
        {
            self.advance(); // 0
            self.advance(); // x
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
        } else {
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }

            if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
                self.advance(); // consume .
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }

            if self.peek().is_some_and(|c| c == 'e' || c == 'E')
                && (self.peek_next().is_some_and(|c| c.is_ascii_digit())
                    || (matches!(self.peek_next(), Some('+' | '-'))
                        && self.peek_third().is_some_and(|c| c.is_ascii_digit())))
            {
                self.advance(); // consume e/E
                if self.peek().is_some_and(|c| c == '+' || c == '-') {
                    self.advance();
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        if self.peek().is_some_and(Self::is_word_char) {
            return self.scan_word();
        }

        let text = &self.input[self.start..self.pos];
        self.make_token(TokenKind::Number(String::from(text)))
    }

    /// Scans a string literal delimited by `quote`.
    ///
    /// Both MySQL escape styles are understood: a doubled quote and a
    /// backslash escape.
    fn scan_string(&mut self, quote: char) -> Token {
        self.advance(); // consume opening quote
        let mut value = String::new();

        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    if self.peek_next() == Some(quote) {
                        value.push(quote);
                        self.advance();
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some('0') => value.push('\0'),
                        Some(c) => value.push(c),
                        None => {
                            return self.make_token(TokenKind::Error(String::from(
                                "Unterminated string literal",
                            )));
                        }
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => {
                    return self.make_token(TokenKind::Error(String::from(
                        "Unterminated string literal",
                    )));
                }
            }
        }

        self.advance(); // consume closing quote
        self.make_token(TokenKind::String(value))
    }

    /// Scans an executable comment. The token carries the body without the
    /// `/*!` and `*/` markers.
    fn scan_executable_comment(&mut self) -> Token {
        self.advance(); // *
        self.advance(); // !
        let body_start = self.pos;

        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    let body = &self.input[body_start..self.pos - 1];
                    self.advance();
                    return self.make_token(TokenKind::ExecutableComment(String::from(body)));
                }
                Some(_) => {}
                None => {
                    return self.make_token(TokenKind::Error(String::from(
                        "Unterminated executable comment",
                    )));
                }
            }
        }
    }

    /// Scans a prefixed literal such as `X'1F'`, `B'0101'` or `N'text'`.
    fn scan_prefixed_string(&mut self) -> Token {
        self.advance(); // consume prefix letter
        self.scan_string('\'')
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            // Single-character tokens
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),
            '+' => self.make_token(TokenKind::Plus),
            '-' => self.make_token(TokenKind::Minus),
            '*' => self.make_token(TokenKind::Star),
            '/' => {
                if self.peek() == Some('*') && self.peek_next() == Some('!') {
                    self.scan_executable_comment()
                } else {
                    self.make_token(TokenKind::Slash)
                }
            }
            '%' => self.make_token(TokenKind::Percent),
            '~' => self.make_token(TokenKind::BitNot),
            '?' => self.make_token(TokenKind::Question),
            '@' => self.make_token(TokenKind::At),
            '.' => self.make_token(TokenKind::Dot),
            ':' => self.make_token(TokenKind::Colon),
            '=' => self.make_token(TokenKind::Eq),
            '&' => self.make_token(TokenKind::BitAnd),

            // Potentially multi-character tokens
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::LtEq)
                } else if self.peek() == Some('>') {
                    self.advance();
                    self.make_token(TokenKind::NotEq)
                } else {
                    self.make_token(TokenKind::Lt)
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::GtEq)
                } else {
                    self.make_token(TokenKind::Gt)
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::NotEq)
                } else {
                    self.make_token(TokenKind::Symbol('!'))
                }
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    self.make_token(TokenKind::Concat)
                } else {
                    self.make_token(TokenKind::BitOr)
                }
            }

            // String literals (double quotes are strings unless ANSI_QUOTES)
            '\'' | '"' => {
                self.pos = self.start;
                self.scan_string(c)
            }

            '`' => {
                self.pos = self.start;
                self.scan_quoted_identifier()
            }

            'X' | 'x' | 'B' | 'b' | 'N' | 'n' if self.peek() == Some('\'') => {
                self.pos = self.start;
                self.scan_prefixed_string()
            }

            c if c.is_ascii_digit() => {
                self.pos = self.start;
                self.scan_number()
            }

            c if c.is_alphabetic() || c == '_' || c == '$' => {
                self.pos = self.start;
                self.scan_word()
            }

            other => self.make_token(TokenKind::Symbol(other)),
        }
    }

    /// Tokenizes the entire input and returns all tokens, ending with
    /// [`TokenKind::Eof`].
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}
