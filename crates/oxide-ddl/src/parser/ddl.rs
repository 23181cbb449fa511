//! `CREATE TABLE` parsing.

use tracing::{debug, trace};

use crate::lexer::{Keyword, Span, Token, TokenKind};
use crate::schema::{Column, Schema, Table};

use super::ParseError;
use super::statement::{RawStatement, split_statements};

/// Parses MySQL DDL text into a desired [`Schema`].
///
/// Only `CREATE TABLE` statements contribute to the schema; any other
/// statement (`CREATE INDEX`, `INSERT`, `SET`, ...) is skipped.
pub struct DdlParser<'a> {
    input: &'a str,
}

impl<'a> DdlParser<'a> {
    /// Creates a parser over the given DDL text.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Parses every statement and collects the tables.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for a malformed statement, a duplicate
    /// table or column, or when no `CREATE TABLE` statement is found.
    pub fn parse(&self) -> Result<Schema, ParseError> {
        let mut schema = Schema::new();

        for statement in split_statements(self.input)? {
            let Some(table) = self.parse_create_table(&statement)? else {
                trace!(statement = statement.text, "Skipping non CREATE TABLE statement");
                continue;
            };

            debug!(
                table = %table.name,
                columns = table.columns.len(),
                "Parsed CREATE TABLE"
            );
            let name = table.name.clone();
            if !schema.add_table(table) {
                return Err(ParseError::in_statement(
                    format!("Duplicate definition of table '{name}'"),
                    statement.span,
                    statement.text,
                ));
            }
        }

        if schema.is_empty() {
            return Err(ParseError::no_tables(self.input.len()));
        }
        Ok(schema)
    }

    /// Parses one statement, returning `None` if it is not a
    /// `CREATE [TEMPORARY] TABLE` statement.
    fn parse_create_table(&self, statement: &RawStatement<'_>) -> Result<Option<Table>, ParseError> {
        let mut cursor = Cursor::new(&statement.tokens);

        if !cursor.eat_keyword(Keyword::Create) {
            return Ok(None);
        }
        cursor.eat_keyword(Keyword::Temporary);
        if !cursor.eat_keyword(Keyword::Table) {
            return Ok(None);
        }

        cursor.skip_executable_comments();
        if cursor.eat_keyword(Keyword::If)
            && !(cursor.eat_keyword(Keyword::Not) && cursor.eat_keyword(Keyword::Exists))
        {
            return Err(statement_error("Expected IF NOT EXISTS", cursor.span(), statement));
        }

        cursor.skip_executable_comments();
        let name = self.parse_table_name(&mut cursor, statement)?;

        // CREATE TABLE t LIKE u, CREATE TABLE t (LIKE u) and CREATE TABLE ...
        // AS SELECT declare no columns of their own.
        let rest = &statement.tokens[cursor.pos..];
        let columns = match rest {
            [open, next, ..]
                if open.kind == TokenKind::LeftParen && !next.is_keyword(Keyword::Like) =>
            {
                self.parse_column_list(rest, statement)?
            }
            _ => Vec::new(),
        };

        Ok(Some(Table {
            name,
            create_statement: statement.text.to_string(),
            columns,
        }))
    }

    /// Parses the table name, resolving `db`.`table` to its last segment.
    fn parse_table_name(
        &self,
        cursor: &mut Cursor<'_>,
        statement: &RawStatement<'_>,
    ) -> Result<String, ParseError> {
        let mut name = self.expect_identifier(cursor, "Expected table name", statement)?;
        while cursor.peek().is_some_and(|t| t.kind == TokenKind::Dot) {
            cursor.advance();
            name = self.expect_identifier(cursor, "Expected table name after '.'", statement)?;
        }
        Ok(name)
    }

    fn expect_identifier(
        &self,
        cursor: &mut Cursor<'_>,
        message: &str,
        statement: &RawStatement<'_>,
    ) -> Result<String, ParseError> {
        match cursor.peek().and_then(|t| t.identifier(self.input)) {
            Some(name) => {
                let name = name.to_string();
                cursor.advance();
                Ok(name)
            }
            None => Err(statement_error(message, cursor.span(), statement)),
        }
    }

    /// Parses the parenthesized column list starting at `tokens[0]`.
    ///
    /// The list is split at commas that sit directly inside the outer
    /// parentheses, so `DECIMAL(10,2)` or `ENUM('a','b')` stay in one clause.
    fn parse_column_list(
        &self,
        tokens: &[Token],
        statement: &RawStatement<'_>,
    ) -> Result<Vec<Column>, ParseError> {
        let open = &tokens[0];
        let mut depth = 0usize;
        let mut close = None;
        for (i, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }
        // Statements are only produced with balanced parentheses.
        let Some(close) = close else {
            return Err(statement_error("Unterminated parenthesis", open.span, statement));
        };

        let inner = &tokens[1..close];
        if inner.is_empty() {
            return Ok(Vec::new());
        }

        let mut columns: Vec<Column> = Vec::new();
        let mut clause_start = 0;
        let mut depth = 0usize;
        for (i, token) in inner.iter().enumerate() {
            match token.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth -= 1,
                TokenKind::Comma if depth == 0 => {
                    self.push_clause(&inner[clause_start..i], token.span, &mut columns, statement)?;
                    clause_start = i + 1;
                }
                _ => {}
            }
        }
        self.push_clause(
            &inner[clause_start..],
            tokens[close].span,
            &mut columns,
            statement,
        )?;

        Ok(columns)
    }

    /// Turns one clause of the column list into a column, unless it
    /// declares an index or constraint. `boundary` is the separator that
    /// ends the clause, used to locate errors on empty clauses.
    fn push_clause(
        &self,
        clause: &[Token],
        boundary: Span,
        columns: &mut Vec<Column>,
        statement: &RawStatement<'_>,
    ) -> Result<(), ParseError> {
        let (Some(first), Some(last)) = (clause.first(), clause.last()) else {
            return Err(statement_error("Empty column definition", boundary, statement));
        };

        if first.as_keyword().is_some_and(|kw| kw.opens_table_constraint()) {
            return Ok(());
        }

        let Some(name) = first.identifier(self.input) else {
            return Err(statement_error(
                "Expected column name at start of column definition",
                first.span,
                statement,
            ));
        };

        if columns.iter().any(|c| c.name == name) {
            return Err(statement_error(
                format!("Duplicate column '{name}'"),
                first.span,
                statement,
            ));
        }

        columns.push(Column {
            name: name.to_string(),
            definition: first.span.merge(last.span).slice(self.input).to_string(),
            position: columns.len(),
        });
        Ok(())
    }
}

fn statement_error(
    message: impl Into<String>,
    span: Span,
    statement: &RawStatement<'_>,
) -> ParseError {
    ParseError::in_statement(message, span, statement.text)
}

/// Forward-only position over a statement's tokens.
struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Cursor<'t> {
    const fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Consumes the next token if it is `keyword`.
    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.peek().is_some_and(|t| t.is_keyword(keyword)) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Skips executable comments such as `/*!32312 IF NOT EXISTS*/`.
    fn skip_executable_comments(&mut self) {
        while self
            .peek()
            .is_some_and(|t| matches!(t.kind, TokenKind::ExecutableComment(_)))
        {
            self.advance();
        }
    }

    /// Span of the current token, or an empty span after the last one.
    fn span(&self) -> Span {
        match self.peek() {
            Some(token) => token.span,
            None => self
                .tokens
                .last()
                .map_or_else(Span::default, |t| Span::new(t.span.end, t.span.end)),
        }
    }
}

/// Parses MySQL DDL text into a desired [`Schema`].
///
/// # Errors
///
/// See [`DdlParser::parse`].
pub fn parse(ddl: &str) -> Result<Schema, ParseError> {
    DdlParser::new(ddl).parse()
}
