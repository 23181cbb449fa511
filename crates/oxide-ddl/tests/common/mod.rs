#![allow(dead_code)]

use oxide_ddl::{
    LiveSchema, LiveTable, OrderingHintError, OrderingHints, ParseError, Schema, SchemaDiff,
    diff_schema, parse,
};

pub fn schema(ddl: &str) -> Schema {
    parse(ddl).unwrap_or_else(|e| panic!("Failed to parse: {ddl}\nError: {e}"))
}

pub fn parse_err(ddl: &str) -> ParseError {
    parse(ddl).expect_err(&format!("Expected parse error for: {ddl}"))
}

/// Builds a live snapshot whose ordering hints match the given column order.
pub fn live(tables: &[(&str, &[&str])]) -> (LiveSchema, OrderingHints) {
    let mut live = LiveSchema::new();
    let mut hints = OrderingHints::new();
    for (name, columns) in tables {
        live.add_table(LiveTable::new(*name, columns.iter().copied()));
        hints.record(*name, columns.iter().copied());
    }
    (live, hints)
}

pub fn diff(ddl: &str, tables: &[(&str, &[&str])]) -> SchemaDiff {
    let (live, hints) = live(tables);
    diff_schema(&schema(ddl), &live, &hints)
}

pub fn unavailable(table: &str) -> Result<Vec<String>, OrderingHintError> {
    Err(OrderingHintError::Lookup {
        table: table.to_string(),
        reason: "Lost connection to MySQL server during query".to_string(),
    })
}
