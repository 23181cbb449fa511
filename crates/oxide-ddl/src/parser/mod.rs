//! DDL parser.
//!
//! Turns a MySQL DDL file into the desired [`Schema`](crate::schema::Schema).
//! Parsing happens in two passes: the input is first split into statements
//! at top-level semicolons, then every `CREATE TABLE` statement has its
//! column list split into clauses. Column definitions are kept verbatim.

mod ddl;
mod error;
mod statement;

pub use ddl::{DdlParser, parse};
pub use error::ParseError;
pub use statement::{RawStatement, split_statements};
