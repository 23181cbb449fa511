//! # oxide-ddl
//!
//! Parsing and additive diffing of MySQL table schemas.
//!
//! This crate provides:
//! - A hand-written lexer and `CREATE TABLE` parser that keep column
//!   definitions verbatim and in declaration order
//! - An order-preserving diff engine that only ever creates tables and
//!   appends columns
//! - A renderer producing a reviewable, executable sync script
//!
//! The crate performs no I/O. The live schema and its column ordering are
//! supplied by the caller.
//!
//! ```rust
//! use oxide_ddl::{LiveSchema, LiveTable, OrderingHints, diff_schema, parse, render};
//!
//! let desired = parse(
//!     "CREATE TABLE `users` (`id` INT NOT NULL, `name` VARCHAR(50));",
//! )
//! .unwrap();
//!
//! let mut live = LiveSchema::new();
//! live.add_table(LiveTable::new("users", ["id"]));
//! let mut hints = OrderingHints::new();
//! hints.record("users", ["id"]);
//!
//! let diff = diff_schema(&desired, &live, &hints);
//! let script = render(&diff);
//! assert!(script.contains("ALTER TABLE `users` ADD COLUMN `name` VARCHAR(50) AFTER `id`;"));
//! ```

pub mod dialect;
pub mod diff;
pub mod introspect;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod schema;

pub use dialect::{MySqlDialect, ScriptDialect};
pub use diff::{AddColumnChange, Change, CreateTableChange, DiffWarning, SchemaDiff, diff_schema};
pub use introspect::{ColumnOrderProvider, OrderingHintError, OrderingHints};
pub use parser::{DdlParser, ParseError, RawStatement, parse, split_statements};
pub use render::{DEFAULT_CHARSET, RenderOptions, render, render_with};
pub use schema::{Column, LiveSchema, LiveTable, Schema, Table};
