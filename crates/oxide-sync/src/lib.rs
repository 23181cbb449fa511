//! Additive MySQL schema sync.
//!
//! `oxide-sync` compares the `CREATE TABLE` statements of a DDL file with
//! the live schema of a MySQL database and produces a script that creates
//! the missing tables and appends the missing columns. Nothing is ever
//! dropped or modified.
//!
//! # Architecture
//!
//! - **Config** - Connection settings persisted as JSON between runs
//! - **Inspector** - Reads tables, columns and column order from
//!   `information_schema`
//! - **Sync** - Parses the DDL file, diffs and renders the script (the
//!   parsing and diffing itself lives in `oxide-ddl`)
//! - **Executor** - Runs a confirmed script as one batch
//!
//! # CLI Usage
//!
//! ```bash
//! # Print the sync script
//! oxide-sync --sql-file schema.sql --database shop compare
//!
//! # Write it to a file instead
//! oxide-sync compare --output sync.sql
//!
//! # Review, confirm and execute
//! oxide-sync apply
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod inspector;
pub mod sync;

/// Re-exports of commonly used types.
pub mod prelude {
    pub use crate::config::{CONFIG_FILE, ConfigOverrides, SyncConfig};
    pub use crate::error::{Result, SyncError};
    pub use crate::executor::{
        ConfirmedScript, ExecutionReport, PendingScript, ScriptExecutor, prompt_confirmation,
    };
    pub use crate::inspector::MySqlInspector;
    pub use crate::sync::{Comparison, compare, compare_with_database, load_desired};
}
