//! Dialect-specific SQL generation for sync scripts.

use crate::diff::{AddColumnChange, Change, CreateTableChange};

/// Trait for dialect-specific SQL generation.
///
/// All methods return a single statement without the terminating `;`.
pub trait ScriptDialect {
    /// Quotes an identifier.
    fn quote_identifier(&self, name: &str) -> String;

    /// Generates the statement selecting the connection character set.
    fn set_names(&self, charset: &str) -> String;

    /// Generates the statement toggling foreign key enforcement.
    fn foreign_key_checks(&self, enabled: bool) -> String;

    /// Generates SQL for a change.
    fn generate_sql(&self, change: &Change) -> String {
        match change {
            Change::CreateTable(change) => self.create_table(change),
            Change::AddColumn(change) => self.add_column(change),
        }
    }

    /// Generates SQL for CREATE TABLE. The statement is reused verbatim.
    fn create_table(&self, change: &CreateTableChange) -> String {
        change.statement.clone()
    }

    /// Generates SQL for ADD COLUMN.
    fn add_column(&self, change: &AddColumnChange) -> String {
        let mut sql = format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.quote_identifier(&change.table),
            change.definition
        );
        if let Some(after) = &change.after {
            sql.push_str(" AFTER ");
            sql.push_str(&self.quote_identifier(after));
        }
        sql
    }
}

/// MySQL dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl MySqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ScriptDialect for MySqlDialect {
    fn quote_identifier(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }

    fn set_names(&self, charset: &str) -> String {
        format!("SET NAMES {charset}")
    }

    fn foreign_key_checks(&self, enabled: bool) -> String {
        format!("SET FOREIGN_KEY_CHECKS = {}", u8::from(enabled))
    }
}
