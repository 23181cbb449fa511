//! Sync script execution.
//!
//! A rendered script starts as a [`PendingScript`]. Only after an explicit
//! [`confirm`](PendingScript::confirm) does it become a [`ConfirmedScript`],
//! which is the only thing [`ScriptExecutor`] accepts.

use std::io::{BufRead, Write};

use sqlx::mysql::MySqlPool;
use tracing::{debug, info};

use oxide_ddl::split_statements;

use crate::error::{Result, SyncError};

/// A rendered script awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingScript {
    sql: String,
}

impl PendingScript {
    /// Wraps rendered script text.
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self { sql: sql.into() }
    }

    /// Returns the script text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns true if the script contains nothing to run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sql.trim().is_empty()
    }

    /// Marks the script as reviewed and approved for execution.
    #[must_use]
    pub fn confirm(self) -> ConfirmedScript {
        ConfirmedScript { sql: self.sql }
    }

    /// Confirms the script if `approved`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Declined`] if not approved.
    pub fn confirm_if(self, approved: bool) -> Result<ConfirmedScript> {
        if approved {
            Ok(self.confirm())
        } else {
            Err(SyncError::Declined)
        }
    }
}

/// A script the user agreed to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedScript {
    sql: String,
}

impl ConfirmedScript {
    /// Returns the script text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the number of statements in the script, not counting
    /// comments.
    #[must_use]
    pub fn statement_count(&self) -> usize {
        split_statements(&self.sql).map_or(0, |statements| statements.len())
    }
}

/// Outcome of running a script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Number of statements in the executed script.
    pub statements: usize,
    /// Total rows affected across all statements.
    pub rows_affected: u64,
}

/// Runs confirmed scripts against the target database.
pub struct ScriptExecutor {
    pool: MySqlPool,
}

impl ScriptExecutor {
    /// Creates a new executor.
    #[must_use]
    pub const fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Runs the whole script as one multi-statement batch on a single
    /// connection.
    ///
    /// DDL is not transactional in MySQL: statements that completed before
    /// a failure stay applied.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Execution`] with the first server error.
    pub async fn execute(&self, script: &ConfirmedScript) -> Result<ExecutionReport> {
        info!(bytes = script.sql.len(), "Executing sync script");
        debug!(sql = %script.sql, "Executing SQL");

        let result = sqlx::raw_sql(&script.sql)
            .execute(&self.pool)
            .await
            .map_err(SyncError::Execution)?;
        let report = ExecutionReport {
            statements: script.statement_count(),
            rows_affected: result.rows_affected(),
        };

        info!(
            statements = report.statements,
            rows_affected = report.rows_affected,
            "Sync script executed successfully"
        );
        Ok(report)
    }
}

/// Asks for confirmation on `output` and reads the answer from `input`.
///
/// Only the exact answer `yes` (case-insensitive) approves.
///
/// # Errors
///
/// Returns [`SyncError::Io`] if the prompt cannot be written or the answer
/// cannot be read.
pub fn prompt_confirmation<R, W>(mut input: R, mut output: W) -> Result<bool>
where
    R: BufRead,
    W: Write,
{
    write!(
        output,
        "WARNING: the script above will be executed against the target database.\n\
         Make sure the database is backed up. Type 'yes' to continue: "
    )?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn only_yes_confirms() {
        for (answer, expected) in [
            ("yes\n", true),
            ("  YES \n", true),
            ("y\n", false),
            ("no\n", false),
            ("", false),
        ] {
            let mut out = Vec::new();
            let approved = prompt_confirmation(Cursor::new(answer), &mut out).unwrap();
            assert_eq!(approved, expected, "answer {answer:?}");
            assert!(String::from_utf8(out).unwrap().contains("Type 'yes'"));
        }
    }

    #[test]
    fn declined_scripts_cannot_be_confirmed() {
        let pending = PendingScript::new("ALTER TABLE `t` ADD COLUMN `x` INT;");
        assert!(matches!(
            pending.clone().confirm_if(false),
            Err(SyncError::Declined)
        ));
        let confirmed = pending.confirm_if(true).unwrap();
        assert_eq!(confirmed.sql(), "ALTER TABLE `t` ADD COLUMN `x` INT;");
        assert_eq!(confirmed.statement_count(), 1);
    }

    #[test]
    fn statement_count_skips_comments() {
        let script = PendingScript::new(
            "-- header\nSET NAMES utf8mb4;\n\n-- >>> [new column] <<<\n\
             ALTER TABLE `t` ADD COLUMN `x` VARCHAR(5) DEFAULT 'a;b';\n\
             SET FOREIGN_KEY_CHECKS = 1;\n-- end\n",
        )
        .confirm();
        assert_eq!(script.statement_count(), 3);
    }

    #[test]
    fn blank_script_is_empty() {
        assert!(PendingScript::new("  \n").is_empty());
        assert!(!PendingScript::new("SELECT 1;").is_empty());
    }
}
