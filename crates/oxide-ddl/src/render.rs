//! Sync script rendering.
//!
//! Turns a [`SchemaDiff`] into an annotated script that can be reviewed and
//! executed as one batch. Rendering cannot fail: every change already
//! carries the verbatim SQL fragments it needs.

use std::fmt::Write as _;

use crate::dialect::{MySqlDialect, ScriptDialect};
use crate::diff::{Change, SchemaDiff};

/// Character set selected with `SET NAMES` when none is configured.
pub const DEFAULT_CHARSET: &str = "utf8mb4";

const RULE: &str = "-- ==========================================================";
const FOOTER: &str = "-- ======================= end of script ========================";

/// Options controlling script rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Character set for `SET NAMES`.
    pub charset: String,
    /// Timestamp written into the header, if any.
    pub generated_at: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            charset: DEFAULT_CHARSET.to_string(),
            generated_at: None,
        }
    }
}

/// Renders a diff as a MySQL script with default options.
///
/// Returns an empty string if the diff has no changes.
#[must_use]
pub fn render(diff: &SchemaDiff) -> String {
    render_with(diff, &RenderOptions::default(), &MySqlDialect::new())
}

/// Renders a diff with the given options and dialect.
///
/// Returns an empty string if the diff has no changes.
#[must_use]
pub fn render_with(diff: &SchemaDiff, options: &RenderOptions, dialect: &impl ScriptDialect) -> String {
    if diff.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_script(&mut out, diff, options, dialect);
    out
}

fn write_script(
    out: &mut String,
    diff: &SchemaDiff,
    options: &RenderOptions,
    dialect: &impl ScriptDialect,
) -> std::fmt::Result {
    writeln!(out, "{RULE}")?;
    writeln!(out, "--  MySQL incremental schema sync script")?;
    writeln!(out, "--  Generated automatically")?;
    if let Some(generated_at) = &options.generated_at {
        writeln!(out, "--  Generated at: {generated_at}")?;
    }
    writeln!(out, "--  Review every statement before running it!")?;
    writeln!(out, "{RULE}")?;
    writeln!(out)?;
    writeln!(out, "{};", dialect.set_names(&options.charset))?;
    writeln!(out, "{};", dialect.foreign_key_checks(false))?;
    writeln!(out)?;

    for group in diff.table_groups() {
        let Some(first) = group.first() else {
            continue;
        };
        match first {
            Change::CreateTable(change) => writeln!(
                out,
                "-- >>> [new table] Table '{}' does not exist in the target database, creating it. <<<",
                change.table
            )?,
            Change::AddColumn(change) => writeln!(
                out,
                "-- >>> [new column] Adding missing columns to table '{}'. <<<",
                change.table
            )?,
        }
        for change in group {
            writeln!(out, "{};", dialect.generate_sql(change))?;
        }
        writeln!(out)?;
    }

    writeln!(out, "{};", dialect.foreign_key_checks(true))?;
    writeln!(out, "{FOOTER}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{AddColumnChange, CreateTableChange};

    fn sample() -> SchemaDiff {
        SchemaDiff {
            changes: vec![
                Change::AddColumn(AddColumnChange {
                    table: "users".to_string(),
                    column: "name".to_string(),
                    definition: "`name` VARCHAR(50)".to_string(),
                    after: Some("id".to_string()),
                }),
                Change::CreateTable(CreateTableChange {
                    table: "orders".to_string(),
                    statement: "CREATE TABLE `orders` (`id` INT)".to_string(),
                }),
            ],
            warnings: vec![],
        }
    }

    #[test]
    fn empty_diff_renders_nothing() {
        assert_eq!(render(&SchemaDiff::default()), "");
    }

    #[test]
    fn full_script_layout() {
        let expected = "\
-- ==========================================================
--  MySQL incremental schema sync script
--  Generated automatically
--  Review every statement before running it!
-- ==========================================================

SET NAMES utf8mb4;
SET FOREIGN_KEY_CHECKS = 0;

-- >>> [new column] Adding missing columns to table 'users'. <<<
ALTER TABLE `users` ADD COLUMN `name` VARCHAR(50) AFTER `id`;

-- >>> [new table] Table 'orders' does not exist in the target database, creating it. <<<
CREATE TABLE `orders` (`id` INT);

SET FOREIGN_KEY_CHECKS = 1;
-- ======================= end of script ========================
";
        assert_eq!(render(&sample()), expected);
    }

    #[test]
    fn options_are_applied() {
        let options = RenderOptions {
            charset: "utf8".to_string(),
            generated_at: Some("2024-05-01 10:00:00".to_string()),
        };
        let script = render_with(&sample(), &options, &MySqlDialect::new());
        assert!(script.contains("--  Generated at: 2024-05-01 10:00:00\n"));
        assert!(script.contains("\nSET NAMES utf8;\n"));
    }

    #[test]
    fn one_comment_per_table_group() {
        let mut diff = sample();
        diff.changes.insert(
            1,
            Change::AddColumn(AddColumnChange {
                table: "users".to_string(),
                column: "email".to_string(),
                definition: "`email` VARCHAR(100)".to_string(),
                after: Some("name".to_string()),
            }),
        );
        let script = render(&diff);
        assert_eq!(script.matches("[new column]").count(), 1);
        assert!(script.contains(
            "AFTER `id`;\nALTER TABLE `users` ADD COLUMN `email` VARCHAR(100) AFTER `name`;\n"
        ));
    }
}
