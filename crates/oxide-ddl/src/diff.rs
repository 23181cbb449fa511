//! Schema diff engine.
//!
//! Compares the desired [`Schema`] parsed from DDL against a [`LiveSchema`]
//! snapshot and produces the additive changes needed to bring the live
//! database in line: missing tables are created and missing columns are
//! appended. Nothing is ever dropped or modified.

use std::fmt;

use tracing::warn;

use crate::introspect::ColumnOrderProvider;
use crate::schema::{LiveSchema, LiveTable, Schema, Table};

// ================================================================
// Public types
// ================================================================

/// Creation of a table missing from the live database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTableChange {
    /// Table name.
    pub table: String,
    /// The verbatim `CREATE TABLE` statement, without `;`.
    pub statement: String,
}

/// Addition of a column missing from an existing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddColumnChange {
    /// Table name.
    pub table: String,
    /// Column name.
    pub column: String,
    /// The verbatim column definition.
    pub definition: String,
    /// Column to place the new one after. `None` appends without an
    /// explicit position.
    pub after: Option<String>,
}

/// A single additive change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Create a missing table.
    CreateTable(CreateTableChange),
    /// Add a missing column to an existing table.
    AddColumn(AddColumnChange),
}

impl Change {
    /// Returns the table the change applies to.
    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::CreateTable(change) => &change.table,
            Self::AddColumn(change) => &change.table,
        }
    }
}

/// Informational warnings about a diff that was computed with
/// reduced accuracy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffWarning {
    /// The live column order of a table could not be determined, so the
    /// first new column was anchored after an arbitrary existing column.
    DegradedOrdering {
        /// Table name.
        table: String,
        /// Why the ordering lookup failed.
        reason: String,
        /// The column used as anchor instead, if the table had any.
        fallback_anchor: Option<String>,
    },
}

impl fmt::Display for DiffWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegradedOrdering {
                table,
                reason,
                fallback_anchor,
            } => {
                write!(f, "column order of table '{table}' unknown ({reason}); ")?;
                match fallback_anchor {
                    Some(anchor) => write!(f, "new columns placed after '{anchor}'"),
                    None => write!(f, "new columns appended at the end"),
                }
            }
        }
    }
}

/// Result of comparing a desired schema with a live snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDiff {
    /// Changes in desired-schema order. Changes for one table are
    /// contiguous.
    pub changes: Vec<Change>,
    /// Warnings raised while computing the changes.
    pub warnings: Vec<DiffWarning>,
}

impl SchemaDiff {
    /// Returns `true` if there is nothing to apply.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Groups consecutive changes by table, preserving order.
    #[must_use]
    pub fn table_groups(&self) -> Vec<&[Change]> {
        let mut groups = Vec::new();
        let mut start = 0;
        for i in 1..=self.changes.len() {
            if i == self.changes.len() || self.changes[i].table() != self.changes[start].table() {
                groups.push(&self.changes[start..i]);
                start = i;
            }
        }
        groups
    }

    /// Returns the names of tables that will be created.
    pub fn created_tables(&self) -> impl Iterator<Item = &str> {
        self.changes.iter().filter_map(|change| match change {
            Change::CreateTable(c) => Some(c.table.as_str()),
            Change::AddColumn(_) => None,
        })
    }

    /// Returns the number of columns that will be added.
    #[must_use]
    pub fn added_column_count(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, Change::AddColumn(_)))
            .count()
    }
}

// ================================================================
// Table-level diff
// ================================================================

/// Computes the `AddColumn` changes for a table that exists on both sides.
fn diff_table<P>(desired: &Table, live: &LiveTable, hints: &P, diff: &mut SchemaDiff)
where
    P: ColumnOrderProvider + ?Sized,
{
    let missing: Vec<_> = desired
        .columns
        .iter()
        .filter(|c| !live.has_column(&c.name))
        .collect();
    if missing.is_empty() {
        return;
    }

    let mut anchor = match hints.ordered_columns(&desired.name) {
        Ok(ordered) => ordered.last().cloned(),
        Err(err) => {
            // Any existing column keeps the statement valid; greatest name
            // keeps the choice deterministic.
            let fallback = live.columns.last().cloned();
            warn!(
                table = %desired.name,
                error = %err,
                fallback = fallback.as_deref().unwrap_or("<none>"),
                "Column ordering unavailable, falling back to arbitrary anchor"
            );
            diff.warnings.push(DiffWarning::DegradedOrdering {
                table: desired.name.clone(),
                reason: err.to_string(),
                fallback_anchor: fallback.clone(),
            });
            fallback
        }
    };

    for column in missing {
        diff.changes.push(Change::AddColumn(AddColumnChange {
            table: desired.name.clone(),
            column: column.name.clone(),
            definition: column.definition.clone(),
            after: anchor.replace(column.name.clone()),
        }));
    }
}

// ================================================================
// Schema-level diff
// ================================================================

/// Compares the desired schema against a live snapshot.
///
/// Tables are visited in desired-schema order. A table missing from the
/// live database yields one `CreateTable`; an existing table yields one
/// `AddColumn` per missing column, in declaration order, each placed after
/// the previous one. The first new column goes after the last column
/// reported by `hints`. Tables and columns that exist only in the live
/// database are ignored.
///
/// A failing ordering lookup never aborts the diff: it is recorded as a
/// [`DiffWarning::DegradedOrdering`] and only affects that table.
#[must_use]
pub fn diff_schema<P>(desired: &Schema, live: &LiveSchema, hints: &P) -> SchemaDiff
where
    P: ColumnOrderProvider + ?Sized,
{
    let mut diff = SchemaDiff::default();

    for table in desired.tables() {
        match live.table(&table.name) {
            None => diff.changes.push(Change::CreateTable(CreateTableChange {
                table: table.name.clone(),
                statement: table.create_statement.clone(),
            })),
            Some(live_table) => diff_table(table, live_table, hints, &mut diff),
        }
    }

    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::{OrderingHintError, OrderingHints};
    use crate::parser::parse;

    // ============================================================
    // Helpers
    // ============================================================

    fn live(tables: &[(&str, &[&str])]) -> LiveSchema {
        let mut live = LiveSchema::new();
        for (name, columns) in tables {
            live.add_table(LiveTable::new(*name, columns.iter().copied()));
        }
        live
    }

    fn add_column(table: &str, column: &str, definition: &str, after: Option<&str>) -> Change {
        Change::AddColumn(AddColumnChange {
            table: table.to_string(),
            column: column.to_string(),
            definition: definition.to_string(),
            after: after.map(str::to_string),
        })
    }

    fn failing(table: &str) -> Result<Vec<String>, OrderingHintError> {
        Err(OrderingHintError::Lookup {
            table: table.to_string(),
            reason: "timeout".to_string(),
        })
    }

    // ============================================================
    // Tests
    // ============================================================

    #[test]
    fn identical_schema_is_empty() {
        let desired = parse("CREATE TABLE a (`x` INT, `y` INT); CREATE TABLE b (`z` INT);").unwrap();
        let diff = diff_schema(&desired, &LiveSchema::from(&desired), &OrderingHints::new());
        assert!(diff.is_empty());
        assert!(diff.warnings.is_empty());
    }

    #[test]
    fn missing_table_is_created_verbatim() {
        let desired = parse("CREATE TABLE `orders` (`id` BIGINT) ENGINE=InnoDB;").unwrap();
        let diff = diff_schema(&desired, &LiveSchema::new(), &OrderingHints::new());
        assert_eq!(
            diff.changes,
            vec![Change::CreateTable(CreateTableChange {
                table: "orders".to_string(),
                statement: "CREATE TABLE `orders` (`id` BIGINT) ENGINE=InnoDB".to_string(),
            })]
        );
    }

    #[test]
    fn missing_columns_are_chained() {
        let desired = parse("CREATE TABLE t (`a` INT, `b` INT, `c` INT);").unwrap();
        let mut hints = OrderingHints::new();
        hints.record("t", ["a"]);
        let diff = diff_schema(&desired, &live(&[("t", &["a"])]), &hints);
        assert_eq!(
            diff.changes,
            vec![
                add_column("t", "b", "`b` INT", Some("a")),
                add_column("t", "c", "`c` INT", Some("b")),
            ]
        );
    }

    #[test]
    fn anchor_is_last_ordinal_column() {
        let desired = parse("CREATE TABLE t (`id` INT, `new_col` INT);").unwrap();
        let mut hints = OrderingHints::new();
        // Live-only columns still count for placement.
        hints.record("t", ["id", "legacy", "zz_last"]);
        let diff = diff_schema(&desired, &live(&[("t", &["id", "legacy", "zz_last"])]), &hints);
        assert_eq!(
            diff.changes,
            vec![add_column("t", "new_col", "`new_col` INT", Some("zz_last"))]
        );
    }

    #[test]
    fn empty_ordering_means_no_anchor() {
        let desired = parse("CREATE TABLE t (`a` INT, `b` INT);").unwrap();
        let mut hints = OrderingHints::new();
        hints.record("t", Vec::<String>::new());
        let diff = diff_schema(&desired, &live(&[("t", &[])]), &hints);
        assert_eq!(
            diff.changes,
            vec![
                add_column("t", "a", "`a` INT", None),
                add_column("t", "b", "`b` INT", Some("a")),
            ]
        );
    }

    #[test]
    fn degraded_ordering_falls_back_and_warns() {
        let desired = parse("CREATE TABLE t (`a` INT, `m` INT, `b` INT);").unwrap();
        let diff = diff_schema(&desired, &live(&[("t", &["m", "a"])]), &failing);
        assert_eq!(diff.changes, vec![add_column("t", "b", "`b` INT", Some("m"))]);
        assert_eq!(
            diff.warnings,
            vec![DiffWarning::DegradedOrdering {
                table: "t".to_string(),
                reason: "column ordering lookup for table 't' failed: timeout".to_string(),
                fallback_anchor: Some("m".to_string()),
            }]
        );
    }

    #[test]
    fn ordering_failure_is_isolated_per_table() {
        let desired = parse("CREATE TABLE a (`x` INT, `y` INT); CREATE TABLE b (`x` INT, `y` INT);")
            .unwrap();
        let mut hints = OrderingHints::new();
        hints.record_failure("a", "denied");
        hints.record("b", ["x"]);
        let diff = diff_schema(&desired, &live(&[("a", &["x"]), ("b", &["x"])]), &hints);
        assert_eq!(
            diff.changes,
            vec![
                add_column("a", "y", "`y` INT", Some("x")),
                add_column("b", "y", "`y` INT", Some("x")),
            ]
        );
        assert_eq!(diff.warnings.len(), 1);
    }

    #[test]
    fn hints_are_not_consulted_without_missing_columns() {
        let desired = parse("CREATE TABLE t (`a` INT);").unwrap();
        let diff = diff_schema(&desired, &live(&[("t", &["a"])]), &failing);
        assert!(diff.is_empty());
        assert!(diff.warnings.is_empty());
    }

    #[test]
    fn live_only_objects_are_ignored() {
        let desired = parse("CREATE TABLE t (`a` INT);").unwrap();
        let diff = diff_schema(
            &desired,
            &live(&[("t", &["a", "old"]), ("legacy", &["id"])]),
            &OrderingHints::new(),
        );
        assert!(diff.is_empty());
    }

    #[test]
    fn changes_follow_desired_order() {
        let desired = parse(
            "CREATE TABLE z (`id` INT); CREATE TABLE m (`id` INT, `n` INT); CREATE TABLE a (`id` INT);",
        )
        .unwrap();
        let mut hints = OrderingHints::new();
        hints.record("m", ["id"]);
        let diff = diff_schema(&desired, &live(&[("m", &["id"])]), &hints);
        let tables: Vec<&str> = diff.changes.iter().map(Change::table).collect();
        assert_eq!(tables, vec!["z", "m", "a"]);
        assert_eq!(diff.created_tables().collect::<Vec<_>>(), vec!["z", "a"]);
        assert_eq!(diff.added_column_count(), 1);
    }

    #[test]
    fn table_groups_split_on_table_change() {
        let desired =
            parse("CREATE TABLE a (`x` INT, `y` INT, `z` INT); CREATE TABLE b (`id` INT);").unwrap();
        let mut hints = OrderingHints::new();
        hints.record("a", ["x"]);
        let diff = diff_schema(&desired, &live(&[("a", &["x"])]), &hints);
        let groups = diff.table_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1][0].table(), "b");
        assert!(SchemaDiff::default().table_groups().is_empty());
    }

    #[test]
    fn warning_display() {
        let warning = DiffWarning::DegradedOrdering {
            table: "t".to_string(),
            reason: "timeout".to_string(),
            fallback_anchor: None,
        };
        assert_eq!(
            warning.to_string(),
            "column order of table 't' unknown (timeout); new columns appended at the end"
        );
    }
}
