//! The compare pipeline: parse, inspect, diff and render.

use std::path::Path;

use oxide_ddl::{
    ColumnOrderProvider, LiveSchema, MySqlDialect, RenderOptions, Schema, SchemaDiff, diff_schema,
    parse, render_with,
};
use tracing::{info, warn};

use crate::error::Result;
use crate::executor::PendingScript;
use crate::inspector::MySqlInspector;

/// Outcome of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// The changes found.
    pub diff: SchemaDiff,
    /// The rendered script. Empty when there is nothing to change.
    pub script: PendingScript,
}

impl Comparison {
    /// Returns true if the live schema already matches.
    #[must_use]
    pub fn is_up_to_date(&self) -> bool {
        self.diff.is_empty()
    }
}

/// Reads and parses the DDL file.
///
/// # Errors
///
/// Returns [`SyncError::Io`](crate::error::SyncError::Io) if the file
/// cannot be read and [`SyncError::Parse`](crate::error::SyncError::Parse)
/// if it is not valid DDL.
pub async fn load_desired(path: &Path) -> Result<Schema> {
    info!(path = %path.display(), "Parsing DDL file");
    let ddl = tokio::fs::read_to_string(path).await?;
    let schema = parse(&ddl)?;
    info!(tables = schema.len(), "Parsed desired schema");
    Ok(schema)
}

/// Returns the tables whose column order is needed to diff: those present
/// on both sides with at least one column missing from the live table.
#[must_use]
pub fn tables_needing_order<'a>(desired: &'a Schema, live: &LiveSchema) -> Vec<&'a str> {
    desired
        .tables()
        .iter()
        .filter(|table| {
            live.table(&table.name)
                .is_some_and(|l| table.columns.iter().any(|c| !l.has_column(&c.name)))
        })
        .map(|table| table.name.as_str())
        .collect()
}

/// Diffs and renders, without any I/O.
#[must_use]
pub fn compare<P>(
    desired: &Schema,
    live: &LiveSchema,
    hints: &P,
    options: &RenderOptions,
) -> Comparison
where
    P: ColumnOrderProvider + ?Sized,
{
    let diff = diff_schema(desired, live, hints);
    for warning in &diff.warnings {
        warn!("{warning}");
    }
    let script = PendingScript::new(render_with(&diff, options, &MySqlDialect::new()));
    info!(
        created_tables = diff.created_tables().count(),
        added_columns = diff.added_column_count(),
        "Compared schemas"
    );
    Comparison { diff, script }
}

/// Runs the full pipeline against a live database.
///
/// The DDL file is parsed before the live schema is read.
///
/// # Errors
///
/// Returns the error of the first stage that fails. Ordering hint failures
/// are not errors; they surface as warnings in the diff.
pub async fn compare_with_database(
    ddl_path: &Path,
    inspector: &MySqlInspector,
    options: &RenderOptions,
) -> Result<Comparison> {
    let desired = load_desired(ddl_path).await?;
    let live = inspector.snapshot().await?;
    let hints = inspector
        .ordering_hints(tables_needing_order(&desired, &live))
        .await;
    Ok(compare(&desired, &live, &hints, options))
}
