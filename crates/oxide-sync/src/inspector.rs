//! Live schema inspection through `information_schema`.

use std::collections::BTreeMap;
use std::time::Duration;

use oxide_ddl::{LiveSchema, LiveTable, OrderingHints};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::error::Result;

// information_schema columns come back as binary strings on some servers,
// hence the casts.
const COLUMNS_SQL: &str = "SELECT CAST(TABLE_NAME AS CHAR), CAST(COLUMN_NAME AS CHAR) \
     FROM information_schema.COLUMNS WHERE TABLE_SCHEMA = ?";

const TABLES_SQL: &str =
    "SELECT CAST(TABLE_NAME AS CHAR) FROM information_schema.TABLES WHERE TABLE_SCHEMA = ?";

const ORDERED_COLUMNS_SQL: &str = "SELECT CAST(COLUMN_NAME AS CHAR) \
     FROM information_schema.COLUMNS WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? \
     ORDER BY ORDINAL_POSITION";

const MAX_CONNECTIONS: u32 = 2;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Reads the current schema of a MySQL database.
pub struct MySqlInspector {
    pool: MySqlPool,
    database: String,
}

impl MySqlInspector {
    /// Creates an inspector over an existing pool.
    #[must_use]
    pub fn new(pool: MySqlPool, database: impl Into<String>) -> Self {
        Self {
            pool,
            database: database.into(),
        }
    }

    /// Connects to the database described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Inspection`](crate::error::SyncError::Inspection)
    /// if the connection fails.
    pub async fn connect(config: &SyncConfig) -> Result<Self> {
        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Connecting to database"
        );
        let pool = MySqlPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(config.connect_options())
            .await?;
        Ok(Self::new(pool, &config.database))
    }

    /// Returns the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Reads every table and its column names.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Inspection`](crate::error::SyncError::Inspection)
    /// if either query fails. A partial snapshot is never returned.
    pub async fn snapshot(&self) -> Result<LiveSchema> {
        debug!(sql = %TABLES_SQL, "Reading tables");
        let tables: Vec<(String,)> = sqlx::query_as(TABLES_SQL)
            .bind(&self.database)
            .fetch_all(&self.pool)
            .await?;

        debug!(sql = %COLUMNS_SQL, "Reading columns");
        let columns: Vec<(String, String)> = sqlx::query_as(COLUMNS_SQL)
            .bind(&self.database)
            .fetch_all(&self.pool)
            .await?;

        let snapshot = build_snapshot(tables.into_iter().map(|(t,)| t), columns);
        info!(
            database = %self.database,
            tables = snapshot.tables.len(),
            "Read live schema"
        );
        Ok(snapshot)
    }

    /// Fetches the ordinal column order of each given table.
    ///
    /// Failures are recorded per table and never returned as errors.
    pub async fn ordering_hints<I, S>(&self, tables: I) -> OrderingHints
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hints = OrderingHints::new();
        for table in tables {
            let table = table.as_ref();
            debug!(sql = %ORDERED_COLUMNS_SQL, table = %table, "Reading column order");
            let result: std::result::Result<Vec<(String,)>, sqlx::Error> =
                sqlx::query_as(ORDERED_COLUMNS_SQL)
                    .bind(&self.database)
                    .bind(table)
                    .fetch_all(&self.pool)
                    .await;
            match result {
                Ok(rows) => hints.record(table, rows.into_iter().map(|(c,)| c)),
                Err(e) => {
                    warn!(table = %table, error = %e, "Failed to read column order");
                    hints.record_failure(table, e.to_string());
                }
            }
        }
        hints
    }
}

/// Assembles a snapshot from table names and `(table, column)` rows.
///
/// Tables without any column row are kept with an empty column set.
/// Column rows for unknown tables add the table.
fn build_snapshot<T>(tables: T, columns: Vec<(String, String)>) -> LiveSchema
where
    T: IntoIterator<Item = String>,
{
    let mut by_table: BTreeMap<String, Vec<String>> =
        tables.into_iter().map(|t| (t, Vec::new())).collect();
    for (table, column) in columns {
        by_table.entry(table).or_default().push(column);
    }

    let mut live = LiveSchema::new();
    for (name, columns) in by_table {
        live.add_table(LiveTable::new(name, columns));
    }
    live
}
