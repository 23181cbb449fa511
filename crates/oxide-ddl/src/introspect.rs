//! Column ordering hints.
//!
//! A [`LiveSchema`](crate::schema::LiveSchema) only carries column names.
//! To append new columns after the physically last existing column the diff
//! engine asks a [`ColumnOrderProvider`] for the true ordinal order of each
//! table. The core defines only the trait; the front end implements it on
//! top of `information_schema`, usually by prefetching into
//! [`OrderingHints`].

use std::collections::BTreeMap;

/// Failure to obtain the ordinal column order of a table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderingHintError {
    /// No ordering information was collected for the table.
    #[error("no column ordering available for table '{table}'")]
    Unavailable {
        /// Table name.
        table: String,
    },

    /// The ordering lookup itself failed.
    #[error("column ordering lookup for table '{table}' failed: {reason}")]
    Lookup {
        /// Table name.
        table: String,
        /// Error reported by the lookup.
        reason: String,
    },
}

/// Supplies the live column order of a table.
pub trait ColumnOrderProvider {
    /// Returns the table's columns ordered by ordinal position.
    ///
    /// An empty list is a valid answer and means the table has no known
    /// last column.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderingHintError`] if the order cannot be determined.
    fn ordered_columns(&self, table: &str) -> Result<Vec<String>, OrderingHintError>;
}

impl<F> ColumnOrderProvider for F
where
    F: Fn(&str) -> Result<Vec<String>, OrderingHintError>,
{
    fn ordered_columns(&self, table: &str) -> Result<Vec<String>, OrderingHintError> {
        self(table)
    }
}

/// Prefetched ordering hints, one entry per table.
///
/// Tables without an entry answer [`OrderingHintError::Unavailable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderingHints {
    tables: BTreeMap<String, Result<Vec<String>, String>>,
}

impl OrderingHints {
    /// Creates an empty set of hints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the ordinal column order of a table.
    pub fn record<I, S>(&mut self, table: impl Into<String>, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables.insert(
            table.into(),
            Ok(columns.into_iter().map(Into::into).collect()),
        );
    }

    /// Records that the lookup for a table failed.
    pub fn record_failure(&mut self, table: impl Into<String>, reason: impl Into<String>) {
        self.tables.insert(table.into(), Err(reason.into()));
    }

    /// Returns the number of tables with a recorded entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl ColumnOrderProvider for OrderingHints {
    fn ordered_columns(&self, table: &str) -> Result<Vec<String>, OrderingHintError> {
        match self.tables.get(table) {
            Some(Ok(columns)) => Ok(columns.clone()),
            Some(Err(reason)) => Err(OrderingHintError::Lookup {
                table: table.to_string(),
                reason: reason.clone(),
            }),
            None => Err(OrderingHintError::Unavailable {
                table: table.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_order_is_returned() {
        let mut hints = OrderingHints::new();
        hints.record("users", ["id", "name", "email"]);
        assert_eq!(
            hints.ordered_columns("users").unwrap(),
            vec!["id", "name", "email"]
        );
    }

    #[test]
    fn missing_table_is_unavailable() {
        let hints = OrderingHints::new();
        assert_eq!(
            hints.ordered_columns("users").unwrap_err(),
            OrderingHintError::Unavailable {
                table: "users".to_string()
            }
        );
    }

    #[test]
    fn recorded_failure_is_reported() {
        let mut hints = OrderingHints::new();
        hints.record_failure("users", "access denied");
        hints.record("orders", ["id"]);
        let err = hints.ordered_columns("users").unwrap_err();
        assert_eq!(
            err.to_string(),
            "column ordering lookup for table 'users' failed: access denied"
        );
        assert!(hints.ordered_columns("orders").is_ok());
        assert_eq!(hints.len(), 2);
    }

    #[test]
    fn closures_are_providers() {
        let provider = |table: &str| -> Result<Vec<String>, OrderingHintError> {
            Ok(vec![format!("{table}_id")])
        };
        assert_eq!(provider.ordered_columns("t").unwrap(), vec!["t_id"]);
    }
}
