//! Schema model.
//!
//! The desired side ([`Schema`]) keeps full detail parsed from DDL: verbatim
//! statement and column text, in declaration order. The live side
//! ([`LiveSchema`]) is intentionally coarser: a set of column names per
//! table, since introspection cannot always recover exact definitions or
//! ordering.

use std::collections::{BTreeMap, BTreeSet};

/// A column declared in a `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name with quoting stripped.
    pub name: String,
    /// The declaration clause exactly as written, without the separating
    /// comma (e.g. ``"`price` DECIMAL(10,2) NOT NULL DEFAULT '0.00'"``).
    pub definition: String,
    /// Zero-based position among the table's columns.
    pub position: usize,
}

/// A table parsed from DDL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Table name with quoting and schema qualifier stripped.
    pub name: String,
    /// The full `CREATE TABLE` statement as written, without the
    /// terminating `;`.
    pub create_statement: String,
    /// Columns in declaration order.
    pub columns: Vec<Column>,
}

impl Table {
    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// The desired schema: tables in the order they appear in the DDL file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    tables: Vec<Table>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a table. Returns `false`, leaving the schema unchanged, if
    /// a table with the same name is already present.
    pub fn add_table(&mut self, table: Table) -> bool {
        if self.table(&table.name).is_some() {
            return false;
        }
        self.tables.push(table);
        true
    }

    /// Looks up a table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Returns the tables in declaration order.
    #[must_use]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Returns the number of tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if no table has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// A table as seen in the live database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveTable {
    /// Table name.
    pub name: String,
    /// Names of the table's columns.
    pub columns: BTreeSet<String>,
}

impl LiveTable {
    /// Creates a live table from its column names.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the table has a column with this name.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }
}

/// A snapshot of the live database schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveSchema {
    /// Tables keyed by name, sorted for deterministic iteration.
    pub tables: BTreeMap<String, LiveTable>,
}

impl LiveSchema {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a table.
    pub fn add_table(&mut self, table: LiveTable) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Looks up a table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&LiveTable> {
        self.tables.get(name)
    }
}

impl From<&Schema> for LiveSchema {
    /// The snapshot a database would report after applying `schema`
    /// exactly.
    fn from(schema: &Schema) -> Self {
        let mut live = Self::new();
        for table in schema.tables() {
            live.add_table(LiveTable::new(table.name.clone(), table.column_names()));
        }
        live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, columns: &[&str]) -> Table {
        Table {
            name: name.to_string(),
            create_statement: format!("CREATE TABLE `{name}` (...)"),
            columns: columns
                .iter()
                .enumerate()
                .map(|(position, c)| Column {
                    name: (*c).to_string(),
                    definition: format!("`{c}` INT"),
                    position,
                })
                .collect(),
        }
    }

    #[test]
    fn schema_keeps_declaration_order() {
        let mut schema = Schema::new();
        assert!(schema.add_table(table("zeta", &["id"])));
        assert!(schema.add_table(table("alpha", &["id"])));
        let names: Vec<&str> = schema.tables().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn schema_rejects_duplicate_tables() {
        let mut schema = Schema::new();
        assert!(schema.add_table(table("users", &["id"])));
        assert!(!schema.add_table(table("users", &["id", "name"])));
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.table("users").unwrap().columns.len(), 1);
    }

    #[test]
    fn column_lookup_by_name() {
        let users = table("users", &["id", "name"]);
        assert_eq!(users.column("name").unwrap().position, 1);
        assert!(users.column("email").is_none());
    }

    #[test]
    fn live_snapshot_of_desired_schema() {
        let mut schema = Schema::new();
        schema.add_table(table("users", &["id", "name"]));
        let live = LiveSchema::from(&schema);
        let users = live.table("users").unwrap();
        assert!(users.has_column("id"));
        assert!(users.has_column("name"));
        assert!(!users.has_column("email"));
    }
}
