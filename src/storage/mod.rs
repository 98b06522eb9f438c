// Storage module - holds loaded tables in memory
// Tables are loaded from CSV files and looked up by name at query time

pub mod loader;
pub mod table;

use crate::error::StorageError;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use table::Table;
use tracing::info;

/// A single row: column name to raw cell text
/// A column with no entry is an absent cell
pub type Row = HashMap<String, String>;

/// Anything the query engine can resolve table names against
pub trait TableStore {
    fn get_table(&self, name: &str) -> Result<&Table, StorageError>;
}

/// In-memory registry of loaded tables
#[derive(Debug, Default)]
pub struct Catalog {
    /// Tables by name
    tables: HashMap<String, Table>,
}

/// What `Catalog::load_csv` reports back to the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub table: String,
    pub rows: usize,
    pub columns: usize,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loaded table '{}' ({} rows, {} cols)",
            self.table, self.rows, self.columns
        )
    }
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table, replacing any table with the same name
    pub fn insert(&mut self, table: Table) -> Option<Table> {
        self.tables.insert(table.name.clone(), table)
    }

    /// Load a CSV file as a table
    /// The table name defaults to the file name without its extension
    pub fn load_csv(
        &mut self,
        path: impl AsRef<Path>,
        name: Option<&str>,
    ) -> Result<LoadSummary, StorageError> {
        let path = path.as_ref();
        let name = match name {
            Some(name) => name.to_string(),
            None => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        };

        let table = loader::read_csv(path, &name)?;
        let summary = LoadSummary {
            table: name,
            rows: table.row_count(),
            columns: table.column_count(),
        };
        info!(
            table = %summary.table,
            rows = summary.rows,
            columns = summary.columns,
            path = %path.display(),
            "loaded table"
        );

        self.insert(table);
        Ok(summary)
    }

    /// List all table names, sorted
    pub fn list_tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    /// Column names of a table in schema order
    pub fn schema(&self, name: &str) -> Result<&[String], StorageError> {
        self.get_table(name).map(|table| table.columns.as_slice())
    }
}

impl TableStore for Catalog {
    fn get_table(&self, name: &str) -> Result<&Table, StorageError> {
        self.tables
            .get(name)
            .ok_or_else(|| StorageError::TableNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_csv_uses_file_stem() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("employees.csv");
        fs::write(&path, "id,name\n1,Ann\n2,Ben\n").unwrap();

        let mut catalog = Catalog::new();
        let summary = catalog.load_csv(&path, None).unwrap();

        assert_eq!(summary.table, "employees");
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.columns, 2);
        assert_eq!(
            summary.to_string(),
            "Loaded table 'employees' (2 rows, 2 cols)"
        );
        assert_eq!(catalog.schema("employees").unwrap().to_vec(), vec!["id", "name"]);
    }

    #[test]
    fn test_load_csv_with_explicit_name_replaces_existing() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("a.csv");
        let second = dir.path().join("b.csv");
        fs::write(&first, "x\n1\n").unwrap();
        fs::write(&second, "y\n1\n2\n").unwrap();

        let mut catalog = Catalog::new();
        catalog.load_csv(&first, Some("data")).unwrap();
        catalog.load_csv(&second, Some("data")).unwrap();

        assert_eq!(catalog.list_tables(), vec!["data"]);
        assert_eq!(catalog.get_table("data").unwrap().row_count(), 2);
    }

    #[test]
    fn test_list_tables_sorted() {
        let mut catalog = Catalog::new();
        for name in ["zeta", "alpha", "mid"] {
            catalog.insert(Table::new(name, vec![], vec![]).unwrap());
        }
        assert_eq!(catalog.list_tables(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_missing_table() {
        let catalog = Catalog::new();
        let err = catalog.get_table("nope").unwrap_err();
        assert!(matches!(err, StorageError::TableNotFound(ref name) if name == "nope"));
        assert!(catalog.schema("nope").is_err());
    }
}
