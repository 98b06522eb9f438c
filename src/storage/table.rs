// Table implementation
// A table is a named list of columns plus rows of raw text cells.
// Cells stay untyped here; the query engine classifies them when it needs to.

use super::Row;
use crate::error::StorageError;
use std::collections::HashSet;

/// Represents an in-memory table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// The name of the table
    pub name: String,
    /// Column names in schema order
    pub columns: Vec<String>,
    /// Rows in load order; a missing key is an absent cell
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a table, checking that column names are distinct and that
    /// every row only uses declared columns
    pub fn new(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Row>,
    ) -> Result<Self, StorageError> {
        let name = name.into();

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(StorageError::DuplicateColumn {
                    table: name,
                    column: column.clone(),
                });
            }
        }

        for (index, row) in rows.iter().enumerate() {
            if let Some(column) = row.keys().find(|key| !seen.contains(key.as_str())) {
                return Err(StorageError::UnknownColumn {
                    table: name,
                    row: index + 1,
                    column: column.clone(),
                });
            }
        }

        Ok(Self {
            name,
            columns,
            rows,
        })
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    /// Get the number of rows in the table
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
