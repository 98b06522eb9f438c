// Error types
// Parsing, execution and storage each get their own enum so callers can
// tell a malformed statement apart from a statement that failed against data

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning query text into a `Query`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Empty query")]
    Empty,

    #[error("Missing FROM clause")]
    MissingFrom,

    #[error("Malformed SELECT clause")]
    MalformedSelect,

    #[error("Unsupported or missing operator in WHERE clause")]
    MissingOperator,
}

/// Errors raised while evaluating a query against a table
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Column '{column}' not found in table '{table}'")]
    ColumnNotFound { column: String, table: String },

    #[error("Column '{column}' not found for COUNT() in table '{table}'")]
    CountColumnNotFound { column: String, table: String },

    #[error("Unsupported function in SELECT: {0}")]
    UnsupportedFunction(String),

    /// Operands are rendered as SQL literals, e.g. `'abc'` or `5`
    #[error("Type error comparing {left} {op} {right}")]
    TypeError {
        left: String,
        op: String,
        right: String,
    },

    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),
}

/// Errors raised by the table store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Table '{0}' not found. Use .load <path> [name].")]
    TableNotFound(String),

    #[error("CSV file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },

    #[error("Row {row} of table '{table}' has a value for unknown column '{column}'")]
    UnknownColumn {
        table: String,
        row: usize,
        column: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_not_found_points_at_load_command() {
        let err = ExecutionError::from(StorageError::TableNotFound("missing".to_string()));
        let msg = err.to_string();
        assert!(msg.contains("'missing'"));
        assert!(msg.contains(".load"));
    }

    #[test]
    fn test_parse_error_is_wrapped() {
        let err = ExecutionError::from(ParseError::MissingFrom);
        assert_eq!(err.to_string(), "Parse error: Missing FROM clause");
    }
}
