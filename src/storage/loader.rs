// CSV loading
// The first record is the header row; every following record becomes one row

use super::{table::Table, Row};
use crate::error::StorageError;
use csv::ReaderBuilder;
use std::path::Path;
use tracing::warn;

/// Read a CSV file into a table called `name`
///
/// Records shorter than the header leave their trailing cells absent.
/// Fields past the last header column are dropped.
pub fn read_csv(path: &Path, name: &str) -> Result<Table, StorageError> {
    if !path.exists() {
        return Err(StorageError::FileNotFound(path.to_path_buf()));
    }

    // flexible: records may have a different length than the header
    let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;

        if record.len() > columns.len() {
            warn!(
                table = name,
                row = index + 1,
                dropped = record.len() - columns.len(),
                "record has more fields than the header"
            );
        }

        let row: Row = columns
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(row);
    }

    Table::new(name, columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_header_and_rows() {
        let file = csv_file("name,age\nAl,30\nBo,\n");
        let table = read_csv(file.path(), "people").unwrap();

        assert_eq!(table.name, "people");
        assert_eq!(table.columns, vec!["name", "age"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0]["age"], "30");
        assert_eq!(table.rows[1]["age"], "");
    }

    #[test]
    fn test_short_and_long_records() {
        let file = csv_file("a,b\n1\n2,3,4\n");
        let table = read_csv(file.path(), "t").unwrap();

        assert_eq!(table.rows[0].get("a").map(String::as_str), Some("1"));
        assert_eq!(table.rows[0].get("b"), None);
        assert_eq!(table.rows[1].len(), 2);
        assert_eq!(table.rows[1]["b"], "3");
    }

    #[test]
    fn test_quoted_fields() {
        let file = csv_file("name,city\n\"Smith, J\",\"Paris\"\n");
        let table = read_csv(file.path(), "t").unwrap();
        assert_eq!(table.rows[0]["name"], "Smith, J");
    }

    #[test]
    fn test_missing_file() {
        let err = read_csv(Path::new("/definitely/not/here.csv"), "t").unwrap_err();
        assert!(matches!(err, StorageError::FileNotFound(_)));
        assert!(err.to_string().contains("here.csv"));
    }

    #[test]
    fn test_duplicate_header() {
        let file = csv_file("a,a\n1,2\n");
        let err = read_csv(file.path(), "t").unwrap_err();
        assert!(matches!(err, StorageError::DuplicateColumn { .. }));
    }
}
