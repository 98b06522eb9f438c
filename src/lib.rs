// minisql - a single-statement SQL dialect over in-memory CSV tables
// This is the library root that exposes the public API

pub mod error;
pub mod query;
pub mod shell;
pub mod storage;

// Re-export commonly used types for convenience
pub use error::{ExecutionError, ParseError, StorageError};
pub use query::executor::{compare, evaluate};
pub use query::parser::{ComparisonOp, CountTarget, Query, SelectSpec, WhereClause};
pub use query::scalar::{classify, Scalar};
pub use query::{QueryExecutor, QueryParser, QueryResult};
pub use storage::{table::Table, Catalog, Row, TableStore};
