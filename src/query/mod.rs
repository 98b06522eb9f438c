// Query module - handles SQL parsing and execution
pub mod executor;
pub mod parser;
pub mod scalar;

pub use executor::{QueryExecutor, QueryResult};
pub use parser::QueryParser;
