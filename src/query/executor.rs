// Query Executor
// This module executes parsed queries against tables from a table store
//
// Pipeline, in order: resolve table -> filter -> COUNT short-circuit -> projection.
// Every step keeps the input row order.

use super::parser::{ComparisonOp, CountTarget, Query, QueryParser, SelectSpec, WhereClause};
use super::scalar::{classify, Scalar};
use crate::error::ExecutionError;
use crate::storage::{table::Table, Row, TableStore};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

/// Executes queries against the tables of a store
/// The executor only borrows the store and keeps no state between calls
pub struct QueryExecutor<'a, S: TableStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: TableStore + ?Sized> QueryExecutor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Parse and execute a SQL string
    /// Parse failures come back as `ExecutionError::Parse`
    pub fn execute(&self, sql: &str) -> Result<QueryResult, ExecutionError> {
        let query = QueryParser::parse(sql)?;
        self.execute_query(&query)
    }

    /// Execute an already parsed query
    pub fn execute_query(&self, query: &Query) -> Result<QueryResult, ExecutionError> {
        let table = self.store.get_table(&query.from)?;
        evaluate(query, table)
    }
}

/// The result of a query: output column names and rows of values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Scalar>>,
}

impl QueryResult {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Evaluate a query against a table the caller already holds
pub fn evaluate(query: &Query, table: &Table) -> Result<QueryResult, ExecutionError> {
    let rows = filter_rows(table, query.where_clause.as_ref())?;
    debug!(
        table = %table.name,
        scanned = table.row_count(),
        matched = rows.len(),
        "filtered rows"
    );

    let columns = match &query.select {
        SelectSpec::Count(target) => return count_rows(table, &rows, target),
        SelectSpec::Wildcard => table.columns.clone(),
        SelectSpec::Columns(items) => project_columns(table, items)?,
    };

    // Projection hands back the stored text as-is; only absent cells become Null
    let rows = rows
        .into_iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| {
                    row.get(column)
                        .map(|cell| Scalar::Text(cell.clone()))
                        .unwrap_or(Scalar::Null)
                })
                .collect()
        })
        .collect();

    Ok(QueryResult { columns, rows })
}

/// Keep the rows that satisfy the WHERE clause, or all rows when there is none
fn filter_rows<'t>(
    table: &'t Table,
    where_clause: Option<&WhereClause>,
) -> Result<Vec<&'t Row>, ExecutionError> {
    let Some(clause) = where_clause else {
        return Ok(table.rows.iter().collect());
    };

    if !table.has_column(&clause.column) {
        return Err(ExecutionError::ColumnNotFound {
            column: clause.column.clone(),
            table: table.name.clone(),
        });
    }

    let mut kept = Vec::new();
    for row in &table.rows {
        let cell = classify(row.get(&clause.column).map(String::as_str));
        if compare(&cell, clause.op, &clause.value)? {
            kept.push(row);
        }
    }

    Ok(kept)
}

/// COUNT(*) counts every surviving row; COUNT(column) skips blank cells
fn count_rows(
    table: &Table,
    rows: &[&Row],
    target: &CountTarget,
) -> Result<QueryResult, ExecutionError> {
    let count = match target {
        CountTarget::All => rows.len(),
        CountTarget::Column(column) => {
            if !table.has_column(column) {
                return Err(ExecutionError::CountColumnNotFound {
                    column: column.clone(),
                    table: table.name.clone(),
                });
            }
            rows.iter()
                .filter(|row| !classify(row.get(column).map(String::as_str)).is_null())
                .count()
        }
    };

    Ok(QueryResult {
        columns: vec!["count".to_string()],
        rows: vec![vec![Scalar::Integer(count as i64)]],
    })
}

/// Validate a column list against the table, in the order given
fn project_columns(table: &Table, items: &[String]) -> Result<Vec<String>, ExecutionError> {
    for item in items {
        if item.contains('(') && item.contains(')') {
            return Err(ExecutionError::UnsupportedFunction(item.clone()));
        }
        if !table.has_column(item) {
            return Err(ExecutionError::ColumnNotFound {
                column: item.clone(),
                table: table.name.clone(),
            });
        }
    }
    Ok(items.to_vec())
}

/// Compare a cell against a WHERE literal
///
/// A numeric literal makes the cell go through `to_number` first; if the
/// cell has no numeric reading the original value is compared instead.
/// Two integers skip that step and compare exactly.
/// Null equals Null, and Null against anything else only satisfies `!=`.
/// Mixing text and numbers is fine for `=` and `!=` but an ordering
/// comparison between them is a type error.
pub fn compare(left: &Scalar, op: ComparisonOp, right: &Scalar) -> Result<bool, ExecutionError> {
    let left = match (left, right) {
        (Scalar::Integer(_), Scalar::Integer(_)) => left.clone(),
        _ if right.is_numeric() && !left.is_null() => left
            .to_number()
            .map(Scalar::Float)
            .unwrap_or_else(|_| left.clone()),
        _ => left.clone(),
    };

    let ordering = match (&left, right) {
        (Scalar::Null, Scalar::Null) => return Ok(op == ComparisonOp::Eq),
        (Scalar::Null, _) | (_, Scalar::Null) => return Ok(op == ComparisonOp::NotEq),
        (Scalar::Integer(a), Scalar::Integer(b)) => a.partial_cmp(b),
        (Scalar::Text(a), Scalar::Text(b)) => a.partial_cmp(b),
        (a, b) if a.is_numeric() && b.is_numeric() => match (a.to_number(), b.to_number()) {
            (Ok(a), Ok(b)) => a.partial_cmp(&b),
            _ => None,
        },
        _ => {
            // Text against a number is never equal but has no ordering
            return match op {
                ComparisonOp::Eq => Ok(false),
                ComparisonOp::NotEq => Ok(true),
                _ => Err(ExecutionError::TypeError {
                    left: left.literal(),
                    op: op.to_string(),
                    right: right.literal(),
                }),
            };
        }
    };

    Ok(holds(op, ordering))
}

/// Whether `op` is satisfied by an ordering; `None` (NaN) only satisfies `!=`
fn holds(op: ComparisonOp, ordering: Option<Ordering>) -> bool {
    match ordering {
        None => op == ComparisonOp::NotEq,
        Some(ordering) => match op {
            ComparisonOp::Eq => ordering == Ordering::Equal,
            ComparisonOp::NotEq => ordering != Ordering::Equal,
            ComparisonOp::Gt => ordering == Ordering::Greater,
            ComparisonOp::Lt => ordering == Ordering::Less,
            ComparisonOp::GtEq => ordering != Ordering::Less,
            ComparisonOp::LtEq => ordering != Ordering::Greater,
        },
    }
}
