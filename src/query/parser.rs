// SQL Parser
// This module converts SQL strings into structured queries
// The dialect is small enough that keyword anchoring with regexes is all we need:
// one SELECT list, one table, at most one WHERE condition

use super::scalar::{parse_number, Scalar};
use crate::error::{ExecutionError, ParseError};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static WHERE_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bWHERE\b").expect("valid WHERE pattern"));

static FROM_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bFROM\b\s+([^\s;]+)").expect("valid FROM pattern"));

static SELECT_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*\bSELECT\b\s+(.+?)\s+\bFROM\b").expect("valid SELECT pattern")
});

static COUNT_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^COUNT\s*\((.*)\)$").expect("valid COUNT pattern"));

/// A parsed SELECT statement
/// SELECT <select> FROM <from> [WHERE <column> <op> <value>]
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub select: SelectSpec,
    pub from: String,
    pub where_clause: Option<WhereClause>,
}

/// What the SELECT list asks for, decided at parse time
#[derive(Debug, Clone, PartialEq)]
pub enum SelectSpec {
    /// SELECT *
    Wildcard,
    /// SELECT a, b, c (raw items, validated against the table at execution)
    Columns(Vec<String>),
    /// SELECT COUNT(*) or SELECT COUNT(column)
    Count(CountTarget),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CountTarget {
    All,
    Column(String),
}

/// Represents a WHERE clause (only a single condition is supported)
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub column: String,
    pub op: ComparisonOp,
    pub value: Scalar,
}

/// Comparison operators allowed in a WHERE clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
}

impl ComparisonOp {
    /// Order in which operators are searched for in a WHERE clause.
    /// Two-character operators come first so `>=` is never read as `>`.
    pub const SCAN_ORDER: [ComparisonOp; 6] = [
        ComparisonOp::GtEq,
        ComparisonOp::LtEq,
        ComparisonOp::NotEq,
        ComparisonOp::Eq,
        ComparisonOp::Lt,
        ComparisonOp::Gt,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::NotEq => "!=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
            ComparisonOp::GtEq => ">=",
            ComparisonOp::LtEq => "<=",
        }
    }
}

impl FromStr for ComparisonOp {
    type Err = ExecutionError;

    /// Used by callers that build a `WhereClause` by hand instead of parsing SQL
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::SCAN_ORDER
            .into_iter()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| ExecutionError::UnsupportedOperator(s.to_string()))
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The query parser
pub struct QueryParser;

impl QueryParser {
    /// Parse a SQL string into a Query
    /// Keywords are case-insensitive and must stand as whole words
    pub fn parse(sql: &str) -> Result<Query, ParseError> {
        if sql.trim().is_empty() {
            return Err(ParseError::Empty);
        }

        let statement = strip_terminator(sql);

        // Everything after the first WHERE is the filter, everything before is SELECT ... FROM ...
        let (head, filter) = match WHERE_KEYWORD.find(statement) {
            Some(m) => (
                statement[..m.start()].trim(),
                Some(statement[m.end()..].trim()),
            ),
            None => (statement, None),
        };

        let from = FROM_CLAUSE
            .captures(head)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or(ParseError::MissingFrom)?;

        let select_text = SELECT_CLAUSE
            .captures(head)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .ok_or(ParseError::MalformedSelect)?;

        let select = Self::parse_select_list(select_text)?;

        // A bare trailing WHERE means no filter
        let where_clause = filter
            .filter(|clause| !strip_terminator(clause).is_empty())
            .map(Self::parse_where_clause)
            .transpose()?;

        let query = Query {
            select,
            from,
            where_clause,
        };
        tracing::debug!(?query, "parsed query");

        Ok(query)
    }

    /// Classify the text between SELECT and FROM
    fn parse_select_list(text: &str) -> Result<SelectSpec, ParseError> {
        if text == "*" {
            return Ok(SelectSpec::Wildcard);
        }

        let items = split_top_level(text);
        if items.is_empty() {
            return Err(ParseError::MalformedSelect);
        }

        // COUNT is only recognised as the sole item in the list
        if items.len() == 1 {
            if let Some(inner) = COUNT_CALL.captures(&items[0]).and_then(|caps| caps.get(1)) {
                let target = match inner.as_str().trim() {
                    "*" => CountTarget::All,
                    column => CountTarget::Column(column.to_string()),
                };
                return Ok(SelectSpec::Count(target));
            }
        }

        Ok(SelectSpec::Columns(items))
    }

    /// Parse `<column> <op> <value>`
    /// The clause is split once, at the first occurrence of the first operator
    /// found in scan order, so a value may itself contain operator characters
    fn parse_where_clause(clause: &str) -> Result<WhereClause, ParseError> {
        let clause = strip_terminator(clause);

        let (op, at) = ComparisonOp::SCAN_ORDER
            .into_iter()
            .find_map(|op| clause.find(op.symbol()).map(|at| (op, at)))
            .ok_or(ParseError::MissingOperator)?;

        let column = clause[..at].trim().to_string();
        let value = parse_literal(clause[at + op.symbol().len()..].trim());

        Ok(WhereClause { column, op, value })
    }
}

/// Trim whitespace and drop a single trailing `;`
fn strip_terminator(text: &str) -> &str {
    let text = text.trim();
    text.strip_suffix(';').unwrap_or(text).trim()
}

/// Split a select list on commas that are not inside parentheses.
/// Depth never goes below zero, so a stray `)` cannot hide later commas.
fn split_top_level(text: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut depth: usize = 0;

    for ch in text.chars() {
        match ch {
            ',' if depth == 0 => {
                items.push(current.trim().to_string());
                current.clear();
            }
            _ => {
                if ch == '(' {
                    depth += 1;
                } else if ch == ')' {
                    depth = depth.saturating_sub(1);
                }
                current.push(ch);
            }
        }
    }
    items.push(current.trim().to_string());

    while items.last().is_some_and(|item| item.is_empty()) {
        items.pop();
    }

    items
}

/// Classify a WHERE literal: quoted text, then float, then integer, then raw text
/// A lone quote character counts as quoted and yields empty text
fn parse_literal(raw: &str) -> Scalar {
    let quoted = ['\'', '"']
        .into_iter()
        .any(|q| raw.starts_with(q) && raw.ends_with(q));

    if quoted {
        let inner = raw.get(1..raw.len() - 1).unwrap_or_default();
        return Scalar::Text(inner.to_string());
    }

    parse_number(raw).unwrap_or_else(|| Scalar::Text(raw.to_string()))
}
