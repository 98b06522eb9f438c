// Result rendering
// Turns a QueryResult into either a box-drawn text table or JSON

use crate::query::{scalar::Scalar, QueryResult};
use anyhow::Result;
use clap::ValueEnum;

/// How query results are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    #[default]
    Table,
    /// Pretty-printed JSON object with `columns` and `rows`
    Json,
}

pub fn render(result: &QueryResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(result)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
    }
}

/// Null cells are shown empty
fn cell_text(value: &Scalar) -> String {
    match value {
        Scalar::Null => String::new(),
        other => other.to_string(),
    }
}

/// Format the result as a table for display
pub fn render_table(result: &QueryResult) -> String {
    if result.columns.is_empty() {
        return "(no columns)".to_string();
    }

    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    // Calculate column widths
    let mut widths: Vec<usize> = result.columns.iter().map(|c| c.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();

    out.push_str(&border(&widths, '┌', '┬', '┐'));
    out.push_str(&line(&result.columns, &widths));
    out.push_str(&border(&widths, '├', '┼', '┤'));
    for row in &cells {
        out.push_str(&line(row, &widths));
    }
    out.push_str(&border(&widths, '└', '┴', '┘'));

    if result.is_empty() {
        out.push_str("\nNo rows found");
    } else {
        out.push_str(&format!("\n{} row(s) returned", result.row_count()));
    }

    out
}

fn border(widths: &[usize], left: char, joint: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    let joint = joint.to_string();
    format!("{}{}{}\n", left, segments.join(joint.as_str()), right)
}

fn line(values: &[String], widths: &[usize]) -> String {
    let mut out = String::from("│");
    for (value, width) in values.iter().zip(widths) {
        out.push_str(&format!(" {:<width$} │", value, width = *width));
    }
    out.push('\n');
    out
}
