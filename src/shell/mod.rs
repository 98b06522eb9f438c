// Interactive shell
// Parses one input line into a meta-command or a SQL statement and runs it
// against the catalog. The read loop itself lives in main.rs.

pub mod render;

use crate::query::QueryExecutor;
use crate::storage::Catalog;
use anyhow::Result;
pub use render::OutputFormat;

/// One line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Help,
    Tables,
    Load { path: String, name: Option<String> },
    Schema(String),
    /// A meta-command given without its required arguments
    Usage(&'static str),
    Unknown(String),
    Sql(String),
}

impl Command {
    /// Returns `None` for a blank line
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            return Some(Command::Exit);
        }

        if !line.starts_with('.') {
            return Some(Command::Sql(line.to_string()));
        }

        let mut words = line.split_whitespace();
        let command = match words.next().unwrap_or_default() {
            ".exit" | ".quit" => Command::Exit,
            ".help" => Command::Help,
            ".tables" => Command::Tables,
            ".load" => match words.next() {
                Some(path) => Command::Load {
                    path: path.to_string(),
                    name: words.next().map(str::to_string),
                },
                None => Command::Usage("Usage: .load <path> [name]"),
            },
            ".schema" => match words.next() {
                Some(table) => Command::Schema(table.to_string()),
                None => Command::Usage("Usage: .schema <table>"),
            },
            _ => Command::Unknown(line.to_string()),
        };

        Some(command)
    }
}

/// What the read loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Print the text (if any) and read the next line
    Continue(String),
    Exit,
}

/// Shell state: the loaded tables and the chosen output format
pub struct Shell {
    catalog: Catalog,
    format: OutputFormat,
}

impl Shell {
    pub fn new(catalog: Catalog, format: OutputFormat) -> Self {
        Self { catalog, format }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Run one command
    /// Errors are per statement; the caller reports them and keeps reading
    pub fn dispatch(&mut self, command: Command) -> Result<Flow> {
        let output = match command {
            Command::Exit => return Ok(Flow::Exit),
            Command::Help => help_text(),
            Command::Tables => self.catalog.list_tables().join("\n"),
            Command::Load { path, name } => self
                .catalog
                .load_csv(&path, name.as_deref())?
                .to_string(),
            Command::Schema(table) => self.catalog.schema(&table)?.join(", "),
            Command::Usage(usage) => usage.to_string(),
            Command::Unknown(input) => {
                format!("Unknown command: {}\nType '.help' for help", input)
            }
            Command::Sql(sql) => self.run_sql(&sql)?,
        };

        Ok(Flow::Continue(output))
    }

    /// Execute a SQL statement and render its result
    pub fn run_sql(&self, sql: &str) -> Result<String> {
        let result = QueryExecutor::new(&self.catalog).execute(sql)?;
        render::render(&result, self.format)
    }
}

/// Print help information
pub fn help_text() -> String {
    "\
Special Commands:
  .help                  Show this help message
  .load <path> [name]    Load a CSV file as a table (name defaults to the file name)
  .tables                List loaded tables
  .schema <table>        Show the columns of a table
  .exit, .quit           Exit the shell

Supported SQL:
  SELECT * FROM employees
  SELECT name, age FROM employees WHERE age >= 30
  SELECT COUNT(*) FROM employees WHERE dept = 'Sales'
  SELECT COUNT(email) FROM employees

Notes:
  - Keywords are case-insensitive
  - WHERE takes a single condition using =, !=, >, <, >= or <=
  - Quote text values with single or double quotes"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("   "), None);
        assert_eq!(Command::parse("quit"), Some(Command::Exit));
        assert_eq!(Command::parse("EXIT"), Some(Command::Exit));
        assert_eq!(Command::parse(".exit"), Some(Command::Exit));
        assert_eq!(Command::parse(".tables"), Some(Command::Tables));
        assert_eq!(
            Command::parse(".load data/people.csv staff"),
            Some(Command::Load {
                path: "data/people.csv".to_string(),
                name: Some("staff".to_string()),
            })
        );
        assert_eq!(
            Command::parse(".load"),
            Some(Command::Usage("Usage: .load <path> [name]"))
        );
        assert_eq!(
            Command::parse(".schema people"),
            Some(Command::Schema("people".to_string()))
        );
        assert_eq!(
            Command::parse(".frobnicate"),
            Some(Command::Unknown(".frobnicate".to_string()))
        );
        assert_eq!(
            Command::parse("SELECT * FROM t;"),
            Some(Command::Sql("SELECT * FROM t;".to_string()))
        );
    }

    #[test]
    fn test_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("people.csv");
        fs::write(&path, "name,age\nAl,30\nBo,\n").unwrap();

        let mut shell = Shell::new(Catalog::new(), OutputFormat::Json);

        let load = Command::Load {
            path: path.display().to_string(),
            name: None,
        };
        assert_eq!(
            shell.dispatch(load).unwrap(),
            Flow::Continue("Loaded table 'people' (2 rows, 2 cols)".to_string())
        );
        assert_eq!(
            shell.dispatch(Command::Tables).unwrap(),
            Flow::Continue("people".to_string())
        );
        assert_eq!(
            shell.dispatch(Command::Schema("people".to_string())).unwrap(),
            Flow::Continue("name, age".to_string())
        );

        let Flow::Continue(json) = shell
            .dispatch(Command::Sql("SELECT COUNT(age) FROM people".to_string()))
            .unwrap()
        else {
            panic!("expected output");
        };
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rows"][0][0], 1);

        assert_eq!(shell.dispatch(Command::Exit).unwrap(), Flow::Exit);
    }

    #[test]
    fn test_failed_statement_leaves_shell_usable() {
        let mut shell = Shell::new(Catalog::new(), OutputFormat::Table);

        let err = shell
            .dispatch(Command::Sql("SELECT * FROM missing".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("Table 'missing' not found"));

        assert!(shell.dispatch(Command::Schema("missing".to_string())).is_err());
        assert!(shell.dispatch(Command::Help).is_ok());
        assert!(shell.catalog().list_tables().is_empty());
    }
}
