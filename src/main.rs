// Main entry point for the minisql CLI
// This provides an interactive shell to query CSV files with SQL

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use minisql::shell::{Command, Flow, OutputFormat, Shell};
use minisql::Catalog;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// minisql - query CSV files with a small SQL dialect
#[derive(ClapParser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV file to load before starting, as PATH or PATH=NAME (repeatable)
    #[arg(short, long = "load", value_name = "PATH[=NAME]")]
    loads: Vec<String>,

    /// Execute a single SQL command and exit
    #[arg(short, long)]
    execute: Option<String>,

    /// Output format for query results
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Log filter (e.g. `info`, `minisql=debug`)
    #[arg(long, env = "MINISQL_LOG", default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log_level).context("invalid log filter")?)
        .with_writer(io::stderr)
        .init();

    let mut catalog = Catalog::new();
    for spec in &args.loads {
        let (path, name) = split_load_spec(spec);
        let summary = catalog
            .load_csv(&path, name)
            .with_context(|| format!("failed to load {}", path.display()))?;
        eprintln!("{}", summary);
    }

    let mut shell = Shell::new(catalog, args.format);

    // If a command was provided, execute it and exit
    if let Some(sql) = args.execute {
        println!("{}", shell.run_sql(&sql)?);
        return Ok(());
    }

    println!("╔════════════════════════════════════════════╗");
    println!("║          minisql Interactive Shell         ║");
    println!("╚════════════════════════════════════════════╝");
    println!();
    println!("Type SQL commands or '.help' for help");
    println!("Load a CSV file with '.load <path> [name]'");
    println!("Type '.exit' to quit");
    println!();

    repl(&mut shell)
}

/// `people.csv=staff` loads people.csv as table `staff`
fn split_load_spec(spec: &str) -> (PathBuf, Option<&str>) {
    match spec.rsplit_once('=') {
        Some((path, name)) if !name.is_empty() => (PathBuf::from(path), Some(name)),
        _ => (PathBuf::from(spec), None),
    }
}

/// REPL (Read-Eval-Print Loop)
/// A failing statement is reported and the loop keeps going
fn repl(shell: &mut Shell) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        print!("minisql> ");
        stdout.flush()?;

        // EOF ends the session
        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line?;

        let Some(command) = Command::parse(&line) else {
            continue;
        };

        match shell.dispatch(command) {
            Ok(Flow::Exit) => {
                println!("Goodbye!");
                break;
            }
            Ok(Flow::Continue(output)) => {
                if !output.is_empty() {
                    println!("{}", output);
                }
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_load_spec() {
        assert_eq!(
            split_load_spec("data/people.csv"),
            (PathBuf::from("data/people.csv"), None)
        );
        assert_eq!(
            split_load_spec("data/people.csv=staff"),
            (PathBuf::from("data/people.csv"), Some("staff"))
        );
        assert_eq!(
            split_load_spec("odd=.csv="),
            (PathBuf::from("odd=.csv="), None)
        );
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "minisql",
            "--load",
            "a.csv",
            "-l",
            "b.csv=bee",
            "--format",
            "json",
            "-e",
            "SELECT * FROM a",
        ]);
        assert_eq!(args.loads, vec!["a.csv", "b.csv=bee"]);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.execute.as_deref(), Some("SELECT * FROM a"));
    }
}
