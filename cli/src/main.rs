use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tablescope_core::{Row, Value};
use tablescope_render::{
    OutputFormat, Section, TableOptions, format_rows, format_sections, to_json, to_yaml,
};
use tablescope_sqlite::{Database, DatabaseConfig, Table, TableSchema};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tablescope")]
#[command(about = "Inspect SQLite tables, columns, indices and rowids", version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the tables in the database.
    Tables(TablesArgs),
    /// Show a table's columns, including primary key and rowid flags.
    Columns(TableArgs),
    /// Show a table's indices and the columns they cover.
    Indices(TableArgs),
    /// Show columns, indices, primary key and rowid status of a table.
    Describe(TableArgs),
    /// Run a SQL statement and print its result rows.
    Query(QueryArgs),
    /// Drop a table.
    Drop(DropArgs),
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Database file path.
    #[arg(long, conflicts_with = "config", required_unless_present = "config")]
    db: Option<PathBuf>,
    /// YAML connection configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct OutputArgs {
    /// Output format.
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
    /// Truncate table cells to this many characters.
    #[arg(long)]
    max_cell_width: Option<usize>,
    /// Prefix each table row with its position.
    #[arg(long)]
    row_index: bool,
}

impl OutputArgs {
    fn table_options(&self) -> TableOptions {
        TableOptions {
            max_cell_width: self.max_cell_width,
            show_row_index: self.row_index,
        }
    }
}

#[derive(Debug, Args)]
struct TablesArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[command(flatten)]
    output: OutputArgs,
    /// Include indices, views and triggers.
    #[arg(long)]
    all: bool,
}

#[derive(Debug, Args)]
struct TableArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[command(flatten)]
    output: OutputArgs,
    /// Table name (case-insensitive).
    #[arg(long)]
    table: String,
}

#[derive(Debug, Args)]
struct QueryArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[command(flatten)]
    output: OutputArgs,
    /// SQL statement to run.
    #[arg(long)]
    sql: String,
}

#[derive(Debug, Args)]
struct DropArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Table name (case-insensitive).
    #[arg(long)]
    table: String,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Tables(args) => run_tables(args),
        Command::Columns(args) => run_columns(args),
        Command::Indices(args) => run_indices(args),
        Command::Describe(args) => run_describe(args),
        Command::Query(args) => run_query(args),
        Command::Drop(args) => run_drop(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_tables(args: TablesArgs) -> Result<(), String> {
    let db = open_database(&args.source)?;
    let tables = if args.all {
        db.schema_objects()
    } else {
        db.tables()
    }
    .map_err(|e| format!("Failed to list tables: {e}"))?;

    let rows: Vec<Row> = tables
        .iter()
        .enumerate()
        .map(|(i, t)| t.to_row(i))
        .collect();
    print_rows(&rows, &args.output)
}

fn run_columns(args: TableArgs) -> Result<(), String> {
    let db = open_database(&args.source)?;
    let table = find_table(&db, &args.table)?;
    let columns = table
        .fetch_columns(&db)
        .map_err(|e| format!("Failed to read columns of '{}': {e}", table.name()))?;

    let rows: Vec<Row> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| c.to_row(i))
        .collect();
    print_rows(&rows, &args.output)
}

fn run_indices(args: TableArgs) -> Result<(), String> {
    let db = open_database(&args.source)?;
    let schema = read_schema(&db, &args.table)?;
    print_rows(&index_rows(&schema), &args.output)
}

/// Everything `describe` reports, for JSON and YAML output.
#[derive(Debug, Serialize)]
struct Description<'a> {
    #[serde(flatten)]
    schema: &'a TableSchema,
    primary_key: Vec<&'a str>,
    rowid_column: Option<&'a str>,
    has_rowid: bool,
    has_auto_rowid: bool,
}

fn run_describe(args: TableArgs) -> Result<(), String> {
    let db = open_database(&args.source)?;
    let schema = read_schema(&db, &args.table)?;

    let description = Description {
        schema: &schema,
        primary_key: schema.primary_key().iter().map(|c| c.name()).collect(),
        rowid_column: schema.rowid_column().map(|c| c.name()),
        has_rowid: schema.has_rowid(),
        has_auto_rowid: schema.has_auto_rowid(),
    };

    let text = match args.output.format {
        OutputFormat::Json => to_json(&description)?,
        OutputFormat::Yaml => to_yaml(&description)?,
        format => {
            let summary = Row::from_pairs(
                0,
                [
                    ("table", Value::from(schema.table().name())),
                    ("primary_key", Value::from(description.primary_key.join(", "))),
                    ("rowid_column", Value::from(description.rowid_column)),
                    ("has_rowid", Value::from(description.has_rowid)),
                    ("has_auto_rowid", Value::from(description.has_auto_rowid)),
                ],
            );
            let columns = schema
                .columns()
                .iter()
                .enumerate()
                .map(|(i, c)| c.to_row(i))
                .collect();
            let sections = [
                Section::new("Table", vec![summary]),
                Section::new("Columns", columns),
                Section::new("Indices", index_rows(&schema)),
            ];
            format_sections(&sections, format, &args.output.table_options())?
        }
    };
    print!("{text}");
    Ok(())
}

fn run_query(args: QueryArgs) -> Result<(), String> {
    let db = open_database(&args.source)?;
    let rows = db
        .execute(&args.sql)
        .map_err(|e| format!("Query failed: {e}"))?;
    debug!(rows = rows.len(), "Query complete");
    print_rows(&rows, &args.output)
}

fn run_drop(args: DropArgs) -> Result<(), String> {
    let db = open_database(&args.source)?;
    let table = find_table(&db, &args.table)?;
    table
        .delete(&db)
        .map_err(|e| format!("Failed to drop table '{}': {e}", table.name()))?;
    info!(table = %table.name(), "Dropped table");
    println!("Dropped table '{}'.", table.name());
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Opens the database named by `--db` or described by `--config`.
///
/// A `--db` path must already exist; opening never creates a database file.
fn open_database(source: &SourceArgs) -> Result<Database, String> {
    let config = match (&source.config, &source.db) {
        (Some(path), _) => DatabaseConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
        (None, Some(path)) => {
            if !path.exists() {
                return Err(format!("Database file '{}' not found", path.display()));
            }
            DatabaseConfig::for_path(path)
        }
        (None, None) => return Err("Either --db or --config is required".to_string()),
    };

    let db = Database::from_config(&config).map_err(|e| match &config.path {
        Some(path) => format!("Failed to open database '{}': {e}", path.display()),
        None => format!("Failed to open in-memory database: {e}"),
    })?;
    debug!(path = ?db.path(), "Database ready");
    Ok(db)
}

fn find_table(db: &Database, name: &str) -> Result<Table, String> {
    db.table(name)
        .map_err(|e| format!("Failed to look up table '{name}': {e}"))?
        .ok_or_else(|| format!("Table '{name}' not found"))
}

fn read_schema(db: &Database, name: &str) -> Result<TableSchema, String> {
    let table = find_table(db, name)?;
    table
        .schema(db)
        .map_err(|e| format!("Failed to read schema of '{}': {e}", table.name()))
}

/// One row per index, with its resolved columns appended.
fn index_rows(schema: &TableSchema) -> Vec<Row> {
    schema
        .indices()
        .iter()
        .enumerate()
        .map(|(i, index)| {
            let columns: Vec<&str> = schema.columns_of(index).iter().map(|c| c.name()).collect();
            let base = index.index().to_row(i);
            let pairs = base
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .chain([("columns".to_string(), Value::from(columns.join(", ")))]);
            Row::from_pairs(i, pairs)
        })
        .collect()
}

fn print_rows(rows: &[Row], output: &OutputArgs) -> Result<(), String> {
    let text = format_rows(rows, output.format, &output.table_options())?;
    if text.is_empty() {
        return Ok(());
    }
    if text.ends_with('\n') {
        print!("{text}");
    } else {
        println!("{text}");
    }
    Ok(())
}
