mod grid;
mod logging;
mod tui;
mod workspace;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use sqlplay_core::Download;
use sqlplay_generate::{PersonColumn, Scenario};
use sqlplay_session::{
    DEFAULT_UPLOAD_TABLE, DataSource, GenerationParams, Session, SessionError, resolve,
};
use thiserror::Error;
use tracing::info;

use grid::render_grid;
use logging::init_stderr_logging;
use workspace::{PlaygroundSettings, WorkspaceError, load_settings, write_download};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Core(#[from] sqlplay_core::Error),
    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "sqlplay", version, about = "SQL playground over synthetic or uploaded CSV data")]
struct Cli {
    /// Settings file (defaults to ./sqlplay.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Log file for the interactive session.
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a dataset and write one CSV per table.
    Generate(GenerateArgs),
    /// Run a single query and print the result.
    Query(QueryArgs),
    /// Start the interactive playground.
    Tui(TuiArgs),
}

/// Overrides for the generation settings.
#[derive(Args, Debug, Default)]
struct GenerationArgs {
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    rows: Option<usize>,
    #[arg(long)]
    scenario: Option<Scenario>,
    /// Number of companies in the consumption scenario.
    #[arg(long)]
    companies: Option<usize>,
    /// Column of the people scenario, repeatable.
    #[arg(long = "column", value_name = "COLUMN")]
    columns: Vec<PersonColumn>,
    /// Rename the generated people table.
    #[arg(long = "table-name", value_name = "NAME")]
    table_name: Option<String>,
}

impl GenerationArgs {
    fn apply(self, settings: &PlaygroundSettings) -> GenerationParams {
        let mut params = settings.generation_params();
        if let Some(seed) = self.seed {
            params.seed = seed;
        }
        if let Some(rows) = self.rows {
            params.row_count = rows;
        }
        if let Some(scenario) = self.scenario {
            params.scenario = scenario;
        }
        if self.companies.is_some() {
            params.companies = self.companies;
        }
        if !self.columns.is_empty() {
            params.columns = self.columns.into_iter().collect();
        }
        params.table_name = self.table_name;
        params
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    generation: GenerationArgs,
    /// Output directory for the CSV files.
    #[arg(long, default_value = "out")]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct QueryArgs {
    #[command(flatten)]
    generation: GenerationArgs,
    /// SQL to execute.
    #[arg(long)]
    sql: String,
    /// Query an uploaded CSV instead of generated data.
    #[arg(long, value_name = "CSV")]
    upload: Option<PathBuf>,
    /// Table name for the uploaded CSV (defaults to `uploaded`).
    #[arg(long, requires = "upload")]
    table: Option<String>,
    /// Also write the result to DIR/result.csv.
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,
    /// Print the history record as JSON instead of a grid.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct TuiArgs {
    #[command(flatten)]
    generation: GenerationArgs,
    /// Start from an uploaded CSV instead of generated data.
    #[arg(long, value_name = "CSV")]
    upload: Option<PathBuf>,
    /// Table name for the uploaded CSV (defaults to `uploaded`).
    #[arg(long, requires = "upload")]
    table: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(log_file) = cli.log_file {
        settings.log_file = log_file;
    }

    match cli.command {
        Command::Generate(args) => {
            init_stderr_logging()?;
            run_generate(&settings, args)
        }
        Command::Query(args) => {
            init_stderr_logging()?;
            run_query(&settings, args)
        }
        Command::Tui(args) => {
            let params = args.generation.apply(&settings);
            let upload = args.upload.map(|path| (path, args.table));
            tui::run(settings, params, upload)
        }
    }
}

fn run_generate(settings: &PlaygroundSettings, args: GenerateArgs) -> Result<(), CliError> {
    let params = args.generation.apply(settings);
    let dataset = resolve(&DataSource::Generate(params), &settings.limits).map_err(SessionError::from)?;
    for table in dataset.tables() {
        let path = write_download(&args.out, &Download::for_table(table)?)?;
        info!(table = table.name(), rows = table.row_count(), path = %path.display(), "table written");
        println!("{}", path.display());
    }
    Ok(())
}

fn run_query(settings: &PlaygroundSettings, args: QueryArgs) -> Result<(), CliError> {
    let source = match &args.upload {
        Some(path) => upload_source(path, args.table.clone())?,
        None => DataSource::Generate(args.generation.apply(settings)),
    };

    let mut session = Session::with_datafusion(settings.limits.clone())?;
    session.load(&source)?;
    let record = session.run_query(&args.sql)?;

    if let Some(dir) = &args.export {
        let path = write_download(dir, &Download::named("result", record.result())?)?;
        info!(path = %path.display(), "result exported");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        for line in render_grid(record.result(), settings.preview_rows) {
            println!("{line}");
        }
    }
    Ok(())
}

fn upload_source(path: &Path, table: Option<String>) -> Result<DataSource, CliError> {
    let bytes = std::fs::read(path)?;
    let name = table.unwrap_or_else(|| DEFAULT_UPLOAD_TABLE.to_string());
    Ok(DataSource::upload(name, bytes))
}
