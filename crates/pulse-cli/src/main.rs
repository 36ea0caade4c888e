//! `pulse` — load student mental-health survey exports into SQLite and
//! summarise them.
//!
//! # Usage
//!
//! ```text
//! pulse init
//! pulse load "Student Mental health.csv"
//! pulse report --by year
//! pulse --config ~/.config/pulse/pulse.toml --database surveys.db load data.csv --json
//! ```

mod render;
mod settings;

use std::{
  fs::File,
  io::BufReader,
  path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use pulse_core::{aggregate::Grouping, pipeline, store::SurveyStore as _};
use pulse_store_sqlite::SqliteStore;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Student survey loader")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "pulse.toml")]
  config: PathBuf,

  /// SQLite database file; overrides `database_path` from the config.
  #[arg(short, long)]
  database: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Create the database file and its tables if they do not exist.
  Init,

  /// Load a survey CSV into an initialised database.
  Load {
    input: PathBuf,

    /// Print the run summary as JSON.
    #[arg(long)]
    json: bool,
  },

  /// Per-group indicator averages over the loaded data.
  Report {
    #[arg(long, value_enum, default_value_t = GroupBy::Year)]
    by: GroupBy,

    #[arg(long)]
    json: bool,
  },

  /// Show the column map in effect.
  Columns,
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupBy {
  Year,
  Stay,
}

impl From<GroupBy> for Grouping {
  fn from(g: GroupBy) -> Self {
    match g {
      GroupBy::Year => Grouping::YearOfStudy,
      GroupBy::Stay => Grouping::LengthOfStay,
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;
  let database = cli
    .database
    .clone()
    .unwrap_or_else(|| settings.database_path.clone());

  match cli.command {
    Command::Init => init(&database),
    Command::Load { input, json } => load(&settings, &database, &input, json),
    Command::Report { by, json } => report(&database, by.into(), json),
    Command::Columns => {
      let options = settings.ingest_options()?;
      print!("{}", render::columns(&options.columns));
      Ok(())
    }
  }
}

fn init(database: &Path) -> anyhow::Result<()> {
  let store = SqliteStore::create(database)
    .with_context(|| format!("failed to create database at {database:?}"))?;
  store.close()?;
  tracing::info!("database ready at {database:?}");
  Ok(())
}

fn load(
  settings: &Settings,
  database: &Path,
  input: &Path,
  json: bool,
) -> anyhow::Result<()> {
  let options = settings.ingest_options()?;
  let file =
    File::open(input).with_context(|| format!("failed to open input {input:?}"))?;

  let mut store = SqliteStore::open(database)
    .with_context(|| format!("failed to open database at {database:?}"))?;

  let outcome = pipeline::run(BufReader::new(file), &options, &mut store);
  let closed = store.close();

  let summary = outcome.context("load aborted")?;
  closed.context("failed to close database")?;

  if json {
    println!("{}", serde_json::to_string_pretty(&summary)?);
  } else {
    print!("{}", render::summary(&summary));
  }
  Ok(())
}

fn report(database: &Path, grouping: Grouping, json: bool) -> anyhow::Result<()> {
  let mut store = SqliteStore::open(database)
    .with_context(|| format!("failed to open database at {database:?}"))?;
  let groups = store
    .summarize(grouping)
    .with_context(|| format!("failed to summarise by {grouping}"))?;
  store.close()?;

  if json {
    println!("{}", serde_json::to_string_pretty(&groups)?);
  } else {
    print!("{}", render::groups(grouping, &groups));
  }
  Ok(())
}
