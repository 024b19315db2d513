//! Command line front end for the `papercat` paper catalog.
//!
//! Keeps a catalog of the PDFs under a directory and works with it:
//! - Scan the directory and reconcile the catalog (`update`)
//! - Find and remove duplicate papers (`dedup`)
//! - Fuzzy search, tag and recency listings
//! - Comments, metadata, moving and opening papers
//!
//! # Usage
//!
//! ```bash
//! # Write a configuration and remember a default directory
//! papercat init --directory ~/papers
//!
//! # Bring the catalog up to date
//! papercat update
//!
//! # Search for papers
//! papercat search quantum entanglement
//!
//! # Tag a paper through its comments
//! papercat comment ~/papers/epr.pdf "{classic} read twice"
//! papercat tag classic
//! ```
//!
//! Destructive steps (deleting duplicates, overwriting the configuration) ask
//! for confirmation first. Pass `-v` one or more times for log output.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use clap::{builder::ArgAction, Parser, Subcommand};
use console::style;
use papercat::{
  config::Config, prelude::*, reconcile::ReconcileReport, record::FileRecord, Papercat,
};
use tracing::{debug, trace};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Keep a catalog of the research papers in a directory")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Path to the configuration file. Uses the platform configuration directory when omitted.
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Path to the catalog file, overriding the one derived from the directory.
  #[arg(long, global = true)]
  catalog: Option<PathBuf>,

  /// Also append log output to this file.
  #[arg(long, global = true)]
  log_file: Option<PathBuf>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

impl Cli {
  /// The configuration file in use.
  fn config_path(&self) -> PathBuf { self.config.clone().unwrap_or_else(Config::default_path) }

  /// Loads the configuration, falling back to defaults when no file was written yet.
  fn load_config(&self) -> Result<Config> { Ok(Config::load(self.config_path())?) }

  /// Opens the catalog for `directory`, or for the configured default directory.
  ///
  /// An explicit `--catalog` is enough on its own for commands that never scan.
  fn open(&self, directory: Option<PathBuf>) -> Result<Papercat> {
    let config = self.load_config()?;
    let directory = directory.or_else(|| config.default_directory()).map(|d| absolute(&d));
    let catalog_path = match (&self.catalog, &directory) {
      (Some(catalog), _) => catalog.clone(),
      (None, Some(directory)) => config.catalog_path_for(directory),
      (None, None) => return Err(CliError::NoDirectory),
    };
    let directory = directory.unwrap_or_else(|| PathBuf::from("."));
    trace!("Using catalog {} for {}", catalog_path.display(), directory.display());
    Ok(Papercat::with_catalog_path(config, directory, catalog_path)?)
  }
}

/// Resolves `path` to the absolute form the catalog stores. Paths that do not exist are returned
/// as given.
pub fn absolute(path: &Path) -> PathBuf {
  path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
///
/// Log lines go to stderr and, with `log_file`, are appended to that file as well. The returned
/// guard flushes the file writer and must be held until exit.
fn setup_logging(verbosity: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  let (file_layer, guard) = match log_file {
    Some(path) => {
      let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
      let (writer, guard) = tracing_appender::non_blocking(file);
      let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true);
      (Some(layer), Some(guard))
    },
    None => (None, None),
  };

  tracing_subscriber::registry()
    .with(filter)
    .with(
      fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true),
    )
    .with(file_layer)
    .init();
  Ok(guard)
}

/// Dispatches the parsed command.
async fn run(cli: &Cli) -> Result<()> {
  let interaction = Interactor::new(cli.accept_defaults);
  match cli.command.clone() {
    Commands::Init(options) => init(&interaction, cli, options).await,
    Commands::Update(options) => update(&interaction, cli, options).await,
    Commands::Dedup(options) => dedup(&interaction, cli, options).await,
    Commands::Search(options) => search(&interaction, cli, options).await,
    Commands::Tags => tags(&interaction, cli).await,
    Commands::Tag(options) => tag(&interaction, cli, options).await,
    Commands::Recent(options) => recent(&interaction, cli, options).await,
    Commands::Show(options) => show(&interaction, cli, options).await,
    Commands::Comment(options) => comment(&interaction, cli, options).await,
    Commands::Bibtex(options) => bibtex(&interaction, cli, options).await,
    Commands::Move(options) => relocate(&interaction, cli, options).await,
    Commands::Open(options) => open(&interaction, cli, options).await,
    Commands::Reveal(options) => reveal(&interaction, cli, options).await,
  }
}

/// Entry point for the papercat CLI application
///
/// Parses arguments, sets up logging and runs the requested command. Any
/// error is printed once and turns into a non-zero exit status.
#[tokio::main]
async fn main() {
  let cli = Cli::parse();

  let guard = match setup_logging(cli.verbose, cli.log_file.as_deref()) {
    Ok(guard) => guard,
    Err(e) => {
      eprintln!("{} Could not set up logging: {e}", style(ERROR_PREFIX).red());
      std::process::exit(1);
    },
  };

  let outcome = run(&cli).await;
  drop(guard);
  if let Err(e) = outcome {
    eprintln!("{} {}", style(ERROR_PREFIX).red(), style(e).red());
    std::process::exit(1);
  }
}
