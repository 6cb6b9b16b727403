//! PointMap - controller point-table manager
//!
//! Edits per-app I/O point configurations and moves them in and out of the
//! `.dt` manifest format, one app at a time or as a zip archive of many.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pointmap::cli::{
    AppArgs, BlockArgs, CliResult, ConfigArgs, ExitCode, ExportAllArgs, ExportArgs, FileArgs,
    GroupArgs, ImportAllArgs, ImportArgs, InspectArgs, LabelArgs, VarArgs,
};
use pointmap::constants::APP_BINARY_NAME;

/// PointMap - controller point-table manager
#[derive(Parser, Debug)]
#[command(name = APP_BINARY_NAME, author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create, delete, list and show apps
    App(AppArgs),
    /// Resize and re-address point blocks
    Block(BlockArgs),
    /// Edit point labels
    Label(LabelArgs),
    /// Manage group inputs and outputs
    Group(GroupArgs),
    /// Manage the FILES list
    File(FileArgs),
    /// Manage SETVAR system variables
    Var(VarArgs),
    /// Export one app to a manifest file
    Export(ExportArgs),
    /// Replace one app from a manifest file
    Import(ImportArgs),
    /// Export every app into a zip archive
    ExportAll(ExportAllArgs),
    /// Import every app from a zip archive
    ImportAll(ImportAllArgs),
    /// Parse a manifest file without touching the store
    Inspect(InspectArgs),
    /// Show or change configuration
    Config(ConfigArgs),
}

impl Commands {
    fn execute(&self) -> CliResult<()> {
        match self {
            Self::App(args) => args.execute(),
            Self::Block(args) => args.execute(),
            Self::Label(args) => args.execute(),
            Self::Group(args) => args.execute(),
            Self::File(args) => args.execute(),
            Self::Var(args) => args.execute(),
            Self::Export(args) => args.execute(),
            Self::Import(args) => args.execute(),
            Self::ExportAll(args) => args.execute(),
            Self::ImportAll(args) => args.execute(),
            Self::Inspect(args) => args.execute(),
            Self::Config(args) => args.execute(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command.execute() {
        Ok(()) => std::process::exit(ExitCode::Success.code()),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(err.kind.code());
        }
    }
}
