//! costforest CLI - run cost-sensitive forest experiments from the terminal
//!
//! - `costforest run`: prequential evaluation on an imbalanced, optionally
//!   drifting SEA stream, printing the learning curve
//! - `costforest config`: print the default forest configuration

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod output;

use commands::run::RunArgs;
pub use error::{CliError, CliResult};

/// costforest CLI application
#[derive(Parser)]
#[command(name = "costforest")]
#[command(about = "Cost-sensitive adaptive random forest for imbalanced streams", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Run a prequential evaluation on a synthetic stream
    Run(RunArgs),

    /// Print the default forest configuration as JSON
    Config,
}

/// Run using the current process arguments.
pub fn run() -> CliResult<()> {
    run_with_args(std::env::args_os())
}

/// Run using the provided argument iterator.
pub fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .try_init();

    match cli.command {
        Commands::Run(args) => commands::run::execute(args, cli.output),
        Commands::Config => commands::config::show_default(),
    }
}
