//! Command line definition and dispatch.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use paygate_core::MeteringArgs;
use paygate_observability::{LogArgs, init_logging};

use crate::demo;

/// Paygate - pay-per-call metering
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Logging configuration (applies to all subcommands).
    #[command(flatten)]
    pub(crate) logs: LogArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub(crate) command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Serve a priced greeting repeatedly against an in-memory ledger.
    Demo(DemoArgs),
}

/// Arguments for the `demo` command.
///
/// Unset values fall back to the config file, then `PAYGATE_` environment
/// variables, then built-in defaults.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DemoArgs {
    /// Path to a TOML config file.
    #[arg(long, short = 'c', value_name = "FILE", env = "PAYGATE_CONFIG")]
    pub(crate) config: Option<PathBuf>,

    /// Number of greetings to request.
    #[arg(long)]
    pub(crate) calls: Option<u64>,

    /// Price charged per greeting.
    #[arg(long)]
    pub(crate) price: Option<u64>,

    /// Initial client funding.
    #[arg(long)]
    pub(crate) funding: Option<u64>,

    /// Give the client a valid subscription (`--subscription false` revokes one set in config).
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub(crate) subscription: Option<bool>,

    /// Withdraw the developer balance and pay out remaining funding at the end.
    #[arg(long)]
    pub(crate) settle: bool,

    /// Metering configuration.
    #[command(flatten)]
    pub(crate) metering: MeteringArgs,
}

/// Parse the command line, set up logging and run the selected command.
pub(crate) async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.logs)?;

    match cli.command {
        Commands::Demo(args) => demo::run(args).await,
    }
}
