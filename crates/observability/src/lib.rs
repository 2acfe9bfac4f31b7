//! Logging arguments and subscriber setup shared by paygate binaries.

use clap::Args;
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging configuration.
#[derive(Debug, Default, Args, Clone, Serialize, Deserialize)]
#[command(next_help_heading = "Logging")]
#[serde(default)]
pub struct LogArgs {
    /// Only show errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (-v, -vv, -vvv, etc.).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    #[serde(skip)]
    pub verbosity: u8,

    /// Log filter directives (e.g., "paygate_core=debug,paygate_consumer=trace").
    #[arg(long = "log.filter", value_name = "DIRECTIVE", global = true)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    /// Use JSON format for log output.
    #[arg(long = "log.json", global = true)]
    pub json: bool,
}

impl LogArgs {
    /// Base level implied by the verbosity count.
    pub fn base_level(&self) -> &'static str {
        match self.verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// The filter is built with the following precedence:
/// 1. If `--quiet` is set, only errors are shown
/// 2. Otherwise, start with `RUST_LOG` if set, or the level implied by `-v`
/// 3. Apply any directives from `--log.filter`
pub fn init_logging(args: &LogArgs) -> Result<()> {
    let filter = build_filter(args, std::env::var(EnvFilter::DEFAULT_ENV).ok())?;

    let layer = fmt::layer().without_time();
    let layer = if args.json {
        layer.json().boxed()
    } else {
        layer.boxed()
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .wrap_err("failed to install tracing subscriber")?;

    Ok(())
}

fn build_filter(args: &LogArgs, rust_log: Option<String>) -> Result<EnvFilter> {
    if args.quiet {
        return Ok(EnvFilter::new("error"));
    }

    let mut filter = match rust_log {
        Some(directives) if !directives.is_empty() => EnvFilter::try_new(&directives)
            .wrap_err_with(|| format!("invalid {} value: {directives}", EnvFilter::DEFAULT_ENV))?,
        _ => EnvFilter::new(args.base_level()),
    };

    if let Some(custom) = &args.filter {
        for directive in custom.split(',').filter(|d| !d.trim().is_empty()) {
            let directive = directive
                .trim()
                .parse()
                .wrap_err_with(|| format!("invalid --log.filter directive: {directive}"))?;
            filter = filter.add_directive(directive);
        }
    }

    Ok(filter)
}
