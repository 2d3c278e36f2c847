// throttle/src/cli.rs
//! This file defines the command-line interface (CLI) for the throttle application,
//! including all available commands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "throttle",
    version = env!("CARGO_PKG_VERSION"),
    about = "Replay statement scripts at a bounded rate",
    long_about = "Throttle splits a semicolon-terminated script into statements and emits them no faster than a configured number per second, using a token bucket that allows a one-second burst.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable all log output.
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG).
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Emit the statements of a script to stdout, rate limited.
    Replay(ReplayCommand),

    /// Print the statements of a script without any rate limiting.
    Split {
        /// Script to split.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Arguments for the `replay` command.
#[derive(Parser, Debug)]
pub struct ReplayCommand {
    /// Script to replay.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Statements per second. Overrides the rate from `--config`.
    #[arg(long, short = 'r', env = "THROTTLE_RATE", help = "Maximum statements per second.")]
    pub rate: Option<u32>,

    /// YAML bucket configuration.
    #[arg(long = "config", short = 'c', value_name = "FILE", help = "Path to a YAML bucket configuration.")]
    pub config: Option<PathBuf>,

    /// Statements admitted per bucket request.
    #[arg(long, short = 'b', default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..), help = "Number of statements admitted per token request.")]
    pub batch: u64,
}
