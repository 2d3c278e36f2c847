// throttle/src/main.rs
//! Throttle entry point.

use anyhow::Result;
use clap::Parser;

use throttle::cli::{Cli, Commands};
use throttle::commands::{replay, split};
use throttle::logger;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    logger::init_logger(logger::level_from_flags(args.quiet, args.debug));

    match args.command {
        Commands::Replay(cmd) => replay::run_replay(cmd).await,
        Commands::Split { file } => split::run_split_stdout(&file),
    }
}
