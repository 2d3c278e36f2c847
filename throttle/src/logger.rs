// throttle/src/logger.rs
//! Logging setup for the throttle binary.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes `env_logger`.
///
/// An explicit `level` overrides `RUST_LOG`; with `None` the environment
/// decides and falls back to `warn`. Calling this more than once is harmless.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp_millis();
    let _ = builder.try_init();
}

/// Maps the `--quiet` / `--debug` flags to a level override.
pub fn level_from_flags(quiet: bool, debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if debug {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}
