//! errors.rs - Custom error types for the throttle-core library.
//!
//! A denied `try_consume` is a normal outcome and is never reported through
//! this type; only construction and I/O problems are.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `throttle-core` library.
///
/// Marked `#[non_exhaustive]` so new variants can be added without breaking
/// downstream matches.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ThrottleError {
    #[error("Invalid rate {0}: a token bucket needs a positive number of tokens per second")]
    InvalidRate(u32),

    #[error("Invalid bucket configuration: {0}")]
    Config(String),

    #[error("An unexpected I/O error occurred: {0}")]
    Io(#[from] std::io::Error),
}
