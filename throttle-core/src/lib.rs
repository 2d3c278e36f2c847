// throttle-core/src/lib.rs
//! # Throttle Core Library
//!
//! `throttle-core` provides an in-process token-bucket rate limiter. A bucket
//! bounds how many units of work may proceed per second while allowing a
//! burst of up to one second's worth, and it reads time through an injected
//! [`TimeSource`] so the refill math can be tested without real delays.
//!
//! ## Modules
//!
//! * `bucket`: The [`TokenBucket`] and the [`Decision`] returned by each attempt.
//! * `clock`: The [`TimeSource`] trait with system, manual and (optionally) tokio clocks.
//! * `config`: [`BucketConfig`] and YAML loading.
//! * `statements`: A dialect-agnostic splitter for semicolon-terminated scripts.
//! * `errors`: The [`ThrottleError`] enum.
//!
//! ## Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use throttle_core::{ManualTimeSource, TokenBucket};
//!
//! # fn main() -> Result<(), throttle_core::ThrottleError> {
//! let clock = Arc::new(ManualTimeSource::new());
//! let bucket = TokenBucket::new(10, clock.clone())?;
//!
//! assert!(bucket.try_consume(10).is_granted());
//! let denied = bucket.try_consume(5);
//! assert!(!denied.is_granted());
//! assert_eq!(denied.wait_hint(), Duration::from_millis(500));
//!
//! clock.advance(Duration::from_millis(500));
//! assert!(bucket.try_consume(5).is_granted());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! A denied request is not an error; it is reported through [`Decision`].
//! Only construction problems (a zero rate, an unreadable configuration) and
//! I/O surface as [`ThrottleError`].
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod bucket;
pub mod clock;
pub mod config;
pub mod errors;
pub mod statements;

pub use bucket::{Decision, TokenBucket};
pub use clock::{ManualTimeSource, SystemTimeSource, TimeSource};
#[cfg(feature = "tokio")]
pub use clock::TokioTimeSource;
pub use config::{BucketConfig, InitialFill, DEFAULT_RATE};
pub use errors::ThrottleError;
pub use statements::{parse_statement_file, parse_statements};
