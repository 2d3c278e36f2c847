// throttle/src/lib.rs
//! # Throttle CLI Application
//!
//! This crate provides the command-line front end for `throttle-core`: it
//! replays statement scripts through a shared token bucket, waiting on the
//! bucket's hints whenever it runs dry.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod pacer;

pub use pacer::Pacer;
