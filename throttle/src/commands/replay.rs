//! `throttle replay`: emit a script's statements no faster than the bucket allows.

use anyhow::{Context, Result};
use log::{debug, info};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use throttle_core::{BucketConfig, TokenBucket, TokioTimeSource, parse_statement_file};

use crate::cli::ReplayCommand;
use crate::pacer::Pacer;

/// What a replay run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub statements: usize,
    pub batches: usize,
    /// Denials absorbed by waiting on the bucket.
    pub waits: u32,
    pub elapsed: Duration,
}

/// Builds the bucket configuration from the optional file and `--rate`.
pub fn resolve_config(cmd: &ReplayCommand) -> Result<BucketConfig> {
    let mut config = match &cmd.config {
        Some(path) => BucketConfig::load_from_file(path)?,
        None => BucketConfig::default(),
    };
    if let Some(rate) = cmd.rate {
        config.rate = rate;
    }
    config.validate()?;
    Ok(config)
}

/// Writes `statements` to `out`, one per line, taking `batch` tokens from
/// the pacer before each group.
pub async fn replay_statements<W: Write>(
    statements: &[String],
    pacer: &Pacer,
    batch: u64,
    out: &mut W,
) -> Result<ReplaySummary> {
    let start = tokio::time::Instant::now();
    let batch_len = usize::try_from(batch).unwrap_or(usize::MAX).max(1);

    let mut summary = ReplaySummary {
        statements: 0,
        batches: 0,
        waits: 0,
        elapsed: Duration::ZERO,
    };

    for group in statements.chunks(batch_len) {
        summary.waits += pacer.acquire(group.len() as u64).await?;
        for stmt in group {
            writeln!(out, "{}", stmt).context("Failed to write statement")?;
        }
        out.flush().context("Failed to flush output")?;
        summary.statements += group.len();
        summary.batches += 1;
        debug!("Emitted batch {} ({} statements)", summary.batches, group.len());
    }

    summary.elapsed = start.elapsed();
    Ok(summary)
}

pub async fn run_replay(cmd: ReplayCommand) -> Result<()> {
    let config = resolve_config(&cmd)?;
    let statements = parse_statement_file(&cmd.file)
        .with_context(|| format!("Failed to read statements from {}", cmd.file.display()))?;
    info!(
        "Replaying {} statements from {} at {}/s",
        statements.len(),
        cmd.file.display(),
        config.rate
    );

    let bucket = TokenBucket::with_config(&config, Arc::new(TokioTimeSource))?;
    let pacer = Pacer::new(Arc::new(bucket));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = replay_statements(&statements, &pacer, cmd.batch, &mut out).await?;

    info!(
        "Replayed {} statements in {} batches ({} waits) in {:?}",
        summary.statements, summary.batches, summary.waits, summary.elapsed
    );
    Ok(())
}
