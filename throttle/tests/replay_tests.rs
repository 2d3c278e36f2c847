// throttle/tests/replay_tests.rs
//! Replay pacing tests on a paused tokio clock, so no real time passes.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use throttle::Pacer;
use throttle::cli::ReplayCommand;
use throttle::commands::replay::{replay_statements, resolve_config};
use throttle_core::{BucketConfig, InitialFill, TokenBucket, TokioTimeSource};

fn statements(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("INSERT INTO t (id) VALUES ({});", i)).collect()
}

fn pacer(config: &BucketConfig) -> Result<Pacer> {
    let bucket = TokenBucket::with_config(config, Arc::new(TokioTimeSource))?;
    Ok(Pacer::new(Arc::new(bucket)))
}

#[tokio::test(start_paused = true)]
async fn test_replay_paces_after_initial_burst() -> Result<()> {
    let pacer = pacer(&BucketConfig::new(2))?;
    let stmts = statements(5);
    let mut out = Vec::new();

    let summary = replay_statements(&stmts, &pacer, 1, &mut out).await?;

    assert_eq!(summary.statements, 5);
    assert_eq!(summary.batches, 5);
    assert_eq!(summary.waits, 3);
    assert!(summary.elapsed >= Duration::from_millis(1500), "{:?}", summary.elapsed);
    assert!(summary.elapsed < Duration::from_secs(2), "{:?}", summary.elapsed);

    let text = String::from_utf8(out)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, stmts.iter().map(String::as_str).collect::<Vec<_>>());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_replay_batches_share_one_request() -> Result<()> {
    let pacer = pacer(&BucketConfig::new(4))?;
    let mut out = Vec::new();

    let summary = replay_statements(&statements(10), &pacer, 4, &mut out).await?;

    // 4 + 4 + 2: the first group rides the initial burst, the second waits a
    // full second, the last waits half a second.
    assert_eq!(summary.batches, 3);
    assert_eq!(summary.waits, 2);
    assert!(summary.elapsed >= Duration::from_millis(1500), "{:?}", summary.elapsed);
    assert_eq!(String::from_utf8(out)?.lines().count(), 10);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_empty_start_waits_before_first_statement() -> Result<()> {
    let config = BucketConfig::new(10).with_initial_fill(InitialFill::Empty);
    let pacer = pacer(&config)?;
    let mut out = Vec::new();

    let summary = replay_statements(&statements(1), &pacer, 1, &mut out).await?;
    assert_eq!(summary.waits, 1);
    assert!(summary.elapsed >= Duration::from_millis(100));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_batch_larger_than_capacity_is_rejected() -> Result<()> {
    let pacer = pacer(&BucketConfig::new(3))?;
    let mut out = Vec::new();

    let err = replay_statements(&statements(5), &pacer, 5, &mut out)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("capacity 3"));
    assert!(out.is_empty());
    Ok(())
}

#[test]
fn test_rate_flag_overrides_default() -> Result<()> {
    let cmd = ReplayCommand {
        file: "unused.cql".into(),
        rate: Some(12),
        config: None,
        batch: 1,
    };
    assert_eq!(resolve_config(&cmd)?.rate, 12);

    let cmd = ReplayCommand { rate: Some(0), ..cmd };
    assert!(resolve_config(&cmd).is_err());
    Ok(())
}
