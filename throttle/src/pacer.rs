// throttle/src/pacer.rs
//! Caller-side waiting on top of the non-blocking token bucket.
//!
//! The bucket only answers "yes" or "not yet, try in X". The pacer turns
//! that into an awaitable permit by sleeping for the returned hint and asking
//! again, since other callers sharing the bucket may win the race.

use anyhow::{Result, bail};
use log::trace;
use std::sync::Arc;
use std::time::Duration;
use throttle_core::{Decision, TokenBucket};

#[derive(Debug, Clone)]
pub struct Pacer {
    bucket: Arc<TokenBucket>,
}

impl Pacer {
    pub fn new(bucket: Arc<TokenBucket>) -> Self {
        Self { bucket }
    }

    pub fn bucket(&self) -> &Arc<TokenBucket> {
        &self.bucket
    }

    /// Waits until `n` tokens have been granted. Returns the number of
    /// denials seen along the way.
    pub async fn acquire(&self, n: u64) -> Result<u32> {
        if n > self.bucket.capacity() {
            bail!(
                "Cannot acquire {} tokens from a bucket with capacity {}",
                n,
                self.bucket.capacity()
            );
        }

        let mut denials = 0u32;
        loop {
            match self.bucket.try_consume(n) {
                Decision::Granted => return Ok(denials),
                Decision::Denied { retry_after } => {
                    denials += 1;
                    trace!("Waiting {:?} for {} tokens", retry_after, n);
                    // A zero hint can only come from rounding; never spin.
                    tokio::time::sleep(retry_after.max(Duration::from_nanos(1))).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use throttle_core::TokioTimeSource;

    #[tokio::test(start_paused = true)]
    async fn acquire_waits_for_refill() {
        let bucket = Arc::new(TokenBucket::new(5, Arc::new(TokioTimeSource)).unwrap());
        let pacer = Pacer::new(bucket);

        let start = tokio::time::Instant::now();
        assert_eq!(pacer.acquire(5).await.unwrap(), 0);
        assert_eq!(pacer.acquire(1).await.unwrap(), 1);
        let waited = start.elapsed();
        assert!(waited >= Duration::from_millis(200), "waited only {:?}", waited);
        assert!(waited < Duration::from_millis(250), "waited {:?}", waited);
    }

    #[tokio::test(start_paused = true)]
    async fn oversized_request_fails_instead_of_hanging() {
        let bucket = Arc::new(TokenBucket::new(2, Arc::new(TokioTimeSource)).unwrap());
        let err = Pacer::new(bucket).acquire(3).await.unwrap_err();
        assert!(err.to_string().contains("capacity 2"));
    }
}
