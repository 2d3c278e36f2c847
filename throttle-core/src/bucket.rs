// throttle-core/src/bucket.rs
//! The token bucket.
//!
//! Tokens accrue lazily: nothing ticks in the background, every call to
//! [`TokenBucket::try_consume`] first credits the time elapsed since the
//! previous call and then decides. The level is kept in nano-tokens so that
//! `elapsed_ns * rate` is exact integer arithmetic and never drifts.

use log::{debug, trace, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::clock::TimeSource;
use crate::config::{BucketConfig, InitialFill};
use crate::errors::ThrottleError;

/// Fixed-point scale: one token is this many nano-tokens.
const NANOS_PER_TOKEN: u128 = 1_000_000_000;

/// Outcome of a single [`TokenBucket::try_consume`] attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Decision {
    Granted,
    /// Not enough tokens right now. `retry_after` is the shortest wait after
    /// which the request could succeed, assuming nobody else consumes first.
    Denied { retry_after: Duration },
}

impl Decision {
    pub fn is_granted(&self) -> bool {
        matches!(self, Decision::Granted)
    }

    /// Advisory wait before retrying; zero when granted.
    pub fn wait_hint(&self) -> Duration {
        match self {
            Decision::Granted => Duration::ZERO,
            Decision::Denied { retry_after } => *retry_after,
        }
    }
}

#[derive(Debug)]
struct BucketState {
    /// Current level in nano-tokens, always within `[0, capacity]`.
    available: u128,
    last_refill: Instant,
}

/// A thread-safe token bucket shared by every caller that must respect the
/// same aggregate rate.
#[derive(Debug)]
pub struct TokenBucket {
    rate: u32,
    /// Burst capacity in nano-tokens.
    capacity: u128,
    time_source: Arc<dyn TimeSource>,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Creates a full bucket allowing `rate` tokens per second with a burst
    /// of one second's worth.
    pub fn new(rate: u32, time_source: Arc<dyn TimeSource>) -> Result<Self, ThrottleError> {
        Self::with_config(&BucketConfig::new(rate), time_source)
    }

    pub fn with_config(
        config: &BucketConfig,
        time_source: Arc<dyn TimeSource>,
    ) -> Result<Self, ThrottleError> {
        config.validate()?;

        let capacity = u128::from(config.rate) * NANOS_PER_TOKEN;
        let available = match config.initial_fill {
            InitialFill::Full => capacity,
            InitialFill::Empty => 0,
        };
        let last_refill = time_source.now();

        debug!(
            "Token bucket created: rate={}/s, initial_fill={:?}",
            config.rate, config.initial_fill
        );

        Ok(Self {
            rate: config.rate,
            capacity,
            time_source,
            state: Mutex::new(BucketState {
                available,
                last_refill,
            }),
        })
    }

    /// Tokens per second.
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Largest request that can ever be granted.
    pub fn capacity(&self) -> u64 {
        (self.capacity / NANOS_PER_TOKEN) as u64
    }

    /// Whole tokens available right now, after crediting elapsed time.
    pub fn available(&self) -> u64 {
        let mut state = self.lock_state();
        self.refill(&mut state);
        (state.available / NANOS_PER_TOKEN) as u64
    }

    /// Attempts to take `n` tokens. Either all `n` are granted or none are.
    pub fn try_consume(&self, n: u64) -> Decision {
        if n == 0 {
            return Decision::Granted;
        }

        let mut state = self.lock_state();
        self.refill(&mut state);

        let wanted = u128::from(n) * NANOS_PER_TOKEN;
        if wanted > self.capacity {
            warn!(
                "Requested {} tokens from a bucket holding at most {}; request can never be granted",
                n,
                self.capacity()
            );
            return Decision::Denied {
                retry_after: Duration::MAX,
            };
        }

        if state.available >= wanted {
            state.available -= wanted;
            trace!("Granted {} tokens ({} nano-tokens left)", n, state.available);
            return Decision::Granted;
        }

        let retry_after = self.time_to_accrue(wanted - state.available);
        trace!(
            "Denied {} tokens ({} nano-tokens available), retry after {:?}",
            n,
            state.available,
            retry_after
        );
        Decision::Denied { retry_after }
    }

    fn lock_state(&self) -> MutexGuard<'_, BucketState> {
        // The state is two plain values updated together; a panic elsewhere
        // cannot leave it half-written.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn refill(&self, state: &mut BucketState) {
        let now = self.time_source.now();
        match now.checked_duration_since(state.last_refill) {
            Some(elapsed) => {
                let accrued = elapsed.as_nanos().saturating_mul(u128::from(self.rate));
                state.available = state.available.saturating_add(accrued).min(self.capacity);
                state.last_refill = now;
            }
            None => {
                // Clock went backwards: credit nothing and keep the later
                // instant so the gap is not counted twice.
                trace!("Time source reported an instant before the last refill; skipping refill");
            }
        }
    }

    /// Nanoseconds needed to accrue `deficit` nano-tokens, rounded up.
    fn time_to_accrue(&self, deficit: u128) -> Duration {
        let rate = u128::from(self.rate);
        let nanos = deficit.div_ceil(rate);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}
