// throttle-core/src/clock.rs
//! Time sources for the token bucket.
//!
//! The bucket never reads the system clock directly. It asks a [`TimeSource`]
//! handed to it at construction, which lets tests drive the refill math with a
//! [`ManualTimeSource`] instead of sleeping.

use std::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Supplies the current instant.
pub trait TimeSource: Send + Sync + Debug {
    fn now(&self) -> Instant;
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Production time source backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Reads tokio's clock, so a runtime started with paused time advances the
/// bucket whenever the runtime auto-advances past a `sleep`.
#[cfg(feature = "tokio")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioTimeSource;

#[cfg(feature = "tokio")]
impl TimeSource for TokioTimeSource {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// A settable clock for tests. Time only moves when the test says so.
#[derive(Debug)]
pub struct ManualTimeSource {
    current: Mutex<Instant>,
}

impl ManualTimeSource {
    /// Starts at the real current instant.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Moves the held instant forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *current += by;
    }

    /// Moves the held instant backward by `by`, simulating clock skew.
    /// Does nothing if the result would precede what `Instant` can represent.
    pub fn rewind(&self, by: Duration) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(earlier) = current.checked_sub(by) {
            *current = earlier;
        }
    }

    pub fn set(&self, to: Instant) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Default for ManualTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Instant {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_source_only_moves_when_told() {
        let ts = ManualTimeSource::new();
        let start = ts.now();
        assert_eq!(ts.now(), start);

        ts.advance(Duration::from_millis(250));
        assert_eq!(ts.now(), start + Duration::from_millis(250));

        ts.rewind(Duration::from_millis(100));
        assert_eq!(ts.now(), start + Duration::from_millis(150));

        ts.set(start);
        assert_eq!(ts.now(), start);
    }

    #[test]
    fn arc_wrapped_source_reads_through() {
        let ts = Arc::new(ManualTimeSource::new());
        let shared: Arc<dyn TimeSource> = Arc::new(Arc::clone(&ts));
        ts.advance(Duration::from_secs(1));
        assert_eq!(shared.now(), ts.now());
    }

    #[test]
    fn system_source_is_monotonic() {
        let ts = SystemTimeSource;
        let a = ts.now();
        let b = ts.now();
        assert!(b >= a);
    }
}
