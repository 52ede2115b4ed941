//! Monotonic clock abstractions.
//!
//! Every timing decision in Tapwise (hold detection, double-tap windows,
//! flick vs swipe) reads time through [`MonotonicClock`] so that replays
//! and tests can drive time explicitly instead of sleeping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Source of monotonic time in fractional seconds.
pub trait MonotonicClock {
    /// Seconds elapsed since the clock's epoch.
    fn now_secs(&self) -> f64;
}

/// A clock backed by [`Instant`], anchored at the moment it was started.
#[derive(Debug, Clone)]
pub struct SystemClock {
    /// The instant the clock started.
    epoch: Instant,

    /// Wall-clock time at epoch (ISO 8601 string).
    epoch_wall: String,
}

impl SystemClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Wall-clock time at clock start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// The underlying epoch instant.
    pub fn epoch(&self) -> Instant {
        self.epoch
    }
}

impl MonotonicClock for SystemClock {
    fn now_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

/// A clock whose time only changes when told to.
///
/// Clones share the same underlying time, so a driver can keep one handle
/// while the classifier owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock reading `0.0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock reading `secs`.
    pub fn at(secs: f64) -> Self {
        let clock = Self::new();
        clock.set(secs);
        clock
    }

    /// Jump to an absolute time. Moving backwards is ignored.
    pub fn set(&self, secs: f64) {
        if secs >= self.now_secs() {
            self.bits.store(secs.to_bits(), Ordering::SeqCst);
        }
    }

    /// Advance by `delta` seconds.
    pub fn advance(&self, delta: f64) {
        self.set(self.now_secs() + delta.max(0.0));
    }
}

impl MonotonicClock for ManualClock {
    fn now_secs(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

impl<C: MonotonicClock + ?Sized> MonotonicClock for &C {
    fn now_secs(&self) -> f64 {
        (**self).now_secs()
    }
}
