//! Time source abstraction for token issuance and expiry checks.
//!
//! This module provides a `TimeSource` trait that abstracts over the wall
//! clock, allowing the gateway to use real system time in production and
//! simulated time in tests that need to step past a token's expiry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Abstraction over time operations.
///
/// Implementations must be shareable across request handlers, hence the
/// `Send + Sync` bound.
pub trait TimeSource: Send + Sync + std::fmt::Debug {
    /// Get the current time in whole seconds since Unix epoch.
    fn now_secs(&self) -> u64;
}

/// Real time source using system clock.
///
/// This is the default implementation used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_secs(&self) -> u64 {
        // duration_since(UNIX_EPOCH) only fails if system time is before 1970.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |duration| duration.as_secs())
    }
}

/// A simulated time source for deterministic testing.
///
/// Time only advances when explicitly told to. Backed by an atomic so it can
/// be shared with a running router.
///
/// # Example
///
/// ```
/// use gateway::time::{SimulatedTimeSource, TimeSource};
///
/// let time = SimulatedTimeSource::new(1000);
/// assert_eq!(time.now_secs(), 1000);
///
/// time.advance(100);
/// assert_eq!(time.now_secs(), 1100);
///
/// time.set(5000);
/// assert_eq!(time.now_secs(), 5000);
/// ```
#[derive(Debug)]
pub struct SimulatedTimeSource {
    /// Current simulated time in seconds since Unix epoch.
    current_time_secs: AtomicU64,
}

impl SimulatedTimeSource {
    /// Default starting point, approximately November 2023.
    pub const DEFAULT_START_SECS: u64 = 1_700_000_000;

    /// Create a new simulated time source with the given initial time.
    #[must_use]
    pub const fn new(initial_time_secs: u64) -> Self {
        Self {
            current_time_secs: AtomicU64::new(initial_time_secs),
        }
    }

    /// Move time forward by `secs`, saturating at `u64::MAX`.
    pub fn advance(&self, secs: u64) {
        let now = self.current_time_secs.load(Ordering::SeqCst);
        self.current_time_secs
            .store(now.saturating_add(secs), Ordering::SeqCst);
    }

    /// Jump to an absolute time.
    pub fn set(&self, secs: u64) {
        self.current_time_secs.store(secs, Ordering::SeqCst);
    }
}

impl Default for SimulatedTimeSource {
    fn default() -> Self {
        Self::new(Self::DEFAULT_START_SECS)
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now_secs(&self) -> u64 {
        self.current_time_secs.load(Ordering::SeqCst)
    }
}
