//! Time sources for record timestamps.
//!
//! Timestamps are Unix epoch milliseconds, the same unit persisted in SQLite.

use std::time::{SystemTime, UNIX_EPOCH};

/// Zero-argument "current time" provider.
pub trait Clock {
    /// Returns the current time in epoch milliseconds.
    fn now_ms(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        // A clock set before 1970 reports the epoch itself.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| {
                i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
            })
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

impl<F> Clock for F
where
    F: Fn() -> i64,
{
    fn now_ms(&self) -> i64 {
        self()
    }
}
