//! Time source abstraction for token issuance and expiry checks.
//!
//! Production code reads the system clock; tests drive a `ManualTimeSource`
//! so that expiry can be reached without sleeping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Abstraction over wall-clock time.
pub trait TimeSource: Send + Sync {
    /// Get the current time in whole seconds since the Unix epoch.
    fn now_secs(&self) -> u64;
}

/// Real time source using the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_secs(&self) -> u64 {
        // Only fails if the system clock is set before 1970.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |duration| duration.as_secs())
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    now_secs: AtomicU64,
}

impl ManualTimeSource {
    #[must_use]
    pub const fn new(now_secs: u64) -> Self {
        Self {
            now_secs: AtomicU64::new(now_secs),
        }
    }

    /// Move the clock forward by `secs` seconds.
    pub fn advance(&self, secs: u64) {
        self.now_secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now_secs(&self) -> u64 {
        self.now_secs.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_time_source() {
        let source = SystemTimeSource;
        let t1 = source.now_secs();
        let t2 = source.now_secs();

        // Time should be reasonable (after 2020)
        assert!(t1 > 1_577_836_800); // 2020-01-01 00:00:00 UTC

        // Time should not go backwards
        assert!(t2 >= t1);
    }

    #[test]
    fn test_manual_time_source_advances() {
        let source = ManualTimeSource::new(1_000);
        assert_eq!(source.now_secs(), 1_000);

        source.advance(3_600);
        assert_eq!(source.now_secs(), 4_600);
    }
}
