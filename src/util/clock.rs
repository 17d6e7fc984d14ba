use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

/// Timestamp reserved to mean "no timestamp"; never stored in a cell.
pub const LATEST_TIMESTAMP: u64 = u64::MAX;

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Hands out cell timestamps.
///
/// Timestamps are wall-clock milliseconds, bumped by one whenever the clock
/// has not advanced past the last value handed out. Two mutations therefore
/// never share a timestamp, and a timestamp is never older than the moment
/// `next()` was called.
#[derive(Debug, Default)]
pub struct TimestampOracle {
    last: AtomicU64,
}

impl TimestampOracle {
    pub fn new() -> Self {
        TimestampOracle::default()
    }

    pub fn next(&self) -> u64 {
        let now = now_millis();
        let mut last = self.last.load(Ordering::Acquire);
        loop {
            let candidate = now.max(last + 1);
            match self.last.compare_exchange_weak(
                last,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }

    /// Last timestamp handed out, 0 if none.
    pub fn last(&self) -> u64 {
        self.last.load(Ordering::Acquire)
    }
}
