/*!
 * Logical Clock
 * Shared logical time source for the simulation driver and process factory
 */

use super::types::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Source of the current logical time
pub trait Clock: Send + Sync {
    /// Current logical time in milliseconds since the start of the run
    fn now(&self) -> Timestamp;
}

/// Logical clock advanced explicitly by the driver
///
/// Cloning yields a handle onto the same clock.
#[derive(Debug, Clone, Default)]
pub struct LogicalClock {
    millis: Arc<AtomicU64>,
}

impl LogicalClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one tick of the given length, returning the new time
    #[inline]
    pub fn advance(&self, by: Duration) -> Timestamp {
        let step = by.as_millis() as u64;
        self.millis.fetch_add(step, Ordering::SeqCst) + step
    }

    /// Rewind to zero for a fresh run
    #[inline]
    pub fn reset(&self) {
        self.millis.store(0, Ordering::SeqCst);
    }
}

impl Clock for LogicalClock {
    #[inline]
    fn now(&self) -> Timestamp {
        self.millis.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_share_time() {
        let clock = LogicalClock::new();
        let handle = clock.clone();

        assert_eq!(clock.advance(Duration::from_millis(250)), 250);
        assert_eq!(handle.now(), 250);

        handle.reset();
        assert_eq!(clock.now(), 0);
    }
}
