/*!
 * ID Generation
 * Monotonic process id assignment owned by a process factory
 */

use super::types::Pid;
use std::sync::atomic::{AtomicU32, Ordering};

/// Monotonic atomic counter for process ids
///
/// Ids are never recycled. The first id handed out is 1.
#[derive(Debug)]
pub struct PidGenerator {
    counter: AtomicU32,
}

impl PidGenerator {
    /// Create new generator starting at given value
    #[inline]
    pub fn new(start: Pid) -> Self {
        Self {
            counter: AtomicU32::new(start),
        }
    }

    /// Generate next id
    #[inline]
    pub fn next(&self) -> Pid {
        self.counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Id that the next call to `next` will return
    #[inline]
    pub fn peek(&self) -> Pid {
        self.counter.load(Ordering::SeqCst)
    }

    /// Make sure future ids are strictly greater than `pid`
    ///
    /// Used when externally supplied processes share the run with
    /// factory-made ones.
    #[inline]
    pub fn observe(&self, pid: Pid) {
        self.counter.fetch_max(pid.saturating_add(1), Ordering::SeqCst);
    }
}

impl Default for PidGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic() {
        let ids = PidGenerator::default();
        assert_eq!(ids.next(), 1);
        assert_eq!(ids.next(), 2);
        assert_eq!(ids.peek(), 3);
    }

    #[test]
    fn test_observe_skips_past_external_ids() {
        let ids = PidGenerator::default();
        ids.observe(41);
        assert_eq!(ids.next(), 42);

        // Lower ids never move the counter backwards
        ids.observe(5);
        assert_eq!(ids.next(), 43);
    }
}
