/*!
 * Lock-Free Engine Statistics
 * Atomic counters readable without taking the engine's state lock
 */

use super::stats::EngineStats;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic engine statistics
///
/// # Performance
/// - Cache-line aligned to prevent false sharing
/// - All operations use relaxed ordering; each counter is exact on its own
#[repr(C, align(64))]
#[derive(Default)]
pub struct AtomicEngineStats {
    ticks: AtomicU64,
    idle_ticks: AtomicU64,
    enqueued: AtomicU64,
    dispatches: AtomicU64,
    preemptions: AtomicU64,
    completions: AtomicU64,
}

impl AtomicEngineStats {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn inc_ticks(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_idle_ticks(&self) {
        self.idle_ticks.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn add_enqueued(&self, count: u64) {
        self.enqueued.fetch_add(count, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_dispatches(&self) {
        self.dispatches.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_preemptions(&self) {
        self.preemptions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_completions(&self) {
        self.completions.fetch_add(1, Ordering::Relaxed);
    }

    /// Zero every counter for a fresh run
    pub fn clear(&self) {
        for counter in [
            &self.ticks,
            &self.idle_ticks,
            &self.enqueued,
            &self.dispatches,
            &self.preemptions,
            &self.completions,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    /// Get snapshot of current stats
    ///
    /// # Note
    /// Counters may be mutually inconsistent if read while a tick is in
    /// flight on another thread.
    #[inline]
    pub fn snapshot(&self) -> EngineStats {
        EngineStats {
            ticks: self.ticks.load(Ordering::Relaxed),
            idle_ticks: self.idle_ticks.load(Ordering::Relaxed),
            enqueued: self.enqueued.load(Ordering::Relaxed),
            dispatches: self.dispatches.load(Ordering::Relaxed),
            preemptions: self.preemptions.load(Ordering::Relaxed),
            completions: self.completions.load(Ordering::Relaxed),
        }
    }
}
