/*!
 * Scheduler Engine
 * One discipline's ready queue, running slot and finished list
 */

use crate::core::types::{SimResult, Timestamp};
use crate::process::Process;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tracing::info;

mod atomic_stats;
mod operations;
mod policy;
mod stats;
pub mod types;

use atomic_stats::AtomicEngineStats;

pub use stats::{EngineSnapshot, EngineStats};
pub use types::{Discipline, TickDuration, TickEvents};

/// Mutable run state, only ever touched under the engine lock
#[derive(Debug, Default)]
struct RunState {
    ready: VecDeque<Process>,
    running: Option<Process>,
    finished: Vec<Process>,
    now: Timestamp,
    preemptive: bool,
    tick_duration: TickDuration,
}

/// Scheduler engine for a single discipline
///
/// Every public operation takes the state lock for its whole duration, so
/// a tick and an arrival hitting the same engine are applied one at a time
/// and never run two preemption checks against the same state.
pub struct Engine {
    discipline: Discipline,
    state: Mutex<RunState>,
    stats: AtomicEngineStats,
}

impl Engine {
    /// Create new idle engine with one-millisecond ticks
    pub fn new(discipline: Discipline) -> Self {
        Self::with_tick_duration(discipline, TickDuration::default())
    }

    /// Create engine with custom tick duration
    pub fn with_tick_duration(discipline: Discipline, tick_duration: TickDuration) -> Self {
        info!(
            discipline = %discipline,
            tick_ms = tick_duration.as_millis(),
            "Scheduler engine initialized"
        );

        Self {
            discipline,
            state: Mutex::new(RunState {
                tick_duration,
                ..RunState::default()
            }),
            stats: AtomicEngineStats::new(),
        }
    }

    /// Create engine from a discipline name such as `"fcfs"` or `"sjn"`
    pub fn from_name(name: &str) -> SimResult<Self> {
        Ok(Self::new(name.parse()?))
    }

    /// Enable preemptive mode at construction
    pub fn preemptive(self, enabled: bool) -> Self {
        self.state.lock().preemptive = enabled;
        self
    }

    pub fn discipline(&self) -> Discipline {
        self.discipline
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Discipline::Fcfs)
    }
}
