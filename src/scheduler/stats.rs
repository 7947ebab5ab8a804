/*!
 * Engine Observation
 * Read-only snapshots, per-process lookups, statistics and metrics
 */

use super::{Discipline, Engine, TickDuration};
use crate::core::serde::{is_none, is_zero_u64};
use crate::core::types::{Pid, Timestamp};
use crate::metrics::{compute_metrics, AggregateMetrics, ProcessMetrics};
use crate::process::{ProcessState, ProcessView};
use serde::{Deserialize, Serialize};

/// Engine counters since the last reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EngineStats {
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub ticks: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub idle_ticks: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub enqueued: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub dispatches: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub preemptions: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub completions: u64,
}

/// Consistent point-in-time view of one engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineSnapshot {
    pub discipline: Discipline,
    pub preemptive: bool,
    pub now: Timestamp,
    pub tick_duration: TickDuration,
    pub ready: Vec<ProcessView>,
    #[serde(default, skip_serializing_if = "is_none")]
    pub running: Option<ProcessView>,
    pub finished: Vec<ProcessView>,
    pub stats: EngineStats,
    #[serde(default, skip_serializing_if = "is_none")]
    pub aggregate: Option<AggregateMetrics>,
}

impl EngineSnapshot {
    /// Every process the engine holds, each exactly once
    pub fn processes(&self) -> impl Iterator<Item = &ProcessView> {
        self.ready
            .iter()
            .chain(self.running.iter())
            .chain(self.finished.iter())
    }
}

impl Engine {
    /// Take a consistent snapshot under a single lock acquisition
    pub fn snapshot(&self) -> EngineSnapshot {
        let state = self.state.lock();
        let stats = self.stats.snapshot();
        let metrics: Vec<ProcessMetrics> = state
            .finished
            .iter()
            .filter_map(|p| compute_metrics(p, state.tick_duration))
            .collect();

        EngineSnapshot {
            discipline: self.discipline,
            preemptive: state.preemptive,
            now: state.now,
            tick_duration: state.tick_duration,
            ready: state
                .ready
                .iter()
                .map(|p| p.view(ProcessState::Ready))
                .collect(),
            running: state.running.as_ref().map(|p| p.view(ProcessState::Running)),
            finished: state
                .finished
                .iter()
                .map(|p| p.view(ProcessState::Finished))
                .collect(),
            stats,
            aggregate: AggregateMetrics::from_metrics(&metrics, stats.ticks),
        }
    }

    /// Ready queue in current order
    pub fn ready(&self) -> Vec<ProcessView> {
        let state = self.state.lock();
        state
            .ready
            .iter()
            .map(|p| p.view(ProcessState::Ready))
            .collect()
    }

    /// Process currently on the CPU
    pub fn running(&self) -> Option<ProcessView> {
        let state = self.state.lock();
        state.running.as_ref().map(|p| p.view(ProcessState::Running))
    }

    /// Finished processes in completion order
    pub fn finished(&self) -> Vec<ProcessView> {
        let state = self.state.lock();
        state
            .finished
            .iter()
            .map(|p| p.view(ProcessState::Finished))
            .collect()
    }

    /// Look up a process wherever it currently lives
    pub fn process(&self, pid: Pid) -> Option<ProcessView> {
        let state = self.state.lock();

        if let Some(p) = state.running.as_ref().filter(|p| p.pid() == pid) {
            return Some(p.view(ProcessState::Running));
        }
        if let Some(p) = state.ready.iter().find(|p| p.pid() == pid) {
            return Some(p.view(ProcessState::Ready));
        }
        state
            .finished
            .iter()
            .find(|p| p.pid() == pid)
            .map(|p| p.view(ProcessState::Finished))
    }

    /// Timing metrics of a finished process
    ///
    /// Timestamps are converted with the current tick duration, so a process
    /// that spans a `set_tick_duration` call reports approximate tick counts.
    pub fn metrics(&self, pid: Pid) -> Option<ProcessMetrics> {
        let state = self.state.lock();
        state
            .finished
            .iter()
            .find(|p| p.pid() == pid)
            .and_then(|p| compute_metrics(p, state.tick_duration))
    }

    /// Metrics of every finished process in completion order, converted
    /// with the current tick duration like [`Engine::metrics`]
    pub fn all_metrics(&self) -> Vec<ProcessMetrics> {
        let state = self.state.lock();
        state
            .finished
            .iter()
            .filter_map(|p| compute_metrics(p, state.tick_duration))
            .collect()
    }

    /// Means over the finished list; `None` until something finishes
    pub fn aggregate_metrics(&self) -> Option<AggregateMetrics> {
        AggregateMetrics::from_metrics(&self.all_metrics(), self.stats.snapshot().ticks)
    }

    /// Get engine statistics (lock-free snapshot)
    pub fn stats(&self) -> EngineStats {
        self.stats.snapshot()
    }

    /// Logical time the next tick will run at
    pub fn now(&self) -> Timestamp {
        self.state.lock().now
    }

    /// Number of processes not yet finished
    pub fn len(&self) -> usize {
        let state = self.state.lock();
        state.ready.len() + usize::from(state.running.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nothing ready and nothing running; further ticks only idle
    pub fn is_drained(&self) -> bool {
        self.is_empty()
    }

    /// CPU slot is free
    pub fn is_idle(&self) -> bool {
        self.state.lock().running.is_none()
    }
}
