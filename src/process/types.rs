/*!
 * Process Types
 * The schedulable process entity, its external spec and read-only views
 */

use crate::core::serde::is_none;
use crate::core::types::{Pid, SimResult, Ticks, Timestamp};
use crate::core::SimError;
use serde::{Deserialize, Serialize};

/// Where a process currently lives inside an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Waiting in the ready queue
    Ready,
    /// Occupying the CPU
    Running,
    /// Completed, in the finished list
    Finished,
}

/// Process description supplied by the factory or an external driver
///
/// `size` and `color` are presentation pass-through and never inspected
/// by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessSpec {
    pub id: Pid,
    pub name: String,
    pub burst: Ticks,
    pub arrival: Timestamp,
    pub size: u32,
    pub color: String,
}

/// Schedulable unit of work
///
/// State transitions consume the process and return the updated value,
/// so every queue/running/finished move hands over a fresh snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Process {
    pid: Pid,
    name: String,
    burst: Ticks,
    remaining: Ticks,
    arrival: Timestamp,
    #[serde(default, skip_serializing_if = "is_none")]
    start_time: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "is_none")]
    finish_time: Option<Timestamp>,
    size: u32,
    color: String,
}

impl Process {
    /// Build a fresh process from an external spec
    pub fn new(spec: ProcessSpec) -> SimResult<Self> {
        if spec.burst == 0 {
            return Err(SimError::InvalidBurst {
                pid: spec.id,
                burst: spec.burst,
            });
        }

        Ok(Self::fresh(spec))
    }

    /// Build without validation; callers guarantee `burst >= 1`
    pub(crate) fn fresh(spec: ProcessSpec) -> Self {
        Self {
            pid: spec.id,
            name: spec.name,
            burst: spec.burst,
            remaining: spec.burst,
            arrival: spec.arrival,
            start_time: None,
            finish_time: None,
            size: spec.size,
            color: spec.color,
        }
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn burst(&self) -> Ticks {
        self.burst
    }

    #[inline]
    pub fn remaining(&self) -> Ticks {
        self.remaining
    }

    #[inline]
    pub fn arrival(&self) -> Timestamp {
        self.arrival
    }

    #[inline]
    pub fn start_time(&self) -> Option<Timestamp> {
        self.start_time
    }

    #[inline]
    pub fn finish_time(&self) -> Option<Timestamp> {
        self.finish_time
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Check if all work is done
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// Placed on the CPU at `now`; the start time is only ever stamped once
    #[must_use]
    pub fn dispatched(self, now: Timestamp) -> Self {
        Self {
            start_time: self.start_time.or(Some(now)),
            ..self
        }
    }

    /// One tick of CPU work, floored at zero
    #[must_use]
    pub fn executed(self) -> Self {
        Self {
            remaining: self.remaining.saturating_sub(1),
            ..self
        }
    }

    /// Stamped finished at `now`
    #[must_use]
    pub fn completed(self, now: Timestamp) -> Self {
        Self {
            finish_time: self.finish_time.or(Some(now)),
            ..self
        }
    }

    /// Spec that would recreate this process from scratch
    pub fn spec(&self) -> ProcessSpec {
        ProcessSpec {
            id: self.pid,
            name: self.name.clone(),
            burst: self.burst,
            arrival: self.arrival,
            size: self.size,
            color: self.color.clone(),
        }
    }

    /// Read-only view tagged with where the process lives
    pub fn view(&self, state: ProcessState) -> ProcessView {
        ProcessView {
            pid: self.pid,
            name: self.name.clone(),
            burst: self.burst,
            remaining: self.remaining,
            arrival: self.arrival,
            start_time: self.start_time,
            finish_time: self.finish_time,
            size: self.size,
            color: self.color.clone(),
            state,
        }
    }
}

/// Immutable snapshot of a process handed to consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessView {
    pub pid: Pid,
    pub name: String,
    pub burst: Ticks,
    pub remaining: Ticks,
    pub arrival: Timestamp,
    #[serde(default, skip_serializing_if = "is_none")]
    pub start_time: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "is_none")]
    pub finish_time: Option<Timestamp>,
    pub size: u32,
    pub color: String,
    pub state: ProcessState,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: Pid, burst: Ticks) -> ProcessSpec {
        ProcessSpec {
            id,
            name: format!("Worker-{}", id),
            burst,
            arrival: 0,
            size: burst * 30,
            color: "hsl(120, 70%, 60%)".to_string(),
        }
    }

    #[test]
    fn test_new_starts_with_full_remaining() {
        let p = Process::new(spec(1, 4)).unwrap();
        assert_eq!(p.remaining(), 4);
        assert_eq!(p.start_time(), None);
        assert_eq!(p.finish_time(), None);
    }

    #[test]
    fn test_zero_burst_rejected() {
        let err = Process::new(spec(3, 0)).unwrap_err();
        assert_eq!(err, SimError::InvalidBurst { pid: 3, burst: 0 });
    }

    #[test]
    fn test_start_time_stamped_once() {
        let p = Process::new(spec(1, 2)).unwrap().dispatched(5);
        let p = p.dispatched(9);
        assert_eq!(p.start_time(), Some(5));
    }

    #[test]
    fn test_executed_floors_at_zero() {
        let p = Process::new(spec(1, 1)).unwrap().executed();
        assert!(p.is_finished());
        let p = p.executed();
        assert_eq!(p.remaining(), 0);
    }

    #[test]
    fn test_view_carries_state() {
        let p = Process::new(spec(2, 3)).unwrap();
        let view = p.view(ProcessState::Ready);
        assert_eq!(view.pid, 2);
        assert_eq!(view.state, ProcessState::Ready);
        assert_eq!(p.spec(), spec(2, 3));
    }
}
