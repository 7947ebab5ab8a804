/*!
 * Scheduler Policy
 * Selection and preemption decisions for each discipline
 *
 * SJN uses a full linear scan on every decision. Queues stay small at
 * simulation scale; a heap keyed by `remaining` would also have to keep the
 * leftmost-minimum tie-break to be a drop-in replacement.
 */

use super::{Discipline, RunState};
use crate::core::types::Pid;
use crate::process::Process;
use std::collections::VecDeque;

/// Index of the leftmost process with the least remaining work
#[inline]
pub(super) fn shortest_index(ready: &VecDeque<Process>) -> Option<usize> {
    // min_by_key keeps the first of equal minima
    ready
        .iter()
        .enumerate()
        .min_by_key(|(_, p)| p.remaining())
        .map(|(idx, _)| idx)
}

impl Discipline {
    /// Index of the ready process this discipline dispatches next
    pub(super) fn select(&self, ready: &VecDeque<Process>) -> Option<usize> {
        match self {
            Discipline::Fcfs => (!ready.is_empty()).then_some(0),
            Discipline::Sjn => shortest_index(ready),
        }
    }
}

impl RunState {
    /// Evict the running process if a strictly shorter job is ready
    ///
    /// On eviction the ready queue is re-sorted ascending by `remaining`
    /// (stable, so equal jobs keep their relative order with the evicted
    /// process behind them). Returns the evicted pid.
    pub(super) fn preempt_if_shorter(&mut self) -> Option<Pid> {
        let running_remaining = self.running.as_ref()?.remaining();
        let idx = shortest_index(&self.ready)?;

        if self.ready[idx].remaining() >= running_remaining {
            return None;
        }

        let evicted = self.running.take()?;
        let pid = evicted.pid();
        self.ready.push_back(evicted);
        self.ready
            .make_contiguous()
            .sort_by_key(|p| p.remaining());

        Some(pid)
    }

    /// Move the selected ready process onto the CPU
    pub(super) fn dispatch(&mut self, discipline: Discipline) -> Option<Pid> {
        let idx = discipline.select(&self.ready)?;
        let process = self.ready.remove(idx)?.dispatched(self.now);
        let pid = process.pid();
        self.running = Some(process);
        Some(pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessSpec;

    fn with_remaining(id: Pid, burst: u32, worked: u32) -> Process {
        let mut p = Process::new(ProcessSpec {
            id,
            name: format!("Daemon-{}", id),
            burst,
            arrival: 0,
            size: 0,
            color: String::new(),
        })
        .unwrap();
        for _ in 0..worked {
            p = p.executed();
        }
        p
    }

    fn queue(items: Vec<Process>) -> VecDeque<Process> {
        items.into_iter().collect()
    }

    #[test]
    fn test_shortest_index_leftmost_tie() {
        let ready = queue(vec![
            with_remaining(1, 4, 0),
            with_remaining(2, 2, 0),
            with_remaining(3, 5, 3),
        ]);
        assert_eq!(shortest_index(&ready), Some(1));
        assert_eq!(shortest_index(&VecDeque::new()), None);
    }

    #[test]
    fn test_fcfs_selects_head() {
        let ready = queue(vec![with_remaining(1, 9, 0), with_remaining(2, 1, 0)]);
        assert_eq!(Discipline::Fcfs.select(&ready), Some(0));
        assert_eq!(Discipline::Sjn.select(&ready), Some(1));
    }

    #[test]
    fn test_no_preemption_on_equal_remaining() {
        let mut state = RunState {
            ready: queue(vec![with_remaining(2, 3, 0)]),
            running: Some(with_remaining(1, 3, 0)),
            ..RunState::default()
        };
        assert_eq!(state.preempt_if_shorter(), None);
        assert_eq!(state.running.as_ref().map(|p| p.pid()), Some(1));
    }

    #[test]
    fn test_preemption_sorts_queue() {
        let mut state = RunState {
            ready: queue(vec![
                with_remaining(2, 6, 0),
                with_remaining(3, 1, 0),
                with_remaining(4, 4, 0),
            ]),
            running: Some(with_remaining(1, 5, 1)),
            ..RunState::default()
        };

        assert_eq!(state.preempt_if_shorter(), Some(1));
        assert!(state.running.is_none());

        let order: Vec<Pid> = state.ready.iter().map(|p| p.pid()).collect();
        assert_eq!(order, vec![3, 4, 1, 2]);
    }
}
