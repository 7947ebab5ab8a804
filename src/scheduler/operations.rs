/*!
 * Scheduler Core Operations
 * Reset, enqueue, tick and runtime controls
 */

use super::{Engine, RunState, TickDuration, TickEvents};
use crate::core::types::Pid;
use crate::process::Process;
use tracing::{debug, info};

impl Engine {
    /// Start a fresh run from `initial`, cloned in input order
    ///
    /// Clears the ready queue, running slot, finished list, logical time and
    /// statistics. Preemptive mode and tick duration carry over.
    pub fn reset(&self, initial: &[Process]) {
        let mut state = self.state.lock();
        state.ready = initial.iter().cloned().collect();
        state.running = None;
        state.finished.clear();
        state.now = 0;

        self.stats.clear();
        self.stats.add_enqueued(initial.len() as u64);

        info!(
            discipline = %self.discipline,
            processes = initial.len(),
            "Engine reset"
        );
    }

    /// Append a clone of an arriving process to the ready queue
    ///
    /// Under preemptive SJN the arrival immediately triggers a preemption
    /// check against the running process.
    pub fn enqueue(&self, process: &Process) {
        let mut state = self.state.lock();
        state.ready.push_back(process.clone());
        self.stats.add_enqueued(1);

        debug!(
            discipline = %self.discipline,
            pid = process.pid(),
            remaining = process.remaining(),
            now = state.now,
            "Process enqueued"
        );

        self.check_preemption(&mut state);
    }

    /// Advance logical time by one tick
    ///
    /// Order within a tick:
    /// 1. preemptive SJN: evict the running process if a shorter job is ready
    /// 2. a process that was already running gets one tick of work and is
    ///    retired to the finished list when it reaches zero
    /// 3. an empty CPU is handed to the next ready process, which does not
    ///    execute until the following tick
    pub fn tick(&self) -> TickEvents {
        let mut state = self.state.lock();
        let now = state.now;
        let mut events = TickEvents {
            now,
            preempted: self.check_preemption(&mut state),
            ..TickEvents::default()
        };

        if let Some(process) = state.running.take() {
            let process = process.executed();
            let pid = process.pid();
            events.executed = Some(pid);

            if process.is_finished() {
                let process = process.completed(now);
                events.completed = Some(pid);
                self.stats.inc_completions();
                info!(
                    discipline = %self.discipline,
                    pid,
                    now,
                    "Process finished"
                );
                state.finished.push(process);
            } else {
                state.running = Some(process);
            }
        }

        if state.running.is_none() {
            events.dispatched = state.dispatch(self.discipline);
            if let Some(pid) = events.dispatched {
                self.stats.inc_dispatches();
                debug!(discipline = %self.discipline, pid, now, "Process dispatched");
            }
        }

        self.stats.inc_ticks();
        if events.is_idle() {
            self.stats.inc_idle_ticks();
        }

        let step = state.tick_duration.as_millis();
        state.now += step;
        events
    }

    /// Toggle preemptive mode; only SJN ever acts on it
    pub fn set_preemptive(&self, enabled: bool) {
        let mut state = self.state.lock();
        if state.preemptive != enabled {
            state.preemptive = enabled;
            info!(discipline = %self.discipline, enabled, "Preemptive mode changed");
        }
    }

    pub fn is_preemptive(&self) -> bool {
        self.state.lock().preemptive
    }

    /// Change the logical length of subsequent ticks
    pub fn set_tick_duration(&self, tick_duration: TickDuration) {
        self.state.lock().tick_duration = tick_duration;
        info!(
            discipline = %self.discipline,
            tick_ms = tick_duration.as_millis(),
            "Tick duration updated"
        );
    }

    pub fn tick_duration(&self) -> TickDuration {
        self.state.lock().tick_duration
    }

    /// Run a preemption check if this engine is in preemptive SJN mode
    fn check_preemption(&self, state: &mut RunState) -> Option<Pid> {
        if !self.discipline.supports_preemption() || !state.preemptive {
            return None;
        }

        let pid = state.preempt_if_shorter()?;
        self.stats.inc_preemptions();
        info!(
            discipline = %self.discipline,
            pid,
            now = state.now,
            "Process preempted"
        );
        Some(pid)
    }
}
