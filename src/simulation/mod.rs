/*!
 * Simulation
 * Two engines fed identical workloads on one logical clock
 *
 * Every event (reset, arrival, tick) is applied to the FCFS and SJN engines
 * back to back under one gate, so both always see the same processes at the
 * same logical time and can be compared tick for tick.
 */

use crate::config::SimulationConfig;
use crate::core::clock::{Clock, LogicalClock};
use crate::core::types::{Pid, SimResult, Timestamp};
use crate::core::SimError;
use crate::metrics::AggregateMetrics;
use crate::monitoring::generate_run_id;
use crate::process::{Process, ProcessFactory, ProcessSpec};
use crate::scheduler::{Discipline, Engine, EngineSnapshot, EngineStats, TickDuration, TickEvents};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

mod task;

pub use task::{SimulationCommand, SimulationTask};

/// Both engines at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulationSnapshot {
    pub run_id: String,
    pub now: Timestamp,
    pub fcfs: EngineSnapshot,
    pub sjn: EngineSnapshot,
}

/// Per-discipline outcome for the final report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DisciplineSummary {
    pub discipline: Discipline,
    pub preemptive: bool,
    pub finished: usize,
    pub pending: usize,
    pub stats: EngineStats,
    /// `None` reads as "no data": nothing has finished yet
    pub aggregate: Option<AggregateMetrics>,
}

/// Final report of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulationSummary {
    pub run_id: String,
    pub now: Timestamp,
    pub tick_duration: TickDuration,
    pub disciplines: Vec<DisciplineSummary>,
}

/// FCFS and SJN engines driven in lockstep
pub struct Simulation {
    fcfs: Engine,
    sjn: Engine,
    factory: ProcessFactory,
    clock: LogicalClock,
    run_id: RwLock<String>,
    /// Serializes resets, arrivals and ticks across both engines
    gate: Mutex<()>,
}

impl Simulation {
    pub fn new(config: &SimulationConfig) -> Self {
        let clock = LogicalClock::new();
        let factory = match config.seed {
            Some(seed) => ProcessFactory::with_seed(clock.clone(), seed),
            None => ProcessFactory::new(clock.clone()),
        };

        let fcfs = Engine::with_tick_duration(Discipline::Fcfs, config.tick_duration);
        let sjn = Engine::with_tick_duration(Discipline::Sjn, config.tick_duration)
            .preemptive(config.preemptive);

        let run_id = generate_run_id();
        info!(
            run_id = %run_id,
            tick_ms = config.tick_duration.as_millis(),
            preemptive = config.preemptive,
            seeded = config.seed.is_some(),
            "Simulation created"
        );

        Self {
            fcfs,
            sjn,
            factory,
            clock,
            run_id: RwLock::new(run_id),
            gate: Mutex::new(()),
        }
    }

    /// Engine for `discipline`, for reads
    ///
    /// Resets, arrivals, ticks and runtime toggles must go through the
    /// `Simulation` methods. Calling them on one engine directly bypasses the
    /// event gate and the shared clock, and the engines drift apart.
    pub fn engine(&self, discipline: Discipline) -> &Engine {
        match discipline {
            Discipline::Fcfs => &self.fcfs,
            Discipline::Sjn => &self.sjn,
        }
    }

    /// Both engines in `Discipline::ALL` order
    pub fn engines(&self) -> [&Engine; 2] {
        [&self.fcfs, &self.sjn]
    }

    /// Start a fresh run from externally supplied specs
    ///
    /// Every spec is validated before either engine is touched: bursts must
    /// be at least one tick, ids unique within the batch and below `Pid::MAX`.
    pub fn reset_run(&self, specs: &[ProcessSpec]) -> SimResult<()> {
        let mut seen = HashSet::with_capacity(specs.len());
        let processes = specs
            .iter()
            .map(|spec| {
                if !seen.insert(spec.id) {
                    return Err(SimError::DuplicatePid(spec.id));
                }
                admit(spec)
            })
            .collect::<SimResult<Vec<_>>>()?;

        let _gate = self.gate.lock();
        for process in &processes {
            self.factory.observe(process.pid());
        }
        self.restart(&processes);
        Ok(())
    }

    /// Start a fresh run from `count` factory-generated processes
    pub fn reset_random(&self, count: usize) -> Vec<Process> {
        let _gate = self.gate.lock();
        // Rewind first so the new population arrives at zero
        self.clock.reset();
        let processes = self.factory.create_batch(count);
        self.restart(&processes);
        processes
    }

    /// Enqueue an externally supplied arrival in both engines
    pub fn enqueue_arrival(&self, spec: &ProcessSpec) -> SimResult<()> {
        let process = admit(spec)?;

        let _gate = self.gate.lock();
        if self.fcfs.process(process.pid()).is_some() {
            return Err(SimError::DuplicatePid(process.pid()));
        }
        self.factory.observe(process.pid());
        self.deliver(&process);
        Ok(())
    }

    /// Generate one random process arriving now and enqueue it in both engines
    pub fn spawn_arrival(&self) -> Process {
        let _gate = self.gate.lock();
        let process = self.factory.create_random();
        self.deliver(&process);
        process
    }

    /// Tick both engines, then advance the shared clock
    pub fn tick(&self) -> [TickEvents; 2] {
        let _gate = self.gate.lock();
        let events = [self.fcfs.tick(), self.sjn.tick()];
        let now = self.clock.advance(self.fcfs.tick_duration().as_duration());

        for ev in events.iter().filter(|ev| !ev.is_idle()) {
            debug!(
                now = ev.now,
                preempted = ?ev.preempted,
                completed = ?ev.completed,
                dispatched = ?ev.dispatched,
                "Tick"
            );
        }
        debug!(now, "Clock advanced");
        events
    }

    /// Toggle preemption; only the SJN engine acts on it
    pub fn set_preemptive(&self, enabled: bool) {
        let _gate = self.gate.lock();
        for engine in self.engines() {
            engine.set_preemptive(enabled);
        }
    }

    pub fn is_preemptive(&self) -> bool {
        self.sjn.is_preemptive()
    }

    /// Change the logical length of subsequent ticks in both engines
    pub fn set_tick_duration(&self, tick_duration: TickDuration) {
        let _gate = self.gate.lock();
        for engine in self.engines() {
            engine.set_tick_duration(tick_duration);
        }
    }

    pub fn tick_duration(&self) -> TickDuration {
        self.fcfs.tick_duration()
    }

    /// Current logical time
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn run_id(&self) -> String {
        self.run_id.read().clone()
    }

    /// Id the factory will hand out next
    pub fn next_pid(&self) -> Pid {
        self.factory.next_pid()
    }

    /// Both engines have finished everything they were given
    pub fn is_drained(&self) -> bool {
        self.engines().iter().all(|engine| engine.is_drained())
    }

    /// Consistent view of both engines between events
    pub fn snapshot(&self) -> SimulationSnapshot {
        let _gate = self.gate.lock();
        SimulationSnapshot {
            run_id: self.run_id(),
            now: self.clock.now(),
            fcfs: self.fcfs.snapshot(),
            sjn: self.sjn.snapshot(),
        }
    }

    /// Aggregate outcome per discipline
    pub fn summary(&self) -> SimulationSummary {
        let snapshot = self.snapshot();
        let tick_duration = snapshot.fcfs.tick_duration;

        let disciplines = [snapshot.fcfs, snapshot.sjn]
            .into_iter()
            .map(|engine| DisciplineSummary {
                discipline: engine.discipline,
                preemptive: engine.preemptive,
                finished: engine.finished.len(),
                pending: engine.ready.len() + usize::from(engine.running.is_some()),
                stats: engine.stats,
                aggregate: engine.aggregate,
            })
            .collect();

        SimulationSummary {
            run_id: snapshot.run_id,
            now: snapshot.now,
            tick_duration,
            disciplines,
        }
    }

    /// Reset both engines and the clock to a new population; gate held
    fn restart(&self, processes: &[Process]) {
        self.clock.reset();
        for engine in self.engines() {
            engine.reset(processes);
        }

        let run_id = generate_run_id();
        info!(run_id = %run_id, processes = processes.len(), "Run started");
        *self.run_id.write() = run_id;
    }

    /// Hand a clone of `process` to each engine; gate held
    fn deliver(&self, process: &Process) {
        for engine in self.engines() {
            engine.enqueue(process);
        }
        debug!(pid = process.pid(), arrival = process.arrival(), "Arrival delivered");
    }
}

/// Validate an externally supplied spec
///
/// `Pid::MAX` is refused: the factory's counter must stay strictly above every
/// external id, and there is no id above it.
fn admit(spec: &ProcessSpec) -> SimResult<Process> {
    if spec.id == Pid::MAX {
        return Err(SimError::ReservedPid(spec.id));
    }
    Process::new(spec.clone())
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(&SimulationConfig::default())
    }
}
