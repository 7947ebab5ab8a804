/*!
 * CPU Scheduling Simulator Library
 * FCFS and SJN engines driven side by side on a shared logical clock
 */

pub mod config;
pub mod core;
pub mod metrics;
pub mod monitoring;
pub mod process;
pub mod scheduler;
pub mod simulation;

// Re-exports
pub use config::SimulationConfig;
pub use crate::core::{Clock, LogicalClock, Pid, SimError, SimResult, Ticks, Timestamp};
pub use metrics::{compute_metrics, AggregateMetrics, ProcessMetrics};
pub use monitoring::{generate_run_id, init_tracing};
pub use process::{Process, ProcessFactory, ProcessSpec, ProcessState, ProcessView};
pub use scheduler::{Discipline, Engine, EngineSnapshot, EngineStats, TickDuration, TickEvents};
pub use simulation::{
    DisciplineSummary, Simulation, SimulationCommand, SimulationSnapshot, SimulationSummary,
    SimulationTask,
};
