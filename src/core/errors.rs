/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 *
 * The scheduling engine itself never fails. Errors only surface at the
 * boundary: parsing a discipline, accepting process specs from outside the
 * factory, validating tick durations, and loading configuration.
 */

use super::types::{Pid, Ticks};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Simulator errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SimError {
    #[error("Invalid scheduling discipline: {0}")]
    #[diagnostic(
        code(scheduler::invalid_discipline),
        help("Use FCFS (fcfs, fifo) or SJN (sjn, sjf, shortest).")
    )]
    InvalidDiscipline(String),

    #[error("Process {pid} has invalid burst {burst}")]
    #[diagnostic(
        code(process::invalid_burst),
        help("A process must require at least one tick of CPU time.")
    )]
    InvalidBurst { pid: Pid, burst: Ticks },

    #[error("Duplicate process id {0}")]
    #[diagnostic(
        code(process::duplicate_pid),
        help("Process ids must be unique within a run.")
    )]
    DuplicatePid(Pid),

    #[error("Process id {0} is reserved")]
    #[diagnostic(
        code(process::reserved_pid),
        help("External process ids must be below u32::MAX so generated ids never collide.")
    )]
    ReservedPid(Pid),

    #[error("Invalid tick duration: {0}ms")]
    #[diagnostic(
        code(scheduler::invalid_tick_duration),
        help("Tick duration must be between 1ms and 60000ms.")
    )]
    InvalidTickDuration(u64),

    #[error("Invalid configuration value for {key}: {value}")]
    #[diagnostic(
        code(config::invalid_value),
        help("Check the SIM_* environment variables.")
    )]
    InvalidConfig { key: String, value: String },
}

impl SimError {
    pub(crate) fn config(key: &str, value: impl Into<String>) -> Self {
        SimError::InvalidConfig {
            key: key.to_string(),
            value: value.into(),
        }
    }
}
