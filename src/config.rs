/*!
 * Simulation Configuration
 *
 * Defaults, presets and environment overrides for a simulation run.
 *
 * Environment variables:
 * - SIM_PRESET: default | fast | relaxed (applied before other overrides)
 * - SIM_TICK_MS: logical tick length and pacing interval
 * - SIM_SPAWN_MS: interval between random arrivals, 0 disables arrivals
 * - SIM_INITIAL_PROCESSES: size of the initial population
 * - SIM_PREEMPTIVE: enable preemptive SJN
 * - SIM_SEED: seed for reproducible process generation
 * - SIM_MAX_TICKS: stop the driver after this many ticks
 */

use crate::core::serde::is_none;
use crate::core::types::SimResult;
use crate::core::SimError;
use crate::scheduler::TickDuration;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulationConfig {
    /// Logical tick length, also the driver's pacing interval
    pub tick_duration: TickDuration,
    /// Milliseconds between random arrivals; 0 disables arrivals
    pub spawn_interval_ms: u64,
    /// Processes generated for a fresh run
    pub initial_processes: usize,
    /// Preemptive mode for the SJN engine
    pub preemptive: bool,
    /// Seed for the process factory
    #[serde(default, skip_serializing_if = "is_none")]
    pub seed: Option<u64>,
    /// Pause the driver after this many ticks
    #[serde(default, skip_serializing_if = "is_none")]
    pub max_ticks: Option<u64>,
    /// Start ticking as soon as the driver is spawned
    pub autostart: bool,
}

impl SimulationConfig {
    /// Default configuration: one tick per second, an arrival every three
    pub fn new() -> Self {
        Self {
            tick_duration: TickDuration::clamped(1_000),
            spawn_interval_ms: 3_000,
            initial_processes: 10,
            preemptive: false,
            seed: None,
            max_ticks: None,
            autostart: true,
        }
    }

    /// Fast configuration for demos and smoke runs
    pub fn fast() -> Self {
        Self {
            tick_duration: TickDuration::clamped(50),
            spawn_interval_ms: 150,
            ..Self::new()
        }
    }

    /// Slow configuration for following every transition by eye
    pub fn relaxed() -> Self {
        Self {
            tick_duration: TickDuration::clamped(2_000),
            spawn_interval_ms: 6_000,
            ..Self::new()
        }
    }

    /// Default configuration with `SIM_*` environment overrides applied
    pub fn from_env() -> SimResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> SimResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("SIM_PRESET").as_deref().map(str::trim) {
            None | Some("") | Some("default") => Self::new(),
            Some("fast") => Self::fast(),
            Some("relaxed") => Self::relaxed(),
            Some(other) => return Err(SimError::config("SIM_PRESET", other)),
        };

        if let Some(value) = lookup("SIM_TICK_MS") {
            let millis = parse_u64("SIM_TICK_MS", &value)?;
            config.tick_duration = TickDuration::from_millis(millis)?;
        }
        if let Some(value) = lookup("SIM_SPAWN_MS") {
            config.spawn_interval_ms = parse_u64("SIM_SPAWN_MS", &value)?;
        }
        if let Some(value) = lookup("SIM_INITIAL_PROCESSES") {
            config.initial_processes = parse_u64("SIM_INITIAL_PROCESSES", &value)? as usize;
        }
        if let Some(value) = lookup("SIM_PREEMPTIVE") {
            config.preemptive = parse_bool("SIM_PREEMPTIVE", &value)?;
        }
        if let Some(value) = lookup("SIM_SEED") {
            config.seed = Some(parse_u64("SIM_SEED", &value)?);
        }
        if let Some(value) = lookup("SIM_MAX_TICKS") {
            config.max_ticks = Some(parse_u64("SIM_MAX_TICKS", &value)?);
        }

        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_preemptive(mut self, preemptive: bool) -> Self {
        self.preemptive = preemptive;
        self
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    /// Arrival interval, if arrivals are enabled
    pub fn spawn_interval(&self) -> Option<Duration> {
        (self.spawn_interval_ms > 0).then(|| Duration::from_millis(self.spawn_interval_ms))
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_u64(key: &str, value: &str) -> SimResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| SimError::config(key, value))
}

fn parse_bool(key: &str, value: &str) -> SimResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SimError::config(key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = SimulationConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SimulationConfig::new());
        assert_eq!(config.tick_duration.as_millis(), 1_000);
        assert_eq!(config.initial_processes, 10);
        assert_eq!(config.spawn_interval(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_overrides_applied_over_preset() {
        let config = SimulationConfig::from_lookup(lookup(&[
            ("SIM_PRESET", "fast"),
            ("SIM_TICK_MS", "20"),
            ("SIM_PREEMPTIVE", "yes"),
            ("SIM_SEED", "1234"),
            ("SIM_SPAWN_MS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.tick_duration.as_millis(), 20);
        assert!(config.preemptive);
        assert_eq!(config.seed, Some(1234));
        assert_eq!(config.spawn_interval(), None);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = SimulationConfig::from_lookup(lookup(&[("SIM_PREEMPTIVE", "maybe")]))
            .unwrap_err();
        assert_eq!(err, SimError::config("SIM_PREEMPTIVE", "maybe"));

        let err = SimulationConfig::from_lookup(lookup(&[("SIM_TICK_MS", "0")])).unwrap_err();
        assert_eq!(err, SimError::InvalidTickDuration(0));

        assert!(SimulationConfig::from_lookup(lookup(&[("SIM_PRESET", "turbo")])).is_err());
    }
}
