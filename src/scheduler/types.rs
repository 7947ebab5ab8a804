/*!
 * Scheduler Types
 * Domain types for scheduling disciplines and tick pacing
 */

use crate::core::serde::is_none;
use crate::core::types::{Pid, SimResult, Timestamp};
use crate::core::SimError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Scheduling discipline, fixed per engine instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Discipline {
    /// First-Come-First-Served: dispatch strictly in enqueue order
    Fcfs,
    /// Shortest-Job-Next: dispatch the least remaining work, optionally preemptive
    Sjn,
}

impl Discipline {
    /// Both disciplines in display order
    pub const ALL: [Discipline; 2] = [Discipline::Fcfs, Discipline::Sjn];

    /// Convert to string representation
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fcfs => "FCFS",
            Self::Sjn => "SJN",
        }
    }

    /// Whether this discipline can ever preempt the running process
    #[inline]
    pub const fn supports_preemption(&self) -> bool {
        matches!(self, Self::Sjn)
    }
}

impl FromStr for Discipline {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fcfs" | "fifo" | "first_come_first_served" => Ok(Self::Fcfs),
            "sjn" | "sjf" | "shortest" | "shortest_job_next" => Ok(Self::Sjn),
            _ => Err(SimError::InvalidDiscipline(s.to_string())),
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Discipline {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Discipline {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Logical length of one tick
///
/// Doubles as the pacing interval of the driver and as the divisor that
/// turns timestamps back into tick units for metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TickDuration {
    millis: u64,
}

impl TickDuration {
    pub const MIN_MILLIS: u64 = 1;
    pub const MAX_MILLIS: u64 = 60_000;

    /// Create new tick duration
    pub fn from_millis(millis: u64) -> SimResult<Self> {
        if !(Self::MIN_MILLIS..=Self::MAX_MILLIS).contains(&millis) {
            return Err(SimError::InvalidTickDuration(millis));
        }
        Ok(Self { millis })
    }

    /// Create tick duration, clamping into the valid range
    pub const fn clamped(millis: u64) -> Self {
        let millis = if millis < Self::MIN_MILLIS {
            Self::MIN_MILLIS
        } else if millis > Self::MAX_MILLIS {
            Self::MAX_MILLIS
        } else {
            millis
        };
        Self { millis }
    }

    #[inline(always)]
    pub const fn as_millis(&self) -> u64 {
        self.millis
    }

    #[inline(always)]
    pub fn as_millis_f64(&self) -> f64 {
        self.millis as f64
    }

    #[inline]
    pub const fn as_duration(&self) -> Duration {
        Duration::from_millis(self.millis)
    }
}

/// One millisecond per tick, so timestamps read directly as tick counts
impl Default for TickDuration {
    fn default() -> Self {
        Self {
            millis: Self::MIN_MILLIS,
        }
    }
}

impl<'de> Deserialize<'de> for TickDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Inner {
            millis: u64,
        }

        let inner = Inner::deserialize(deserializer)?;
        Self::from_millis(inner.millis).map_err(serde::de::Error::custom)
    }
}

/// Transitions observed during a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TickEvents {
    /// Logical time the tick ran at
    pub now: Timestamp,
    /// Process evicted back to the ready queue
    #[serde(default, skip_serializing_if = "is_none")]
    pub preempted: Option<Pid>,
    /// Process that reached zero remaining work
    #[serde(default, skip_serializing_if = "is_none")]
    pub completed: Option<Pid>,
    /// Process placed on the CPU
    #[serde(default, skip_serializing_if = "is_none")]
    pub dispatched: Option<Pid>,
    /// Process that received one tick of CPU work
    #[serde(default, skip_serializing_if = "is_none")]
    pub executed: Option<Pid>,
}

impl TickEvents {
    /// Nothing ran, nothing moved
    pub fn is_idle(&self) -> bool {
        self.executed.is_none() && self.dispatched.is_none() && self.preempted.is_none()
    }
}
