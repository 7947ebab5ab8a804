/*!
 * Timing Metrics
 * Per-process response, waiting and turnaround times in tick units
 */

use crate::core::types::Pid;
use crate::process::Process;
use crate::scheduler::TickDuration;
use serde::{Deserialize, Serialize};

/// Timing metrics of one finished process, in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessMetrics {
    pub pid: Pid,
    /// Arrival until first dispatch
    pub response_time: u64,
    /// Time in the system not spent executing
    pub waiting_time: u64,
    /// Arrival until completion
    pub turnaround_time: u64,
}

/// Compute metrics for a process that has both started and finished
///
/// Returns `None` while either timestamp is missing. Every value is rounded
/// to the nearest tick and floored at zero.
pub fn compute_metrics(process: &Process, tick_duration: TickDuration) -> Option<ProcessMetrics> {
    let start = process.start_time()? as f64;
    let finish = process.finish_time()? as f64;
    let arrival = process.arrival() as f64;
    let tick = tick_duration.as_millis_f64();

    let in_system = finish - arrival;
    let executing = process.burst() as f64 * tick;

    Some(ProcessMetrics {
        pid: process.pid(),
        response_time: to_ticks((start - arrival) / tick),
        waiting_time: to_ticks((in_system - executing) / tick),
        turnaround_time: to_ticks(in_system / tick),
    })
}

#[inline]
fn to_ticks(value: f64) -> u64 {
    value.round().max(0.0) as u64
}

/// Means over a set of finished processes
///
/// Only constructed from a non-empty set; an empty finished list has no
/// aggregate at all rather than a NaN one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AggregateMetrics {
    pub count: usize,
    pub mean_response_time: f64,
    pub mean_waiting_time: f64,
    pub mean_turnaround_time: f64,
    /// Finished processes per elapsed tick
    pub throughput: f64,
}

impl AggregateMetrics {
    /// Aggregate per-process metrics over `elapsed_ticks` of simulated time
    pub fn from_metrics<'a, I>(metrics: I, elapsed_ticks: u64) -> Option<Self>
    where
        I: IntoIterator<Item = &'a ProcessMetrics>,
    {
        let (count, response, waiting, turnaround) = metrics.into_iter().fold(
            (0usize, 0u64, 0u64, 0u64),
            |(n, r, w, t), m| {
                (
                    n + 1,
                    r + m.response_time,
                    w + m.waiting_time,
                    t + m.turnaround_time,
                )
            },
        );

        if count == 0 {
            return None;
        }

        let n = count as f64;
        Some(Self {
            count,
            mean_response_time: response as f64 / n,
            mean_waiting_time: waiting as f64 / n,
            mean_turnaround_time: turnaround as f64 / n,
            throughput: n / elapsed_ticks.max(1) as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessSpec;

    fn finished(arrival: u64, start: u64, finish: u64, burst: u32) -> Process {
        Process::new(ProcessSpec {
            id: 1,
            name: "Backup-1".to_string(),
            burst,
            arrival,
            size: burst * 30,
            color: "hsl(10, 70%, 60%)".to_string(),
        })
        .unwrap()
        .dispatched(start)
        .completed(finish)
    }

    #[test]
    fn test_reference_metrics() {
        let p = finished(0, 2, 6, 3);
        let m = compute_metrics(&p, TickDuration::default()).unwrap();

        assert_eq!(m.response_time, 2);
        assert_eq!(m.turnaround_time, 6);
        assert_eq!(m.waiting_time, 3);
    }

    #[test]
    fn test_metrics_in_tick_units() {
        let tick = TickDuration::from_millis(500).unwrap();
        let p = finished(1_000, 2_000, 4_000, 2);
        let m = compute_metrics(&p, tick).unwrap();

        assert_eq!(m.response_time, 2);
        assert_eq!(m.turnaround_time, 6);
        assert_eq!(m.waiting_time, 4);
    }

    #[test]
    fn test_waiting_floored_at_zero() {
        // Finished faster than its burst would allow at this tick length
        let p = finished(0, 0, 2, 5);
        let m = compute_metrics(&p, TickDuration::default()).unwrap();
        assert_eq!(m.waiting_time, 0);
    }

    #[test]
    fn test_unfinished_has_no_metrics() {
        let p = Process::new(ProcessSpec {
            id: 9,
            name: "Init-9".to_string(),
            burst: 2,
            arrival: 0,
            size: 60,
            color: String::new(),
        })
        .unwrap()
        .dispatched(1);
        assert!(compute_metrics(&p, TickDuration::default()).is_none());
    }

    #[test]
    fn test_aggregate_means() {
        let metrics = [
            ProcessMetrics {
                pid: 1,
                response_time: 0,
                waiting_time: 0,
                turnaround_time: 3,
            },
            ProcessMetrics {
                pid: 2,
                response_time: 3,
                waiting_time: 3,
                turnaround_time: 4,
            },
        ];

        let agg = AggregateMetrics::from_metrics(&metrics, 5).unwrap();
        assert_eq!(agg.count, 2);
        assert_eq!(agg.mean_response_time, 1.5);
        assert_eq!(agg.mean_waiting_time, 1.5);
        assert_eq!(agg.mean_turnaround_time, 3.5);
        assert_eq!(agg.throughput, 0.4);
    }

    #[test]
    fn test_aggregate_empty_is_none() {
        let none: Vec<ProcessMetrics> = Vec::new();
        assert!(AggregateMetrics::from_metrics(&none, 10).is_none());
    }
}
