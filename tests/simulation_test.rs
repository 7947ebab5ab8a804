/*!
 * Simulation Tests
 * Lockstep FCFS/SJN comparison, the async driver and configuration
 */

use pretty_assertions::assert_eq;
use sched_sim::{
    Discipline, Pid, ProcessSpec, SimError, Simulation, SimulationCommand, SimulationConfig,
    SimulationSnapshot, SimulationTask, TickDuration,
};
use std::sync::Arc;
use std::time::Duration;

fn spec(id: Pid, burst: u32) -> ProcessSpec {
    ProcessSpec {
        id,
        name: format!("Compiler-{}", id),
        burst,
        arrival: 0,
        size: burst * 30,
        color: "hsl(180, 70%, 60%)".to_string(),
    }
}

fn one_ms_ticks() -> SimulationConfig {
    SimulationConfig {
        tick_duration: TickDuration::clamped(1),
        spawn_interval_ms: 0,
        ..SimulationConfig::new().with_seed(99)
    }
}

#[test]
fn test_same_workload_both_disciplines() {
    let sim = Simulation::new(&one_ms_ticks());
    sim.reset_run(&[spec(1, 3), spec(2, 1)]).unwrap();

    for _ in 0..5 {
        sim.tick();
    }

    let fcfs: Vec<(Pid, Option<u64>)> = sim
        .engine(Discipline::Fcfs)
        .finished()
        .iter()
        .map(|p| (p.pid, p.finish_time))
        .collect();
    let sjn: Vec<(Pid, Option<u64>)> = sim
        .engine(Discipline::Sjn)
        .finished()
        .iter()
        .map(|p| (p.pid, p.finish_time))
        .collect();

    assert_eq!(fcfs, vec![(1, Some(3)), (2, Some(4))]);
    assert_eq!(sjn, vec![(2, Some(1)), (1, Some(4))]);

    let summary = sim.summary();
    let fcfs_wait = summary.disciplines[0].aggregate.unwrap().mean_waiting_time;
    let sjn_wait = summary.disciplines[1].aggregate.unwrap().mean_waiting_time;
    assert!(sjn_wait < fcfs_wait);
}

#[test]
fn test_preemptive_scenario_through_facade() {
    let sim = Simulation::new(&one_ms_ticks().with_preemptive(true));
    sim.reset_run(&[spec(1, 5)]).unwrap();
    for _ in 0..3 {
        sim.tick();
    }

    sim.enqueue_arrival(&ProcessSpec {
        arrival: sim.now(),
        ..spec(3, 1)
    })
    .unwrap();

    let sjn = sim.engine(Discipline::Sjn);
    assert!(sjn.running().is_none());
    assert_eq!(sim.engine(Discipline::Fcfs).running().unwrap().pid, 1);

    sim.tick();
    let [_, events] = sim.tick();
    assert_eq!(events.completed, Some(3));
    assert_eq!(sjn.running().unwrap().remaining, 3);
}

#[test]
fn test_rejects_duplicate_arrival() {
    let sim = Simulation::new(&one_ms_ticks());
    sim.reset_run(&[spec(1, 2), spec(2, 2)]).unwrap();

    assert_eq!(
        sim.enqueue_arrival(&spec(2, 4)),
        Err(SimError::DuplicatePid(2))
    );
    assert_eq!(
        sim.enqueue_arrival(&spec(3, 0)),
        Err(SimError::InvalidBurst { pid: 3, burst: 0 })
    );
    assert_eq!(sim.engine(Discipline::Sjn).len(), 2);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let a = Simulation::new(&one_ms_ticks());
    let b = Simulation::new(&one_ms_ticks());

    let first: Vec<ProcessSpec> = a.reset_random(6).iter().map(|p| p.spec()).collect();
    let second: Vec<ProcessSpec> = b.reset_random(6).iter().map(|p| p.spec()).collect();
    assert_eq!(first, second);
}

#[test]
fn test_reset_starts_new_run() {
    let sim = Simulation::new(&one_ms_ticks());
    sim.reset_random(3);
    let first = sim.run_id();
    for _ in 0..4 {
        sim.tick();
    }

    let processes = sim.reset_random(2);
    assert_ne!(sim.run_id(), first);
    assert_eq!(sim.now(), 0);
    assert!(processes.iter().all(|p| p.arrival() == 0));
    assert!(processes.iter().all(|p| p.pid() > 3));
    assert_eq!(sim.engine(Discipline::Fcfs).stats().ticks, 0);
}

#[test]
fn test_snapshot_json_round_trip() {
    let sim = Simulation::new(&one_ms_ticks());
    sim.reset_run(&[spec(1, 2), spec(2, 1)]).unwrap();
    sim.tick();

    let snapshot = sim.snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"discipline\":\"FCFS\""));
    assert!(json.contains("\"discipline\":\"SJN\""));

    let parsed: SimulationSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snapshot);
}

#[test]
fn test_config_from_lookup() {
    let config = SimulationConfig::from_lookup(|key| match key {
        "SIM_TICK_MS" => Some("250".to_string()),
        "SIM_INITIAL_PROCESSES" => Some("4".to_string()),
        "SIM_MAX_TICKS" => Some("12".to_string()),
        _ => None,
    })
    .unwrap();

    assert_eq!(config.tick_duration.as_millis(), 250);
    assert_eq!(config.initial_processes, 4);
    assert_eq!(config.max_ticks, Some(12));

    let err = SimulationConfig::from_lookup(|key| {
        (key == "SIM_TICK_MS").then(|| "120000".to_string())
    })
    .unwrap_err();
    assert_eq!(err, SimError::InvalidTickDuration(120_000));
}

#[tokio::test(start_paused = true)]
async fn test_driver_runs_both_engines() {
    let config = SimulationConfig {
        tick_duration: TickDuration::clamped(50),
        spawn_interval_ms: 200,
        ..SimulationConfig::new().with_seed(5).with_max_ticks(40)
    };
    let sim = Arc::new(Simulation::new(&config));
    sim.reset_random(4);

    let task = SimulationTask::spawn(sim.clone(), &config);
    task.finished().await;

    for engine in sim.engines() {
        assert_eq!(engine.stats().ticks, 40);
        assert_eq!(engine.now(), 2_000);
    }
    assert_eq!(
        sim.engine(Discipline::Fcfs).stats().enqueued,
        sim.engine(Discipline::Sjn).stats().enqueued
    );

    task.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_driver_stop_preserves_state() {
    let config = SimulationConfig {
        tick_duration: TickDuration::clamped(100),
        spawn_interval_ms: 0,
        ..SimulationConfig::new().with_seed(3)
    };
    let sim = Arc::new(Simulation::new(&config));
    sim.reset_run(&[spec(1, 9), spec(2, 9)]).unwrap();

    let task = SimulationTask::spawn(sim.clone(), &config);
    tokio::time::sleep(Duration::from_millis(350)).await;
    task.stop();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let paused = sim.snapshot();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(sim.snapshot(), paused);

    assert!(task.send(SimulationCommand::Start));
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(sim.now() > paused.now);

    task.shutdown().await;
}

#[test]
fn test_concurrent_ticks_and_arrivals_stay_consistent() {
    let sim = Simulation::new(&one_ms_ticks().with_preemptive(true));
    let initial: Vec<Pid> = sim.reset_random(5).iter().map(|p| p.pid()).collect();

    let spawned: Vec<Pid> = std::thread::scope(|scope| {
        let ticker = scope.spawn(|| {
            for _ in 0..200 {
                sim.tick();
            }
        });
        let spawners: Vec<_> = (0..3)
            .map(|_| {
                scope.spawn(|| {
                    (0..20)
                        .map(|_| sim.spawn_arrival().pid())
                        .collect::<Vec<Pid>>()
                })
            })
            .collect();

        let mut spawned = Vec::new();
        for handle in spawners {
            spawned.extend(handle.join().unwrap());
        }
        ticker.join().unwrap();
        spawned
    });

    let mut expected: Vec<Pid> = initial.into_iter().chain(spawned).collect();
    expected.sort_unstable();

    let snapshot = sim.snapshot();
    for engine in [&snapshot.fcfs, &snapshot.sjn] {
        let mut held: Vec<Pid> = engine.processes().map(|p| p.pid).collect();
        held.sort_unstable();
        assert_eq!(held, expected);
        assert_eq!(engine.now, snapshot.now);
        assert_eq!(engine.stats.ticks, 200);
    }

    assert_eq!(snapshot.fcfs.stats.enqueued, snapshot.sjn.stats.enqueued);
    assert_eq!(snapshot.fcfs.stats.enqueued, expected.len() as u64);
    assert_eq!(sim.now(), sim.engine(Discipline::Sjn).now());
}
