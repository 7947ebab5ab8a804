/*!
 * Scheduling Simulator - Main Entry Point
 *
 * Runs FCFS and SJN side by side on the same randomly generated workload:
 * - Configuration from SIM_* environment variables
 * - Periodic progress logging
 * - Stops on Ctrl+C or after SIM_MAX_TICKS ticks
 * - Prints per-discipline aggregate metrics as JSON
 */

use miette::IntoDiagnostic;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use sched_sim::{init_tracing, Simulation, SimulationConfig, SimulationTask};

/// How often the main loop logs a progress line
const PROGRESS_INTERVAL: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> miette::Result<()> {
    init_tracing();

    let config = SimulationConfig::from_env()?;
    info!(
        tick_ms = config.tick_duration.as_millis(),
        spawn_ms = config.spawn_interval_ms,
        initial = config.initial_processes,
        preemptive = config.preemptive,
        "Scheduling simulator starting"
    );

    let simulation = Arc::new(Simulation::new(&config));
    simulation.reset_random(config.initial_processes);

    let task = SimulationTask::spawn(simulation.clone(), &config);
    info!(run_id = %simulation.run_id(), "Simulation running - press Ctrl+C to exit");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut progress = tokio::time::interval(PROGRESS_INTERVAL);
    progress.tick().await;

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                result.into_diagnostic()?;
                info!("Interrupt received");
                break;
            }

            _ = task.finished() => {
                break;
            }

            _ = progress.tick() => {
                for engine in simulation.engines() {
                    let stats = engine.stats();
                    info!(
                        discipline = %engine.discipline(),
                        now = engine.now(),
                        pending = engine.len(),
                        idle = engine.is_idle(),
                        completions = stats.completions,
                        preemptions = stats.preemptions,
                        "Progress"
                    );
                }
            }
        }
    }

    task.shutdown().await;

    let summary = simulation.summary();
    for discipline in &summary.disciplines {
        if discipline.aggregate.is_none() {
            info!(discipline = %discipline.discipline, "No data: nothing finished");
        }
    }

    let report = serde_json::to_string_pretty(&summary).into_diagnostic()?;
    println!("{}", report);

    Ok(())
}
