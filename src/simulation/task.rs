/*!
 * Simulation Task
 * Background driver that paces ticks and arrivals in wall-clock time
 *
 * The engines own no timers. This task holds the tick interval and the
 * arrival interval and turns them into `Simulation::tick` and
 * `Simulation::spawn_arrival` calls. Stopping only stops delivery; engine
 * state is left as-is and `Start` resumes from where it was.
 *
 * # Shutdown
 *
 * Prefer `shutdown().await`, which asks the loop to exit and waits for it.
 * Dropping the handle without it aborts the task and logs a warning.
 */

use super::Simulation;
use crate::config::SimulationConfig;
use crate::monitoring::span_driver;
use crate::process::ProcessSpec;
use crate::scheduler::TickDuration;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Notify};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn, Instrument};

/// Control messages for the simulation task
#[derive(Debug, Clone)]
pub enum SimulationCommand {
    /// Resume periodic ticks and arrivals
    Start,
    /// Pause periodic ticks and arrivals
    Stop,
    /// Run a single tick while stopped
    Step,
    /// Change tick length and pacing
    SetTickDuration(TickDuration),
    /// Toggle SJN preemption
    SetPreemptive(bool),
    /// Fresh run from external specs
    Reset(Vec<ProcessSpec>),
    /// Fresh run of `n` generated processes
    ResetRandom(usize),
    /// Exit the loop
    Shutdown,
}

/// Handle to the simulation background task
pub struct SimulationTask {
    command_tx: mpsc::UnboundedSender<SimulationCommand>,
    handle: Option<tokio::task::JoinHandle<()>>,
    shutdown_initiated: Arc<AtomicBool>,
    ticks: Arc<AtomicU64>,
    finished: Arc<Notify>,
}

impl SimulationTask {
    /// Spawn the driver for `simulation` paced by `config`
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(simulation: Arc<Simulation>, config: &SimulationConfig) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let ticks = Arc::new(AtomicU64::new(0));
        let finished = Arc::new(Notify::new());

        let driver = Driver {
            simulation: simulation.clone(),
            spawn_interval: config.spawn_interval(),
            max_ticks: config.max_ticks,
            active: config.autostart,
            ticks: ticks.clone(),
            finished: finished.clone(),
        };

        let span = span_driver(&simulation.run_id());
        let handle = tokio::spawn(driver.run(command_rx).instrument(span));

        info!(
            tick_ms = config.tick_duration.as_millis(),
            spawn_ms = config.spawn_interval_ms,
            max_ticks = ?config.max_ticks,
            autostart = config.autostart,
            "Simulation task spawned"
        );

        Self {
            command_tx,
            handle: Some(handle),
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
            ticks,
            finished,
        }
    }

    /// Queue a command; false once the loop has exited
    pub fn send(&self, command: SimulationCommand) -> bool {
        self.command_tx.send(command).is_ok()
    }

    pub fn start(&self) {
        self.send(SimulationCommand::Start);
    }

    pub fn stop(&self) {
        self.send(SimulationCommand::Stop);
    }

    pub fn step(&self) {
        self.send(SimulationCommand::Step);
    }

    pub fn set_tick_duration(&self, tick_duration: TickDuration) {
        self.send(SimulationCommand::SetTickDuration(tick_duration));
    }

    pub fn set_preemptive(&self, enabled: bool) {
        self.send(SimulationCommand::SetPreemptive(enabled));
    }

    pub fn reset(&self, specs: Vec<ProcessSpec>) {
        self.send(SimulationCommand::Reset(specs));
    }

    pub fn reset_random(&self, count: usize) {
        self.send(SimulationCommand::ResetRandom(count));
    }

    /// Ticks driven since the last reset
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Resolves once the configured tick limit has been reached
    pub async fn finished(&self) {
        self.finished.notified().await;
    }

    /// Shutdown the task gracefully, waiting for the loop to exit
    pub async fn shutdown(mut self) {
        self.shutdown_initiated.store(true, Ordering::SeqCst);
        self.send(SimulationCommand::Shutdown);

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Simulation task shutdown error");
            } else {
                info!("Simulation task shutdown complete");
            }
        }
    }
}

impl Drop for SimulationTask {
    fn drop(&mut self) {
        if self.shutdown_initiated.load(Ordering::SeqCst) {
            return;
        }

        if let Some(handle) = self.handle.take() {
            warn!(
                "SimulationTask dropped without calling shutdown() - aborting task immediately. \
                 Use `task.shutdown().await` for graceful cleanup."
            );
            handle.abort();
        }
    }
}

/// Interval whose first tick fires one full period from now
fn paced(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

async fn next_arrival(spawner: &mut Option<Interval>) {
    match spawner {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Loop state owned by the background task
struct Driver {
    simulation: Arc<Simulation>,
    spawn_interval: Option<Duration>,
    max_ticks: Option<u64>,
    active: bool,
    ticks: Arc<AtomicU64>,
    finished: Arc<Notify>,
}

impl Driver {
    async fn run(mut self, mut command_rx: mpsc::UnboundedReceiver<SimulationCommand>) {
        let mut ticker = paced(self.simulation.tick_duration().as_duration());
        let mut spawner = self.spawn_interval.map(paced);

        info!(active = self.active, "Simulation loop started");

        loop {
            tokio::select! {
                _ = ticker.tick(), if self.active => {
                    self.advance();
                }

                _ = next_arrival(&mut spawner), if self.active => {
                    let process = self.simulation.spawn_arrival();
                    debug!(pid = process.pid(), burst = process.burst(), "Arrival spawned");
                }

                command = command_rx.recv() => {
                    let Some(command) = command else {
                        info!("Command channel closed, simulation loop exiting");
                        break;
                    };

                    match command {
                        SimulationCommand::Start => {
                            if !self.active {
                                self.active = true;
                                // Skip the backlog accumulated while stopped
                                ticker.reset();
                                if let Some(interval) = spawner.as_mut() {
                                    interval.reset();
                                }
                                info!("Simulation started");
                            }
                        }

                        SimulationCommand::Stop => {
                            if self.active {
                                self.active = false;
                                info!(ticks = self.ticks.load(Ordering::Relaxed), "Simulation stopped");
                            }
                        }

                        SimulationCommand::Step => {
                            if self.active {
                                debug!("Step ignored while running");
                            } else {
                                self.advance();
                            }
                        }

                        SimulationCommand::SetTickDuration(tick_duration) => {
                            self.simulation.set_tick_duration(tick_duration);
                            ticker = paced(tick_duration.as_duration());
                        }

                        SimulationCommand::SetPreemptive(enabled) => {
                            self.simulation.set_preemptive(enabled);
                        }

                        SimulationCommand::Reset(specs) => {
                            match self.simulation.reset_run(&specs) {
                                Ok(()) => self.ticks.store(0, Ordering::Relaxed),
                                Err(e) => warn!(error = %e, "Reset rejected"),
                            }
                        }

                        SimulationCommand::ResetRandom(count) => {
                            self.simulation.reset_random(count);
                            self.ticks.store(0, Ordering::Relaxed);
                        }

                        SimulationCommand::Shutdown => {
                            info!("Simulation task shutting down");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// One tick of both engines, pausing at the tick limit
    fn advance(&mut self) {
        self.simulation.tick();
        let ticks = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;

        if self.max_ticks.is_some_and(|limit| ticks >= limit) && self.active {
            self.active = false;
            info!(ticks, now = self.simulation.now(), "Tick limit reached");
            self.finished.notify_one();
        }
    }
}
