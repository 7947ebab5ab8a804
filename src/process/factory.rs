/*!
 * Process Factory
 * Randomized process generation for the initial population and arrivals
 */

use super::types::{Process, ProcessSpec};
use crate::core::clock::{Clock, LogicalClock};
use crate::core::id::PidGenerator;
use crate::core::types::{Pid, Ticks};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Display labels a generated process is named after
pub const PROCESS_NAMES: [&str; 15] = [
    "Init", "System", "Chrome", "VSCode", "Explorer", "Discord", "Spotify", "Terminal",
    "Compiler", "Kernel", "Daemon", "Worker", "Backup", "Updater", "Logger",
];

/// Burst bounds (inclusive)
pub const MIN_BURST: Ticks = 2;
pub const MAX_BURST: Ticks = 9;

/// Display width per tick of burst
pub const SIZE_FACTOR: u32 = 30;

/// Produces processes with fresh ids stamped at the current logical time
///
/// Owns the run's id counter; ids are never reused while the factory lives.
pub struct ProcessFactory<C: Clock = LogicalClock> {
    ids: PidGenerator,
    clock: C,
    rng: Mutex<StdRng>,
}

impl<C: Clock> ProcessFactory<C> {
    /// Create factory seeded from OS entropy
    pub fn new(clock: C) -> Self {
        Self::with_rng(clock, StdRng::from_entropy())
    }

    /// Create factory with a fixed seed for reproducible runs
    pub fn with_seed(clock: C, seed: u64) -> Self {
        Self::with_rng(clock, StdRng::seed_from_u64(seed))
    }

    fn with_rng(clock: C, rng: StdRng) -> Self {
        Self {
            ids: PidGenerator::default(),
            clock,
            rng: Mutex::new(rng),
        }
    }

    /// Generate one random process arriving now
    pub fn create_random(&self) -> Process {
        let pid = self.ids.next();
        let (label, burst, hue) = {
            let mut rng = self.rng.lock();
            let label = PROCESS_NAMES[rng.gen_range(0..PROCESS_NAMES.len())];
            let burst = rng.gen_range(MIN_BURST..=MAX_BURST);
            let hue = rng.gen_range(0..360u16);
            (label, burst, hue)
        };

        let spec = ProcessSpec {
            id: pid,
            name: format!("{}-{}", label, pid),
            burst,
            arrival: self.clock.now(),
            size: burst * SIZE_FACTOR,
            color: format!("hsl({}, 70%, 60%)", hue),
        };

        debug!(pid, burst, arrival = spec.arrival, "Process created");
        Process::fresh(spec)
    }

    /// Generate `count` processes in id order
    pub fn create_batch(&self, count: usize) -> Vec<Process> {
        (0..count).map(|_| self.create_random()).collect()
    }

    /// Keep future ids clear of an externally supplied one
    pub fn observe(&self, pid: Pid) {
        self.ids.observe(pid);
    }

    /// Id the next generated process will get
    pub fn next_pid(&self) -> Pid {
        self.ids.peek()
    }
}
