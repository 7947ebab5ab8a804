/*!
 * Process Module
 * Process entities and the factory that creates them
 */

pub mod factory;
pub mod types;

// Re-export for convenience
pub use factory::{ProcessFactory, MAX_BURST, MIN_BURST, PROCESS_NAMES, SIZE_FACTOR};
pub use types::{Process, ProcessSpec, ProcessState, ProcessView};
