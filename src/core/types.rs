/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type
pub type Pid = u32;

/// Logical timestamp in milliseconds since the start of a run
pub type Timestamp = u64;

/// CPU work measured in ticks
pub type Ticks = u32;

/// Common result type for simulator operations
pub type SimResult<T> = Result<T, super::errors::SimError>;
