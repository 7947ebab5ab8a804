/*!
 * Core Module
 * Fundamental simulator types, logical clock and error handling
 */

pub mod clock;
pub mod errors;
pub mod id;
pub mod serde;
pub mod types;

// Re-export for convenience
pub use clock::{Clock, LogicalClock};
pub use errors::*;
pub use id::PidGenerator;
pub use types::*;
