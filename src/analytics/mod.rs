// ============================================================================
// Analytics Module
// Execution benchmark calculators (measurement only)
// ============================================================================

mod twap;
mod vwap;

pub use twap::{TwapAccumulator, TwapError};
pub use vwap::VwapAccumulator;
