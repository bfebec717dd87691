// ============================================================================
// Quoter Module
// Two-sided quoting around a theoretical price for one instrument
// ============================================================================

mod config;
mod instrument_quoter;

pub use config::QuoterConfig;
pub use instrument_quoter::{InstrumentQuoter, Quote, QuoteStatus};
