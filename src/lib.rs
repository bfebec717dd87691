// ============================================================================
// Fill Analytics Library
// Order-chain resolution and execution price analytics for exchange messages
// ============================================================================

//! # Fill Analytics
//!
//! Reconstructs order chains (`new` → `modify` → `fill`) from a stream of
//! exchange messages and reports the volume-weighted average fill price of
//! every chain, keyed by the id of the order that opened it.
//!
//! ## Features
//!
//! - **Exact decimal arithmetic** on prices via `rust_decimal`
//! - **Chain tracking** across modifies with stale and duplicate id detection
//! - **Bounded memory** for superseded ids through an O(1) LRU cache
//! - **VWAP/TWAP accumulators** usable on their own
//! - **Two-sided instrument quoter** behind an `Execution` trait
//! - **Paced replay** of message streams at a fixed rate
//!
//! ## Example
//!
//! ```rust
//! use fill_analytics::prelude::*;
//! use std::sync::Arc;
//!
//! let mut processor =
//!     AveragePriceProcessor::new(ProcessorConfig::strict(), Arc::new(NoOpEventHandler)).unwrap();
//!
//! processor
//!     .process_lines([
//!         "new 1 AAPL buy 100 10.00",
//!         "fill 1 40 10.00",
//!         "modify 2 1 60 10.50",
//!         "fill 2 60 10.25",
//!     ])
//!     .unwrap();
//!
//! let report = processor.report();
//! assert_eq!(report[0].to_string(), "1 AAPL 10.15");
//! ```

pub mod analytics;
pub mod domain;
pub mod engine;
pub mod interfaces;
pub mod numeric;
pub mod quoter;
pub mod utils;

pub use engine::{average_prices, try_average_prices};

// Re-exports for convenience
pub mod prelude {
    pub use crate::analytics::{TwapAccumulator, VwapAccumulator};
    pub use crate::domain::{
        AveragePriceLine, ChainSummary, ExchangeMessage, InvalidMessagePolicy, OrderId,
        ProcessorConfig, Side,
    };
    pub use crate::engine::{
        average_prices, try_average_prices, AveragePriceProcessor, ChainError, OrderChainTracker,
        ProcessError,
    };
    pub use crate::interfaces::{
        ChainEvent, EventHandler, Execution, LoggingEventHandler, NoOpEventHandler,
    };
    pub use crate::numeric::{Price, Quantity};
    pub use crate::quoter::{InstrumentQuoter, QuoterConfig};
    pub use crate::utils::{LruCache, PacingConfig, TimedTaskProcessor};
}
