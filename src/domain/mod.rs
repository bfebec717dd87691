// ============================================================================
// Domain Models Module
// Contains exchange messages, chain summaries and configuration
// ============================================================================

pub mod chain;
pub mod config;
pub mod message;

pub use chain::{AveragePriceLine, ChainSummary};
pub use config::{ConfigError, InvalidMessagePolicy, ProcessorConfig};
pub use message::{ExchangeMessage, Fill, ModifyOrder, NewOrder, OrderId, ParseError, Side};
