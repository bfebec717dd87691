// ============================================================================
// Engine Module
// Order-chain resolution and average price reporting
// ============================================================================

mod average_prices;
mod chain_tracker;

pub use average_prices::{
    average_prices, try_average_prices, AveragePriceProcessor, MessageError, ProcessError,
};
pub use chain_tracker::{ChainError, ChainUpdate, OrderChainTracker};
