// ============================================================================
// Numeric Module
// Decimal price arithmetic for order-chain analytics
// ============================================================================
//
// This module provides:
// - Price/Quantity type aliases used across the crate
// - Checked parsing of message fields into prices and quantities
// - Rounding helpers (fixed decimals, tick grid)
// - NumericError: Error types for arithmetic operations
//
// Design principles:
// - No floating-point operations on prices
// - All arithmetic returns Result (no panics)

mod errors;
mod price;

pub use errors::{NumericError, NumericResult};
pub use price::{
    notional, parse_price, parse_quantity, round_price, round_to_tick, round_to_tick_with, Price,
    Quantity,
};
