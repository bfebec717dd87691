// ============================================================================
// Order Chain Views
// Read-only snapshots of a chain and its reported average price
// ============================================================================

use super::{OrderId, Side};
use crate::numeric::{Price, Quantity};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Snapshot of one order chain
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChainSummary {
    /// Id of the `new` message that opened the chain
    pub root: OrderId,

    /// Id of the latest order version
    pub current: OrderId,

    pub symbol: String,
    pub side: Side,

    /// Limit price of the latest order version
    pub limit_price: Price,

    /// Quantity still working on the latest order version
    pub open_quantity: Quantity,

    /// Sum of all fills on the chain
    pub filled_quantity: Quantity,

    pub fill_count: usize,

    /// Unrounded volume-weighted fill price, `None` before the first fill
    pub average_price: Option<Price>,

    /// Open quantity reached zero
    pub complete: bool,
}

/// One reported chain: `"<root_order_id> <symbol> <average_price>"`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AveragePriceLine {
    pub root: OrderId,
    pub symbol: String,
    pub side: Side,
    pub filled_quantity: Quantity,
    /// Rounded to the configured number of decimals
    pub average_price: Price,
}

impl fmt::Display for AveragePriceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.root, self.symbol, self.average_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_line_display() {
        let line = AveragePriceLine {
            root: OrderId::new(1),
            symbol: "AAPL".to_string(),
            side: Side::Buy,
            filled_quantity: 100,
            average_price: Decimal::new(1015, 2),
        };

        assert_eq!(line.to_string(), "1 AAPL 10.15");
    }
}
