// ============================================================================
// VWAP Accumulator
// Running volume-weighted average price over a set of fills
// ============================================================================

use crate::numeric::{notional, NumericError, NumericResult, Price, Quantity};
use rust_decimal::Decimal;

/// Σ(price × quantity) / Σ(quantity), accumulated with checked decimal math.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VwapAccumulator {
    cumulative_pq: Decimal,
    cumulative_q: Quantity,
    count: usize,
    min_price: Option<Price>,
    max_price: Option<Price>,
}

impl VwapAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one execution. Zero quantities carry no weight and are ignored.
    ///
    /// # Errors
    /// Returns `Overflow` if the running notional or volume leaves the
    /// representable range. The accumulator is unchanged in that case.
    pub fn add(&mut self, price: Price, quantity: Quantity) -> NumericResult<()> {
        if quantity == 0 {
            return Ok(());
        }

        let pq = self
            .cumulative_pq
            .checked_add(notional(price, quantity)?)
            .ok_or(NumericError::Overflow)?;
        let q = self
            .cumulative_q
            .checked_add(quantity)
            .ok_or(NumericError::Overflow)?;

        self.cumulative_pq = pq;
        self.cumulative_q = q;
        self.count += 1;
        self.min_price = Some(self.min_price.map_or(price, |p| p.min(price)));
        self.max_price = Some(self.max_price.map_or(price, |p| p.max(price)));
        Ok(())
    }

    /// Unrounded VWAP, `None` until some volume was added
    pub fn vwap(&self) -> Option<Price> {
        if self.cumulative_q == 0 {
            return None;
        }
        self.cumulative_pq
            .checked_div(Decimal::from(self.cumulative_q))
    }

    pub fn total_quantity(&self) -> Quantity {
        self.cumulative_q
    }

    pub fn notional(&self) -> Decimal {
        self.cumulative_pq
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn min_price(&self) -> Option<Price> {
        self.min_price
    }

    pub fn max_price(&self) -> Option<Price> {
        self.max_price
    }
}
