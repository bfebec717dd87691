// ============================================================================
// TWAP Accumulator
// Time-weighted average of a step price series
// ============================================================================

use crate::numeric::{NumericError, Price};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TwapError {
    #[error("sample at {got} precedes previous sample at {previous}")]
    OutOfOrder {
        previous: DateTime<Utc>,
        got: DateTime<Utc>,
    },

    #[error(transparent)]
    Numeric(#[from] NumericError),
}

/// Time-weighted average price.
///
/// Each sample's price stays in force until the next sample. Weights are
/// measured in milliseconds.
#[derive(Debug, Clone, Default)]
pub struct TwapAccumulator {
    samples: Vec<(DateTime<Utc>, Price)>,
}

impl TwapAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a price observed at `at`. Times must not go backwards.
    pub fn add(&mut self, at: DateTime<Utc>, price: Price) -> Result<(), TwapError> {
        if let Some(&(previous, _)) = self.samples.last() {
            if at < previous {
                return Err(TwapError::OutOfOrder { previous, got: at });
            }
        }
        self.samples.push((at, price));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// TWAP over `[first sample, end)`.
    ///
    /// Returns `Ok(None)` when no sample precedes `end`. If the in-force
    /// window has zero length the last price in force is returned.
    pub fn twap_until(&self, end: DateTime<Utc>) -> Result<Option<Price>, TwapError> {
        let in_force: Vec<_> = self.samples.iter().filter(|(at, _)| *at < end).collect();
        let Some(&&(_, last_price)) = in_force.last() else {
            return Ok(None);
        };

        let mut weighted = Decimal::ZERO;
        let mut total_ms: i64 = 0;
        for (i, &&(at, price)) in in_force.iter().enumerate() {
            let until = in_force.get(i + 1).map_or(end, |next| next.0);
            let ms = (until - at).num_milliseconds();
            if ms == 0 {
                continue;
            }
            let term = price
                .checked_mul(Decimal::from(ms))
                .ok_or(NumericError::Overflow)?;
            weighted = weighted.checked_add(term).ok_or(NumericError::Overflow)?;
            total_ms = total_ms.checked_add(ms).ok_or(NumericError::Overflow)?;
        }

        if total_ms == 0 {
            return Ok(Some(last_price));
        }
        weighted
            .checked_div(Decimal::from(total_ms))
            .map(Some)
            .ok_or(TwapError::Numeric(NumericError::DivisionByZero))
    }
}
