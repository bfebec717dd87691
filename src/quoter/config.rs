// ============================================================================
// Quoter Configuration
// ============================================================================

use crate::domain::ConfigError;
use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuoterConfig {
    /// Exchange identifier of the instrument
    pub feedcode: String,

    /// Minimum distance of a quote from the theoretical price
    pub quote_offset: Price,

    /// Volume of every quote
    pub quote_volume: Quantity,

    /// Price grid of the instrument
    pub tick_width: Price,
}

impl QuoterConfig {
    pub fn new(
        feedcode: impl Into<String>,
        quote_offset: Price,
        quote_volume: Quantity,
        tick_width: Price,
    ) -> Self {
        Self {
            feedcode: feedcode.into(),
            quote_offset,
            quote_volume,
            tick_width,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feedcode.is_empty() {
            return Err(ConfigError::Empty { field: "feedcode" });
        }
        if self.tick_width <= Decimal::ZERO {
            return Err(ConfigError::NotPositive { field: "tick_width" });
        }
        if self.quote_offset <= Decimal::ZERO {
            return Err(ConfigError::NotPositive {
                field: "quote_offset",
            });
        }
        if self.quote_volume == 0 {
            return Err(ConfigError::NotPositive {
                field: "quote_volume",
            });
        }
        Ok(())
    }
}
