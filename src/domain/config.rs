// ============================================================================
// Processor Configuration
// How message streams are validated, indexed and reported
// ============================================================================

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest number of decimals an average price may be reported with
pub const MAX_PRICE_DECIMALS: u32 = 10;

/// Default size of the superseded-id index
pub const DEFAULT_SUPERSEDED_CAPACITY: usize = 1 << 16;

/// Configuration validation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },

    #[error("{field} must be at most {max}, got {value}")]
    TooLarge {
        field: &'static str,
        max: u64,
        value: u64,
    },

    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

// ============================================================================
// Invalid Message Policy
// ============================================================================

/// What a processor does with a message that fails parsing or validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InvalidMessagePolicy {
    /// Abort processing and return the error with its line number
    Reject,
    /// Log the message, emit a rejection event and continue
    #[default]
    Skip,
}

// ============================================================================
// Processor Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcessorConfig {
    /// Handling of malformed or inconsistent messages
    pub invalid_message_policy: InvalidMessagePolicy,

    /// Decimal places of reported average prices
    pub price_decimals: u32,

    /// How many replaced order ids stay resolvable for late fills
    pub superseded_capacity: usize,
}

impl ProcessorConfig {
    pub fn new(invalid_message_policy: InvalidMessagePolicy) -> Self {
        Self {
            invalid_message_policy,
            price_decimals: 2,
            superseded_capacity: DEFAULT_SUPERSEDED_CAPACITY,
        }
    }

    /// Stop at the first bad message
    pub fn strict() -> Self {
        Self::new(InvalidMessagePolicy::Reject)
    }

    /// Skip bad messages and keep going
    pub fn lenient() -> Self {
        Self::new(InvalidMessagePolicy::Skip)
    }

    /// Builder method: Set reported price decimals
    pub fn with_price_decimals(mut self, decimals: u32) -> Self {
        self.price_decimals = decimals;
        self
    }

    /// Builder method: Set superseded-id index capacity
    pub fn with_superseded_capacity(mut self, capacity: usize) -> Self {
        self.superseded_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.price_decimals > MAX_PRICE_DECIMALS {
            return Err(ConfigError::TooLarge {
                field: "price_decimals",
                max: MAX_PRICE_DECIMALS as u64,
                value: self.price_decimals as u64,
            });
        }

        if self.superseded_capacity == 0 {
            return Err(ConfigError::NotPositive {
                field: "superseded_capacity",
            });
        }

        Ok(())
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self::lenient()
    }
}
