// ============================================================================
// Price and Quantity Helpers
// Parsing, rounding and notional calculation on rust_decimal
// ============================================================================

use super::errors::{NumericError, NumericResult};
use rust_decimal::{Decimal, RoundingStrategy};

/// Price as an exact decimal (never a float)
pub type Price = Decimal;

/// Quantity in whole units
pub type Quantity = u64;

/// Parse a decimal price literal such as `"10.25"`.
///
/// # Errors
/// Returns `InvalidInput` for empty or non-numeric input.
pub fn parse_price(s: &str) -> NumericResult<Price> {
    let s = s.trim();
    if s.is_empty() {
        return Err(NumericError::InvalidInput);
    }
    s.parse::<Decimal>().map_err(|_| NumericError::InvalidInput)
}

/// Parse an unsigned whole quantity.
///
/// # Errors
/// - `InvalidInput` for empty, signed or non-numeric input
/// - `Overflow` if the value does not fit in a `u64`
pub fn parse_quantity(s: &str) -> NumericResult<Quantity> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NumericError::InvalidInput);
    }
    s.parse::<u64>().map_err(|_| NumericError::Overflow)
}

/// Checked `price × quantity`.
#[inline]
pub fn notional(price: Price, quantity: Quantity) -> NumericResult<Decimal> {
    price
        .checked_mul(Decimal::from(quantity))
        .ok_or(NumericError::Overflow)
}

/// Round half away from zero to exactly `decimals` places.
///
/// The result always carries `decimals` as its scale, so `Display` prints
/// that many fractional digits (`10.1` with 2 decimals prints `10.10`).
pub fn round_price(price: Price, decimals: u32) -> Price {
    let mut rounded = price.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimals);
    rounded
}

/// Snap a price to the nearest multiple of `tick` (half away from zero).
///
/// # Errors
/// - `InvalidInput` if `tick` is not positive
/// - `Overflow` if the snapped value is out of range
pub fn round_to_tick(price: Price, tick: Price) -> NumericResult<Price> {
    round_to_tick_with(price, tick, RoundingStrategy::MidpointAwayFromZero)
}

/// Snap a price onto the `tick` grid using an explicit rounding strategy,
/// e.g. `ToNegativeInfinity` to never round a bid up.
pub fn round_to_tick_with(
    price: Price,
    tick: Price,
    strategy: RoundingStrategy,
) -> NumericResult<Price> {
    if tick <= Decimal::ZERO {
        return Err(NumericError::InvalidInput);
    }
    let ticks = price
        .checked_div(tick)
        .ok_or(NumericError::Overflow)?
        .round_dp_with_strategy(0, strategy);
    ticks.checked_mul(tick).ok_or(NumericError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("10.25").unwrap(), Decimal::new(1025, 2));
        assert_eq!(parse_price(" 42 ").unwrap(), Decimal::from(42));
        assert_eq!(parse_price("-0.5").unwrap(), Decimal::new(-5, 1));
    }

    #[test]
    fn test_parse_price_invalid() {
        assert_eq!(parse_price(""), Err(NumericError::InvalidInput));
        assert_eq!(parse_price("ten"), Err(NumericError::InvalidInput));
        assert_eq!(parse_price("1.2.3"), Err(NumericError::InvalidInput));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("100").unwrap(), 100);
        assert_eq!(parse_quantity("0").unwrap(), 0);
        assert_eq!(parse_quantity("-5"), Err(NumericError::InvalidInput));
        assert_eq!(parse_quantity("1.5"), Err(NumericError::InvalidInput));
        assert_eq!(
            parse_quantity("99999999999999999999999"),
            Err(NumericError::Overflow)
        );
    }

    #[test]
    fn test_notional() {
        let n = notional(Decimal::new(1025, 2), 60).unwrap();
        assert_eq!(n, Decimal::from(615));

        assert_eq!(notional(Decimal::MAX, 2), Err(NumericError::Overflow));
    }

    #[test]
    fn test_round_price() {
        assert_eq!(round_price(Decimal::new(10145, 3), 2).to_string(), "10.15");
        assert_eq!(round_price(Decimal::new(-10145, 3), 2).to_string(), "-10.15");
        assert_eq!(round_price(Decimal::new(101, 1), 2).to_string(), "10.10");
        assert_eq!(round_price(Decimal::from(7), 0).to_string(), "7");
    }

    #[test]
    fn test_round_to_tick() {
        let tick = Decimal::new(5, 2); // 0.05
        assert_eq!(
            round_to_tick(Decimal::new(10012, 3), tick).unwrap(),
            Decimal::new(1000, 2)
        );
        assert_eq!(
            round_to_tick(Decimal::new(10025, 3), tick).unwrap(),
            Decimal::new(1005, 2)
        );
        assert_eq!(
            round_to_tick(Decimal::ONE, Decimal::ZERO),
            Err(NumericError::InvalidInput)
        );
    }

    #[test]
    fn test_round_to_tick_directional() {
        let tick = Decimal::new(25, 2); // 0.25
        let px = Decimal::new(9920, 2); // 99.20
        assert_eq!(
            round_to_tick_with(px, tick, RoundingStrategy::ToNegativeInfinity).unwrap(),
            Decimal::new(9900, 2)
        );
        assert_eq!(
            round_to_tick_with(px, tick, RoundingStrategy::ToPositiveInfinity).unwrap(),
            Decimal::new(9925, 2)
        );
    }
}
