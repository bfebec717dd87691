// ============================================================================
// Exchange Message Domain Model
// Text messages announcing new orders, modifications and fills
// ============================================================================

use crate::numeric::{parse_price, parse_quantity, Price, Quantity};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Value Objects
// ============================================================================

/// Exchange-assigned order identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderId(u64);

impl OrderId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl FromStr for Side {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("buy") || s.eq_ignore_ascii_case("b") {
            Ok(Side::Buy)
        } else if s.eq_ignore_ascii_case("sell") || s.eq_ignore_ascii_case("s") {
            Ok(Side::Sell)
        } else {
            Err(ParseError::InvalidSide(s.to_string()))
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Reasons a text line is not a well-formed exchange message
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty message")]
    Empty,

    #[error("unknown message kind '{0}'")]
    UnknownKind(String),

    #[error("'{kind}' expects {expected} fields, found {found}")]
    WrongArity {
        kind: &'static str,
        expected: &'static str,
        found: usize,
    },

    #[error("invalid order id '{0}'")]
    InvalidOrderId(String),

    #[error("invalid side '{0}' (expected buy or sell)")]
    InvalidSide(String),

    #[error("invalid quantity '{0}'")]
    InvalidQuantity(String),

    #[error("invalid price '{0}'")]
    InvalidPrice(String),
}

// ============================================================================
// Messages
// ============================================================================

/// Opens an order chain
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NewOrder {
    pub order_id: OrderId,
    pub symbol: String,
    pub side: Side,
    pub quantity: Quantity,
    pub price: Price,
}

/// Replaces the latest order of a chain with a new id, quantity and price.
///
/// The long wire form repeats the symbol, which must then match the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModifyOrder {
    pub order_id: OrderId,
    pub prev_order_id: OrderId,
    pub symbol: Option<String>,
    pub quantity: Quantity,
    pub price: Price,
}

/// Execution against any order of a chain.
///
/// The long wire form also carries symbol and side, which must then agree
/// with the chain the order belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fill {
    pub order_id: OrderId,
    pub symbol: Option<String>,
    pub side: Option<Side>,
    pub quantity: Quantity,
    pub price: Price,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExchangeMessage {
    New(NewOrder),
    Modify(ModifyOrder),
    Fill(Fill),
}

impl ExchangeMessage {
    /// Parse one whitespace-separated message.
    ///
    /// ```
    /// use fill_analytics::domain::{ExchangeMessage, Side};
    ///
    /// let msg = ExchangeMessage::parse("new 1 AAPL buy 100 10.00").unwrap();
    /// match msg {
    ///     ExchangeMessage::New(order) => assert_eq!(order.side, Side::Buy),
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let tokens: SmallVec<[&str; 6]> = line.split_whitespace().collect();
        let (kind, args) = tokens.split_first().ok_or(ParseError::Empty)?;

        if kind.eq_ignore_ascii_case("new") {
            let [id, symbol, side, qty, px] = fields::<5>("new", "5", args)?;
            Ok(ExchangeMessage::New(NewOrder {
                order_id: parse_order_id(id)?,
                symbol: symbol.to_string(),
                side: side.parse()?,
                quantity: parse_qty(qty)?,
                price: parse_px(px)?,
            }))
        } else if kind.eq_ignore_ascii_case("modify") {
            let (id, prev, symbol, qty, px) = match args {
                [id, prev, qty, px] => (id, prev, None, qty, px),
                [id, prev, symbol, qty, px] => (id, prev, Some(symbol.to_string()), qty, px),
                _ => {
                    return Err(ParseError::WrongArity {
                        kind: "modify",
                        expected: "4 or 5",
                        found: args.len(),
                    })
                },
            };
            Ok(ExchangeMessage::Modify(ModifyOrder {
                order_id: parse_order_id(id)?,
                prev_order_id: parse_order_id(prev)?,
                symbol,
                quantity: parse_qty(qty)?,
                price: parse_px(px)?,
            }))
        } else if kind.eq_ignore_ascii_case("fill") {
            match args {
                [id, qty, px] => Ok(ExchangeMessage::Fill(Fill {
                    order_id: parse_order_id(id)?,
                    symbol: None,
                    side: None,
                    quantity: parse_qty(qty)?,
                    price: parse_px(px)?,
                })),
                [id, symbol, side, qty, px] => Ok(ExchangeMessage::Fill(Fill {
                    order_id: parse_order_id(id)?,
                    symbol: Some(symbol.to_string()),
                    side: Some(side.parse()?),
                    quantity: parse_qty(qty)?,
                    price: parse_px(px)?,
                })),
                _ => Err(ParseError::WrongArity {
                    kind: "fill",
                    expected: "3 or 5",
                    found: args.len(),
                }),
            }
        } else {
            Err(ParseError::UnknownKind(kind.to_string()))
        }
    }

    /// The order id this message carries
    pub fn order_id(&self) -> OrderId {
        match self {
            ExchangeMessage::New(m) => m.order_id,
            ExchangeMessage::Modify(m) => m.order_id,
            ExchangeMessage::Fill(m) => m.order_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ExchangeMessage::New(_) => "new",
            ExchangeMessage::Modify(_) => "modify",
            ExchangeMessage::Fill(_) => "fill",
        }
    }
}

impl FromStr for ExchangeMessage {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ExchangeMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeMessage::New(m) => write!(
                f,
                "new {} {} {} {} {}",
                m.order_id, m.symbol, m.side, m.quantity, m.price
            ),
            ExchangeMessage::Modify(m) => match &m.symbol {
                Some(symbol) => write!(
                    f,
                    "modify {} {} {} {} {}",
                    m.order_id, m.prev_order_id, symbol, m.quantity, m.price
                ),
                None => write!(
                    f,
                    "modify {} {} {} {}",
                    m.order_id, m.prev_order_id, m.quantity, m.price
                ),
            },
            ExchangeMessage::Fill(m) => match (&m.symbol, m.side) {
                (Some(symbol), Some(side)) => write!(
                    f,
                    "fill {} {} {} {} {}",
                    m.order_id, symbol, side, m.quantity, m.price
                ),
                _ => write!(f, "fill {} {} {}", m.order_id, m.quantity, m.price),
            },
        }
    }
}

// ============================================================================
// Field helpers
// ============================================================================

fn fields<'a, const N: usize>(
    kind: &'static str,
    expected: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; N], ParseError> {
    <[&str; N]>::try_from(args).map_err(|_| ParseError::WrongArity {
        kind,
        expected,
        found: args.len(),
    })
}

fn parse_order_id(s: &str) -> Result<OrderId, ParseError> {
    s.parse::<u64>()
        .map(OrderId)
        .map_err(|_| ParseError::InvalidOrderId(s.to_string()))
}

fn parse_qty(s: &str) -> Result<Quantity, ParseError> {
    parse_quantity(s).map_err(|_| ParseError::InvalidQuantity(s.to_string()))
}

fn parse_px(s: &str) -> Result<Price, ParseError> {
    parse_price(s).map_err(|_| ParseError::InvalidPrice(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_parse_new() {
        let msg = ExchangeMessage::parse("new 1 AAPL buy 100 10.00").unwrap();
        assert_eq!(
            msg,
            ExchangeMessage::New(NewOrder {
                order_id: OrderId::new(1),
                symbol: "AAPL".to_string(),
                side: Side::Buy,
                quantity: 100,
                price: Decimal::new(1000, 2),
            })
        );
    }

    #[test]
    fn test_parse_tolerates_whitespace_and_case() {
        let msg = ExchangeMessage::parse("  MODIFY\t2   1  60 10.5 \n").unwrap();
        assert_eq!(msg.kind(), "modify");
        assert_eq!(msg.order_id(), OrderId::new(2));
    }

    #[test]
    fn test_parse_fill_forms() {
        let short = ExchangeMessage::parse("fill 2 60 10.25").unwrap();
        let long = ExchangeMessage::parse("fill 2 AAPL S 60 10.25").unwrap();

        match (short, long) {
            (ExchangeMessage::Fill(s), ExchangeMessage::Fill(l)) => {
                assert_eq!(s.symbol, None);
                assert_eq!(l.symbol.as_deref(), Some("AAPL"));
                assert_eq!(l.side, Some(Side::Sell));
                assert_eq!(s.quantity, l.quantity);
                assert_eq!(s.price, l.price);
            },
            other => panic!("unexpected messages: {:?}", other),
        }
    }

    #[test]
    fn test_parse_modify_forms() {
        let short = ExchangeMessage::parse("modify 2 1 60 10.50").unwrap();
        let long = ExchangeMessage::parse("modify 2 1 AAPL 60 10.50").unwrap();

        match (short, long) {
            (ExchangeMessage::Modify(s), ExchangeMessage::Modify(l)) => {
                assert_eq!(s.symbol, None);
                assert_eq!(l.symbol.as_deref(), Some("AAPL"));
                assert_eq!(l.prev_order_id, OrderId::new(1));
                assert_eq!(l.quantity, 60);
                assert_eq!(l.price, Decimal::new(1050, 2));
                assert_eq!((s.order_id, s.quantity, s.price), (l.order_id, l.quantity, l.price));
            },
            other => panic!("unexpected messages: {:?}", other),
        }

        assert_eq!(
            ExchangeMessage::parse("modify 2 1 AAPL buy 60 10.50"),
            Err(ParseError::WrongArity {
                kind: "modify",
                expected: "4 or 5",
                found: 6
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(ExchangeMessage::parse("   "), Err(ParseError::Empty));
        assert_eq!(
            ExchangeMessage::parse("cancel 1"),
            Err(ParseError::UnknownKind("cancel".to_string()))
        );
        assert_eq!(
            ExchangeMessage::parse("new 1 AAPL buy 100"),
            Err(ParseError::WrongArity {
                kind: "new",
                expected: "5",
                found: 4
            })
        );
        assert_eq!(
            ExchangeMessage::parse("fill 1 2 3 4"),
            Err(ParseError::WrongArity {
                kind: "fill",
                expected: "3 or 5",
                found: 4
            })
        );
        assert_eq!(
            ExchangeMessage::parse("new x AAPL buy 100 1"),
            Err(ParseError::InvalidOrderId("x".to_string()))
        );
        assert_eq!(
            ExchangeMessage::parse("new 1 AAPL hold 100 1"),
            Err(ParseError::InvalidSide("hold".to_string()))
        );
        assert_eq!(
            ExchangeMessage::parse("new 1 AAPL buy -3 1"),
            Err(ParseError::InvalidQuantity("-3".to_string()))
        );
        assert_eq!(
            ExchangeMessage::parse("modify 2 1 10 abc"),
            Err(ParseError::InvalidPrice("abc".to_string()))
        );
    }

    #[test]
    fn test_display_is_canonical() {
        for line in [
            "new 7 MSFT sell 25 301.5",
            "modify 8 7 20 301.25",
            "modify 8 7 MSFT 20 301.25",
            "fill 8 5 301.25",
            "fill 8 MSFT sell 5 301.25",
        ] {
            let msg: ExchangeMessage = line.parse().unwrap();
            assert_eq!(msg.to_string(), line);
            assert_eq!(msg.to_string().parse::<ExchangeMessage>().unwrap(), msg);
        }
    }

    #[test]
    fn test_side_parsing() {
        assert_eq!("B".parse::<Side>().unwrap(), Side::Buy);
        assert_eq!("SELL".parse::<Side>().unwrap(), Side::Sell);
        assert_eq!(Side::Sell.to_string(), "sell");
    }
}
