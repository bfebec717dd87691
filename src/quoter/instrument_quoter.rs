// ============================================================================
// Instrument Quoter
// Keeps one bid and one offer working around a theoretical price
// ============================================================================

use super::QuoterConfig;
use crate::domain::{ConfigError, Side};
use crate::interfaces::Execution;
use crate::numeric::{round_to_tick_with, Price, Quantity};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStatus {
    /// Add requested, not yet confirmed by the exchange
    Pending,
    /// Confirmed by the exchange
    Live,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub id: u32,
    pub side: Side,
    pub price: Price,
    pub volume: Quantity,
    pub status: QuoteStatus,
}

/// Quoting state machine for a single instrument.
///
/// On every market update, live quotes that sit closer to the theoretical
/// price than `quote_offset` or that would cross the exchange's best bid or
/// offer are pulled. Then any side without a quote gets a fresh one. Pending
/// quotes are never pulled, and a side holds at most one quote at a time.
///
/// Bids are rounded down and offers up onto the tick grid, so a new quote
/// always honours the offset.
pub struct InstrumentQuoter {
    config: QuoterConfig,
    execution: Arc<dyn Execution>,
    theoretical_price: Price,
    exchange_bid: Price,
    exchange_ask: Price,
    next_quote_id: u32,
    quotes: BTreeMap<u32, Quote>,
}

impl InstrumentQuoter {
    pub fn new(config: QuoterConfig, execution: Arc<dyn Execution>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            execution,
            theoretical_price: Decimal::ZERO,
            exchange_bid: Decimal::ZERO,
            exchange_ask: Decimal::ZERO,
            next_quote_id: 1,
            quotes: BTreeMap::new(),
        })
    }

    // ========================================================================
    // Market and exchange callbacks
    // ========================================================================

    pub fn on_theoretical_price(&mut self, theoretical_price: Price) {
        self.theoretical_price = theoretical_price;
        self.process_market_update();
    }

    /// Exchange best bid/offer. A zero price means that side is empty.
    pub fn on_best_bid_offer(&mut self, bid: Price, ask: Price) {
        self.exchange_bid = bid;
        self.exchange_ask = ask;
        self.process_market_update();
    }

    pub fn on_order_add_confirm(&mut self, id: u32) {
        if let Some(quote) = self.quotes.get_mut(&id) {
            quote.status = QuoteStatus::Live;
        }
    }

    pub fn on_order_remove_confirm(&mut self, id: u32) {
        // Pulled quotes are dropped when the remove is requested
        self.quotes.remove(&id);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Working quotes ordered by id
    pub fn quotes(&self) -> Vec<Quote> {
        self.quotes.values().cloned().collect()
    }

    pub fn quote_on(&self, side: Side) -> Option<&Quote> {
        self.quotes.values().find(|q| q.side == side)
    }

    pub fn theoretical_price(&self) -> Price {
        self.theoretical_price
    }

    pub fn config(&self) -> &QuoterConfig {
        &self.config
    }

    // ========================================================================
    // Private methods
    // ========================================================================

    fn process_market_update(&mut self) {
        let stale: Vec<u32> = self
            .quotes
            .values()
            .filter(|q| q.status == QuoteStatus::Live && !self.is_acceptable(q))
            .map(|q| q.id)
            .collect();

        for id in stale {
            self.quotes.remove(&id);
            self.execution.request_order_remove(id);
            tracing::debug!(id, feedcode = %self.config.feedcode, "quote pulled");
        }

        if self.theoretical_price > Decimal::ZERO {
            for side in [Side::Buy, Side::Sell] {
                if self.quote_on(side).is_none() {
                    self.send_quote(side);
                }
            }
        }
    }

    fn is_acceptable(&self, quote: &Quote) -> bool {
        self.has_valid_offset(quote) && !self.crosses_exchange(quote)
    }

    fn has_valid_offset(&self, quote: &Quote) -> bool {
        let distance = match quote.side {
            Side::Buy => self.theoretical_price - quote.price,
            Side::Sell => quote.price - self.theoretical_price,
        };
        distance >= self.config.quote_offset
    }

    fn crosses_exchange(&self, quote: &Quote) -> bool {
        match quote.side {
            Side::Buy => self.exchange_ask > Decimal::ZERO && quote.price >= self.exchange_ask,
            Side::Sell => self.exchange_bid > Decimal::ZERO && quote.price <= self.exchange_bid,
        }
    }

    fn quote_price(&self, side: Side) -> Option<Price> {
        let tick = self.config.tick_width;
        let offset = self.config.quote_offset;

        let price = match side {
            Side::Buy => {
                let target = self.theoretical_price.checked_sub(offset)?;
                let price = round_to_tick_with(target, tick, RoundingStrategy::ToNegativeInfinity).ok()?;
                if self.exchange_ask > Decimal::ZERO {
                    price.min(self.exchange_ask.checked_sub(tick)?)
                } else {
                    price
                }
            },
            Side::Sell => {
                let target = self.theoretical_price.checked_add(offset)?;
                let price = round_to_tick_with(target, tick, RoundingStrategy::ToPositiveInfinity).ok()?;
                if self.exchange_bid > Decimal::ZERO {
                    price.max(self.exchange_bid.checked_add(tick)?)
                } else {
                    price
                }
            },
        };
        Some(price)
    }

    fn send_quote(&mut self, side: Side) {
        let Some(price) = self.quote_price(side).filter(|p| *p > Decimal::ZERO) else {
            tracing::debug!(%side, theo = %self.theoretical_price, "no positive quote price");
            return;
        };

        let id = self.next_quote_id;
        self.next_quote_id = self.next_quote_id.wrapping_add(1).max(1);
        let volume = self.config.quote_volume;

        self.quotes.insert(
            id,
            Quote {
                id,
                side,
                price,
                volume,
                status: QuoteStatus::Pending,
            },
        );
        self.execution
            .request_order_add(id, &self.config.feedcode, side, price, volume);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::{ExecutionRequest, RecordingExecution};

    fn px(units: i64, scale: u32) -> Price {
        Decimal::new(units, scale)
    }

    fn quoter() -> (InstrumentQuoter, Arc<RecordingExecution>) {
        let execution = Arc::new(RecordingExecution::new());
        let config = QuoterConfig::new("ESZ5", Decimal::ONE, 10, px(25, 2));
        let quoter = InstrumentQuoter::new(config, execution.clone()).unwrap();
        (quoter, execution)
    }

    fn add(id: u32, side: Side, price: Price) -> ExecutionRequest {
        ExecutionRequest::Add {
            id,
            feedcode: "ESZ5".to_string(),
            side,
            price,
            volume: 10,
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = QuoterConfig::new("ESZ5", Decimal::ZERO, 10, px(25, 2));
        assert!(InstrumentQuoter::new(config, Arc::new(RecordingExecution::new())).is_err());
    }

    #[test]
    fn test_no_quotes_without_theoretical_price() {
        let (mut q, exec) = quoter();
        q.on_best_bid_offer(px(99, 0), px(101, 0));
        assert!(exec.requests().is_empty());
        assert!(q.quotes().is_empty());
    }

    #[test]
    fn test_quotes_both_sides() {
        let (mut q, exec) = quoter();
        q.on_theoretical_price(px(1001, 1)); // 100.1

        // bid floor(99.1) = 99.00, offer ceil(101.1) = 101.25
        assert_eq!(
            exec.take(),
            vec![add(1, Side::Buy, px(99, 0)), add(2, Side::Sell, px(10125, 2))]
        );
        assert!(q.quotes().iter().all(|quote| quote.status == QuoteStatus::Pending));
    }

    #[test]
    fn test_pending_quotes_are_left_alone() {
        let (mut q, exec) = quoter();
        q.on_theoretical_price(px(100, 0));
        exec.take();

        // Both quotes now violate the offset but are still pending
        q.on_theoretical_price(px(1005, 1));
        assert!(exec.take().is_empty());
        assert_eq!(q.quotes().len(), 2);
    }

    #[test]
    fn test_full_cycle() {
        let (mut q, exec) = quoter();
        q.on_theoretical_price(px(100, 0));
        assert_eq!(
            exec.take(),
            vec![add(1, Side::Buy, px(99, 0)), add(2, Side::Sell, px(101, 0))]
        );
        q.on_order_add_confirm(1);
        q.on_order_add_confirm(2);

        // Offer is now only 0.5 above theo: pull and requote
        q.on_theoretical_price(px(1005, 1));
        assert_eq!(
            exec.take(),
            vec![ExecutionRequest::Remove { id: 2 }, add(3, Side::Sell, px(1015, 1))]
        );

        // Bid 99 would cross an ask of 98.75: pull, requote one tick inside the ask
        q.on_best_bid_offer(px(98, 0), px(9875, 2));
        assert_eq!(
            exec.take(),
            vec![ExecutionRequest::Remove { id: 1 }, add(4, Side::Buy, px(985, 1))]
        );

        q.on_order_remove_confirm(1);
        q.on_order_remove_confirm(2);
        let ids: Vec<u32> = q.quotes().iter().map(|quote| quote.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[test]
    fn test_sell_pushed_above_exchange_bid() {
        let (mut q, exec) = quoter();
        q.on_best_bid_offer(px(102, 0), Decimal::ZERO);
        q.on_theoretical_price(px(100, 0));

        assert_eq!(
            exec.take(),
            vec![add(1, Side::Buy, px(99, 0)), add(2, Side::Sell, px(10225, 2))]
        );
    }

    #[test]
    fn test_non_positive_price_not_sent() {
        let (mut q, exec) = quoter();
        q.on_theoretical_price(px(5, 1)); // 0.5

        assert_eq!(exec.take(), vec![add(1, Side::Sell, px(15, 1))]);
        assert!(q.quote_on(Side::Buy).is_none());
    }

    #[test]
    fn test_zero_theo_pulls_live_quotes() {
        let (mut q, exec) = quoter();
        q.on_theoretical_price(px(100, 0));
        q.on_order_add_confirm(1);
        q.on_order_add_confirm(2);
        exec.take();

        q.on_theoretical_price(Decimal::ZERO);
        let requests = exec.take();
        // the offer at 101 is still 101 above theo, only the bid is pulled
        assert_eq!(requests, vec![ExecutionRequest::Remove { id: 1 }]);
        assert!(q.quote_on(Side::Buy).is_none());
    }
}
