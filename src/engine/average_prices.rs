// ============================================================================
// Average Price Processor
// Turns an exchange message stream into per-chain average fill prices
// ============================================================================

use super::chain_tracker::{ChainError, ChainUpdate, OrderChainTracker};
use crate::domain::{
    AveragePriceLine, ChainSummary, ConfigError, ExchangeMessage, InvalidMessagePolicy,
    ParseError, ProcessorConfig,
};
use crate::interfaces::{ChainEvent, EventHandler, NoOpEventHandler};
use crate::numeric::round_price;
use chrono::Utc;
use std::sync::Arc;

/// A single message that could not be used
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    #[error("malformed message: {0}")]
    Parse(#[from] ParseError),

    #[error("rejected message: {0}")]
    Chain(#[from] ChainError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcessError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("line {line}: {source}")]
    Message { line: usize, source: MessageError },
}

/// Streaming processor for exchange messages.
///
/// Lines are numbered from 1 in the order they are passed in. Blank lines
/// and lines starting with `#` are ignored.
pub struct AveragePriceProcessor {
    config: ProcessorConfig,
    tracker: OrderChainTracker,
    event_handler: Arc<dyn EventHandler>,
    line_number: usize,
    lines_processed: usize,
    rejected: usize,
}

impl AveragePriceProcessor {
    pub fn new(
        config: ProcessorConfig,
        event_handler: Arc<dyn EventHandler>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let tracker = OrderChainTracker::new(config.superseded_capacity)?;

        Ok(Self {
            config,
            tracker,
            event_handler,
            line_number: 0,
            lines_processed: 0,
            rejected: 0,
        })
    }

    /// Process one text line.
    ///
    /// # Errors
    /// Only under [`InvalidMessagePolicy::Reject`]; the tracker is left as it
    /// was before the offending line.
    pub fn process_line(&mut self, line: &str) -> Result<(), ProcessError> {
        self.line_number += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(());
        }
        self.lines_processed += 1;

        match self.apply(trimmed) {
            Ok(events) => {
                self.event_handler.on_events(events);
                Ok(())
            },
            Err(source) => match self.config.invalid_message_policy {
                InvalidMessagePolicy::Reject => Err(ProcessError::Message {
                    line: self.line_number,
                    source,
                }),
                InvalidMessagePolicy::Skip => {
                    self.rejected += 1;
                    tracing::warn!(line = self.line_number, error = %source, "skipping message");
                    self.event_handler.on_event(ChainEvent::MessageRejected {
                        line: self.line_number,
                        reason: source.to_string(),
                        timestamp: Utc::now(),
                    });
                    Ok(())
                },
            },
        }
    }

    /// Process every line, stopping at the first error under `Reject`.
    pub fn process_lines<I, S>(&mut self, lines: I) -> Result<(), ProcessError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.process_line(line.as_ref())?;
        }
        Ok(())
    }

    /// Chains with at least one fill, in first-seen order of their roots
    pub fn report(&self) -> Vec<AveragePriceLine> {
        self.tracker
            .chains()
            .filter_map(|chain| {
                let average = chain.average_price?;
                Some(AveragePriceLine {
                    root: chain.root,
                    average_price: round_price(average, self.config.price_decimals),
                    symbol: chain.symbol,
                    side: chain.side,
                    filled_quantity: chain.filled_quantity,
                })
            })
            .collect()
    }

    pub fn summaries(&self) -> Vec<ChainSummary> {
        self.tracker.chains().collect()
    }

    pub fn tracker(&self) -> &OrderChainTracker {
        &self.tracker
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Non-blank, non-comment lines handled so far
    pub fn lines_processed(&self) -> usize {
        self.lines_processed
    }

    /// Lines skipped under the `Skip` policy
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    // ========================================================================
    // Private methods
    // ========================================================================

    fn apply(&mut self, line: &str) -> Result<Vec<ChainEvent>, MessageError> {
        let message = ExchangeMessage::parse(line)?;
        let update = self.tracker.apply(&message)?;
        let timestamp = Utc::now();

        let mut events = Vec::with_capacity(2);
        match (&message, update) {
            (ExchangeMessage::New(m), ChainUpdate::Opened { root }) => {
                events.push(ChainEvent::ChainOpened {
                    root,
                    symbol: m.symbol.clone(),
                    side: m.side,
                    quantity: m.quantity,
                    price: m.price,
                    timestamp,
                });
            },
            (ExchangeMessage::Modify(m), ChainUpdate::Modified { root }) => {
                events.push(ChainEvent::ChainModified {
                    root,
                    order_id: m.order_id,
                    prev_order_id: m.prev_order_id,
                    quantity: m.quantity,
                    price: m.price,
                    timestamp,
                });
            },
            (
                ExchangeMessage::Fill(m),
                ChainUpdate::Filled {
                    root,
                    open_quantity,
                    complete,
                },
            ) => {
                events.push(ChainEvent::FillApplied {
                    root,
                    order_id: m.order_id,
                    quantity: m.quantity,
                    price: m.price,
                    open_quantity,
                    timestamp,
                });
                if complete {
                    if let Some(chain) = self.tracker.chain(root) {
                        events.push(ChainEvent::ChainCompleted {
                            root,
                            filled_quantity: chain.filled_quantity,
                            average_price: chain.average_price,
                            timestamp,
                        });
                    }
                }
            },
            // The tracker answers each message kind with its own update
            _ => {},
        }
        Ok(events)
    }
}

/// Average fill price of every order chain, skipping invalid messages.
///
/// Each output line reads `"<root_order_id> <symbol> <average_price>"`, with
/// the price rounded half away from zero to two decimals. Chains without
/// fills are not reported.
///
/// ```
/// use fill_analytics::average_prices;
///
/// let out = average_prices(&[
///     "new 1 AAPL buy 100 10.00",
///     "fill 1 40 10.00",
///     "modify 2 1 60 10.50",
///     "fill 2 60 10.25",
/// ]);
/// assert_eq!(out, vec!["1 AAPL 10.15".to_string()]);
/// ```
pub fn average_prices<S: AsRef<str>>(messages: &[S]) -> Vec<String> {
    try_average_prices(messages, &ProcessorConfig::default()).unwrap_or_else(|err| {
        tracing::error!(%err, "average price processing failed");
        Vec::new()
    })
}

/// Configurable form of [`average_prices`].
pub fn try_average_prices<S: AsRef<str>>(
    messages: &[S],
    config: &ProcessorConfig,
) -> Result<Vec<String>, ProcessError> {
    let mut processor = AveragePriceProcessor::new(config.clone(), Arc::new(NoOpEventHandler))?;
    processor.process_lines(messages)?;

    tracing::info!(
        lines = processor.lines_processed(),
        rejected = processor.rejected(),
        chains = processor.tracker().len(),
        "processed exchange messages"
    );

    Ok(processor
        .report()
        .iter()
        .map(ToString::to_string)
        .collect())
}
