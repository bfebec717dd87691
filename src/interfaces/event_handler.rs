// ============================================================================
// Event Handler Interface
// Defines the contract for observing order-chain processing
// ============================================================================

use crate::domain::{OrderId, Side};
use crate::numeric::{Price, Quantity};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted while processing exchange messages
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChainEvent {
    /// A `new` message opened a chain
    ChainOpened {
        root: OrderId,
        symbol: String,
        side: Side,
        quantity: Quantity,
        price: Price,
        timestamp: DateTime<Utc>,
    },

    /// A `modify` replaced the chain's current order
    ChainModified {
        root: OrderId,
        order_id: OrderId,
        prev_order_id: OrderId,
        quantity: Quantity,
        price: Price,
        timestamp: DateTime<Utc>,
    },

    /// A fill was attributed to the chain
    FillApplied {
        root: OrderId,
        order_id: OrderId,
        quantity: Quantity,
        price: Price,
        open_quantity: Quantity,
        timestamp: DateTime<Utc>,
    },

    /// Open quantity reached zero
    ChainCompleted {
        root: OrderId,
        filled_quantity: Quantity,
        average_price: Option<Price>,
        timestamp: DateTime<Utc>,
    },

    /// A message was skipped
    MessageRejected {
        line: usize,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

/// Event handler trait for observing chain processing
/// Implementations can handle logging, metrics, audit trails, etc.
pub trait EventHandler: Send + Sync {
    /// Handle a chain event
    fn on_event(&self, event: ChainEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<ChainEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: ChainEvent) {}
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: ChainEvent) {
        tracing::debug!("order chain event: {:?}", event);
    }
}

/// Keeps every event in memory
#[derive(Default)]
pub struct RecordingEventHandler {
    events: Mutex<Vec<ChainEvent>>,
}

impl RecordingEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the events seen so far
    pub fn events(&self) -> Vec<ChainEvent> {
        self.events.lock().clone()
    }

    /// Drain and return the events seen so far
    pub fn take(&self) -> Vec<ChainEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventHandler for RecordingEventHandler {
    fn on_event(&self, event: ChainEvent) {
        self.events.lock().push(event);
    }

    fn on_events(&self, events: Vec<ChainEvent>) {
        self.events.lock().extend(events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_handler() {
        let handler = NoOpEventHandler;
        handler.on_event(ChainEvent::MessageRejected {
            line: 1,
            reason: "test".to_string(),
            timestamp: Utc::now(),
        });
    }

    #[test]
    fn test_recording_handler() {
        let handler = RecordingEventHandler::new();
        handler.on_events(vec![
            ChainEvent::MessageRejected {
                line: 1,
                reason: "a".to_string(),
                timestamp: Utc::now(),
            },
            ChainEvent::MessageRejected {
                line: 2,
                reason: "b".to_string(),
                timestamp: Utc::now(),
            },
        ]);

        assert_eq!(handler.len(), 2);
        assert_eq!(handler.take().len(), 2);
        assert!(handler.is_empty());
    }
}
