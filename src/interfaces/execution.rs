// ============================================================================
// Execution Interface
// Order entry seam used by the instrument quoter
// ============================================================================

use crate::domain::Side;
use crate::numeric::{Price, Quantity};
use parking_lot::Mutex;

/// Sends order requests to an exchange.
///
/// Requests are fire-and-forget; the exchange answers asynchronously through
/// the quoter's confirm callbacks.
pub trait Execution: Send + Sync {
    /// Request a new order. `id` is chosen by the caller.
    fn request_order_add(&self, id: u32, feedcode: &str, side: Side, price: Price, volume: Quantity);

    /// Request removal of an order previously added under `id`
    fn request_order_remove(&self, id: u32);
}

/// A request captured by [`RecordingExecution`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionRequest {
    Add {
        id: u32,
        feedcode: String,
        side: Side,
        price: Price,
        volume: Quantity,
    },
    Remove {
        id: u32,
    },
}

/// Execution that only records requests, for dry runs and tests
#[derive(Default)]
pub struct RecordingExecution {
    requests: Mutex<Vec<ExecutionRequest>>,
}

impl RecordingExecution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<ExecutionRequest> {
        self.requests.lock().clone()
    }

    /// Drain and return the captured requests
    pub fn take(&self) -> Vec<ExecutionRequest> {
        std::mem::take(&mut *self.requests.lock())
    }
}

impl Execution for RecordingExecution {
    fn request_order_add(&self, id: u32, feedcode: &str, side: Side, price: Price, volume: Quantity) {
        tracing::debug!(id, feedcode, %side, %price, volume, "order add requested");
        self.requests.lock().push(ExecutionRequest::Add {
            id,
            feedcode: feedcode.to_string(),
            side,
            price,
            volume,
        });
    }

    fn request_order_remove(&self, id: u32) {
        tracing::debug!(id, "order remove requested");
        self.requests.lock().push(ExecutionRequest::Remove { id });
    }
}
