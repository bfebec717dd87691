// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod event_handler;
mod execution;

pub use event_handler::{
    ChainEvent, EventHandler, LoggingEventHandler, NoOpEventHandler, RecordingEventHandler,
};
pub use execution::{Execution, ExecutionRequest, RecordingExecution};
