// ============================================================================
// Utilities Module
// Bounded caching and rate pacing helpers
// ============================================================================

mod lru;
mod pacing;

pub use lru::LruCache;
pub use pacing::{PacingConfig, TaskStatus, TimedTaskProcessor};
