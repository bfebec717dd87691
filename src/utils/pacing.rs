// ============================================================================
// Timed Task Processor
// Runs a task on a worker thread at a bounded rate
// ============================================================================

use crate::domain::ConfigError;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Returned by a paced task to keep going or end the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Continue,
    Done,
}

/// Rate settings for a [`TimedTaskProcessor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PacingConfig {
    /// Task slots per cycle; slots are spaced `1s / tasks_per_second` apart
    pub tasks_per_second: u32,

    /// Idle time after each full cycle
    pub cycle_pause: Duration,
}

impl PacingConfig {
    pub fn new(tasks_per_second: u32) -> Self {
        Self {
            tasks_per_second,
            cycle_pause: Duration::ZERO,
        }
    }

    /// Builder method: Set the pause between cycles
    pub fn with_cycle_pause(mut self, pause: Duration) -> Self {
        self.cycle_pause = pause;
        self
    }

    pub fn slot_duration(&self) -> Duration {
        Duration::from_secs(1) / self.tasks_per_second.max(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tasks_per_second == 0 {
            return Err(ConfigError::NotPositive {
                field: "tasks_per_second",
            });
        }
        Ok(())
    }
}

struct Shared {
    stopped: Mutex<bool>,
    wake: Condvar,
    running: AtomicBool,
    completed: AtomicU64,
}

impl Shared {
    /// Sleep until `deadline` or until stopped. Returns true if stopped.
    fn sleep_until(&self, deadline: Instant) -> bool {
        let mut stopped = self.stopped.lock();
        while !*stopped {
            if self.wake.wait_until(&mut stopped, deadline).timed_out() {
                break;
            }
        }
        *stopped
    }

    fn is_stopped(&self) -> bool {
        *self.stopped.lock()
    }
}

/// Background worker that calls a task at a fixed rate.
///
/// Each cycle runs `tasks_per_second` slots. A slot starts the task and then
/// waits out the remainder of its time budget, so a fast task never exceeds
/// the configured rate. Stopping wakes the worker out of any wait.
pub struct TimedTaskProcessor {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl TimedTaskProcessor {
    /// Spawn the worker thread. The task receives the slot index within the
    /// current cycle.
    pub fn start<F>(mut task: F, config: PacingConfig) -> Result<Self, ConfigError>
    where
        F: FnMut(u32) -> TaskStatus + Send + 'static,
    {
        config.validate()?;

        let shared = Arc::new(Shared {
            stopped: Mutex::new(false),
            wake: Condvar::new(),
            running: AtomicBool::new(true),
            completed: AtomicU64::new(0),
        });

        let worker_shared = Arc::clone(&shared);
        let slot = config.slot_duration();
        let handle = thread::spawn(move || {
            let shared = worker_shared;
            'cycles: while !shared.is_stopped() {
                for i in 0..config.tasks_per_second {
                    let deadline = Instant::now() + slot;
                    let status = task(i);
                    shared.completed.fetch_add(1, Ordering::AcqRel);
                    if status == TaskStatus::Done {
                        break 'cycles;
                    }
                    if shared.sleep_until(deadline) {
                        break 'cycles;
                    }
                }
                if shared.sleep_until(Instant::now() + config.cycle_pause) {
                    break;
                }
            }
            shared.running.store(false, Ordering::Release);
            tracing::debug!(
                completed = shared.completed.load(Ordering::Acquire),
                "paced worker finished"
            );
        });

        Ok(Self {
            shared,
            worker: Mutex::new(Some(handle)),
        })
    }

    /// Ask the worker to stop. Idempotent.
    pub fn stop(&self) {
        *self.shared.stopped.lock() = true;
        self.shared.wake.notify_all();
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Number of task invocations so far
    pub fn completed(&self) -> u64 {
        self.shared.completed.load(Ordering::Acquire)
    }

    /// Wait for the worker to exit. Returns `Err` if the task panicked.
    pub fn join(&self) -> thread::Result<()> {
        match self.worker.lock().take() {
            Some(handle) => handle.join(),
            None => Ok(()),
        }
    }
}

impl Drop for TimedTaskProcessor {
    fn drop(&mut self) {
        self.stop();
        let _ = self.join();
    }
}
