//! Progress events emitted while a wait is running
//!
//! A CLI can hook these up to a spinner; library callers usually pass nothing.

use std::time::Duration;

/// Progress events emitted during a wait
#[derive(Debug, Clone, PartialEq)]
pub enum WaitEvent {
    /// The wait has started
    Started { operation: String },
    /// About to issue a probe
    Polling {
        operation: String,
        attempt: u32,
        elapsed: Duration,
    },
    /// The operation reached its success state
    Completed {
        operation: String,
        attempts: u32,
        elapsed: Duration,
    },
    /// The wait ended without success
    Failed { operation: String, error: String },
}

/// Callback type for progress updates
pub type ProgressCallback = Box<dyn Fn(WaitEvent) + Send + Sync>;

/// Helper to emit progress events
pub(crate) fn emit(callback: &Option<ProgressCallback>, event: WaitEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}
