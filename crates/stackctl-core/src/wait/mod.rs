//! Resource-agnostic polling engine
//!
//! Cloud control planes accept a mutation and return right away; the actual
//! state change happens later. This module turns "poll this status endpoint
//! until it says done" into a single awaitable call with a bounded duration.
//!
//! The resource-specific handlers in [`crate::skcf`] and [`crate::iaas`] are
//! thin adapters that build an [`AsyncWait`] with the right probe, evaluation
//! and default timeout.

pub mod engine;
pub mod outcome;
pub mod progress;

pub use engine::{AsyncWait, DEFAULT_INTERVAL, DEFAULT_TIMEOUT};
pub use outcome::Outcome;
pub use progress::{ProgressCallback, WaitEvent};
