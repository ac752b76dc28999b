//! # stackctl-core
//!
//! Wait handlers for asynchronous STACKIT resource operations.
//!
//! Creating, updating or deleting a cluster, a network or a network area is
//! accepted immediately but completes later. This crate polls the resource's
//! status until the operation reaches a terminal state, the deadline passes,
//! or the caller cancels.
//!
//! ## Layout
//!
//! - [`wait`] - the resource-agnostic polling engine ([`AsyncWait`])
//! - [`skcf`] - cluster and service enablement handlers
//! - [`iaas`] - network area and network handlers
//! - [`http`] - a `reqwest` client implementing every status trait
//! - [`config`] - region, endpoints, token and default wait settings
//!
//! ## Example
//!
//! ```rust,no_run
//! use stackctl_core::{Config, StackitClient};
//! use stackctl_core::skcf::create_or_update_cluster_wait_handler;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let client = StackitClient::new(config.endpoints()?, config.token.clone())?;
//!
//! let cluster = create_or_update_cluster_wait_handler(&client, "project-id", "my-cluster")
//!     .with_interval(config.wait.interval())
//!     .wait()
//!     .await?;
//! println!("{:?}", cluster.aggregated_state());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod iaas;
pub mod skcf;
pub mod wait;

mod state;

#[cfg(test)]
mod test_support;

pub use config::{Config, ConfigError, WaitSettings};
pub use error::{ApiError, ApiResult, WaitError, WaitFailure, WaitResult};
pub use http::{Endpoints, StackitClient};
pub use wait::{AsyncWait, Outcome, ProgressCallback, WaitEvent};
