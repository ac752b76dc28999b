//! Configuration for stackctl
//!
//! A single TOML file holds the region, optional endpoint overrides, the
//! bearer token and the default wait settings. `${VAR}` and `${VAR:-default}`
//! references are expanded when the file is loaded.

#![allow(clippy::module_inception)]

pub mod config;
pub mod error;

pub use config::{Config, WaitSettings};
pub use error::{ConfigError, Result};
