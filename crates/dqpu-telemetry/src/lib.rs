//! # DQPU Telemetry
//!
//! Logging bootstrap for binaries and tests that embed the marketplace.
//!
//! The library crates only emit `tracing` events; this crate installs the
//! subscriber that renders them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dqpu_telemetry::{init_tracing, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_tracing(&config).expect("Failed to init tracing");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DQPU_SERVICE_NAME` | `dqpu` | Service name in log records |
//! | `DQPU_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `DQPU_JSON_LOGS` | `false` | JSON output (default on in containers) |
//! | `DQPU_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

#![warn(missing_docs)]

mod config;
mod tracing_setup;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};
pub use tracing_setup::{env_filter, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// The log level directive could not be parsed.
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber is already installed.
    #[error("Failed to initialize tracing subscriber: {0}")]
    SubscriberInit(String),
}

/// Install the global subscriber from environment configuration.
pub fn init_from_env() -> Result<TelemetryConfig, TelemetryError> {
    let config = TelemetryConfig::from_env();
    init_tracing(&config)?;
    Ok(config)
}
