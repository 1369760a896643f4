//! # DiamondScope Telemetry
//!
//! Structured logging setup shared by every binary in the workspace.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ds_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(&config).expect("failed to init telemetry");
//!     // tracing events are now collected
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DS_SERVICE_NAME` | `diamond-scope` | Service name stamped on log lines |
//! | `DS_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `DS_JSON_LOGS` | `false` (auto `true` in containers) | JSON formatted logs |

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{init_telemetry, TracingGuard};

use thiserror::Error;

/// Telemetry initialization errors.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The subscriber could not be installed (usually: already set).
    #[error("failed to initialize tracing subscriber: {0}")]
    SubscriberInit(String),

    /// Invalid configuration.
    #[error("invalid telemetry configuration: {0}")]
    Config(String),
}
