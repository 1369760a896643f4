//! Tracing subscriber installation.

use tracing_subscriber::EnvFilter;

use crate::{TelemetryConfig, TelemetryError};

/// Guard returned by `init_telemetry`. Hold it for the lifetime of the
/// process; dropping it is currently a no-op but keeps room for flushing
/// exporters later without an API change.
pub struct TracingGuard {
    _private: (),
}

/// Install the global tracing subscriber.
///
/// Idempotence is the caller's problem: installing twice is an error, so
/// binaries call this exactly once at startup.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TracingGuard, TelemetryError> {
    let filter = EnvFilter::try_new(&config.log_level)
        .map_err(|err| TelemetryError::Config(err.to_string()))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|err| TelemetryError::SubscriberInit(err.to_string()))?;

    tracing::debug!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "telemetry initialized"
    );

    Ok(TracingGuard { _private: () })
}
