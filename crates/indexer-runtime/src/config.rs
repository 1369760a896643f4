//! Runtime configuration.
//!
//! Loaded from an optional JSON file, then overridden by environment
//! variables so container deployments can reconfigure without editing the
//! file.

use std::env;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Configuration for one indexer run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Path of the JSON-lines event log to replay.
    pub event_log: String,
    /// Where to write the snapshot; stdout when unset.
    pub snapshot_out: Option<String>,
    /// Upper bound on one registry metadata lookup (milliseconds).
    pub registry_timeout_ms: u64,
    /// Whether to enrich installations with registry metadata.
    pub enrich_metadata: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_log: "events.jsonl".to_string(),
            snapshot_out: None,
            registry_timeout_ms: 250,
            enrich_metadata: true,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration: defaults, then the JSON file (if given), then
    /// environment overrides.
    ///
    /// - `DS_EVENT_LOG`: overrides `event_log`
    /// - `DS_SNAPSHOT_OUT`: overrides `snapshot_out`
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(Path::new(path))
                    .with_context(|| format!("reading config file {path}"))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing config file {path}"))?
            }
            None => Self::default(),
        };

        if let Ok(event_log) = env::var("DS_EVENT_LOG") {
            config.event_log = event_log;
        }
        if let Ok(snapshot_out) = env::var("DS_SNAPSHOT_OUT") {
            config.snapshot_out = Some(snapshot_out);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RuntimeConfig::default();
        assert_eq!(config.event_log, "events.jsonl");
        assert!(config.snapshot_out.is_none());
        assert_eq!(config.registry_timeout_ms, 250);
        assert!(config.enrich_metadata);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: RuntimeConfig =
            serde_json::from_str(r#"{"event_log": "mainnet.jsonl"}"#).unwrap();
        assert_eq!(config.event_log, "mainnet.jsonl");
        assert_eq!(config.registry_timeout_ms, 250);
    }
}
