//! Engine configuration, loaded from TOML.
//!
//! ```toml
//! timeout_ms = 30000
//! failure_policy = "best_effort"   # or "strict"
//! ```
//!
//! Both keys are optional; unknown keys are rejected.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

/// What to do when a source fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Replace failed sources by defaults and list them in the report.
    #[default]
    BestEffort,
    /// Abort the whole report on the first failed source.
    Strict,
}

/// Settings of [`crate::AggregationOrchestrator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct StatsConfig {
    /// Deadline for the whole fan-out, in milliseconds.
    pub timeout_ms: u64,
    /// Failure handling.
    pub failure_policy: FailurePolicy,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl StatsConfig {
    /// The fan-out deadline.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Reject settings the orchestrator cannot honour.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.timeout_ms == 0 {
            bail!("timeout_ms must be > 0");
        }
        Ok(())
    }
}

/// Parse and validate a config from a TOML string.
pub fn load_config_str(s: &str) -> anyhow::Result<StatsConfig> {
    let cfg: StatsConfig = toml::from_str(s).context("parse stats config TOML")?;
    cfg.validate()?;
    Ok(cfg)
}

/// Read, parse and validate a config file.
pub fn load_config_path(path: impl AsRef<Path>) -> anyhow::Result<StatsConfig> {
    let path = path.as_ref();
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read stats config {}", path.display()))?;
    load_config_str(&s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = load_config_str("").unwrap();
        assert_eq!(cfg, StatsConfig::default());
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
        assert_eq!(cfg.failure_policy, FailurePolicy::BestEffort);
    }

    #[test]
    fn strict_policy_parses() {
        let cfg = load_config_str(
            r#"
            timeout_ms = 500
            failure_policy = "strict"
        "#,
        )
        .unwrap();
        assert_eq!(cfg.timeout_ms, 500);
        assert_eq!(cfg.failure_policy, FailurePolicy::Strict);
    }

    #[test]
    fn unknown_keys_and_zero_timeout_are_rejected() {
        assert!(load_config_str("beds_per_room = 6").is_err());
        assert!(load_config_str("timeout_ms = 0").is_err());
        assert!(load_config_str(r#"failure_policy = "sometimes""#).is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.toml");
        std::fs::write(&path, "timeout_ms = 1234\n").unwrap();
        assert_eq!(load_config_path(&path).unwrap().timeout_ms, 1234);
        assert!(load_config_path(dir.path().join("missing.toml")).is_err());
    }
}
