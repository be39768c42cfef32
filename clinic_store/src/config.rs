//! Application config for the `clinic-stats` binary.
//!
//! ```toml
//! [database]
//! url = "clinic.db"          # DATABASE_URL overrides this
//! bed_room_kind = "ward"
//!
//! [stats]
//! timeout_ms = 30000
//! failure_policy = "best_effort"
//! ```

use std::path::Path;

use anyhow::{Context, anyhow};
use clinic_stats::config::StatsConfig;
use serde::{Deserialize, Serialize};
use shared_utils::env::env_override;

/// Environment variable that overrides `database.url`.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

fn default_bed_room_kind() -> String {
    "ward".to_string()
}

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SQLite path, `file:` URI or `sqlite:` URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Room kind whose rooms hold beds.
    #[serde(default = "default_bed_room_kind")]
    pub bed_room_kind: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            bed_room_kind: default_bed_room_kind(),
        }
    }
}

impl DatabaseConfig {
    /// The configured URL, or an error naming both places it can come from.
    pub fn url(&self) -> anyhow::Result<&str> {
        self.url
            .as_deref()
            .ok_or_else(|| anyhow!("no database url: set [database] url or {DATABASE_URL_VAR}"))
    }
}

/// The whole config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub stats: StatsConfig,
}

impl AppConfig {
    /// Replace `database.url` when an override is present.
    pub fn apply_env_override(&mut self, database_url: Option<String>) {
        if let Some(url) = database_url {
            self.database.url = Some(url);
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.database.url()?;
        if self.database.bed_room_kind.trim().is_empty() {
            anyhow::bail!("database.bed_room_kind must not be blank");
        }
        self.stats.validate()
    }
}

/// Parse a config document and apply `database_url` as override.
pub fn parse_app_config(s: &str, database_url: Option<String>) -> anyhow::Result<AppConfig> {
    let mut cfg: AppConfig = toml::from_str(s).context("parse app config TOML")?;
    cfg.apply_env_override(database_url);
    cfg.validate()?;
    Ok(cfg)
}

/// Read the config file at `path`, honouring `DATABASE_URL`.
pub fn load_app_config(path: impl AsRef<Path>) -> anyhow::Result<AppConfig> {
    let path = path.as_ref();
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read app config {}", path.display()))?;
    parse_app_config(&s, env_override(DATABASE_URL_VAR))
        .with_context(|| format!("load app config {}", path.display()))
}
