//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use veracity_credibility::ServiceConfig;
use veracity_types::ScoringParams;
use veracity_utils::LogFormat;

use crate::NodeError;

/// Configuration for a credibility node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in megabytes.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    /// Upper bound on a single ledger call.
    #[serde(default = "default_ledger_timeout_ms")]
    pub ledger_timeout_ms: u64,

    /// Age after which a pending row counts as abandoned and may be acted on
    /// again. Must be at least `ledger_timeout_ms`.
    #[serde(default = "default_pending_timeout_ms")]
    pub pending_timeout_ms: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to keep Prometheus metrics.
    #[serde(default)]
    pub enable_metrics: bool,

    /// Only actors holding the reviewer role may verify or dispute.
    #[serde(default)]
    pub require_reviewer_role: bool,

    #[serde(default)]
    pub scoring: ScoringParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./veracity_data")
}

fn default_map_size_mb() -> usize {
    1024
}

fn default_ledger_timeout_ms() -> u64 {
    15_000
}

fn default_pending_timeout_ms() -> u64 {
    30_000
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config
            .scoring
            .validate()
            .map_err(|e| NodeError::Config(e.to_string()))?;
        if config.pending_timeout_ms < config.ledger_timeout_ms {
            return Err(NodeError::Config(format!(
                "pending_timeout_ms ({}) is shorter than ledger_timeout_ms ({})",
                config.pending_timeout_ms, config.ledger_timeout_ms
            )));
        }
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn map_size_bytes(&self) -> usize {
        self.map_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn ledger_timeout(&self) -> Duration {
        Duration::from_millis(self.ledger_timeout_ms)
    }

    pub fn logging_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse().map_err(NodeError::Config)
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            scoring: self.scoring.clone(),
            require_reviewer_role: self.require_reviewer_role,
            pending_timeout: Duration::from_millis(self.pending_timeout_ms),
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size_mb: default_map_size_mb(),
            ledger_timeout_ms: default_ledger_timeout_ms(),
            pending_timeout_ms: default_pending_timeout_ms(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            enable_metrics: false,
            require_reviewer_role: false,
            scoring: ScoringParams::default(),
        }
    }
}
