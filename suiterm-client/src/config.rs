//! Configuration loading for the suiterm client.
//!
//! All top-level fields are required unless explicitly marked optional.
//! The `[cache]` table may be omitted, in which case the stock TTLs apply.

use crate::store::CachePolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Longest TTL accepted for any resource.
pub const MAX_TTL_MS: u64 = 10 * 60 * 1000;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Per-resource TTLs and the faucet settle delay, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheSettings {
    pub addresses_ttl_ms: u64,
    pub environments_ttl_ms: u64,
    pub gas_coins_ttl_ms: u64,
    pub objects_ttl_ms: u64,
    pub community_ttl_ms: u64,
    pub tier_ttl_ms: u64,
    #[serde(default = "default_blobs_ttl_ms")]
    pub blobs_ttl_ms: u64,
    pub faucet_settle_delay_ms: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            addresses_ttl_ms: 3_000,
            environments_ttl_ms: 10_000,
            gas_coins_ttl_ms: 3_000,
            objects_ttl_ms: 5_000,
            community_ttl_ms: 10_000,
            tier_ttl_ms: 10_000,
            blobs_ttl_ms: default_blobs_ttl_ms(),
            faucet_settle_delay_ms: 2_000,
        }
    }
}

fn default_blobs_ttl_ms() -> u64 {
    10_000
}

impl CacheSettings {
    pub fn policy(&self) -> CachePolicy {
        CachePolicy {
            addresses_ttl: Duration::from_millis(self.addresses_ttl_ms),
            environments_ttl: Duration::from_millis(self.environments_ttl_ms),
            gas_coins_ttl: Duration::from_millis(self.gas_coins_ttl_ms),
            objects_ttl: Duration::from_millis(self.objects_ttl_ms),
            community_ttl: Duration::from_millis(self.community_ttl_ms),
            tier_ttl: Duration::from_millis(self.tier_ttl_ms),
            blobs_ttl: Duration::from_millis(self.blobs_ttl_ms),
            faucet_settle_delay: Duration::from_millis(self.faucet_settle_delay_ms),
        }
    }

    fn ttls(&self) -> [(&'static str, u64); 7] {
        [
            ("cache.addresses_ttl_ms", self.addresses_ttl_ms),
            ("cache.environments_ttl_ms", self.environments_ttl_ms),
            ("cache.gas_coins_ttl_ms", self.gas_coins_ttl_ms),
            ("cache.objects_ttl_ms", self.objects_ttl_ms),
            ("cache.community_ttl_ms", self.community_ttl_ms),
            ("cache.tier_ttl_ms", self.tier_ttl_ms),
            ("cache.blobs_ttl_ms", self.blobs_ttl_ms),
        ]
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or SUITERM_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ClientConfig {
    /// Load from `path` (the `--config` flag), falling back to
    /// `SUITERM_CONFIG`, and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(config_path_from_env)
            .ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.api_base_url.trim();
        if base.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must start with http:// or https://".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if let Some(key) = &self.auth.api_key {
            if key.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "auth.api_key",
                    reason: "must not be blank when set".to_string(),
                });
            }
        }
        for (field, ttl) in self.cache.ttls() {
            if ttl == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be > 0".to_string(),
                });
            }
            if ttl > MAX_TTL_MS {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must be <= {}", MAX_TTL_MS),
                });
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var("SUITERM_CONFIG").ok().map(PathBuf::from)
}
