//! Console configuration loaded from the process environment.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use nexus_inventory::{DEFAULT_AUDIT_CAPACITY, LedgerPolicy, NegativeStockPolicy};

pub const ENV_NEGATIVE_STOCK: &str = "NEXUS_NEGATIVE_STOCK";
pub const ENV_UNIQUE_SKU: &str = "NEXUS_UNIQUE_SKU";
pub const ENV_AUDIT_CAPACITY: &str = "NEXUS_AUDIT_CAPACITY";
pub const ENV_DATA_DIR: &str = "NEXUS_DATA_DIR";
pub const ENV_INSIGHT_TIMEOUT_SECS: &str = "NEXUS_INSIGHT_TIMEOUT_SECS";
pub const ENV_INSIGHT_EXPIRY_DAYS: &str = "NEXUS_INSIGHT_EXPIRY_DAYS";

const DEFAULT_INSIGHT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_INSIGHT_EXPIRY_DAYS: i64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub policy: LedgerPolicy,
    /// Directory for the file-backed store. `None` keeps state in memory only.
    pub data_dir: Option<PathBuf>,
    pub insight_timeout: Duration,
    /// Items expiring within this many days count as stockout risks.
    pub insight_expiry_days: i64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            policy: LedgerPolicy::default(),
            data_dir: None,
            insight_timeout: DEFAULT_INSIGHT_TIMEOUT,
            insight_expiry_days: DEFAULT_INSIGHT_EXPIRY_DAYS,
        }
    }
}

impl ConsoleConfig {
    /// Read configuration from `NEXUS_*` environment variables. Unset variables keep
    /// their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ConsoleConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConsoleConfig::default();

        if let Some(raw) = lookup(ENV_NEGATIVE_STOCK) {
            let policy: NegativeStockPolicy = raw
                .parse()
                .map_err(|e| ConfigError::invalid(ENV_NEGATIVE_STOCK, &raw, e))?;
            config.policy = config.policy.with_negative_stock(policy);
        }

        if let Some(raw) = lookup(ENV_UNIQUE_SKU) {
            config.policy = config
                .policy
                .with_unique_sku(parse_bool(ENV_UNIQUE_SKU, &raw)?);
        }

        if let Some(raw) = lookup(ENV_AUDIT_CAPACITY) {
            let capacity: usize = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid(ENV_AUDIT_CAPACITY, &raw, e))?;
            if capacity == 0 {
                return Err(ConfigError::invalid(
                    ENV_AUDIT_CAPACITY,
                    &raw,
                    "capacity must be at least 1",
                ));
            }
            config.policy = config.policy.with_audit_capacity(capacity);
        }

        if let Some(raw) = lookup(ENV_DATA_DIR) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                config.data_dir = Some(PathBuf::from(trimmed));
            }
        }

        if let Some(raw) = lookup(ENV_INSIGHT_TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid(ENV_INSIGHT_TIMEOUT_SECS, &raw, e))?;
            config.insight_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup(ENV_INSIGHT_EXPIRY_DAYS) {
            let days: i64 = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid(ENV_INSIGHT_EXPIRY_DAYS, &raw, e))?;
            if days < 0 {
                return Err(ConfigError::invalid(
                    ENV_INSIGHT_EXPIRY_DAYS,
                    &raw,
                    "window cannot be negative",
                ));
            }
            config.insight_expiry_days = days;
        }

        Ok(config)
    }

    pub fn audit_capacity(&self) -> usize {
        self.policy.audit_capacity
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, raw, "expected a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ConsoleConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConsoleConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.audit_capacity(), DEFAULT_AUDIT_CAPACITY);
        assert_eq!(config.policy.negative_stock, NegativeStockPolicy::Reject);
        assert!(config.policy.unique_sku);
        assert_eq!(config.insight_timeout, Duration::from_secs(30));
        assert_eq!(config.insight_expiry_days, 30);
    }

    #[test]
    fn reads_every_variable() {
        let config = load(&[
            (ENV_NEGATIVE_STOCK, "Backorder"),
            (ENV_UNIQUE_SKU, "off"),
            (ENV_AUDIT_CAPACITY, "25"),
            (ENV_DATA_DIR, "/tmp/nexus"),
            (ENV_INSIGHT_TIMEOUT_SECS, "5"),
            (ENV_INSIGHT_EXPIRY_DAYS, "7"),
        ])
        .unwrap();

        assert_eq!(config.policy.negative_stock, NegativeStockPolicy::Backorder);
        assert!(!config.policy.unique_sku);
        assert_eq!(config.audit_capacity(), 25);
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/nexus")));
        assert_eq!(config.insight_timeout, Duration::from_secs(5));
        assert_eq!(config.insight_expiry_days, 7);
    }

    #[test]
    fn rejects_invalid_values() {
        for (key, value) in [
            (ENV_NEGATIVE_STOCK, "sometimes"),
            (ENV_UNIQUE_SKU, "maybe"),
            (ENV_AUDIT_CAPACITY, "0"),
            (ENV_AUDIT_CAPACITY, "-4"),
            (ENV_INSIGHT_TIMEOUT_SECS, "soon"),
            (ENV_INSIGHT_EXPIRY_DAYS, "-1"),
        ] {
            match load(&[(key, value)]) {
                Err(ConfigError::Invalid { key: k, .. }) => assert_eq!(k, key),
                other => panic!("Expected invalid {key}, got {other:?}"),
            }
        }
    }
}
