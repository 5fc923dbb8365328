//! Session configuration.
//!
//! Defaults first, then `RETAILDESK_*` environment variables. The binary may
//! override individual fields from its own flags afterwards.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use retaildesk_inventory::{StockPolicy, DEFAULT_LOW_STOCK_THRESHOLD};

pub const ENV_SEED: &str = "RETAILDESK_SEED";
pub const ENV_LOW_STOCK_THRESHOLD: &str = "RETAILDESK_LOW_STOCK_THRESHOLD";
pub const ENV_STOCK_POLICY: &str = "RETAILDESK_STOCK_POLICY";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Which set of literal rows a fresh session starts with.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedVariant {
    /// Suppliers ABC Traders / XYZ Foods and five seed sales in August 2025.
    #[default]
    Classic,
    /// Suppliers Fresh Farms / Oil Depot and an empty sales ledger.
    Sidebar,
}

impl FromStr for SeedVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(SeedVariant::Classic),
            "sidebar" => Ok(SeedVariant::Sidebar),
            other => Err(format!("unknown seed variant {other:?} (expected classic|sidebar)")),
        }
    }
}

fn parse_policy(s: &str) -> Result<StockPolicy, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "allow" | "allow_negative" => Ok(StockPolicy::AllowNegative),
        "reject" | "reject_negative" => Ok(StockPolicy::RejectNegative),
        other => Err(format!("unknown stock policy {other:?} (expected allow|reject)")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub seed: SeedVariant,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
    #[serde(default)]
    pub stock_policy: StockPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: SeedVariant::default(),
            low_stock_threshold: default_low_stock_threshold(),
            stock_policy: StockPolicy::default(),
        }
    }
}

fn default_low_stock_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

impl SessionConfig {
    /// Defaults overridden by `RETAILDESK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SessionConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_SEED) {
            config.seed = raw
                .parse()
                .map_err(|reason: String| ConfigError::invalid(ENV_SEED, &raw, reason))?;
        }

        if let Some(raw) = lookup(ENV_LOW_STOCK_THRESHOLD) {
            config.low_stock_threshold = raw
                .trim()
                .parse()
                .map_err(|e: core::num::ParseIntError| {
                    ConfigError::invalid(ENV_LOW_STOCK_THRESHOLD, &raw, e.to_string())
                })?;
        }

        if let Some(raw) = lookup(ENV_STOCK_POLICY) {
            config.stock_policy = parse_policy(&raw)
                .map_err(|reason| ConfigError::invalid(ENV_STOCK_POLICY, &raw, reason))?;
        }

        Ok(config)
    }
}
