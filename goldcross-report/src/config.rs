//! Serializable run configuration.
//!
//! A `RunConfig` captures everything needed to reproduce a run: the input
//! file, starting cash, strategy parameters, and the free-text report header
//! fields. Loadable from a TOML file; CLI flags override individual fields.

use goldcross_core::StrategyParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {reason}")]
    Invalid { reason: String },
}

/// Configuration for a single backtest-and-report run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Input CSV file.
    #[serde(default = "default_data")]
    pub data: PathBuf,

    /// Broker starting cash.
    #[serde(default = "default_starting_cash")]
    pub starting_cash: f64,

    /// Report header: the user running the backtest.
    #[serde(default)]
    pub user: String,

    /// Report header: free-text memo.
    #[serde(default)]
    pub memo: String,

    /// Strategy parameters.
    #[serde(default)]
    pub strategy: StrategyParams,
}

fn default_data() -> PathBuf {
    PathBuf::from("sampledata/btc_usd.csv")
}

fn default_starting_cash() -> f64 {
    100.0
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data: default_data(),
            starting_cash: default_starting_cash(),
            user: String::new(),
            memo: String::new(),
            strategy: StrategyParams::default(),
        }
    }
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| Err(ConfigError::Invalid { reason });
        if self.strategy.fast < 1 {
            return invalid("strategy.fast must be >= 1".into());
        }
        if self.strategy.slow <= self.strategy.fast {
            return invalid(format!(
                "strategy.slow ({}) must be greater than strategy.fast ({})",
                self.strategy.slow, self.strategy.fast
            ));
        }
        if !(self.strategy.order_pct > 0.0 && self.strategy.order_pct <= 1.0) {
            return invalid("strategy.order_pct must be in (0, 1]".into());
        }
        if !(self.starting_cash > 0.0) {
            return invalid("starting_cash must be positive".into());
        }
        Ok(())
    }

    /// Deterministic content hash of this configuration, shown in the report
    /// footer so a report can be traced back to the run that produced it.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).expect("RunConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
