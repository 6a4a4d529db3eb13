//! Engine tuning knobs.
//!
//! Defaults reproduce the reference behaviour: one-cent tolerance,
//! two decimal places in reports and an `n²` simplifier pass cap.

use crate::core::money::{DISPLAY_SCALE, EPSILON};
use crate::settlement::simplify::PassCap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("epsilon must be non-negative, got {0}")]
    NegativeEpsilon(Decimal),
}

/// Configuration for a [`SettlementEngine`](crate::settlement::engine::SettlementEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Differences at or below this are treated as zero.
    pub epsilon: Decimal,
    /// Decimal places in the emitted report.
    pub scale: u32,
    /// Bound on transitive simplifier passes.
    pub pass_cap: PassCap,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            epsilon: EPSILON,
            scale: DISPLAY_SCALE,
            pass_cap: PassCap::Squared,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.epsilon < Decimal::ZERO {
            return Err(ConfigError::NegativeEpsilon(self.epsilon));
        }
        Ok(())
    }
}
