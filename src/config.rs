//! Chain configuration

use crate::constants::{COINBASE_VALUE, CUT_OFF_AGE};
use crate::error::{LedgerError, Result};
use crate::types::{Amount, Natural};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for a [`ChainState`](crate::chain::ChainState)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Generations behind the tip a block may still attach
    pub cut_off_age: Natural,
    /// Reward paid by each assembled block's coinbase
    pub coinbase_value: Amount,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            cut_off_age: CUT_OFF_AGE,
            coinbase_value: COINBASE_VALUE,
        }
    }
}

impl ChainConfig {
    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.coinbase_value < 0 {
            return Err(LedgerError::Config(format!(
                "coinbase_value must be non-negative, got {}",
                self.coinbase_value
            )));
        }
        Ok(())
    }
}
