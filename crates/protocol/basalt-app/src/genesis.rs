//! Genesis file types.
//!
//! A genesis file carries the chain identity, the initial application state,
//! and the initial validator set. It seeds an empty store on first start and
//! is the output format of the genesis-file tooling that consumes exported
//! state.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GenesisError;

/// A validator identity with its consensus bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    /// Operator address.
    pub address: String,
    /// Voting power.
    pub power: u64,
    /// Whether the validator is jailed (excluded from consensus).
    #[serde(default)]
    pub jailed: bool,
    /// Height of the last power update.
    #[serde(default)]
    pub update_height: u64,
}

impl Validator {
    /// Create an active validator.
    pub fn new(address: impl Into<String>, power: u64) -> Self {
        Self {
            address: address.into(),
            power,
            jailed: false,
            update_height: 0,
        }
    }
}

/// The genesis document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    /// Chain identifier, e.g. `basalt-local-1`.
    pub chain_id: String,
    /// Initial application state: an object of opaque module entries.
    pub app_state: serde_json::Value,
    /// Initial validator set.
    pub validators: Vec<Validator>,
}

impl Genesis {
    /// Create an empty genesis for a chain.
    pub fn new(chain_id: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            app_state: serde_json::Value::Object(serde_json::Map::new()),
            validators: Vec::new(),
        }
    }

    /// Read and parse a genesis file.
    pub fn load(path: &Path) -> Result<Self, GenesisError> {
        let contents = std::fs::read_to_string(path)?;
        let genesis: Self = serde_json::from_str(&contents)?;
        Ok(genesis)
    }

    /// Write the genesis file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), GenesisError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Check structural rules: non-empty chain id, object-shaped app state,
    /// unique validator addresses, positive voting power.
    pub fn validate(&self) -> Result<(), GenesisError> {
        if self.chain_id.is_empty() {
            return Err(GenesisError::Invalid("chain_id is empty".to_string()));
        }
        if !self.app_state.is_object() {
            return Err(GenesisError::Invalid(
                "app_state must be a JSON object".to_string(),
            ));
        }
        let mut seen = BTreeSet::new();
        for validator in &self.validators {
            if validator.power == 0 {
                return Err(GenesisError::Invalid(format!(
                    "validator {} has zero power",
                    validator.address
                )));
            }
            if !seen.insert(&validator.address) {
                return Err(GenesisError::Invalid(format!(
                    "duplicate validator address {}",
                    validator.address
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Genesis {
        let mut genesis = Genesis::new("basalt-test-1");
        genesis.validators.push(Validator::new("basval1", 10));
        genesis.app_state = serde_json::json!({ "bank": { "basval1": "1000ubas" } });
        genesis
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config").join("genesis.json");

        let genesis = sample();
        genesis.save(&path).unwrap();
        let loaded = Genesis::load(&path).unwrap();
        assert_eq!(genesis, loaded);
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_chain_id() {
        let mut genesis = sample();
        genesis.chain_id.clear();
        assert!(genesis.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_power() {
        let mut genesis = sample();
        genesis.validators.push(Validator::new("basval2", 0));
        assert!(genesis.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_address() {
        let mut genesis = sample();
        genesis.validators.push(Validator::new("basval1", 5));
        let err = genesis.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }
}
