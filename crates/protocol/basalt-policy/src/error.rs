//! Error types for option access and policy resolution.

use thiserror::Error;

/// Result type alias for policy operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors produced while reading options or resolving the runtime policy.
///
/// Every variant names the offending key or value so the operator can fix
/// the configuration without spelunking.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A value exists under the key but cannot be coerced to the needed type.
    #[error("option `{key}` is not a valid {expected}")]
    Coerce {
        /// The option key that held the bad value.
        key: String,
        /// Human-readable description of the expected type.
        expected: &'static str,
    },

    /// The pruning strategy string is not one of the known strategies.
    #[error("unknown pruning strategy `{0}` (expected default, nothing, everything, or custom)")]
    UnknownPruningStrategy(String),

    /// Custom pruning was selected but a numeric sub-field is missing.
    #[error("custom pruning requires option `{0}`")]
    MissingPruningField(&'static str),

    /// An upgrade-skip height is negative.
    #[error("option `unsafe_skip_upgrades` contains negative height {0}")]
    NegativeUpgradeHeight(i64),

    /// The minimum gas price is present but not a decimal-tagged amount.
    #[error("minimum gas price `{0}` is malformed (expected e.g. \"0.025ubas\")")]
    MalformedGasPrice(String),
}

impl ConfigError {
    /// Create a coercion error for the given key.
    pub fn coerce(key: impl Into<String>, expected: &'static str) -> Self {
        ConfigError::Coerce {
            key: key.into(),
            expected,
        }
    }
}
