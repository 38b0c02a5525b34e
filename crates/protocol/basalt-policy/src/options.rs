//! Typed accessors over untyped option sources.
//!
//! Runtime options arrive from heterogeneous sources (command-line flags, a
//! TOML config file, defaults baked into the binary). The [`OptionBag`] trait
//! is the narrow seam between those sources and policy resolution: typed
//! getters that coerce where a human would expect coercion (an integer
//! written as a string still parses) and fail loudly where they would not.

use toml::Value;

use crate::error::{ConfigError, Result};

/// Well-known option keys.
///
/// Flag names map onto these by replacing `-` with `_`, so `--halt-height`
/// and the `halt_height` config entry address the same option.
pub mod keys {
    /// Pruning strategy: `default`, `nothing`, `everything`, or `custom`.
    pub const PRUNING: &str = "pruning";
    /// Block interval between pruning passes (custom strategy).
    pub const PRUNING_INTERVAL: &str = "pruning_interval";
    /// Number of recent versions always retained (custom strategy).
    pub const PRUNING_KEEP_RECENT: &str = "pruning_keep_recent";
    /// Periodic version retained forever, 0 to disable (custom strategy).
    pub const PRUNING_KEEP_EVERY: &str = "pruning_keep_every";
    /// Heights at which scheduled upgrades are skipped without a handler.
    pub const UNSAFE_SKIP_UPGRADES: &str = "unsafe_skip_upgrades";
    /// Minimum gas price accepted by the validator, e.g. `0.025ubas`.
    pub const MINIMUM_GAS_PRICES: &str = "minimum_gas_prices";
    /// Height at which the node halts gracefully (0 = disabled).
    pub const HALT_HEIGHT: &str = "halt_height";
    /// Unix time at which the node halts gracefully (0 = disabled).
    pub const HALT_TIME: &str = "halt_time";
    /// Whether the inter-block read cache is constructed.
    pub const INTER_BLOCK_CACHE: &str = "inter_block_cache";
    /// Blocks between state-sync snapshots (0 = disabled).
    pub const SNAPSHOT_INTERVAL: &str = "snapshot_interval";
    /// Number of recent snapshots retained.
    pub const SNAPSHOT_KEEP_RECENT: &str = "snapshot_keep_recent";
    /// Event type names the node indexes.
    pub const INDEX_EVENTS: &str = "index_events";
    /// Minimum number of recent blocks the store must retain (0 = all).
    pub const MIN_RETAIN_BLOCKS: &str = "min_retain_blocks";
    /// Blocks between invariant checks (0 = disabled).
    pub const INV_CHECK_PERIOD: &str = "inv_check_period";
    /// Whether full error traces are recorded to the trace sink.
    pub const TRACE: &str = "trace";
}

/// Read-only typed view over loosely-typed runtime options.
///
/// Absent keys resolve to `Ok(None)` — callers apply documented defaults.
/// Only a value that exists and cannot be coerced is an error, reported
/// with the offending key.
pub trait OptionBag {
    /// Get a string value.
    fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Get a boolean value.
    fn get_bool(&self, key: &str) -> Result<Option<bool>>;

    /// Get a non-negative integer value.
    fn get_u64(&self, key: &str) -> Result<Option<u64>>;

    /// Get a list of (possibly negative) integers.
    fn get_i64_list(&self, key: &str) -> Result<Option<Vec<i64>>>;

    /// Get a list of strings.
    fn get_string_list(&self, key: &str) -> Result<Option<Vec<String>>>;
}

/// [`OptionBag`] over a TOML table — the config-file source.
#[derive(Debug, Clone, Default)]
pub struct TomlBag {
    table: toml::Table,
}

impl TomlBag {
    /// Wrap a TOML table.
    pub fn new(table: toml::Table) -> Self {
        Self { table }
    }

    fn value(&self, key: &str) -> Option<&Value> {
        self.table.get(key)
    }
}

impl OptionBag for TomlBag {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        match self.value(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(ConfigError::coerce(key, "string")),
        }
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.value(key) {
            None => Ok(None),
            Some(Value::Boolean(b)) => Ok(Some(*b)),
            Some(Value::String(s)) => s
                .parse::<bool>()
                .map(Some)
                .map_err(|_| ConfigError::coerce(key, "boolean")),
            Some(_) => Err(ConfigError::coerce(key, "boolean")),
        }
    }

    fn get_u64(&self, key: &str) -> Result<Option<u64>> {
        match self.value(key) {
            None => Ok(None),
            Some(Value::Integer(i)) if *i >= 0 => Ok(Some(*i as u64)),
            Some(Value::String(s)) => s
                .parse::<u64>()
                .map(Some)
                .map_err(|_| ConfigError::coerce(key, "non-negative integer")),
            Some(_) => Err(ConfigError::coerce(key, "non-negative integer")),
        }
    }

    fn get_i64_list(&self, key: &str) -> Result<Option<Vec<i64>>> {
        let values = match self.value(key) {
            None => return Ok(None),
            Some(Value::Array(values)) => values,
            Some(_) => return Err(ConfigError::coerce(key, "list of integers")),
        };
        let mut out = Vec::with_capacity(values.len());
        for value in values {
            match value {
                Value::Integer(i) => out.push(*i),
                Value::String(s) => out.push(
                    s.parse::<i64>()
                        .map_err(|_| ConfigError::coerce(key, "list of integers"))?,
                ),
                _ => return Err(ConfigError::coerce(key, "list of integers")),
            }
        }
        Ok(Some(out))
    }

    fn get_string_list(&self, key: &str) -> Result<Option<Vec<String>>> {
        let values = match self.value(key) {
            None => return Ok(None),
            Some(Value::Array(values)) => values,
            Some(_) => return Err(ConfigError::coerce(key, "list of strings")),
        };
        let mut out = Vec::with_capacity(values.len());
        for value in values {
            match value {
                Value::String(s) => out.push(s.clone()),
                _ => return Err(ConfigError::coerce(key, "list of strings")),
            }
        }
        Ok(Some(out))
    }
}

/// [`OptionBag`] layering several sources; the first layer holding a key wins.
///
/// Used to express precedence: explicit command-line flags go in front of the
/// config file, so a flag the operator typed is never overridden by a file
/// value. A malformed value in any consulted layer is still an error.
pub struct LayeredBag {
    layers: Vec<Box<dyn OptionBag>>,
}

impl LayeredBag {
    /// Compose layers, highest precedence first.
    pub fn new(layers: Vec<Box<dyn OptionBag>>) -> Self {
        Self { layers }
    }

    fn first<T>(
        &self,
        get: impl Fn(&dyn OptionBag) -> Result<Option<T>>,
    ) -> Result<Option<T>> {
        for layer in &self.layers {
            if let Some(value) = get(layer.as_ref())? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

impl OptionBag for LayeredBag {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        self.first(|bag| bag.get_string(key))
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        self.first(|bag| bag.get_bool(key))
    }

    fn get_u64(&self, key: &str) -> Result<Option<u64>> {
        self.first(|bag| bag.get_u64(key))
    }

    fn get_i64_list(&self, key: &str) -> Result<Option<Vec<i64>>> {
        self.first(|bag| bag.get_i64_list(key))
    }

    fn get_string_list(&self, key: &str) -> Result<Option<Vec<String>>> {
        self.first(|bag| bag.get_string_list(key))
    }
}
