//! Node configuration file.
//!
//! One TOML file at `<home>/config.toml` with a `[client]` section (what the
//! operator-facing commands need) and an `[app]` section (the server-side
//! option source consumed by policy resolution). The file is written with
//! seeded defaults on first run so a fresh home starts a node without any
//! manual configuration — including a non-empty minimum gas price.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use basalt_policy::DEFAULT_MIN_GAS_PRICE;

use crate::error::{CliError, CliResult};

/// Default chain identifier for a locally initialized node.
pub const DEFAULT_CHAIN_ID: &str = "basalt-local-1";

/// Node configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Client-side settings.
    pub client: ClientConfig,
    /// Server-side runtime options.
    pub app: AppConfig,
}

impl NodeConfig {
    /// Load configuration from a file, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load the config, writing the seeded defaults first if no file exists
    /// yet. Returns the config and whether the file was created.
    pub fn load_or_init(path: &Path) -> CliResult<(Self, bool)> {
        if path.exists() {
            return Ok((Self::load(path)?, false));
        }
        let config = Self::default();
        config.save(path)?;
        Ok((config, true))
    }
}

/// Client-side settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// The network chain ID.
    pub chain_id: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID.to_string(),
        }
    }
}

/// Server-side runtime options.
///
/// Field names double as option-bag keys; [`AppConfig::to_table`] turns the
/// section into the file layer of the option bag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Minimum gas price. Seeded non-empty so operators are not forced to
    /// configure one; upstream frameworks leave this empty and refuse to
    /// start until every validator sets it.
    pub minimum_gas_prices: String,
    /// Pruning strategy.
    pub pruning: String,
    /// Custom pruning: blocks between pruning passes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pruning_interval: Option<u64>,
    /// Custom pruning: recent versions always retained.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pruning_keep_recent: Option<u64>,
    /// Custom pruning: periodic version retained forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pruning_keep_every: Option<u64>,
    /// Halt height (0 = disabled).
    pub halt_height: u64,
    /// Halt time as unix seconds (0 = disabled).
    pub halt_time: u64,
    /// Whether the inter-block read cache is constructed.
    pub inter_block_cache: bool,
    /// Upgrade heights to skip without a handler.
    pub unsafe_skip_upgrades: Vec<i64>,
    /// Event type names to index.
    pub index_events: Vec<String>,
    /// Blocks between state-sync snapshots (0 = disabled).
    pub snapshot_interval: u64,
    /// Recent snapshots retained.
    pub snapshot_keep_recent: u64,
    /// Minimum recent blocks retained regardless of pruning (0 = all).
    pub min_retain_blocks: u64,
    /// Blocks between invariant checks (0 = disabled).
    pub inv_check_period: u64,
    /// Record full traces to the trace sink.
    pub trace: bool,
    /// Milliseconds between blocks in the dev run loop.
    pub block_time_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            minimum_gas_prices: DEFAULT_MIN_GAS_PRICE.to_string(),
            pruning: "default".to_string(),
            pruning_interval: None,
            pruning_keep_recent: None,
            pruning_keep_every: None,
            halt_height: 0,
            halt_time: 0,
            inter_block_cache: true,
            unsafe_skip_upgrades: Vec::new(),
            index_events: Vec::new(),
            snapshot_interval: 0,
            snapshot_keep_recent: 2,
            min_retain_blocks: 0,
            inv_check_period: 0,
            trace: false,
            block_time_ms: 1000,
        }
    }
}

impl AppConfig {
    /// Render this section as an option-bag table.
    pub fn to_table(&self) -> CliResult<toml::Table> {
        let value = toml::Value::try_from(self)
            .map_err(|e| CliError::config(format!("Failed to encode app options: {}", e)))?;
        match value {
            toml::Value::Table(table) => Ok(table),
            _ => Err(CliError::config("app options did not encode as a table")),
        }
    }
}

/// Get the default home directory for basalt data.
///
/// Priority:
/// 1. `BASALTD_HOME` environment variable (if set)
/// 2. Platform-specific data directory
/// 3. Fallback to `$HOME/.basalt`
pub fn default_home() -> PathBuf {
    if let Ok(dir) = std::env::var("BASALTD_HOME") {
        return PathBuf::from(dir);
    }

    directories::ProjectDirs::from("io", "basalt", "basaltd")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".basalt")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = NodeConfig::default();
        assert_eq!(config.client.chain_id, DEFAULT_CHAIN_ID);
        assert_eq!(config.app.pruning, "default");
        assert!(config.app.inter_block_cache);
        assert_eq!(config.app.snapshot_interval, 0);
    }

    /// The seeded file must carry a non-empty minimum gas price; an operator
    /// who never edits the config still gets a node that starts.
    #[test]
    fn test_seeded_min_gas_price_is_non_empty() {
        let config = NodeConfig::default();
        assert_eq!(config.app.minimum_gas_prices, "0ubas");
        assert!(!config.app.minimum_gas_prices.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = NodeConfig::default();
        config.client.chain_id = "basalt-test-7".to_string();
        config.app.halt_height = 99;
        config.save(&path).unwrap();

        let loaded = NodeConfig::load(&path).unwrap();
        assert_eq!(loaded.client.chain_id, "basalt-test-7");
        assert_eq!(loaded.app.halt_height, 99);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let config = NodeConfig::load(Path::new("/tmp/basalt_nonexistent_4921/config.toml"))
            .unwrap();
        assert_eq!(config.client.chain_id, DEFAULT_CHAIN_ID);
    }

    #[test]
    fn test_load_or_init_writes_seeded_file_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let (_, created) = NodeConfig::load_or_init(&path).unwrap();
        assert!(created);
        assert!(path.exists());

        let (_, created) = NodeConfig::load_or_init(&path).unwrap();
        assert!(!created);
    }

    #[test]
    fn test_app_section_renders_as_option_table() {
        let config = NodeConfig::default();
        let table = config.app.to_table().unwrap();
        assert_eq!(
            table.get("minimum_gas_prices").and_then(|v| v.as_str()),
            Some("0ubas")
        );
        // Unset custom pruning fields stay absent so resolver defaults apply.
        assert!(!table.contains_key("pruning_interval"));
    }

    #[test]
    fn test_option_table_feeds_policy_resolution() {
        let mut config = NodeConfig::default();
        config.app.pruning = "custom".to_string();
        config.app.pruning_interval = Some(10);
        config.app.pruning_keep_recent = Some(100);
        config.app.pruning_keep_every = Some(0);

        let bag = basalt_policy::TomlBag::new(config.app.to_table().unwrap());
        let policy = basalt_policy::resolve(&bag).unwrap();
        assert!(matches!(
            policy.pruning,
            basalt_policy::PruningStrategy::Custom { interval: 10, .. }
        ));
    }

    #[test]
    fn test_default_home_is_not_empty() {
        assert!(!default_home().as_os_str().is_empty());
    }
}
