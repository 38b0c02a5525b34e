//! Execution context threaded through the command tree.
//!
//! The context is primed exactly once per invocation, before dispatch:
//! persistent flags are merged first, then the discovered config file fills
//! in whatever the flags left unset — a file value never overrides a flag
//! the operator typed. Sealing is type-level: [`Context`] exposes only
//! getters, so nothing downstream can mutate what the pre-dispatch hook
//! established.

use std::path::{Path, PathBuf};

use clap::ArgMatches;
use tracing::info;

use crate::config::{default_home, NodeConfig};
use crate::error::CliResult;

/// Mutable-until-sealed accumulator for the execution context.
#[derive(Debug, Default)]
pub struct ContextBuilder {
    home: Option<PathBuf>,
    chain_id: Option<String>,
}

impl ContextBuilder {
    /// Start with nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the home directory explicitly.
    pub fn home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Set the chain ID explicitly.
    pub fn chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = Some(chain_id.into());
        self
    }

    /// Merge persistent flags from the matched leaf.
    ///
    /// No persistent flag carries a clap default, so a present value was
    /// typed by the operator and takes precedence over anything merged
    /// later. `try_get_one` tolerates sub-trees that don't register a flag
    /// (only `query` and `tx` own `--chain-id`).
    pub fn merge_flags(mut self, leaf: &ArgMatches) -> Self {
        if self.home.is_none() {
            if let Ok(Some(home)) = leaf.try_get_one::<String>("home") {
                self.home = Some(PathBuf::from(home));
            }
        }
        if self.chain_id.is_none() {
            if let Ok(Some(chain_id)) = leaf.try_get_one::<String>("chain_id") {
                self.chain_id = Some(chain_id.clone());
            }
        }
        self
    }

    /// Merge config-file values into fields the flags left unset.
    pub fn merge_config(mut self, config: &NodeConfig) -> Self {
        if self.chain_id.is_none() && !config.client.chain_id.is_empty() {
            self.chain_id = Some(config.client.chain_id.clone());
        }
        self
    }

    /// The home this builder will seal with.
    pub fn resolved_home(&self) -> PathBuf {
        self.home.clone().unwrap_or_else(default_home)
    }

    /// Seal into an immutable context.
    pub fn seal(self, config: NodeConfig) -> Context {
        Context {
            home: self.resolved_home(),
            chain_id: self.chain_id.unwrap_or_default(),
            config,
        }
    }
}

/// Immutable per-invocation execution context.
///
/// Created by the pre-dispatch hook and handed to every leaf command; never
/// shared across invocations (the daemon runs one command per process).
pub struct Context {
    home: PathBuf,
    chain_id: String,
    config: NodeConfig,
}

impl Context {
    /// The pre-dispatch hook: merge flags, discover (and seed on first run)
    /// the config file, merge its values, and seal.
    pub fn prime(leaf: &ArgMatches) -> CliResult<Self> {
        let builder = ContextBuilder::new().merge_flags(leaf);
        let home = builder.resolved_home();

        let config_path = home.join("config.toml");
        let (config, created) = NodeConfig::load_or_init(&config_path)?;
        if created {
            info!(path = %config_path.display(), "wrote default node configuration");
        }

        Ok(builder.merge_config(&config).seal(config))
    }

    /// Home directory.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Resolved chain ID (flag first, then config file).
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// The node configuration.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Path of the config file.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Path of the genesis file.
    pub fn genesis_path(&self) -> PathBuf {
        self.home.join("genesis.json")
    }

    /// Path of the store database.
    pub fn db_path(&self) -> PathBuf {
        self.home.join("data").join("basalt.db")
    }

    /// Directory holding keyring entries.
    pub fn keyring_dir(&self) -> PathBuf {
        self.home.join("keyring")
    }
}
