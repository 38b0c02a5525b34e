//! The runtime policy and its resolver.

use std::collections::BTreeSet;

use crate::error::{ConfigError, Result};
use crate::options::{keys, OptionBag};

/// Base denomination of the chain's fee token.
pub const BASE_DENOM: &str = "ubas";

/// Minimum gas price used when the operator sets none.
///
/// Upstream node frameworks default this to the empty string and refuse to
/// start until every validator configures a value. Basalt instead seeds a
/// zero price so operators are not forced to configure a minimum.
pub const DEFAULT_MIN_GAS_PRICE: &str = "0ubas";

/// Pruning interval for the `default` and `everything` strategies.
pub const DEFAULT_PRUNING_INTERVAL: u64 = 10;
/// Versions retained by the `default` strategy.
pub const DEFAULT_PRUNING_KEEP_RECENT: u64 = 100;
/// Periodic version retained forever by the `default` strategy.
pub const DEFAULT_PRUNING_KEEP_EVERY: u64 = 100;

/// Historical-state retention strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruningStrategy {
    /// Keep the last [`DEFAULT_PRUNING_KEEP_RECENT`] versions and every
    /// [`DEFAULT_PRUNING_KEEP_EVERY`]th version, pruning every
    /// [`DEFAULT_PRUNING_INTERVAL`] blocks.
    Default,
    /// Keep every version forever (archive node).
    Nothing,
    /// Keep only the current version.
    Everything,
    /// Operator-supplied retention parameters.
    Custom {
        /// Blocks between pruning passes.
        interval: u64,
        /// Recent versions always retained.
        keep_recent: u64,
        /// Periodic version retained forever (0 = none).
        keep_every: u64,
    },
}

impl PruningStrategy {
    /// Blocks between pruning passes (0 for strategies that never prune).
    pub fn interval(&self) -> u64 {
        match self {
            PruningStrategy::Default | PruningStrategy::Everything => DEFAULT_PRUNING_INTERVAL,
            PruningStrategy::Nothing => 0,
            PruningStrategy::Custom { interval, .. } => *interval,
        }
    }

    /// Recent versions always retained.
    pub fn keep_recent(&self) -> u64 {
        match self {
            PruningStrategy::Default => DEFAULT_PRUNING_KEEP_RECENT,
            PruningStrategy::Nothing => u64::MAX,
            PruningStrategy::Everything => 0,
            PruningStrategy::Custom { keep_recent, .. } => *keep_recent,
        }
    }

    /// Periodic version retained forever (0 = none).
    pub fn keep_every(&self) -> u64 {
        match self {
            PruningStrategy::Default => DEFAULT_PRUNING_KEEP_EVERY,
            PruningStrategy::Nothing | PruningStrategy::Everything => 0,
            PruningStrategy::Custom { keep_every, .. } => *keep_every,
        }
    }

    /// Whether this strategy ever discards versions.
    pub fn prunes(&self) -> bool {
        !matches!(self, PruningStrategy::Nothing)
    }
}

/// Validated, immutable runtime policy for one process lifetime.
///
/// Constructed once by [`resolve`] and consumed by the application factory;
/// nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePolicy {
    /// Historical-state retention strategy.
    pub pruning: PruningStrategy,
    /// Heights whose scheduled upgrades are skipped without a handler.
    pub skip_upgrade_heights: BTreeSet<u64>,
    /// Minimum gas price, decimal-tagged (`0.025ubas`). Never empty.
    pub min_gas_price: String,
    /// Height at which the node halts gracefully (0 = disabled).
    pub halt_height: u64,
    /// Unix time at which the node halts gracefully (0 = disabled).
    pub halt_time: u64,
    /// Whether the inter-block read cache is constructed.
    pub inter_block_cache: bool,
    /// Blocks between state-sync snapshots (0 = disabled).
    pub snapshot_interval: u64,
    /// Number of recent snapshots retained.
    pub snapshot_keep_recent: u64,
    /// Whether a snapshot store is constructed at all.
    ///
    /// No snapshot subsystem is wired yet; this stays `false` regardless of
    /// the interval so the recognized-but-inactive state survives refactors.
    pub snapshot_store_enabled: bool,
    /// Event type names the node indexes.
    pub indexed_events: BTreeSet<String>,
    /// Minimum number of recent blocks the store must retain (0 = all).
    pub min_retain_blocks: u64,
    /// Blocks between invariant checks (0 = disabled).
    pub inv_check_period: u64,
    /// Whether full error traces are recorded to the trace sink.
    pub trace: bool,
}

impl Default for RuntimePolicy {
    /// The policy an empty option bag resolves to.
    fn default() -> Self {
        Self {
            pruning: PruningStrategy::Default,
            skip_upgrade_heights: BTreeSet::new(),
            min_gas_price: DEFAULT_MIN_GAS_PRICE.to_string(),
            halt_height: 0,
            halt_time: 0,
            inter_block_cache: true,
            snapshot_interval: 0,
            snapshot_keep_recent: 2,
            snapshot_store_enabled: SNAPSHOT_STORE_WIRED,
            indexed_events: BTreeSet::new(),
            min_retain_blocks: 0,
            inv_check_period: 0,
            trace: false,
        }
    }
}

/// No snapshot subsystem exists to receive snapshots yet; the policy records
/// the operator's snapshot fields but activation stays off.
const SNAPSHOT_STORE_WIRED: bool = false;

/// Resolve a runtime policy from an option bag.
///
/// Total over well-formed bags: absent keys take their documented defaults
/// and never fail. Malformed values fail with a [`ConfigError`] naming the
/// offending key. Pure — no side effects, deterministic.
pub fn resolve(bag: &dyn OptionBag) -> Result<RuntimePolicy> {
    Ok(RuntimePolicy {
        pruning: resolve_pruning(bag)?,
        skip_upgrade_heights: resolve_skip_heights(bag)?,
        min_gas_price: resolve_min_gas_price(bag)?,
        halt_height: bag.get_u64(keys::HALT_HEIGHT)?.unwrap_or(0),
        halt_time: bag.get_u64(keys::HALT_TIME)?.unwrap_or(0),
        inter_block_cache: bag.get_bool(keys::INTER_BLOCK_CACHE)?.unwrap_or(true),
        snapshot_interval: bag.get_u64(keys::SNAPSHOT_INTERVAL)?.unwrap_or(0),
        snapshot_keep_recent: bag.get_u64(keys::SNAPSHOT_KEEP_RECENT)?.unwrap_or(2),
        snapshot_store_enabled: SNAPSHOT_STORE_WIRED,
        indexed_events: bag
            .get_string_list(keys::INDEX_EVENTS)?
            .unwrap_or_default()
            .into_iter()
            .collect(),
        min_retain_blocks: bag.get_u64(keys::MIN_RETAIN_BLOCKS)?.unwrap_or(0),
        inv_check_period: bag.get_u64(keys::INV_CHECK_PERIOD)?.unwrap_or(0),
        trace: bag.get_bool(keys::TRACE)?.unwrap_or(false),
    })
}

/// The pruning fields are read as a cohesive group: a `custom` strategy
/// requires all three numeric sub-fields.
fn resolve_pruning(bag: &dyn OptionBag) -> Result<PruningStrategy> {
    let strategy = bag
        .get_string(keys::PRUNING)?
        .unwrap_or_else(|| "default".to_string());

    match strategy.as_str() {
        "default" | "" => Ok(PruningStrategy::Default),
        "nothing" => Ok(PruningStrategy::Nothing),
        "everything" => Ok(PruningStrategy::Everything),
        "custom" => Ok(PruningStrategy::Custom {
            interval: require_u64(bag, keys::PRUNING_INTERVAL)?,
            keep_recent: require_u64(bag, keys::PRUNING_KEEP_RECENT)?,
            keep_every: require_u64(bag, keys::PRUNING_KEEP_EVERY)?,
        }),
        other => Err(ConfigError::UnknownPruningStrategy(other.to_string())),
    }
}

fn require_u64(bag: &dyn OptionBag, key: &'static str) -> Result<u64> {
    bag.get_u64(key)?
        .ok_or(ConfigError::MissingPruningField(key))
}

/// Duplicates collapse; negative heights are rejected.
fn resolve_skip_heights(bag: &dyn OptionBag) -> Result<BTreeSet<u64>> {
    let mut heights = BTreeSet::new();
    for height in bag
        .get_i64_list(keys::UNSAFE_SKIP_UPGRADES)?
        .unwrap_or_default()
    {
        if height < 0 {
            return Err(ConfigError::NegativeUpgradeHeight(height));
        }
        heights.insert(height as u64);
    }
    Ok(heights)
}

fn resolve_min_gas_price(bag: &dyn OptionBag) -> Result<String> {
    match bag.get_string(keys::MINIMUM_GAS_PRICES)? {
        None => Ok(DEFAULT_MIN_GAS_PRICE.to_string()),
        Some(raw) if raw.is_empty() => Ok(DEFAULT_MIN_GAS_PRICE.to_string()),
        Some(raw) => {
            for coin in raw.split(',') {
                validate_gas_coin(coin.trim())
                    .ok_or_else(|| ConfigError::MalformedGasPrice(raw.clone()))?;
            }
            Ok(raw)
        }
    }
}

/// A gas coin is a decimal amount immediately followed by a denomination,
/// e.g. `0.025ubas`. Returns `None` if the shape is wrong.
fn validate_gas_coin(coin: &str) -> Option<()> {
    let denom_start = coin.find(|c: char| c.is_ascii_alphabetic())?;
    let (amount, denom) = coin.split_at(denom_start);
    amount.parse::<f64>().ok().filter(|a| *a >= 0.0)?;
    if denom.chars().all(|c| c.is_ascii_alphanumeric()) && !denom.is_empty() {
        Some(())
    } else {
        None
    }
}
