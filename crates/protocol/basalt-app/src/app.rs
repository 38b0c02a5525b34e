//! Application instance construction and block-by-block execution surface.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use basalt_policy::RuntimePolicy;
use basalt_store::NodeStore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::cache::InterBlockCache;
use crate::error::AppError;
use crate::sender::Sender;
use crate::snapshot::SnapshotStore;

/// Reserved key prefix for system bookkeeping; excluded from exported
/// application state.
pub const RESERVED_PREFIX: &str = "sys/";

/// Working-state key holding the validator set.
pub const VALIDATORS_KEY: &str = "sys/validators";

/// Working-state key holding a scheduled upgrade plan.
pub const UPGRADE_PLAN_KEY: &str = "sys/upgrade";

/// Working-state key holding the chain identifier.
pub const CHAIN_ID_KEY: &str = "sys/chain_id";

/// A scheduled upgrade: execution halts at `height` unless a handler exists
/// or the height is in the policy's skip set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradePlan {
    /// Name of the upgrade.
    pub name: String,
    /// Height the upgrade activates at.
    pub height: u64,
}

/// One committed version of the working state.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    height: u64,
    app_hash: String,
    entries: Vec<(String, Vec<u8>)>,
}

/// Hooks invoked by the factory.
#[derive(Default)]
pub struct AppHooks {
    /// Called once, after the instance is fully constructed.
    pub on_built: Option<Box<dyn FnOnce(&App) + Send>>,
}

/// The live state-machine replica.
///
/// All policy knobs — halt conditions, pruning, minimum gas price, event
/// indexing, block retention — are applied at construction time and are not
/// adjustable afterwards. The instance exclusively owns its store for the
/// process lifetime.
pub struct App {
    policy: RuntimePolicy,
    store: NodeStore,
    sender: Arc<dyn Sender>,
    cache: Option<InterBlockCache>,
    snapshots: Option<SnapshotStore>,
    trace_sink: Option<Box<dyn Write + Send>>,
    height: u64,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("height", &self.height)
            .field("has_cache", &self.cache.is_some())
            .field("has_snapshots", &self.snapshots.is_some())
            .field("has_trace_sink", &self.trace_sink.is_some())
            .finish_non_exhaustive()
    }
}

impl App {
    /// Construct a running application instance.
    ///
    /// Fails only on an invalid policy (which resolution should already have
    /// rejected) or on store access — both fatal to startup; the caller
    /// surfaces the error and exits before any consensus participation.
    pub fn build(
        policy: RuntimePolicy,
        store: NodeStore,
        trace_sink: Option<Box<dyn Write + Send>>,
        sender: Arc<dyn Sender>,
        hooks: AppHooks,
    ) -> Result<Self, AppError> {
        if policy.min_gas_price.is_empty() {
            return Err(AppError::InvalidPolicy(
                "minimum gas price is empty".to_string(),
            ));
        }

        let cache = policy.inter_block_cache.then(InterBlockCache::new);

        // Snapshot fields are recognized but no snapshot subsystem is wired:
        // the gate stays off and `None` is handed downward.
        let snapshots = if policy.snapshot_store_enabled {
            let dir = store
                .path()
                .parent()
                .map(|p| p.join("snapshots"))
                .unwrap_or_else(|| PathBuf::from("snapshots"));
            Some(SnapshotStore::new(&dir))
        } else {
            None
        };

        let height = store.latest_height()?.unwrap_or(0);
        let app = Self {
            policy,
            store,
            sender,
            cache,
            snapshots,
            trace_sink,
            height,
        };

        info!(
            height = app.height,
            pruning = ?app.policy.pruning,
            cache = app.cache.is_some(),
            min_gas_price = %app.policy.min_gas_price,
            "application instance constructed"
        );

        if let Some(on_built) = hooks.on_built {
            on_built(&app);
        }
        Ok(app)
    }

    /// Lower-level constructor used when reconstructing historical state.
    ///
    /// Applies the default policy and no trace sink. With `load_latest`
    /// false the instance starts at height 0 and the caller is expected to
    /// call [`App::load_height`] before reading state.
    pub fn reconstruct(
        store: NodeStore,
        sender: Arc<dyn Sender>,
        load_latest: bool,
    ) -> Result<Self, AppError> {
        let height = if load_latest {
            store.latest_height()?.unwrap_or(0)
        } else {
            0
        };
        Ok(Self {
            policy: RuntimePolicy::default(),
            store,
            sender,
            cache: Some(InterBlockCache::new()),
            snapshots: None,
            trace_sink: None,
            height,
        })
    }

    /// Current committed height.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// The policy this instance was constructed with.
    pub fn policy(&self) -> &RuntimePolicy {
        &self.policy
    }

    /// The snapshot store, when one was constructed (currently never).
    pub fn snapshot_store(&self) -> Option<&SnapshotStore> {
        self.snapshots.as_ref()
    }

    /// The inter-block cache, when the policy enabled one.
    pub fn cache(&self) -> Option<&InterBlockCache> {
        self.cache.as_ref()
    }

    /// Read a key, via the inter-block cache when one exists.
    pub fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        if let Some(cache) = self.cache.as_mut() {
            if let Some(value) = cache.get(key) {
                return Ok(Some(value));
            }
        }
        let value = self.store.get(key)?;
        if let (Some(cache), Some(value)) = (self.cache.as_mut(), value.as_ref()) {
            cache.insert(key, value.clone());
        }
        Ok(value)
    }

    /// Write a key, write-through when a cache exists.
    pub fn set(&mut self, key: &str, value: &[u8]) -> Result<(), AppError> {
        self.store.put(key, value)?;
        if let Some(cache) = self.cache.as_mut() {
            cache.insert(key, value.to_vec());
        }
        Ok(())
    }

    /// Delete a key.
    pub fn delete(&mut self, key: &str) -> Result<(), AppError> {
        self.store.delete(key)?;
        if let Some(cache) = self.cache.as_mut() {
            cache.remove(key);
        }
        Ok(())
    }

    /// All working-state entries, ordered by key.
    pub fn state_entries(&self) -> Result<Vec<(String, Vec<u8>)>, AppError> {
        Ok(self.store.state_entries()?)
    }

    /// The current validator set (empty if none was ever written).
    pub fn validators(&mut self) -> Result<Vec<crate::genesis::Validator>, AppError> {
        match self.get(VALIDATORS_KEY)? {
            None => Ok(Vec::new()),
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
        }
    }

    /// Replace the validator set.
    pub fn set_validators(
        &mut self,
        validators: &[crate::genesis::Validator],
    ) -> Result<(), AppError> {
        let bytes = serde_json::to_vec(validators)?;
        self.set(VALIDATORS_KEY, &bytes)
    }

    /// The scheduled upgrade plan, if any.
    pub fn upgrade_plan(&mut self) -> Result<Option<UpgradePlan>, AppError> {
        match self.get(UPGRADE_PLAN_KEY)? {
            None => Ok(None),
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        }
    }

    /// Schedule an upgrade at a future height.
    pub fn schedule_upgrade(&mut self, plan: &UpgradePlan) -> Result<(), AppError> {
        let bytes = serde_json::to_vec(plan)?;
        self.set(UPGRADE_PLAN_KEY, &bytes)
    }

    /// Seed state from a genesis document and commit height 0.
    pub fn init_from_genesis(&mut self, genesis: &crate::genesis::Genesis) -> Result<(), AppError> {
        if let Some(entries) = genesis.app_state.as_object() {
            for (key, value) in entries {
                let bytes = serde_json::to_vec(value)?;
                self.set(key, &bytes)?;
            }
        }
        self.set_validators(&genesis.validators)?;
        self.set(CHAIN_ID_KEY, genesis.chain_id.as_bytes())?;
        self.height = 0;
        let app_hash = self.write_snapshot(0)?;
        info!(chain_id = %genesis.chain_id, app_hash = %app_hash, "state seeded from genesis");
        Ok(())
    }

    /// Whether a configured halt condition has been reached.
    pub fn halt_reached(&self, now_unix: u64) -> bool {
        (self.policy.halt_height != 0 && self.height >= self.policy.halt_height)
            || (self.policy.halt_time != 0 && now_unix >= self.policy.halt_time)
    }

    /// Delegate an operation to the external controller, blocking until a
    /// reply or error arrives.
    pub fn delegate(&self, need_reply: bool, payload: &str) -> Result<String, AppError> {
        Ok(self.sender.send(need_reply, payload)?)
    }

    /// Commit the working state as the next block.
    ///
    /// Enforces the upgrade gate, persists the version snapshot, applies the
    /// pruning strategy's retention, runs the periodic invariant check, and
    /// writes a trace line when a sink is attached. Returns the new height.
    pub fn commit(&mut self) -> Result<u64, AppError> {
        let next = self.height + 1;

        if let Some(plan) = self.upgrade_plan()? {
            if plan.height == next {
                if self.policy.skip_upgrade_heights.contains(&next) {
                    info!(name = %plan.name, height = next, "skipping scheduled upgrade");
                    self.delete(UPGRADE_PLAN_KEY)?;
                } else {
                    return Err(AppError::UpgradeRequired {
                        name: plan.name,
                        height: next,
                    });
                }
            }
        }

        let app_hash = self.write_snapshot(next)?;
        self.apply_pruning(next)?;

        if self.policy.inv_check_period != 0 && next % self.policy.inv_check_period == 0 {
            self.check_invariants(next, &app_hash)?;
        }

        if let Some(sink) = self.trace_sink.as_mut() {
            let mut line = serde_json::json!({ "height": next, "app_hash": app_hash });
            if self.policy.trace {
                line["keys"] =
                    serde_json::json!(self.store.state_entries().map(|e| e.len()).unwrap_or(0));
            }
            writeln!(sink, "{}", line).map_err(AppError::Trace)?;
        }

        self.height = next;
        Ok(next)
    }

    /// Load the working state committed at exactly `height`.
    pub fn load_height(&mut self, height: u64) -> Result<(), AppError> {
        let bytes = self
            .store
            .load_height(height)?
            .ok_or(AppError::HeightUnavailable(height))?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
        self.store.replace_state(&snapshot.entries)?;
        // Cached reads belong to the abandoned state.
        if let Some(cache) = self.cache.as_mut() {
            *cache = InterBlockCache::new();
        }
        self.height = height;
        Ok(())
    }

    fn write_snapshot(&mut self, height: u64) -> Result<String, AppError> {
        let entries = self.store.state_entries()?;
        let app_hash = hash_entries(&entries);
        let snapshot = Snapshot {
            height,
            app_hash: app_hash.clone(),
            entries,
        };
        let bytes = serde_json::to_vec(&snapshot)?;
        self.store.save_version(height, &bytes)?;
        Ok(app_hash)
    }

    fn apply_pruning(&mut self, height: u64) -> Result<(), AppError> {
        let strategy = self.policy.pruning;
        if !strategy.prunes() {
            return Ok(());
        }
        let interval = strategy.interval();
        if interval == 0 || height % interval != 0 {
            return Ok(());
        }
        // The retain-blocks floor wins over an aggressive strategy.
        let keep = strategy.keep_recent().max(self.policy.min_retain_blocks);
        let cutoff = height.saturating_sub(keep);
        self.store.prune_below(cutoff, strategy.keep_every())?;
        Ok(())
    }

    /// Re-read the snapshot just written and verify its hash against the
    /// live working state.
    fn check_invariants(&mut self, height: u64, expected_hash: &str) -> Result<(), AppError> {
        let bytes = self
            .store
            .load_height(height)?
            .ok_or(AppError::HeightUnavailable(height))?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
        if snapshot.app_hash != expected_hash {
            return Err(AppError::InvariantViolated {
                height,
                detail: format!(
                    "persisted app hash {} does not match {}",
                    snapshot.app_hash, expected_hash
                ),
            });
        }
        Ok(())
    }
}

/// Summary of one committed version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// Committed height.
    pub height: u64,
    /// Hash of the state at that height.
    pub app_hash: String,
    /// Number of state entries in the snapshot.
    pub entries: usize,
}

/// Read the summary of a committed version without constructing an
/// application instance.
pub fn version_info(store: &NodeStore, height: u64) -> Result<Option<VersionInfo>, AppError> {
    match store.load_height(height)? {
        None => Ok(None),
        Some(bytes) => {
            let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
            Ok(Some(VersionInfo {
                height: snapshot.height,
                app_hash: snapshot.app_hash,
                entries: snapshot.entries.len(),
            }))
        }
    }
}

/// Deterministic hash over length-prefixed key/value pairs.
fn hash_entries(entries: &[(String, Vec<u8>)]) -> String {
    let mut hasher = Sha256::new();
    for (key, value) in entries {
        hasher.update((key.len() as u64).to_le_bytes());
        hasher.update(key.as_bytes());
        hasher.update((value.len() as u64).to_le_bytes());
        hasher.update(value);
    }
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SenderError;
    use crate::genesis::{Genesis, Validator};
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn echo_sender() -> Arc<dyn Sender> {
        Arc::new(|_: bool, payload: &str| -> Result<String, SenderError> {
            Ok(payload.to_string())
        })
    }

    fn open_store(dir: &TempDir) -> NodeStore {
        NodeStore::open(&dir.path().join("basalt.db")).unwrap()
    }

    fn build_app(dir: &TempDir, policy: RuntimePolicy) -> App {
        App::build(
            policy,
            open_store(dir),
            None,
            echo_sender(),
            AppHooks::default(),
        )
        .unwrap()
    }

    fn seeded_app(dir: &TempDir, policy: RuntimePolicy) -> App {
        let mut app = build_app(dir, policy);
        let mut genesis = Genesis::new("basalt-test-1");
        genesis.validators.push(Validator::new("basval1", 10));
        genesis.app_state = serde_json::json!({ "bank/alice": "100ubas" });
        app.init_from_genesis(&genesis).unwrap();
        app
    }

    #[test]
    fn test_empty_min_gas_price_is_rejected() {
        let dir = TempDir::new().unwrap();
        let policy = RuntimePolicy {
            min_gas_price: String::new(),
            ..RuntimePolicy::default()
        };
        let err = App::build(
            policy,
            open_store(&dir),
            None,
            echo_sender(),
            AppHooks::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidPolicy(_)));
    }

    #[test]
    fn test_cache_follows_policy() {
        let dir = TempDir::new().unwrap();
        let app = build_app(&dir, RuntimePolicy::default());
        assert!(app.cache().is_some());

        let dir = TempDir::new().unwrap();
        let policy = RuntimePolicy {
            inter_block_cache: false,
            ..RuntimePolicy::default()
        };
        let app = build_app(&dir, policy);
        assert!(app.cache().is_none());
    }

    /// A nonzero snapshot interval still constructs no snapshot store. The
    /// gate is intentional: the policy records the fields, activation waits
    /// on the subsystem that would consume them.
    #[test]
    fn test_snapshot_store_not_constructed_despite_interval() {
        let dir = TempDir::new().unwrap();
        let policy = RuntimePolicy {
            snapshot_interval: 500,
            snapshot_keep_recent: 4,
            ..RuntimePolicy::default()
        };
        assert!(!policy.snapshot_store_enabled);
        let app = build_app(&dir, policy);
        assert!(app.snapshot_store().is_none());
    }

    #[test]
    fn test_on_built_hook_runs() {
        let dir = TempDir::new().unwrap();
        let seen = Arc::new(Mutex::new(None));
        let seen2 = Arc::clone(&seen);
        let hooks = AppHooks {
            on_built: Some(Box::new(move |app: &App| {
                *seen2.lock().unwrap() = Some(app.height());
            })),
        };
        let _app = App::build(
            RuntimePolicy::default(),
            open_store(&dir),
            None,
            echo_sender(),
            hooks,
        )
        .unwrap();
        assert_eq!(*seen.lock().unwrap(), Some(0));
    }

    #[test]
    fn test_commit_advances_height_and_persists_version() {
        let dir = TempDir::new().unwrap();
        let mut app = seeded_app(&dir, RuntimePolicy::default());
        assert_eq!(app.height(), 0);

        app.set("bank/bob", b"\"50ubas\"").unwrap();
        let height = app.commit().unwrap();
        assert_eq!(height, 1);

        // Reopen and confirm the version survived.
        drop(app);
        let store = open_store(&dir);
        assert_eq!(store.latest_height().unwrap(), Some(1));
    }

    #[test]
    fn test_build_resumes_at_latest_height() {
        let dir = TempDir::new().unwrap();
        {
            let mut app = seeded_app(&dir, RuntimePolicy::default());
            app.commit().unwrap();
            app.commit().unwrap();
        }
        let app = build_app(&dir, RuntimePolicy::default());
        assert_eq!(app.height(), 2);
    }

    #[test]
    fn test_load_height_restores_state() {
        let dir = TempDir::new().unwrap();
        let mut app = seeded_app(&dir, RuntimePolicy::default());
        app.set("counter", b"1").unwrap();
        app.commit().unwrap();
        app.set("counter", b"2").unwrap();
        app.commit().unwrap();

        app.load_height(1).unwrap();
        assert_eq!(app.height(), 1);
        assert_eq!(app.get("counter").unwrap(), Some(b"1".to_vec()));
    }

    #[test]
    fn test_load_height_unavailable() {
        let dir = TempDir::new().unwrap();
        let mut app = seeded_app(&dir, RuntimePolicy::default());
        let err = app.load_height(42).unwrap_err();
        assert!(matches!(err, AppError::HeightUnavailable(42)));
    }

    #[test]
    fn test_pruning_everything_keeps_only_recent() {
        let dir = TempDir::new().unwrap();
        let policy = RuntimePolicy {
            pruning: basalt_policy::PruningStrategy::Everything,
            ..RuntimePolicy::default()
        };
        let mut app = seeded_app(&dir, policy);
        for _ in 0..10 {
            app.commit().unwrap();
        }
        drop(app);
        // Interval 10: the pass at height 10 removed everything below it.
        let store = open_store(&dir);
        assert_eq!(store.heights().unwrap(), vec![10]);
    }

    #[test]
    fn test_pruning_nothing_keeps_all() {
        let dir = TempDir::new().unwrap();
        let policy = RuntimePolicy {
            pruning: basalt_policy::PruningStrategy::Nothing,
            ..RuntimePolicy::default()
        };
        let mut app = seeded_app(&dir, policy);
        for _ in 0..12 {
            app.commit().unwrap();
        }
        drop(app);
        let store = open_store(&dir);
        assert_eq!(store.heights().unwrap().len(), 13); // genesis + 12
    }

    #[test]
    fn test_pruning_custom_retention() {
        let dir = TempDir::new().unwrap();
        let policy = RuntimePolicy {
            pruning: basalt_policy::PruningStrategy::Custom {
                interval: 5,
                keep_recent: 2,
                keep_every: 0,
            },
            ..RuntimePolicy::default()
        };
        let mut app = seeded_app(&dir, policy);
        for _ in 0..10 {
            app.commit().unwrap();
        }
        drop(app);
        // Pass at 10 pruned below 8.
        let store = open_store(&dir);
        assert_eq!(store.heights().unwrap(), vec![8, 9, 10]);
    }

    #[test]
    fn test_min_retain_blocks_overrides_aggressive_pruning() {
        let dir = TempDir::new().unwrap();
        let policy = RuntimePolicy {
            pruning: basalt_policy::PruningStrategy::Everything,
            min_retain_blocks: 5,
            ..RuntimePolicy::default()
        };
        let mut app = seeded_app(&dir, policy);
        for _ in 0..10 {
            app.commit().unwrap();
        }
        drop(app);
        let store = open_store(&dir);
        assert_eq!(store.heights().unwrap(), vec![5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_upgrade_gate_halts_commit() {
        let dir = TempDir::new().unwrap();
        let mut app = seeded_app(&dir, RuntimePolicy::default());
        app.schedule_upgrade(&UpgradePlan {
            name: "v2".to_string(),
            height: 2,
        })
        .unwrap();

        assert_eq!(app.commit().unwrap(), 1);
        let err = app.commit().unwrap_err();
        assert!(matches!(err, AppError::UpgradeRequired { height: 2, .. }));
        // Nothing was committed at the gated height.
        assert_eq!(app.height(), 1);
    }

    #[test]
    fn test_upgrade_gate_skipped_when_policy_allows() {
        let dir = TempDir::new().unwrap();
        let policy = RuntimePolicy {
            skip_upgrade_heights: [2u64].into_iter().collect(),
            ..RuntimePolicy::default()
        };
        let mut app = seeded_app(&dir, policy);
        app.schedule_upgrade(&UpgradePlan {
            name: "v2".to_string(),
            height: 2,
        })
        .unwrap();

        app.commit().unwrap();
        assert_eq!(app.commit().unwrap(), 2);
        // The plan was consumed by the skip.
        assert_eq!(app.upgrade_plan().unwrap(), None);
    }

    #[test]
    fn test_halt_conditions() {
        let dir = TempDir::new().unwrap();
        let policy = RuntimePolicy {
            halt_height: 2,
            ..RuntimePolicy::default()
        };
        let mut app = seeded_app(&dir, policy);
        assert!(!app.halt_reached(0));
        app.commit().unwrap();
        app.commit().unwrap();
        assert!(app.halt_reached(0));

        let dir = TempDir::new().unwrap();
        let policy = RuntimePolicy {
            halt_time: 1_700_000_000,
            ..RuntimePolicy::default()
        };
        let app = seeded_app(&dir, policy);
        assert!(!app.halt_reached(1_699_999_999));
        assert!(app.halt_reached(1_700_000_000));
    }

    #[test]
    fn test_delegate_blocks_for_reply() {
        let dir = TempDir::new().unwrap();
        let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let log2 = Arc::clone(&log);
        let sender: Arc<dyn Sender> =
            Arc::new(move |need_reply: bool, payload: &str| -> Result<String, SenderError> {
                log2.lock().unwrap().push(payload.to_string());
                Ok(if need_reply { "ack".to_string() } else { String::new() })
            });
        let app = App::build(
            RuntimePolicy::default(),
            open_store(&dir),
            None,
            sender,
            AppHooks::default(),
        )
        .unwrap();

        assert_eq!(app.delegate(true, "block 1").unwrap(), "ack");
        assert_eq!(app.delegate(false, "block 2").unwrap(), "");
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_trace_sink_receives_commit_lines() {
        struct SharedSink(Arc<Mutex<Vec<u8>>>);
        impl Write for SharedSink {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let dir = TempDir::new().unwrap();
        let buffer: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
        let policy = RuntimePolicy {
            trace: true,
            ..RuntimePolicy::default()
        };
        let mut app = App::build(
            policy,
            open_store(&dir),
            Some(Box::new(SharedSink(Arc::clone(&buffer)))),
            echo_sender(),
            AppHooks::default(),
        )
        .unwrap();

        app.set("k", b"v").unwrap();
        app.commit().unwrap();

        let output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(output.contains("\"height\":1"));
        assert!(output.contains("app_hash"));
        assert!(output.contains("keys"));
    }

    #[test]
    fn test_invariant_check_passes_on_clean_commits() {
        let dir = TempDir::new().unwrap();
        let policy = RuntimePolicy {
            inv_check_period: 2,
            ..RuntimePolicy::default()
        };
        let mut app = seeded_app(&dir, policy);
        for _ in 0..6 {
            app.commit().unwrap();
        }
        assert_eq!(app.height(), 6);
    }

    #[test]
    fn test_version_info_reads_committed_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut app = seeded_app(&dir, RuntimePolicy::default());
        app.commit().unwrap();
        drop(app);

        let store = open_store(&dir);
        let info = version_info(&store, 1).unwrap().unwrap();
        assert_eq!(info.height, 1);
        assert!(!info.app_hash.is_empty());
        assert_eq!(version_info(&store, 9).unwrap(), None);
    }

    #[test]
    fn test_hash_entries_is_order_and_content_sensitive() {
        let a = vec![("a".to_string(), b"1".to_vec())];
        let b = vec![("a".to_string(), b"2".to_vec())];
        assert_ne!(hash_entries(&a), hash_entries(&b));
        assert_eq!(hash_entries(&a), hash_entries(&a));
    }
}
