//! Run the node.

use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::parser::ValueSource;
use clap::ArgMatches;
use tracing::info;

use basalt_app::{App, AppHooks, Genesis, Sender};
use basalt_policy::{LayeredBag, TomlBag};
use basalt_store::NodeStore;

use crate::context::Context;
use crate::error::{CliError, CliResult};
use crate::signals::shutdown_signal;

pub async fn run(ctx: &Context, matches: &ArgMatches, sender: Arc<dyn Sender>) -> CliResult<()> {
    if !ctx.genesis_path().exists() {
        return Err(CliError::HomeNotInitialized);
    }

    // Explicit flags layered over the config file's [app] section: a flag
    // the operator typed is never overridden by a file value.
    let bag = LayeredBag::new(vec![
        Box::new(TomlBag::new(flag_options(matches))),
        Box::new(TomlBag::new(ctx.config().app.to_table()?)),
    ]);
    let policy = basalt_policy::resolve(&bag)?;

    // A store that cannot be opened terminates startup; no retry.
    let store = NodeStore::open(&ctx.db_path())?;
    let fresh = store.latest_height()?.is_none();

    let trace_sink: Option<Box<dyn Write + Send>> = match matches.get_one::<String>("trace_store")
    {
        Some(path) => Some(Box::new(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?,
        )),
        None => None,
    };

    let block_time = Duration::from_millis(ctx.config().app.block_time_ms.max(1));
    let mut app = App::build(policy, store, trace_sink, sender, AppHooks::default())?;

    if fresh {
        let genesis = Genesis::load(&ctx.genesis_path())?;
        genesis.validate()?;
        app.init_from_genesis(&genesis)?;
    }

    info!(
        chain_id = %ctx.chain_id(),
        height = app.height(),
        home = %ctx.home().display(),
        "node started"
    );

    let mut shutdown = shutdown_signal();
    let mut ticker = tokio::time::interval(block_time);
    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                info!("shutdown signal received");
                break;
            }
            _ = ticker.tick() => {
                if app.halt_reached(unix_now()) {
                    info!(height = app.height(), "halt condition reached");
                    break;
                }
                let height = app.commit()?;
                let notice = serde_json::json!({ "type": "commit", "height": height });
                app.delegate(false, &notice.to_string())?;
            }
        }
    }

    info!(height = app.height(), "node stopped");
    Ok(())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// The flag layer of the option bag: only options the operator typed.
///
/// Valued flags carry no clap defaults, so presence means the command line
/// set them; `SetTrue` flags get an implicit `false` default, so those check
/// the value source explicitly.
fn flag_options(matches: &ArgMatches) -> toml::Table {
    use toml::Value;

    let mut table = toml::Table::new();

    for key in ["pruning", "minimum_gas_prices"] {
        if let Some(value) = matches.get_one::<String>(key) {
            table.insert(key.to_string(), Value::String(value.clone()));
        }
    }

    for key in [
        "pruning_interval",
        "pruning_keep_recent",
        "pruning_keep_every",
        "halt_height",
        "halt_time",
        "snapshot_interval",
        "snapshot_keep_recent",
        "min_retain_blocks",
        "inv_check_period",
    ] {
        if let Some(value) = matches.get_one::<u64>(key) {
            table.insert(key.to_string(), Value::Integer(*value as i64));
        }
    }

    if let Some(value) = matches.get_one::<bool>("inter_block_cache") {
        table.insert("inter_block_cache".to_string(), Value::Boolean(*value));
    }

    if matches.value_source("trace") == Some(ValueSource::CommandLine) {
        table.insert("trace".to_string(), Value::Boolean(matches.get_flag("trace")));
    }

    if let Some(heights) = matches.get_many::<i64>("unsafe_skip_upgrades") {
        table.insert(
            "unsafe_skip_upgrades".to_string(),
            Value::Array(heights.map(|h| Value::Integer(*h)).collect()),
        );
    }

    if let Some(events) = matches.get_many::<String>("index_events") {
        table.insert(
            "index_events".to_string(),
            Value::Array(events.map(|e| Value::String(e.clone())).collect()),
        );
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{registrations, root_args, ABOUT, BIN_NAME};
    use crate::tree::{compose, matched_path};
    use basalt_policy::{resolve, OptionBag, PruningStrategy};

    fn start_matches(args: &[&str]) -> ArgMatches {
        let tree = compose(BIN_NAME, ABOUT, root_args(), registrations());
        let mut full = vec![BIN_NAME, "start"];
        full.extend_from_slice(args);
        tree.to_clap().try_get_matches_from(full).unwrap()
    }

    fn leaf_flags(matches: &ArgMatches) -> toml::Table {
        let (_, leaf) = matched_path(matches);
        flag_options(leaf)
    }

    #[test]
    fn test_untouched_flags_stay_out_of_the_bag() {
        let matches = start_matches(&[]);
        let table = leaf_flags(&matches);
        assert!(table.is_empty());
    }

    #[test]
    fn test_typed_flags_land_in_the_bag() {
        let matches = start_matches(&[
            "--pruning",
            "custom",
            "--pruning-interval",
            "10",
            "--pruning-keep-recent",
            "50",
            "--pruning-keep-every",
            "0",
            "--unsafe-skip-upgrades",
            "5,7",
            "--trace",
        ]);
        let table = leaf_flags(&matches);
        assert_eq!(table["pruning"].as_str(), Some("custom"));
        assert_eq!(table["pruning_interval"].as_integer(), Some(10));
        assert_eq!(table["trace"].as_bool(), Some(true));
        assert_eq!(table["unsafe_skip_upgrades"].as_array().unwrap().len(), 2);
    }

    /// A flag typed on the command line beats the config file's [app] value.
    #[test]
    fn test_flag_layer_beats_config_layer() {
        let matches = start_matches(&["--pruning", "nothing"]);

        let mut config = crate::config::NodeConfig::default();
        config.app.pruning = "everything".to_string();

        let (_, leaf) = matched_path(&matches);
        let bag = LayeredBag::new(vec![
            Box::new(TomlBag::new(flag_options(leaf))),
            Box::new(TomlBag::new(config.app.to_table().unwrap())),
        ]);
        assert_eq!(
            bag.get_string("pruning").unwrap(),
            Some("nothing".to_string())
        );
        let policy = resolve(&bag).unwrap();
        assert_eq!(policy.pruning, PruningStrategy::Nothing);
        // Config still supplies what the flags left unset.
        assert_eq!(policy.min_gas_price, "0ubas");
    }
}
