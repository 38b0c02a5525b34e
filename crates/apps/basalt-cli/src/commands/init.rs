//! Initialize a node home directory.

use clap::ArgMatches;
use serde_json::Value;
use tracing::info;

use basalt_app::{Genesis, Validator};

use crate::context::Context;
use crate::error::{CliError, CliResult};
use crate::keyring::Keyring;

/// Initial voting power of the local validator.
const INITIAL_POWER: u64 = 10;

/// Initial balance credited to the local validator.
const INITIAL_BALANCE: &str = "1000000ubas";

pub fn run(ctx: &Context, matches: &ArgMatches) -> CliResult<()> {
    let moniker = matches
        .get_one::<String>("moniker")
        .ok_or_else(|| CliError::usage("moniker is required"))?;
    let chain_id = matches.get_one::<String>("chain_id").cloned();
    let overwrite = matches.get_flag("overwrite");
    let genesis = init_home(ctx, moniker, chain_id, overwrite)?;

    println!("Initialized node home at {}", ctx.home().display());
    println!("  chain-id:  {}", genesis.chain_id);
    println!("  validator: {}", genesis.validators[0].address);
    println!("  genesis:   {}", ctx.genesis_path().display());
    Ok(())
}

/// Create the home skeleton: config, operator key, single-validator genesis.
pub fn init_home(
    ctx: &Context,
    moniker: &str,
    chain_id: Option<String>,
    overwrite: bool,
) -> CliResult<Genesis> {
    let genesis_path = ctx.genesis_path();
    if genesis_path.exists() && !overwrite {
        return Err(CliError::config(format!(
            "genesis already exists at {}; pass --overwrite to replace it",
            genesis_path.display()
        )));
    }

    let chain_id = chain_id.unwrap_or_else(|| ctx.chain_id().to_string());

    // Persist the chosen chain id next to the seeded defaults.
    let mut config = ctx.config().clone();
    config.client.chain_id = chain_id.clone();
    config.save(&ctx.config_path())?;

    let keyring = Keyring::open(&ctx.keyring_dir())?;
    let record = match keyring.get(moniker) {
        Ok(existing) => existing,
        Err(_) => keyring.add(moniker)?,
    };

    let mut genesis = Genesis::new(&chain_id);
    genesis
        .validators
        .push(Validator::new(&record.address, INITIAL_POWER));
    let mut app_state = serde_json::Map::new();
    app_state.insert(
        format!("bank/{}", record.address),
        Value::String(INITIAL_BALANCE.to_string()),
    );
    genesis.app_state = Value::Object(app_state);
    genesis.validate()?;
    genesis.save(&genesis_path)?;

    info!(chain_id = %chain_id, moniker, "initialized node home");
    Ok(genesis)
}
