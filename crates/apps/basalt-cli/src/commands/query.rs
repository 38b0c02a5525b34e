//! Querying subcommands: blocks, raw state, validators.

use std::sync::Arc;

use clap::ArgMatches;

use basalt_app::{version_info, App, Sender};
use basalt_store::NodeStore;

use crate::context::Context;
use crate::error::{CliError, CliResult};

fn open_store(ctx: &Context) -> CliResult<NodeStore> {
    if !ctx.db_path().exists() {
        return Err(CliError::HomeNotInitialized);
    }
    Ok(NodeStore::open(&ctx.db_path())?)
}

pub fn block(ctx: &Context, matches: &ArgMatches) -> CliResult<()> {
    let height = matches
        .get_one::<u64>("height")
        .copied()
        .ok_or_else(|| CliError::usage("height is required"))?;
    let store = open_store(ctx)?;

    match version_info(&store, height)? {
        Some(info) => {
            println!("Height:   {}", info.height);
            println!("App hash: {}", info.app_hash);
            println!("Entries:  {}", info.entries);
            Ok(())
        }
        None => Err(CliError::App(basalt_app::AppError::HeightUnavailable(
            height,
        ))),
    }
}

pub fn state(ctx: &Context, matches: &ArgMatches) -> CliResult<()> {
    let key = matches
        .get_one::<String>("key")
        .ok_or_else(|| CliError::usage("key is required"))?;
    let store = open_store(ctx)?;

    match store.get(key)? {
        Some(value) => {
            match std::str::from_utf8(&value) {
                Ok(text) => println!("{}", text),
                Err(_) => {
                    let hex: String = value.iter().map(|b| format!("{:02x}", b)).collect();
                    println!("0x{}", hex);
                }
            }
            Ok(())
        }
        None => Err(CliError::usage(format!("no value under key \"{}\"", key))),
    }
}

pub fn validators(ctx: &Context, sender: Arc<dyn Sender>) -> CliResult<()> {
    let store = open_store(ctx)?;
    let mut app = App::reconstruct(store, sender, true)?;
    let validators = app.validators()?;

    if validators.is_empty() {
        println!("No validators");
        return Ok(());
    }
    for validator in validators {
        println!(
            "{}  power={}  jailed={}",
            validator.address, validator.power, validator.jailed
        );
    }
    Ok(())
}
