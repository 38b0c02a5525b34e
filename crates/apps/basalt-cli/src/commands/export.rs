//! Export application state and validators.

use std::sync::Arc;

use clap::ArgMatches;

use basalt_app::{export_at_height, Sender};
use basalt_store::NodeStore;

use crate::context::Context;
use crate::error::{CliError, CliResult};

pub fn run(ctx: &Context, matches: &ArgMatches, sender: Arc<dyn Sender>) -> CliResult<()> {
    let height = matches
        .get_one::<i64>("height")
        .copied()
        .ok_or_else(|| CliError::usage("height is required"))?;
    let for_zero_height = matches.get_flag("for_zero_height");
    let jail_allowed: Vec<String> = matches
        .get_many::<String>("jail_allowed_addrs")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    if !ctx.db_path().exists() {
        return Err(CliError::HomeNotInitialized);
    }
    let store = NodeStore::open(&ctx.db_path())?;

    let exported = export_at_height(store, sender, height, for_zero_height, &jail_allowed)?;
    let bundle = serde_json::to_string_pretty(&exported)?;

    // Nothing is written until the export succeeded in full.
    match matches.get_one::<String>("output") {
        Some(path) => {
            std::fs::write(path, bundle)?;
            println!("Exported state at height {} to {}", exported.height, path);
        }
        None => println!("{}", bundle),
    }
    Ok(())
}
