//! Show node status.

use basalt_store::NodeStore;

use crate::context::Context;
use crate::error::CliResult;

pub fn run(ctx: &Context) -> CliResult<()> {
    println!("Home:      {}", ctx.home().display());
    println!("Chain ID:  {}", ctx.chain_id());

    if !ctx.db_path().exists() {
        println!("Store:     not created");
        return Ok(());
    }

    let store = NodeStore::open(&ctx.db_path())?;
    match store.latest_height()? {
        Some(height) => println!("Height:    {}", height),
        None => println!("Height:    none committed"),
    }
    println!("Versions:  {}", store.heights()?.len());
    Ok(())
}
