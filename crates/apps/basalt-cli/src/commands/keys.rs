//! Key management subcommands.

use clap::ArgMatches;

use crate::context::Context;
use crate::error::{CliError, CliResult};
use crate::keyring::Keyring;

pub fn add(ctx: &Context, matches: &ArgMatches) -> CliResult<()> {
    let name = matches
        .get_one::<String>("name")
        .ok_or_else(|| CliError::usage("name is required"))?;
    let keyring = Keyring::open(&ctx.keyring_dir())?;
    let record = keyring.add(name)?;

    println!("Created key \"{}\"", record.name);
    println!("  address:    {}", record.address);
    println!("  public key: {}", record.public_key);
    Ok(())
}

pub fn list(ctx: &Context) -> CliResult<()> {
    let keyring = Keyring::open(&ctx.keyring_dir())?;
    let records = keyring.list()?;
    if records.is_empty() {
        println!("No keys");
        return Ok(());
    }
    for record in records {
        println!("{}  {}", record.name, record.address);
    }
    Ok(())
}

pub fn show(ctx: &Context, matches: &ArgMatches) -> CliResult<()> {
    let name = matches
        .get_one::<String>("name")
        .ok_or_else(|| CliError::usage("name is required"))?;
    let keyring = Keyring::open(&ctx.keyring_dir())?;
    let record = keyring.get(name)?;

    println!("Name:       {}", record.name);
    println!("Address:    {}", record.address);
    println!("Public key: {}", record.public_key);
    Ok(())
}
