//! Genesis file subcommands.

use clap::ArgMatches;
use serde_json::Value;

use basalt_app::Genesis;

use crate::context::Context;
use crate::error::{CliError, CliResult};

pub fn validate(ctx: &Context) -> CliResult<()> {
    let path = ctx.genesis_path();
    if !path.exists() {
        return Err(CliError::HomeNotInitialized);
    }
    let genesis = Genesis::load(&path)?;
    genesis.validate()?;
    println!(
        "Genesis at {} is valid ({} validators)",
        path.display(),
        genesis.validators.len()
    );
    Ok(())
}

pub fn add_account(ctx: &Context, matches: &ArgMatches) -> CliResult<()> {
    let address = matches
        .get_one::<String>("address")
        .ok_or_else(|| CliError::usage("address is required"))?;
    let amount = matches
        .get_one::<String>("amount")
        .ok_or_else(|| CliError::usage("amount is required"))?;

    let path = ctx.genesis_path();
    if !path.exists() {
        return Err(CliError::HomeNotInitialized);
    }
    let mut genesis = Genesis::load(&path)?;
    add_balance(&mut genesis, address, amount)?;
    genesis.save(&path)?;

    println!("Credited {} to {}", amount, address);
    Ok(())
}

/// Insert a bank balance into the genesis app state.
fn add_balance(genesis: &mut Genesis, address: &str, amount: &str) -> CliResult<()> {
    let key = format!("bank/{}", address);
    let entries = genesis
        .app_state
        .as_object_mut()
        .ok_or_else(|| CliError::config("genesis app_state is not an object"))?;
    if entries.contains_key(&key) {
        return Err(CliError::config(format!(
            "account {} already has a balance",
            address
        )));
    }
    entries.insert(key, Value::String(amount.to_string()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_balance() {
        let mut genesis = Genesis::new("basalt-test-1");
        add_balance(&mut genesis, "bas1abc", "500ubas").unwrap();
        assert_eq!(
            genesis.app_state["bank/bas1abc"],
            Value::String("500ubas".to_string())
        );
    }

    #[test]
    fn test_add_balance_rejects_duplicates() {
        let mut genesis = Genesis::new("basalt-test-1");
        add_balance(&mut genesis, "bas1abc", "500ubas").unwrap();
        assert!(add_balance(&mut genesis, "bas1abc", "100ubas").is_err());
    }
}
