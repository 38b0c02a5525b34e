//! Transaction subcommands: sign and broadcast.
//!
//! Transaction execution itself is not this layer's concern; these commands
//! prepare payloads and hand them to the controller through the sender
//! capability, request/reply.

use std::sync::Arc;

use clap::ArgMatches;

use basalt_app::{AppError, Sender};

use crate::context::Context;
use crate::error::{CliError, CliResult};
use crate::keyring::Keyring;

pub fn sign(ctx: &Context, matches: &ArgMatches) -> CliResult<()> {
    let file = matches
        .get_one::<String>("file")
        .ok_or_else(|| CliError::usage("file is required"))?;
    let from = matches
        .get_one::<String>("from")
        .ok_or_else(|| CliError::usage("--from is required"))?;

    let payload = std::fs::read(file)?;
    let keyring = Keyring::open(&ctx.keyring_dir())?;
    let (signature, record) = keyring.sign(from, &payload)?;

    let signed = serde_json::json!({
        "chain_id": ctx.chain_id(),
        "from": record.address,
        "public_key": record.public_key,
        "signature": signature,
        "payload": String::from_utf8_lossy(&payload),
    });
    println!("{}", serde_json::to_string_pretty(&signed)?);
    Ok(())
}

pub fn broadcast(ctx: &Context, matches: &ArgMatches, sender: Arc<dyn Sender>) -> CliResult<()> {
    let file = matches
        .get_one::<String>("file")
        .ok_or_else(|| CliError::usage("file is required"))?;
    let contents = std::fs::read_to_string(file)?;

    tracing::debug!(chain_id = %ctx.chain_id(), file, "broadcasting payload");
    let reply = sender
        .send(true, &contents)
        .map_err(AppError::Sender)?;

    if reply.is_empty() {
        println!("(no reply)");
    } else {
        println!("{}", reply);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NodeConfig;
    use crate::context::ContextBuilder;
    use crate::keyring::verify;
    use tempfile::TempDir;

    #[test]
    fn test_sign_produces_verifiable_signature() {
        let dir = TempDir::new().unwrap();
        let ctx = ContextBuilder::new()
            .home(dir.path())
            .seal(NodeConfig::default());

        let keyring = Keyring::open(&ctx.keyring_dir()).unwrap();
        keyring.add("alice").unwrap();
        let (signature, record) = keyring.sign("alice", b"transfer 5ubas").unwrap();
        assert!(verify(&record, b"transfer 5ubas", &signature).unwrap());
    }
}
