//! Basalt node daemon.
//!
//! `basaltd` composes the operator command surface from declarative
//! registrations, primes the execution context once per invocation (flags
//! first, then the discovered config file), and dispatches exactly one
//! command to completion before exiting.
//!
//! # Usage
//!
//! ```bash
//! basaltd init my-node --chain-id basalt-local-1
//! basaltd start --pruning custom --pruning-interval 10 \
//!     --pruning-keep-recent 100 --pruning-keep-every 500
//! basaltd export --height 42 --for-zero-height
//! ```

mod commands;
mod config;
mod context;
mod controller;
mod error;
mod keyring;
mod signals;
mod tree;

use std::sync::Arc;

use clap::error::ErrorKind;
use clap::ArgMatches;

use basalt_app::Sender;

use crate::controller::LoopbackController;
use crate::error::{CliError, CliResult};

#[tokio::main]
async fn main() {
    // The sender capability is supplied at the outermost boundary; an
    // embedder replaces the loopback with a channel to its controller
    // process, everything below holds it by reference.
    let sender: Arc<dyn Sender> = Arc::new(LoopbackController);

    if let Err(err) = run(sender).await {
        eprintln!("Error: {}", err);
        std::process::exit(err.exit_code());
    }
}

async fn run(sender: Arc<dyn Sender>) -> CliResult<()> {
    let tree = tree::compose(
        commands::BIN_NAME,
        commands::ABOUT,
        commands::root_args(),
        commands::registrations(),
    );

    let matches = match tree
        .to_clap()
        .version(env!("CARGO_PKG_VERSION"))
        .try_get_matches()
    {
        Ok(matches) => matches,
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) =>
        {
            let _ = err.print();
            return Ok(());
        }
        Err(err) => return Err(CliError::usage(err.to_string())),
    };

    init_tracing(&matches);

    // Pre-dispatch: prime the context cascade, then walk to the leaf.
    let (path, leaf) = tree::matched_path(&matches);
    let ctx = context::Context::prime(leaf)?;
    let node = tree.resolve(&path)?;
    let action = node.action().ok_or_else(|| {
        CliError::usage(format!("\"{}\" requires a sub-command", node.name()))
    })?;

    commands::run(action, &ctx, leaf, sender).await
}

fn init_tracing(matches: &ArgMatches) {
    let level = matches
        .get_one::<String>("log_level")
        .map(|s| s.as_str())
        .unwrap_or("info");
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
