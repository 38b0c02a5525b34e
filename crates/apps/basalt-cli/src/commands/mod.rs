//! Command implementations and their registrations.
//!
//! Each sub-module implements one leaf (or group of leaves); this module
//! owns the declarative registration list the dispatch tree is folded from,
//! and the dispatcher that maps a resolved [`Action`] onto its
//! implementation.

pub mod completions;
pub mod export;
pub mod genesis;
pub mod init;
pub mod keys;
pub mod query;
pub mod start;
pub mod status;
pub mod tx;

use std::sync::Arc;

use clap::{Arg, ArgAction, ArgMatches};

use basalt_app::Sender;

use crate::context::Context;
use crate::error::CliResult;
use crate::tree::{Action, Registration};

/// Binary name.
pub const BIN_NAME: &str = "basaltd";

/// Root command description.
pub const ABOUT: &str = "Basalt blockchain node daemon";

/// Persistent flags registered on the root command.
pub fn root_args() -> Vec<Arg> {
    vec![
        Arg::new("home")
            .long("home")
            .global(true)
            .value_name("DIR")
            .help("Node home directory"),
        Arg::new("log_level")
            .long("log-level")
            .global(true)
            .value_name("LEVEL")
            .default_value("info")
            .help("Log level (trace, debug, info, warn, error)"),
    ]
}

fn chain_id_arg() -> Arg {
    Arg::new("chain_id")
        .long("chain-id")
        .global(true)
        .value_name("ID")
        .help("The network chain ID")
}

/// The full declarative command surface, in no particular order.
pub fn registrations() -> Vec<Registration> {
    vec![
        Registration::leaf(&["init"], "Initialize a node home directory", Action::Init)
            .arg(
                Arg::new("moniker")
                    .required(true)
                    .value_name("MONIKER")
                    .help("Human-readable name for this node"),
            )
            .arg(chain_id_arg())
            .arg(
                Arg::new("overwrite")
                    .long("overwrite")
                    .action(ArgAction::SetTrue)
                    .help("Replace an existing genesis file"),
            ),
        Registration::leaf(&["start"], "Run the node", Action::Start)
            .arg(Arg::new("pruning").long("pruning").value_name("STRATEGY"))
            .arg(
                Arg::new("pruning_interval")
                    .long("pruning-interval")
                    .value_name("BLOCKS")
                    .value_parser(clap::value_parser!(u64)),
            )
            .arg(
                Arg::new("pruning_keep_recent")
                    .long("pruning-keep-recent")
                    .value_name("VERSIONS")
                    .value_parser(clap::value_parser!(u64)),
            )
            .arg(
                Arg::new("pruning_keep_every")
                    .long("pruning-keep-every")
                    .value_name("BLOCKS")
                    .value_parser(clap::value_parser!(u64)),
            )
            .arg(
                Arg::new("minimum_gas_prices")
                    .long("minimum-gas-prices")
                    .value_name("PRICE"),
            )
            .arg(
                Arg::new("halt_height")
                    .long("halt-height")
                    .value_name("HEIGHT")
                    .value_parser(clap::value_parser!(u64)),
            )
            .arg(
                Arg::new("halt_time")
                    .long("halt-time")
                    .value_name("UNIX_SECONDS")
                    .value_parser(clap::value_parser!(u64)),
            )
            .arg(
                Arg::new("inter_block_cache")
                    .long("inter-block-cache")
                    .value_name("BOOL")
                    .value_parser(clap::value_parser!(bool)),
            )
            .arg(
                Arg::new("unsafe_skip_upgrades")
                    .long("unsafe-skip-upgrades")
                    .value_name("HEIGHTS")
                    .value_delimiter(',')
                    .allow_hyphen_values(true)
                    .value_parser(clap::value_parser!(i64)),
            )
            .arg(
                Arg::new("index_events")
                    .long("index-events")
                    .value_name("EVENTS")
                    .value_delimiter(','),
            )
            .arg(
                Arg::new("snapshot_interval")
                    .long("snapshot-interval")
                    .value_name("BLOCKS")
                    .value_parser(clap::value_parser!(u64)),
            )
            .arg(
                Arg::new("snapshot_keep_recent")
                    .long("snapshot-keep-recent")
                    .value_name("COUNT")
                    .value_parser(clap::value_parser!(u64)),
            )
            .arg(
                Arg::new("min_retain_blocks")
                    .long("min-retain-blocks")
                    .value_name("BLOCKS")
                    .value_parser(clap::value_parser!(u64)),
            )
            .arg(
                Arg::new("inv_check_period")
                    .long("inv-check-period")
                    .value_name("BLOCKS")
                    .value_parser(clap::value_parser!(u64)),
            )
            .arg(
                Arg::new("trace")
                    .long("trace")
                    .action(ArgAction::SetTrue)
                    .help("Record full traces to the trace sink"),
            )
            .arg(
                Arg::new("trace_store")
                    .long("trace-store")
                    .value_name("FILE")
                    .help("Append block traces to this file"),
            ),
        Registration::leaf(
            &["export"],
            "Export application state and validators",
            Action::Export,
        )
        .arg(
            Arg::new("height")
                .long("height")
                .value_name("HEIGHT")
                .default_value("-1")
                .allow_hyphen_values(true)
                .value_parser(clap::value_parser!(i64))
                .help("Height to export (-1 for latest)"),
        )
        .arg(
            Arg::new("for_zero_height")
                .long("for-zero-height")
                .action(ArgAction::SetTrue)
                .help("Normalize state as a new chain starting from genesis"),
        )
        .arg(
            Arg::new("jail_allowed_addrs")
                .long("jail-allowed-addrs")
                .value_name("ADDRS")
                .value_delimiter(',')
                .help("Validators exempt from jailing during normalization"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("FILE")
                .help("Write the bundle to a file instead of stdout"),
        ),
        Registration::leaf(&["status"], "Show node status", Action::Status),
        // Query umbrella. Registers its own chain-id flag so the subtree
        // works when invoked in isolation.
        Registration::group(&["query"], "Querying subcommands")
            .aliases(&["q"])
            .arg(chain_id_arg()),
        Registration::leaf(&["query", "block"], "Show a committed block", Action::QueryBlock).arg(
            Arg::new("height")
                .required(true)
                .value_name("HEIGHT")
                .value_parser(clap::value_parser!(u64)),
        ),
        Registration::leaf(&["query", "state"], "Read a raw state key", Action::QueryState).arg(
            Arg::new("key").required(true).value_name("KEY"),
        ),
        Registration::leaf(
            &["query", "validators"],
            "Show the validator set",
            Action::QueryValidators,
        ),
        // Transaction umbrella. Deliberately registers chain-id again.
        Registration::group(&["tx"], "Transactions subcommands").arg(chain_id_arg()),
        Registration::leaf(&["tx", "sign"], "Sign a payload file", Action::TxSign)
            .arg(Arg::new("file").required(true).value_name("FILE"))
            .arg(
                Arg::new("from")
                    .long("from")
                    .required(true)
                    .value_name("KEY")
                    .help("Name of the signing key"),
            ),
        Registration::leaf(
            &["tx", "broadcast"],
            "Hand a signed payload to the controller",
            Action::TxBroadcast,
        )
        .arg(Arg::new("file").required(true).value_name("FILE")),
        Registration::group(&["keys"], "Key management subcommands"),
        Registration::leaf(&["keys", "add"], "Create a new key", Action::KeysAdd)
            .arg(Arg::new("name").required(true).value_name("NAME")),
        Registration::leaf(&["keys", "list"], "List keys", Action::KeysList),
        Registration::leaf(&["keys", "show"], "Show one key", Action::KeysShow)
            .arg(Arg::new("name").required(true).value_name("NAME")),
        Registration::group(&["genesis"], "Genesis file subcommands"),
        Registration::leaf(
            &["genesis", "validate"],
            "Validate the genesis file",
            Action::GenesisValidate,
        ),
        Registration::leaf(
            &["genesis", "add-account"],
            "Add an account balance to the genesis file",
            Action::GenesisAddAccount,
        )
        .arg(Arg::new("address").required(true).value_name("ADDRESS"))
        .arg(Arg::new("amount").required(true).value_name("AMOUNT")),
        Registration::leaf(
            &["completions"],
            "Generate shell completions",
            Action::Completions,
        )
        .arg(
            Arg::new("shell")
                .required(true)
                .value_name("SHELL")
                .value_parser(clap::value_parser!(clap_complete::Shell)),
        ),
    ]
}

/// Run the action a matched leaf resolved to.
pub async fn run(
    action: Action,
    ctx: &Context,
    matches: &ArgMatches,
    sender: Arc<dyn Sender>,
) -> CliResult<()> {
    match action {
        Action::Init => init::run(ctx, matches),
        Action::Start => start::run(ctx, matches, sender).await,
        Action::Export => export::run(ctx, matches, sender),
        Action::Status => status::run(ctx),
        Action::QueryBlock => query::block(ctx, matches),
        Action::QueryState => query::state(ctx, matches),
        Action::QueryValidators => query::validators(ctx, sender),
        Action::TxSign => tx::sign(ctx, matches),
        Action::TxBroadcast => tx::broadcast(ctx, matches, sender),
        Action::KeysAdd => keys::add(ctx, matches),
        Action::KeysList => keys::list(ctx),
        Action::KeysShow => keys::show(ctx, matches),
        Action::GenesisValidate => genesis::validate(ctx),
        Action::GenesisAddAccount => genesis::add_account(ctx, matches),
        Action::Completions => completions::run(matches),
    }
}
