//! Generate shell completions.

use clap::ArgMatches;
use clap_complete::Shell;

use crate::commands::{registrations, root_args, ABOUT, BIN_NAME};
use crate::error::{CliError, CliResult};
use crate::tree::compose;

pub fn run(matches: &ArgMatches) -> CliResult<()> {
    let shell = matches
        .get_one::<Shell>("shell")
        .copied()
        .ok_or_else(|| CliError::usage("shell is required"))?;

    let tree = compose(BIN_NAME, ABOUT, root_args(), registrations());
    clap_complete::generate(
        shell,
        &mut tree.to_clap(),
        BIN_NAME,
        &mut std::io::stdout(),
    );
    Ok(())
}
