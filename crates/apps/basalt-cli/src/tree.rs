//! Declarative command registrations folded into a dispatchable tree.
//!
//! Command groups are supplied as flat [`Registration`]s — a path into the
//! hierarchy plus the flags the node owns and the action its leaf runs.
//! [`compose`] folds them into a [`CommandNode`] tree in any order, so group
//! providers stay independent of each other and of registration sequence.
//!
//! The tree itself is plain data: [`CommandNode::resolve`] walks a path and
//! reports unknown sub-commands without involving the CLI library, and
//! [`CommandNode::to_clap`] renders the same tree for parsing, help, and
//! completion generation.

use clap::{Arg, ArgMatches, Command};

use crate::error::{CliError, CliResult};

/// What a matched leaf runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Initialize a node home.
    Init,
    /// Run the node.
    Start,
    /// Export state at a height.
    Export,
    /// Show node status.
    Status,
    /// Show a committed block version.
    QueryBlock,
    /// Read a raw state key.
    QueryState,
    /// Show the validator set.
    QueryValidators,
    /// Sign a payload with a stored key.
    TxSign,
    /// Hand a signed payload to the controller.
    TxBroadcast,
    /// Create a key.
    KeysAdd,
    /// List keys.
    KeysList,
    /// Show one key.
    KeysShow,
    /// Validate a genesis file.
    GenesisValidate,
    /// Add an account balance to a genesis file.
    GenesisAddAccount,
    /// Generate shell completions.
    Completions,
}

/// One declarative command registration.
pub struct Registration {
    path: &'static [&'static str],
    aliases: &'static [&'static str],
    about: &'static str,
    parses_flags: bool,
    args: Vec<Arg>,
    action: Option<Action>,
}

impl Registration {
    /// Register a leaf command that parses its own flags.
    pub fn leaf(path: &'static [&'static str], about: &'static str, action: Action) -> Self {
        Self {
            path,
            aliases: &[],
            about,
            parses_flags: true,
            args: Vec::new(),
            action: Some(action),
        }
    }

    /// Register an umbrella node that delegates parsing to its children.
    pub fn group(path: &'static [&'static str], about: &'static str) -> Self {
        Self {
            path,
            aliases: &[],
            about,
            parses_flags: false,
            args: Vec::new(),
            action: None,
        }
    }

    /// Add aliases for the final path segment.
    pub fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Add a flag owned by this node (persistent for a group).
    pub fn arg(mut self, arg: Arg) -> Self {
        self.args.push(arg);
        self
    }
}

/// A node in the composed command tree.
///
/// The tree is acyclic, built once at process start, and read-only
/// afterwards.
#[derive(Debug)]
pub struct CommandNode {
    name: String,
    aliases: Vec<String>,
    about: String,
    parses_flags: bool,
    args: Vec<Arg>,
    children: Vec<CommandNode>,
    action: Option<Action>,
}

impl CommandNode {
    fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            about: String::new(),
            parses_flags: true,
            args: Vec::new(),
            children: Vec::new(),
            action: None,
        }
    }

    /// Node name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The action this node runs, if it is a leaf.
    pub fn action(&self) -> Option<Action> {
        self.action
    }

    /// Whether this node parses flags itself (false for umbrella nodes,
    /// which require a sub-command and own only persistent flags).
    pub fn parses_flags(&self) -> bool {
        self.parses_flags
    }

    /// Flags registered on this node.
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Immediate children, ordered by name.
    pub fn children(&self) -> &[CommandNode] {
        &self.children
    }

    fn child_mut(&mut self, name: &str) -> &mut CommandNode {
        // Children stay sorted by name so composition order never shows.
        match self.children.binary_search_by(|c| c.name.as_str().cmp(name)) {
            Ok(idx) => &mut self.children[idx],
            Err(idx) => {
                self.children.insert(idx, CommandNode::empty(name));
                &mut self.children[idx]
            }
        }
    }

    fn find_child(&self, segment: &str) -> Option<&CommandNode> {
        self.children
            .iter()
            .find(|c| c.name == segment || c.aliases.iter().any(|a| a == segment))
    }

    /// Prefix-walk the tree along `path`.
    ///
    /// An unknown segment under any node — umbrella or root — is a usage
    /// error naming the rejected sub-command; it never falls through to a
    /// leaf action.
    pub fn resolve(&self, path: &[&str]) -> CliResult<&CommandNode> {
        let mut node = self;
        for segment in path {
            node = node.find_child(segment).ok_or_else(|| {
                CliError::usage(format!(
                    "unknown sub-command \"{}\" for \"{}\"",
                    segment, node.name
                ))
            })?;
        }
        Ok(node)
    }

    /// Render this tree as a `clap` command for parsing and help.
    pub fn to_clap(&self) -> Command {
        let mut cmd = Command::new(self.name.clone()).about(self.about.clone());
        for alias in &self.aliases {
            cmd = cmd.visible_alias(alias.clone());
        }
        for arg in &self.args {
            cmd = cmd.arg(arg.clone());
        }
        if !self.children.is_empty() {
            // Umbrella nodes own no positional parsing: a sub-command is
            // required and an unknown one is rejected up front.
            cmd = cmd
                .subcommand_required(self.action.is_none())
                .arg_required_else_help(self.action.is_none());
            for child in &self.children {
                cmd = cmd.subcommand(child.to_clap());
            }
        }
        cmd
    }
}

/// Fold registrations into a command tree rooted at the binary name.
///
/// Order-independent: intermediate nodes are created on first touch and
/// filled in when their own registration arrives; children are kept sorted.
pub fn compose(
    name: &str,
    about: &str,
    root_args: Vec<Arg>,
    registrations: Vec<Registration>,
) -> CommandNode {
    let mut root = CommandNode::empty(name);
    root.about = about.to_string();
    root.args = root_args;

    for registration in registrations {
        let mut node = &mut root;
        for segment in registration.path {
            node = node.child_mut(segment);
        }
        node.about = registration.about.to_string();
        node.aliases = registration.aliases.iter().map(|a| a.to_string()).collect();
        node.parses_flags = registration.parses_flags;
        node.args.extend(registration.args);
        node.action = registration.action;
    }

    root
}

/// Follow the matched sub-command chain to the leaf.
///
/// Returns the canonical path segments and the leaf's matches.
pub fn matched_path(matches: &ArgMatches) -> (Vec<&str>, &ArgMatches) {
    let mut path = Vec::new();
    let mut current = matches;
    while let Some((name, sub)) = current.subcommand() {
        path.push(name);
        current = sub;
    }
    (path, current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registrations() -> Vec<Registration> {
        vec![
            Registration::leaf(&["start"], "Run the node", Action::Start),
            Registration::group(&["query"], "Querying subcommands")
                .aliases(&["q"])
                .arg(Arg::new("chain_id").long("chain-id").global(true)),
            Registration::leaf(&["query", "block"], "Show a block", Action::QueryBlock),
            Registration::group(&["tx"], "Transactions subcommands")
                .arg(Arg::new("chain_id").long("chain-id").global(true)),
            Registration::leaf(&["tx", "broadcast"], "Broadcast", Action::TxBroadcast),
        ]
    }

    fn sample_tree() -> CommandNode {
        compose("basaltd", "test", Vec::new(), sample_registrations())
    }

    #[test]
    fn test_compose_is_order_independent() {
        let forward = sample_tree();
        let mut reversed_regs = sample_registrations();
        reversed_regs.reverse();
        let reversed = compose("basaltd", "test", Vec::new(), reversed_regs);

        let names = |node: &CommandNode| {
            node.children()
                .iter()
                .map(|c| c.name().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&forward), names(&reversed));
        assert_eq!(
            forward.resolve(&["query", "block"]).unwrap().action(),
            reversed.resolve(&["query", "block"]).unwrap().action(),
        );
    }

    #[test]
    fn test_resolve_walks_to_leaf() {
        let tree = sample_tree();
        let node = tree.resolve(&["query", "block"]).unwrap();
        assert_eq!(node.action(), Some(Action::QueryBlock));
    }

    #[test]
    fn test_resolve_follows_aliases() {
        let tree = sample_tree();
        let node = tree.resolve(&["q", "block"]).unwrap();
        assert_eq!(node.action(), Some(Action::QueryBlock));
    }

    #[test]
    fn test_unknown_subcommand_is_usage_error() {
        let tree = sample_tree();
        let err = tree.resolve(&["query", "bogus"]).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
        assert!(err.to_string().contains("bogus"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_umbrella_nodes_delegate_parsing() {
        let tree = sample_tree();
        assert!(!tree.resolve(&["query"]).unwrap().parses_flags());
        assert!(tree.resolve(&["start"]).unwrap().parses_flags());
    }

    /// Both umbrellas register their own chain-id flag so each subtree works
    /// when invoked in isolation.
    #[test]
    fn test_chain_id_registered_on_both_umbrellas() {
        let tree = sample_tree();
        for umbrella in ["query", "tx"] {
            let node = tree.resolve(&[umbrella]).unwrap();
            assert!(
                node.args().iter().any(|a| a.get_id() == "chain_id"),
                "{} should own a chain-id flag",
                umbrella
            );
        }
    }

    #[test]
    fn test_clap_rejects_unknown_subcommand() {
        let cmd = sample_tree().to_clap();
        let result = cmd.try_get_matches_from(["basaltd", "query", "bogus"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_clap_round_trip_dispatch() {
        let tree = sample_tree();
        let matches = tree
            .to_clap()
            .try_get_matches_from(["basaltd", "tx", "broadcast"])
            .unwrap();
        let (path, _) = matched_path(&matches);
        assert_eq!(path, vec!["tx", "broadcast"]);
        assert_eq!(
            tree.resolve(&path).unwrap().action(),
            Some(Action::TxBroadcast)
        );
    }

    #[test]
    fn test_clap_debug_assert() {
        sample_tree().to_clap().debug_assert();
    }
}
