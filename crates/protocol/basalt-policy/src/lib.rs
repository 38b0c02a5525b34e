//! Runtime policy resolution for the Basalt daemon.
//!
//! This crate turns a bag of loosely-typed runtime options (flags, config
//! file, environment — whatever the host wires up) into the strict, immutable
//! [`RuntimePolicy`] that governs pruning, halting, snapshotting, and caching
//! for one process lifetime.
//!
//! # Design
//!
//! - [`OptionBag`] is a narrow typed accessor over an untyped option source.
//!   Absent keys are `None`, never an error; only malformed values fail.
//! - [`TomlBag`] implements the accessor over a TOML table (the config-file
//!   source); [`LayeredBag`] composes sources so explicit flags take
//!   precedence over file values.
//! - [`resolve`] is a pure function: same bag in, same policy out.
//!
//! # Example
//!
//! ```
//! use basalt_policy::{resolve, PruningStrategy, TomlBag};
//!
//! let table = toml::from_str(
//!     r#"
//!     pruning = "custom"
//!     pruning_interval = 10
//!     pruning_keep_recent = 100
//!     pruning_keep_every = 500
//!     halt_height = 1000
//!     "#,
//! )
//! .unwrap();
//!
//! let policy = resolve(&TomlBag::new(table)).unwrap();
//! assert_eq!(policy.halt_height, 1000);
//! assert!(matches!(policy.pruning, PruningStrategy::Custom { .. }));
//! ```

pub mod error;
pub mod options;
pub mod policy;

pub use error::{ConfigError, Result};
pub use options::{keys, LayeredBag, OptionBag, TomlBag};
pub use policy::{resolve, PruningStrategy, RuntimePolicy, BASE_DENOM, DEFAULT_MIN_GAS_PRICE};
