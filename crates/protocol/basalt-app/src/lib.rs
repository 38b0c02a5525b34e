//! Application construction and state export for the Basalt daemon.
//!
//! This crate builds (and re-builds, for export) the application instance
//! that replicates state-machine transitions under a consensus engine:
//!
//! - **Factory** ([`App::build`]): turns a resolved
//!   [`RuntimePolicy`](basalt_policy::RuntimePolicy), an opened store, an
//!   optional trace sink, and a [`Sender`] capability into a running
//!   instance. Policy is applied at construction time and never afterwards.
//! - **Sender** ([`Sender`]): the instance's sole synchronous channel to an
//!   externally-owned controller process.
//! - **Export** ([`export_at_height`]): reconstructs the application pinned
//!   at a historical height and extracts a portable state bundle.
//! - **Genesis** ([`Genesis`]): the document that seeds an empty store and
//!   the shape downstream tooling writes exported state back into.
//!
//! Transaction execution semantics and the consensus/networking protocol are
//! out of scope; this crate exposes exactly the surface those collaborators
//! drive (`get`/`set`/`commit`, halt checks, delegation).

pub mod app;
pub mod cache;
pub mod error;
pub mod export;
pub mod genesis;
pub mod sender;
pub mod snapshot;

pub use app::{
    version_info, App, AppHooks, UpgradePlan, VersionInfo, CHAIN_ID_KEY, UPGRADE_PLAN_KEY,
    VALIDATORS_KEY,
};
pub use cache::InterBlockCache;
pub use error::{AppError, ExportError, GenesisError, SenderError};
pub use export::{export_at_height, ExportedState};
pub use genesis::{Genesis, Validator};
pub use sender::Sender;
pub use snapshot::SnapshotStore;
