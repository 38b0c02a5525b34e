//! Error types for application construction, execution, and export.

use basalt_store::StoreError;
use thiserror::Error;

/// Error returned by a [`crate::Sender`] implementation.
#[derive(Debug, Error)]
pub enum SenderError {
    /// The controller process could not be reached.
    #[error("controller unavailable: {0}")]
    Unavailable(String),

    /// The controller rejected the request.
    #[error("controller rejected request: {0}")]
    Rejected(String),
}

/// Errors from building or running an application instance.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage failure.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// The runtime policy is invalid. Policy resolution should have caught
    /// this already; hitting it here is an operator or packaging defect.
    #[error("invalid runtime policy: {0}")]
    InvalidPolicy(String),

    /// A requested historical height was never committed (or was pruned).
    #[error("height {0} is not available in the store")]
    HeightUnavailable(u64),

    /// State (de)serialization failure.
    #[error("state serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A scheduled upgrade has no handler and was not skipped.
    #[error("upgrade \"{name}\" required at height {height}")]
    UpgradeRequired {
        /// Name of the scheduled upgrade.
        name: String,
        /// Height the upgrade is scheduled for.
        height: u64,
    },

    /// A periodic invariant check failed.
    #[error("invariant violated at height {height}: {detail}")]
    InvariantViolated {
        /// Height at which the check ran.
        height: u64,
        /// What went wrong.
        detail: String,
    },

    /// Delegation to the external controller failed.
    #[error("{0}")]
    Sender(#[from] SenderError),

    /// The trace sink could not be written.
    #[error("trace sink error: {0}")]
    Trace(#[source] std::io::Error),
}

/// Errors from the height-bound export operation.
///
/// No partial bundle is ever produced: export either returns a complete
/// [`crate::ExportedState`] or one of these.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The requested height was never committed.
    #[error("height {0} is not available in the store")]
    HeightUnavailable(u64),

    /// The requested height is neither `-1` nor a committed height.
    #[error("export height {0} is invalid")]
    InvalidHeight(i64),

    /// Failure while reconstructing or reading the application.
    #[error(transparent)]
    App(#[from] AppError),
}

/// Errors from reading, writing, or validating a genesis file.
#[derive(Debug, Error)]
pub enum GenesisError {
    /// I/O failure on the genesis file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The genesis file is not valid JSON.
    #[error("genesis parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The genesis content violates a structural rule.
    #[error("invalid genesis: {0}")]
    Invalid(String),
}
