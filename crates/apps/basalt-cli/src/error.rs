//! CLI error types.

use thiserror::Error;

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error enum wrapping all crate errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Unknown command, sub-command, or malformed invocation.
    #[error("{0}")]
    Usage(String),

    /// Malformed runtime option.
    #[error("Configuration error: {0}")]
    Policy(#[from] basalt_policy::ConfigError),

    /// CLI-level configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config file is not valid TOML.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Store error.
    #[error("{0}")]
    Store(#[from] basalt_store::StoreError),

    /// Application error.
    #[error("{0}")]
    App(#[from] basalt_app::AppError),

    /// Export error.
    #[error("{0}")]
    Export(#[from] basalt_app::ExportError),

    /// Genesis file error.
    #[error("{0}")]
    Genesis(#[from] basalt_app::GenesisError),

    /// Keyring error.
    #[error("Key error: {0}")]
    Key(String),

    /// IO error.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Home directory has no genesis yet.
    #[error("Home is not initialized. Run 'basaltd init <moniker>' first.")]
    HomeNotInitialized,
}

impl CliError {
    /// Create a usage error.
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a keyring error.
    pub fn key(msg: impl Into<String>) -> Self {
        Self::Key(msg.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            // Operator-fixable state: 1
            Self::HomeNotInitialized => 1,
            // Usage errors: 2
            Self::Usage(_) => 2,
            // Config errors: 3
            Self::Policy(_) | Self::Config(_) | Self::Toml(_) => 3,
            // Keyring errors: 4
            Self::Key(_) => 4,
            // Genesis errors: 5
            Self::Genesis(_) => 5,
            // Export errors: 6
            Self::Export(_) => 6,
            // Store errors: 7
            Self::Store(_) => 7,
            // Application errors: 8
            Self::App(_) => 8,
            // IO errors: 9
            Self::Io(_) => 9,
            // JSON/format errors: 10
            Self::Json(_) => 10,
        }
    }
}
