//! Height-bound state export.
//!
//! Reconstructs an application instance pinned at an arbitrary historical
//! height and extracts a portable bundle of application state plus the
//! resolved validator set, for consumption by downstream genesis tooling
//! (hard-fork migrations, new-chain bootstraps).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use basalt_store::NodeStore;

use crate::app::{App, RESERVED_PREFIX};
use crate::error::{AppError, ExportError};
use crate::genesis::Validator;
use crate::sender::Sender;

/// The portable export bundle.
///
/// `app_state` is opaque to this layer: whatever the modules wrote, keyed as
/// they wrote it. The validator set is resolved out of band so genesis
/// tooling never parses module state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedState {
    /// Height the bundle represents (0 after zero-height normalization).
    pub height: u64,
    /// Raw application state as a JSON object.
    pub app_state: serde_json::Value,
    /// The validator set at the exported height.
    pub validators: Vec<Validator>,
}

impl App {
    /// Extract the export bundle from this instance's current state.
    ///
    /// With `for_zero_height`, validator bookkeeping is normalized as if a
    /// new chain were starting from genesis: update heights rebase to zero
    /// and, when `jail_allowed` is non-empty, every validator *not* on that
    /// allow-list is jailed. An empty list applies no jail filtering.
    pub fn export(
        &mut self,
        for_zero_height: bool,
        jail_allowed: &[String],
    ) -> Result<ExportedState, ExportError> {
        let mut validators = self.validators().map_err(ExportError::App)?;

        let mut app_state = serde_json::Map::new();
        for (key, value) in self.state_entries().map_err(ExportError::App)? {
            if key.starts_with(RESERVED_PREFIX) {
                continue;
            }
            let parsed = serde_json::from_slice(&value).unwrap_or_else(|_| {
                serde_json::Value::String(String::from_utf8_lossy(&value).into_owned())
            });
            app_state.insert(key, parsed);
        }

        let height = if for_zero_height {
            normalize_for_zero_height(&mut validators, jail_allowed);
            0
        } else {
            self.height()
        };

        info!(
            height,
            for_zero_height,
            validators = validators.len(),
            "exported application state"
        );

        Ok(ExportedState {
            height,
            app_state: serde_json::Value::Object(app_state),
            validators,
        })
    }
}

/// Rebase validator bookkeeping for a chain restarting at height zero.
fn normalize_for_zero_height(validators: &mut [Validator], jail_allowed: &[String]) {
    for validator in validators.iter_mut() {
        validator.update_height = 0;
        if !jail_allowed.is_empty() && !jail_allowed.iter().any(|a| a == &validator.address) {
            validator.jailed = true;
        }
    }
}

/// Reconstruct an application at `height` and export its state.
///
/// `height == -1` exports the latest committed state (origin mode). Any
/// other non-negative height must have been committed; a missing height is
/// an error and no partial bundle is produced.
pub fn export_at_height(
    store: NodeStore,
    sender: Arc<dyn Sender>,
    height: i64,
    for_zero_height: bool,
    jail_allowed: &[String],
) -> Result<ExportedState, ExportError> {
    let mut app = match height {
        -1 => App::reconstruct(store, sender, true)?,
        h if h >= 0 => {
            let mut app = App::reconstruct(store, sender, false)?;
            match app.load_height(h as u64) {
                Ok(()) => app,
                Err(AppError::HeightUnavailable(missing)) => {
                    return Err(ExportError::HeightUnavailable(missing))
                }
                Err(other) => return Err(ExportError::App(other)),
            }
        }
        h => return Err(ExportError::InvalidHeight(h)),
    };
    app.export(for_zero_height, jail_allowed)
}
