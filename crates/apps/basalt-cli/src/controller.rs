//! Controller channel for the standalone binary.
//!
//! The bootstrap API takes any [`Sender`] implementation; embedders wire in
//! their controller process. The standalone `basaltd` binary has no external
//! controller, so it installs a loopback that acknowledges every request
//! in-process.

use basalt_app::{Sender, SenderError};
use tracing::debug;

/// In-process stand-in for the external controller.
///
/// Echoes request payloads as replies so request/reply call sites behave the
/// same standalone as embedded.
pub struct LoopbackController;

impl Sender for LoopbackController {
    fn send(&self, need_reply: bool, payload: &str) -> Result<String, SenderError> {
        debug!(need_reply, payload, "loopback controller request");
        if need_reply {
            Ok(payload.to_string())
        } else {
            Ok(String::new())
        }
    }
}
