//! The sender capability — the application's channel to its controller.
//!
//! A Basalt node delegates privileged or out-of-process work to an external
//! controller process. The [`Sender`] trait is the whole contract: an opaque
//! string payload goes out, an opaque string reply (possibly empty) comes
//! back. Payload encoding is owned by the controller, not by this crate.

use crate::error::SenderError;

/// Synchronous request/reply channel to the external controller.
///
/// Invoked from within state-machine execution; the caller blocks until a
/// reply or error arrives. There is no timeout or cancellation at this layer
/// — an implementation needing bounded latency must enforce it internally.
///
/// Held by the application instance for its entire lifetime and never
/// reassigned.
pub trait Sender: Send + Sync {
    /// Send `payload` to the controller.
    ///
    /// When `need_reply` is false the controller's reply is discarded and an
    /// empty string is an acceptable return.
    fn send(&self, need_reply: bool, payload: &str) -> Result<String, SenderError>;
}

impl<F> Sender for F
where
    F: Fn(bool, &str) -> Result<String, SenderError> + Send + Sync,
{
    fn send(&self, need_reply: bool, payload: &str) -> Result<String, SenderError> {
        self(need_reply, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_closure_is_a_sender() {
        let sender: Arc<dyn Sender> =
            Arc::new(|need_reply: bool, payload: &str| -> Result<String, SenderError> {
                if need_reply {
                    Ok(format!("echo:{}", payload))
                } else {
                    Ok(String::new())
                }
            });

        assert_eq!(sender.send(true, "ping").unwrap(), "echo:ping");
        assert_eq!(sender.send(false, "ping").unwrap(), "");
    }

    #[test]
    fn test_sender_error_propagates() {
        let sender: Arc<dyn Sender> = Arc::new(|_: bool, _: &str| -> Result<String, SenderError> {
            Err(SenderError::Unavailable("controller down".to_string()))
        });
        assert!(sender.send(true, "ping").is_err());
    }
}
