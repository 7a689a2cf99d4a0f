//! # Dockyard UI Bridge Errors
//!
//! [`UiBridgeError`] reports failures of the message sinks attached to the
//! router and misuse of the bridge's sink registry.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UiBridgeError {
    #[error("Message sink '{sink_name}' failed to handle a {kind} message: {message}")]
    SinkFailed {
        sink_name: String,
        kind: String,
        message: String,
    },

    #[error("A message sink named '{0}' is already attached")]
    DuplicateSink(String),

    #[error("Message sink '{0}' not found")]
    SinkNotFound(String),
}
