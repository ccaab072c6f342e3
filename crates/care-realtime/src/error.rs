//! Error types for the care-realtime crate.
//!
//! Nothing here is fatal to a host application. The connection loop recovers
//! internally (reconnect, drop-and-log); these types exist for the fallible
//! seams and for structured logging context.

use thiserror::Error;

/// Errors that can occur in the realtime transport.
#[derive(Debug, Error)]
pub enum RealtimeError {
    /// Failed to open the WebSocket connection.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The auth handshake was not accepted within the timeout.
    #[error("authentication timed out after {seconds}s")]
    AuthTimeout {
        /// Configured timeout, in seconds.
        seconds: u64,
    },

    /// No credential is available, or the one available has expired.
    #[error("no usable credential: {0}")]
    Credential(String),

    /// Protocol error.
    #[error("protocol error: {0}")]
    Protocol(#[from] care_proto::ProtoError),

    /// Session error.
    #[error("session error: {0}")]
    Session(#[from] care_session::SessionError),
}
