//! Error types for the care-session crate.

use thiserror::Error;

/// Errors that can occur while handling session credentials.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The token is not a structurally valid compact JWT.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The token payload segment is not valid base64url.
    #[error("invalid payload encoding: {0}")]
    PayloadEncoding(String),

    /// The token payload is not valid claims JSON.
    #[error("invalid claims: {0}")]
    InvalidClaims(String),
}
