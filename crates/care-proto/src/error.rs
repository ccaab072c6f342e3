//! Error types for the care-proto crate.

use thiserror::Error;

/// Errors that can occur during frame encoding or decoding.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// Failed to encode a frame.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Failed to decode a frame.
    #[error("decoding error: {0}")]
    Decoding(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_error_display() {
        let err = ProtoError::Encoding("bad frame".to_string());
        assert_eq!(err.to_string(), "encoding error: bad frame");
    }

    #[test]
    fn test_decoding_error_display() {
        let err = ProtoError::Decoding("truncated input".to_string());
        assert_eq!(err.to_string(), "decoding error: truncated input");
    }
}
