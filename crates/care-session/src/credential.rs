//! Bearer credentials and local expiry checks.
//!
//! A [`SessionCredential`] is a transient copy of the bearer token held only
//! for the duration of one connection attempt. The payload decode is
//! deliberately unverified: it pre-empts a doomed handshake with an expired
//! token, nothing more.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// The claims this client reads from a token payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Expiration time (Unix timestamp, seconds).
    pub exp: i64,
    /// Subject (viewer ID), when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

impl TokenClaims {
    /// Returns the expiration time as a `DateTime`.
    #[must_use]
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Checks if the claims have expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// A bearer token plus its locally decoded claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredential {
    /// The opaque bearer string, sent verbatim in the auth handshake.
    pub token: String,
    /// Claims decoded (not verified) from the token payload.
    pub claims: TokenClaims,
}

impl SessionCredential {
    /// Decode a compact JWT-style token without verifying its signature.
    ///
    /// # Errors
    ///
    /// Returns an error if the token does not have three segments, the
    /// payload segment is not base64url, or the payload is not claims JSON.
    pub fn decode(token: impl Into<String>) -> Result<Self, SessionError> {
        let token = token.into();
        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_)) => payload,
            _ => {
                return Err(SessionError::MalformedToken(
                    "expected 3 dot-separated segments".to_string(),
                ))
            }
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| SessionError::PayloadEncoding(e.to_string()))?;
        let claims: TokenClaims = serde_json::from_slice(&bytes)
            .map_err(|e| SessionError::InvalidClaims(e.to_string()))?;

        Ok(Self { token, claims })
    }

    /// Checks if the credential has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.claims.is_expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    /// Build an unsigned compact token with the given claims payload.
    fn make_token(claims: &TokenClaims) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap());
        format!("{header}.{payload}.sig")
    }

    #[test]
    fn test_decode_reads_exp_and_sub() {
        let claims = TokenClaims {
            exp: 4_102_444_800, // 2100-01-01
            sub: Some("42".to_string()),
        };
        let cred = SessionCredential::decode(make_token(&claims)).unwrap();
        assert_eq!(cred.claims, claims);
        assert!(!cred.is_expired());
    }

    #[test]
    fn test_expired_token_is_expired() {
        let claims = TokenClaims {
            exp: 1_000_000_000, // 2001
            sub: None,
        };
        let cred = SessionCredential::decode(make_token(&claims)).unwrap();
        assert!(cred.is_expired());
    }

    #[test_case("only-one-segment"; "one segment")]
    #[test_case("two.segments"; "two segments")]
    #[test_case(""; "empty")]
    fn test_wrong_segment_count_is_malformed(token: &str) {
        let err = SessionCredential::decode(token).unwrap_err();
        assert!(matches!(err, SessionError::MalformedToken(_)));
    }

    #[test]
    fn test_bad_base64_payload() {
        let err = SessionCredential::decode("header.!!!not-base64!!!.sig").unwrap_err();
        assert!(matches!(err, SessionError::PayloadEncoding(_)));
    }

    #[test]
    fn test_non_claims_payload() {
        let payload = URL_SAFE_NO_PAD.encode(b"plain text");
        let err = SessionCredential::decode(format!("h.{payload}.s")).unwrap_err();
        assert!(matches!(err, SessionError::InvalidClaims(_)));
    }

    #[test]
    fn test_expiry_datetime() {
        let claims = TokenClaims {
            exp: 0,
            sub: None,
        };
        assert_eq!(claims.expiry().unwrap().timestamp(), 0);
    }
}
