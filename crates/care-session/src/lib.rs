//! # care-session
//!
//! Session credential handling for CareLink clients: bearer tokens, local
//! (unverified) expiry checks, and the viewer identity the realtime
//! transport reads through the [`SessionSource`] trait.
//!
//! Nothing in this crate verifies a token signature. The local decode exists
//! only to avoid dialing the server with a token that is already expired;
//! the server remains the source of truth for validity.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod credential;
pub mod error;
pub mod viewer;

pub use credential::{SessionCredential, TokenClaims};
pub use error::SessionError;
pub use viewer::{SessionSource, Viewer};
