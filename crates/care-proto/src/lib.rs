//! # care-proto
//!
//! Wire protocol for the CareLink realtime notification channel: the frame
//! types exchanged over the WebSocket connection between a client and the
//! notification server.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod frames;

pub use error::ProtoError;
pub use frames::{ChangeKind, ClientFrame, ServerFrame};
