//! Frame definitions for the realtime channel.
//!
//! Every frame on the wire is a JSON object with at least a `kind` field.
//! The client initiates exactly one frame type (the auth handshake); the
//! server pushes event frames after the handshake completes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtoError;

/// Frames sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Authentication handshake, sent immediately after the socket opens.
    Auth {
        /// Bearer token proving the viewer's identity.
        token: String,
    },
}

impl ClientFrame {
    /// Create an auth frame for the given bearer token.
    #[must_use]
    pub fn auth(token: impl Into<String>) -> Self {
        Self::Auth {
            token: token.into(),
        }
    }

    /// Serialize to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ProtoError> {
        serde_json::to_string(self).map_err(|e| ProtoError::Encoding(e.to_string()))
    }

    /// Deserialize from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a valid client frame.
    pub fn from_json(json: &str) -> Result<Self, ProtoError> {
        serde_json::from_str(json).map_err(|e| ProtoError::Decoding(e.to_string()))
    }
}

/// Frames pushed from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServerFrame {
    /// The auth handshake was accepted.
    AuthSuccess {
        /// Optional human-readable detail.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// A server-side notification was generated for this viewer.
    EnterpriseNotification {
        /// Opaque notification payload.
        data: Value,
    },
    /// A medication record changed.
    MedicationUpdated {
        /// Opaque record payload.
        data: Value,
    },
    /// A medication record was created.
    MedicationCreated {
        /// Opaque record payload.
        data: Value,
    },
    /// A notification record was created.
    NotificationCreated {
        /// Opaque record payload.
        data: Value,
    },
    /// Any frame kind this client does not recognize.
    ///
    /// Unknown kinds decode successfully and are dropped by the dispatcher
    /// rather than failing the whole frame.
    #[serde(other)]
    Unknown,
}

impl ServerFrame {
    /// Serialize to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ProtoError> {
        serde_json::to_string(self).map_err(|e| ProtoError::Encoding(e.to_string()))
    }

    /// Deserialize from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a JSON object with a `kind`.
    pub fn from_json(json: &str) -> Result<Self, ProtoError> {
        serde_json::from_str(json).map_err(|e| ProtoError::Decoding(e.to_string()))
    }
}

/// Classification of a domain-change frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// A medication record changed.
    MedicationUpdated,
    /// A medication record was created.
    MedicationCreated,
    /// A notification record was created.
    NotificationCreated,
}

impl ChangeKind {
    /// The wire `kind` string for this change.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MedicationUpdated => "medication_updated",
            Self::MedicationCreated => "medication_created",
            Self::NotificationCreated => "notification_created",
        }
    }
}
