//! Viewer identity and the session seam the transport reads through.

use serde::{Deserialize, Serialize};

/// The authenticated household member viewing the application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Viewer {
    /// Numeric identity. Zero is never a valid identity.
    pub id: u64,
    /// Display name, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Viewer {
    /// Create a viewer with the given identity.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self { id, name: None }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether this viewer carries a valid numeric identity.
    #[must_use]
    pub const fn has_valid_identity(&self) -> bool {
        self.id != 0
    }
}

/// Source of the current session's credential and viewer.
///
/// Implemented by the embedding application's auth layer. The realtime
/// transport only ever reads it: it holds a transient copy of the token for
/// one connection attempt and never persists or mutates session state.
pub trait SessionSource: Send + Sync {
    /// The current bearer token, if a session exists.
    fn bearer_token(&self) -> Option<String>;

    /// The currently authenticated viewer, if any.
    fn viewer(&self) -> Option<Viewer>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_identity_validity() {
        assert!(Viewer::new(7).has_valid_identity());
        assert!(!Viewer::new(0).has_valid_identity());
    }

    #[test]
    fn test_viewer_builder() {
        let viewer = Viewer::new(3).with_name("Ana");
        assert_eq!(viewer.id, 3);
        assert_eq!(viewer.name.as_deref(), Some("Ana"));
    }

    struct FixedSession;

    impl SessionSource for FixedSession {
        fn bearer_token(&self) -> Option<String> {
            Some("token".to_string())
        }

        fn viewer(&self) -> Option<Viewer> {
            Some(Viewer::new(1))
        }
    }

    #[test]
    fn test_session_source_object_safety() {
        let source: Box<dyn SessionSource> = Box::new(FixedSession);
        assert_eq!(source.bearer_token().as_deref(), Some("token"));
        assert_eq!(source.viewer(), Some(Viewer::new(1)));
    }
}
