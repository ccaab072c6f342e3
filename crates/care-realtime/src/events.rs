//! Application event types published on the event bus.

use care_proto::ChangeKind;
use serde_json::Value;

/// Typed events republished from inbound frames.
///
/// Consumers subscribe to these through [`EventBus`](crate::EventBus) and
/// never touch wire frames directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A server-side notification was pushed for this viewer.
    NotificationPushed {
        /// Opaque notification payload.
        data: Value,
    },
    /// A domain record changed (medication or notification CRUD).
    DomainChanged {
        /// What kind of change occurred.
        change: ChangeKind,
        /// Opaque record payload.
        data: Value,
    },
}
