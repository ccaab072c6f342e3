//! Inbound frame dispatcher.
//!
//! Classifies each authenticated inbound frame by its `kind` and republishes
//! it as a typed [`AppEvent`] on the event bus. Consumers never see wire
//! frames. Unknown kinds and malformed bodies are dropped per-frame; a bad
//! frame never terminates the connection or affects the next frame.

use care_proto::{ChangeKind, ServerFrame};
use tracing::{debug, warn};

use crate::bus::EventBus;
use crate::events::AppEvent;

/// Parse raw frame text and publish the corresponding event, if any.
pub fn dispatch_text(text: &str, bus: &EventBus) {
    match ServerFrame::from_json(text) {
        Ok(frame) => dispatch_frame(frame, bus),
        Err(e) => warn!(error = %e, "dropping malformed frame"),
    }
}

/// Publish the event corresponding to a decoded frame, if any.
pub fn dispatch_frame(frame: ServerFrame, bus: &EventBus) {
    match frame {
        ServerFrame::EnterpriseNotification { data } => {
            bus.publish(AppEvent::NotificationPushed { data });
        }
        ServerFrame::MedicationUpdated { data } => {
            bus.publish(AppEvent::DomainChanged {
                change: ChangeKind::MedicationUpdated,
                data,
            });
        }
        ServerFrame::MedicationCreated { data } => {
            bus.publish(AppEvent::DomainChanged {
                change: ChangeKind::MedicationCreated,
                data,
            });
        }
        ServerFrame::NotificationCreated { data } => {
            bus.publish(AppEvent::DomainChanged {
                change: ChangeKind::NotificationCreated,
                data,
            });
        }
        ServerFrame::AuthSuccess { .. } => {
            // Handshake replies are consumed by the connection loop; one
            // arriving here is server noise.
            debug!("ignoring auth_success after authentication");
        }
        ServerFrame::Unknown => {
            warn!("dropping frame with unknown kind");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_enterprise_notification_republished_once() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        dispatch_text(r#"{"kind":"enterprise_notification","data":{"id":7}}"#, &bus);

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            AppEvent::NotificationPushed {
                data: json!({"id": 7})
            }
        );
        assert!(rx.try_recv().is_err()); // exactly once
    }

    #[tokio::test]
    async fn test_medication_frames_become_domain_changed() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        dispatch_text(r#"{"kind":"medication_updated","data":{"id":1}}"#, &bus);
        dispatch_text(r#"{"kind":"medication_created","data":{"id":2}}"#, &bus);
        dispatch_text(r#"{"kind":"notification_created","data":{"id":3}}"#, &bus);

        let changes: Vec<ChangeKind> = [rx.recv().await, rx.recv().await, rx.recv().await]
            .into_iter()
            .map(|ev| match ev.unwrap() {
                AppEvent::DomainChanged { change, .. } => change,
                other => panic!("expected DomainChanged, got {other:?}"),
            })
            .collect();

        assert_eq!(
            changes,
            vec![
                ChangeKind::MedicationUpdated,
                ChangeKind::MedicationCreated,
                ChangeKind::NotificationCreated,
            ]
        );
    }

    #[tokio::test]
    async fn test_malformed_frame_does_not_block_next_valid_frame() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        dispatch_text("{{{ definitely not json", &bus);
        dispatch_text(r#"{"kind":"enterprise_notification","data":{"id":8}}"#, &bus);

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            AppEvent::NotificationPushed {
                data: json!({"id": 8})
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_kind_publishes_nothing() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        dispatch_text(r#"{"kind":"totally_new_kind","data":{}}"#, &bus);

        assert!(rx.try_recv().is_err());
    }
}
