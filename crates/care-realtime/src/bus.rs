//! Process-wide typed event bus.

use tokio::sync::broadcast;
use tracing::trace;

use crate::events::AppEvent;

/// Default buffered capacity per subscriber.
const DEFAULT_CAPACITY: usize = 256;

/// Fan-out bus for [`AppEvent`]s.
///
/// A thin wrapper over a broadcast channel: every subscriber receives every
/// event published after it subscribed. Publishing with no subscribers is
/// not an error; realtime events are best-effort by design.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    /// Create a bus with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a bus with a specific per-subscriber capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: AppEvent) {
        if self.tx.send(event).is_err() {
            trace!("event dropped: no subscribers");
        }
    }

    /// Subscribe to events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(AppEvent::NotificationPushed {
            data: json!({"id": 7}),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            AppEvent::NotificationPushed {
                data: json!({"id": 7})
            }
        );
    }

    #[tokio::test]
    async fn test_fan_out_to_multiple_subscribers() {
        let bus = EventBus::new();
        let mut rx_a = bus.subscribe();
        let mut rx_b = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(AppEvent::NotificationPushed { data: json!(null) });

        assert!(rx_a.recv().await.is_ok());
        assert!(rx_b.recv().await.is_ok());
    }

    #[test]
    fn test_publish_without_subscribers_does_not_panic() {
        let bus = EventBus::new();
        bus.publish(AppEvent::NotificationPushed { data: json!(1) });
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_earlier_events() {
        let bus = EventBus::new();
        bus.publish(AppEvent::NotificationPushed { data: json!(1) });

        let mut rx = bus.subscribe();
        bus.publish(AppEvent::NotificationPushed { data: json!(2) });

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            AppEvent::NotificationPushed { data: json!(2) }
        );
    }
}
