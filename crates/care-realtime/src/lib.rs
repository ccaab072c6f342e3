//! # care-realtime
//!
//! Realtime notification transport for CareLink clients.
//!
//! Maintains one persistent WebSocket per session to the notification
//! server, with an authentication handshake, automatic reconnection with
//! exponential backoff, and a fan-out dispatcher that republishes inbound
//! frames as typed application events. UI components share a single
//! [`RealtimeClient`] handle; the client guarantees at most one live socket
//! no matter how many call sites request a connection.
//!
//! Everything here is best-effort by design: losing the realtime channel
//! never surfaces as a user-visible error, only as a quiet absence of push
//! updates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bus;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod gate;
pub mod listeners;
pub mod manager;
pub mod reconnect;
pub mod state;

pub use bus::EventBus;
pub use config::{endpoint_url, RealtimeConfig, DEFAULT_AUTH_TIMEOUT, NOTIFICATIONS_PATH};
pub use error::RealtimeError;
pub use events::AppEvent;
pub use gate::{eligible, is_public_route, PUBLIC_ROUTES};
pub use listeners::{ListenerId, ListenerRegistry};
pub use manager::RealtimeClient;
pub use reconnect::{ReconnectConfig, DEFAULT_MAX_ATTEMPTS};
pub use state::{AtomicConnectionState, ConnectionState};
