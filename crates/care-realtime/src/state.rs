//! Connection state types.

use std::sync::atomic::{AtomicU32, Ordering};

/// State of the realtime connection.
///
/// Exactly one instance exists per [`RealtimeClient`](crate::RealtimeClient);
/// transitions are the only way to mutate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected.
    Disconnected,
    /// Socket dial in progress.
    Connecting,
    /// Socket open, auth frame sent, waiting for the server to accept.
    AwaitingAuth,
    /// Handshake accepted; frames are flowing.
    Authenticated,
}

/// Atomic wrapper for connection state.
#[derive(Debug)]
pub struct AtomicConnectionState(AtomicU32);

impl AtomicConnectionState {
    /// Create a new atomic state.
    #[must_use]
    pub const fn new(state: ConnectionState) -> Self {
        Self(AtomicU32::new(state as u32))
    }

    /// Load the current state.
    #[must_use]
    pub fn load(&self) -> ConnectionState {
        Self::from_u32(self.0.load(Ordering::SeqCst))
    }

    /// Store a new state.
    pub fn store(&self, state: ConnectionState) {
        self.0.store(state as u32, Ordering::SeqCst);
    }

    /// Transition from `current` to `next` only if `current` still holds.
    ///
    /// Returns `true` when the transition was applied. Racing callers that
    /// lose the exchange observe `false` and must back off.
    pub fn transition(&self, current: ConnectionState, next: ConnectionState) -> bool {
        self.0
            .compare_exchange(
                current as u32,
                next as u32,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }

    fn from_u32(value: u32) -> ConnectionState {
        match value {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::AwaitingAuth,
            3 => ConnectionState::Authenticated,
            _ => ConnectionState::Disconnected,
        }
    }
}
