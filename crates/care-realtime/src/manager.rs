//! Connection manager.
//!
//! Owns the single WebSocket per session and drives the state machine:
//! connect, authenticate, deliver, reconnect. All other components interact
//! through its public operations; nothing else touches the socket or the
//! state directly.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use care_proto::{ClientFrame, ServerFrame};
use care_session::{SessionCredential, SessionSource};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::{Mutex, RwLock};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{sleep, timeout};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::bus::EventBus;
use crate::config::RealtimeConfig;
use crate::dispatch;
use crate::events::AppEvent;
use crate::listeners::{ListenerId, ListenerRegistry};
use crate::state::{AtomicConnectionState, ConnectionState};

type WsRead = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;
type WsWrite = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Everything the connection task shares with the client handle.
#[derive(Clone)]
struct Shared {
    config: Arc<RealtimeConfig>,
    session: Arc<dyn SessionSource>,
    state: Arc<AtomicConnectionState>,
    /// Cross-cutting guard: set the instant an attempt begins, cleared only
    /// when the connection task terminates. Racing callers observe
    /// "already active" even before the state machine has moved.
    active: Arc<AtomicBool>,
    attempts: Arc<AtomicU32>,
    listeners: Arc<ListenerRegistry>,
    bus: EventBus,
    outbound: Arc<RwLock<Option<mpsc::Sender<ClientFrame>>>>,
}

/// Why a live connection ended.
enum CloseReason {
    /// The client closed it intentionally. No reconnect.
    Local,
    /// The server or the transport ended it. Reconnect policy applies.
    Remote(String),
}

/// The realtime notification client.
///
/// There is at most one live socket per client, regardless of how many call
/// sites request a connection. Construct one per session with [`shared`]
/// and hand the `Arc` to every interested component.
///
/// [`shared`]: RealtimeClient::shared
pub struct RealtimeClient {
    shared: Shared,
    shutdown: Mutex<Option<watch::Sender<bool>>>,
}

impl RealtimeClient {
    /// Create a new client. It stays disconnected until [`connect`] is
    /// called with `eligible == true`.
    ///
    /// [`connect`]: RealtimeClient::connect
    #[must_use]
    pub fn new(config: RealtimeConfig, session: Arc<dyn SessionSource>) -> Self {
        Self {
            shared: Shared {
                config: Arc::new(config),
                session,
                state: Arc::new(AtomicConnectionState::new(ConnectionState::Disconnected)),
                active: Arc::new(AtomicBool::new(false)),
                attempts: Arc::new(AtomicU32::new(0)),
                listeners: Arc::new(ListenerRegistry::new()),
                bus: EventBus::new(),
                outbound: Arc::new(RwLock::new(None)),
            },
            shutdown: Mutex::new(None),
        }
    }

    /// Create the shared per-session instance.
    #[must_use]
    pub fn shared(config: RealtimeConfig, session: Arc<dyn SessionSource>) -> Arc<Self> {
        Arc::new(Self::new(config, session))
    }

    /// Get the current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.shared.state.load()
    }

    /// True iff the handshake completed and frames are flowing.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Authenticated
    }

    /// Get the current reconnection attempt count.
    #[must_use]
    pub fn reconnect_attempts(&self) -> u32 {
        self.shared.attempts.load(Ordering::SeqCst)
    }

    /// Subscribe to typed application events.
    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<AppEvent> {
        self.shared.bus.subscribe()
    }

    /// Register a connectivity listener.
    ///
    /// The listener is invoked synchronously with the current connected flag
    /// before this returns, so late subscribers converge immediately.
    pub fn subscribe(&self, listener: impl Fn(bool) + Send + Sync + 'static) -> ListenerId {
        self.shared.listeners.add(listener, self.is_connected())
    }

    /// Remove a connectivity listener. Idempotent.
    pub fn unsubscribe(&self, id: ListenerId) {
        self.shared.listeners.remove(id);
    }

    /// Request a connection. Idempotent; returns immediately.
    ///
    /// `eligible == false` behaves as [`disconnect`]. A call while an
    /// attempt is in flight or the client is authenticated is a no-op,
    /// apart from re-notifying listeners of the current state. A call
    /// without a valid, unexpired credential fails silently (log only) —
    /// absence of realtime push must never block the application.
    ///
    /// [`disconnect`]: RealtimeClient::disconnect
    pub fn connect(&self, eligible: bool) {
        if !eligible {
            self.disconnect();
            return;
        }

        let state = self.state();
        if state != ConnectionState::Disconnected {
            debug!(?state, "connect ignored: attempt already in flight");
            self.shared.listeners.notify(state == ConnectionState::Authenticated);
            return;
        }

        if self
            .shared
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("connect ignored: connection already active");
            self.shared.listeners.notify(self.is_connected());
            return;
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        *self.shutdown.lock() = Some(shutdown_tx);

        let shared = self.shared.clone();
        tokio::spawn(async move {
            connection_loop(shared, shutdown_rx).await;
        });
    }

    /// Close any live connection and cancel pending timers.
    ///
    /// Idempotent. The socket is closed with the normal-closure code, so no
    /// automatic reconnect follows; the auth timer and any scheduled backoff
    /// are cancelled along with the connection task that owns them.
    pub fn disconnect(&self) {
        if let Some(tx) = self.shutdown.lock().take() {
            let _ = tx.send(true);
        }
        *self.shared.outbound.write() = None;
        if self
            .shared
            .state
            .transition(ConnectionState::Authenticated, ConnectionState::Disconnected)
        {
            self.shared.listeners.notify(false);
        }
    }

    /// Transmit a frame if authenticated.
    ///
    /// Returns `true` when the frame was handed to the writer. Frames sent
    /// while not authenticated are dropped, never queued.
    pub async fn send(&self, frame: ClientFrame) -> bool {
        if !self.is_connected() {
            debug!("dropping outbound frame: not authenticated");
            return false;
        }
        let tx = self.shared.outbound.read().clone();
        match tx {
            Some(tx) => tx.send(frame).await.is_ok(),
            None => false,
        }
    }
}

impl std::fmt::Debug for RealtimeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeClient")
            .field("endpoint", &self.shared.config.endpoint)
            .field("state", &self.state())
            .field("reconnect_attempts", &self.reconnect_attempts())
            .finish_non_exhaustive()
    }
}

/// Read the current credential, refusing expired or undecodable tokens.
fn current_credential(session: &dyn SessionSource) -> Option<SessionCredential> {
    let token = session.bearer_token()?;
    match SessionCredential::decode(token) {
        Ok(credential) if credential.is_expired() => {
            warn!("credential expired; not connecting");
            None
        }
        Ok(credential) => Some(credential),
        Err(e) => {
            warn!(error = %e, "credential undecodable; not connecting");
            None
        }
    }
}

/// One logical connection: dial, handshake, deliver, and reconnect with
/// backoff after abnormal closes, until told to stop or attempts run out.
async fn connection_loop(shared: Shared, mut shutdown: watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow() {
            break;
        }

        let Some(credential) = current_credential(shared.session.as_ref()) else {
            info!("no usable credential; abandoning connection attempt");
            break;
        };

        shared.state.store(ConnectionState::Connecting);

        let connected = tokio::select! {
            result = tokio_tungstenite::connect_async(&shared.config.endpoint) => result,
            _ = shutdown.changed() => break,
        };

        match connected {
            Ok((ws_stream, _)) => {
                shared.state.store(ConnectionState::AwaitingAuth);
                let (mut write, mut read) = ws_stream.split();

                let authed = send_auth(&mut write, &credential).await
                    && await_auth_success(&mut read, &shared, &mut shutdown).await;

                if authed {
                    shared.state.store(ConnectionState::Authenticated);
                    shared.attempts.store(0, Ordering::SeqCst);
                    shared.listeners.notify(true);

                    let (tx, rx) = mpsc::channel::<ClientFrame>(32);
                    *shared.outbound.write() = Some(tx);

                    let close = run_connection(read, write, rx, &shared.bus, &mut shutdown).await;

                    *shared.outbound.write() = None;
                    if shared
                        .state
                        .transition(ConnectionState::Authenticated, ConnectionState::Disconnected)
                    {
                        shared.listeners.notify(false);
                    }

                    match close {
                        CloseReason::Local => break,
                        CloseReason::Remote(reason) => info!(%reason, "connection lost"),
                    }
                } else {
                    // A silent server and a rejected token look the same
                    // from here: failed attempt, transport rules apply.
                    shared.state.store(ConnectionState::Disconnected);
                }
            }
            Err(e) => {
                shared.state.store(ConnectionState::Disconnected);
                warn!(error = %e, "failed to open connection");
            }
        }

        if *shutdown.borrow() {
            break;
        }

        let attempt = shared.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if !shared.config.reconnect.should_reconnect(attempt) {
            warn!(attempt, "reconnect attempts exhausted; staying disconnected");
            break;
        }

        let delay = shared.config.reconnect.delay_for_attempt(attempt);
        info!(attempt, ?delay, "scheduling reconnect");
        tokio::select! {
            () = sleep(delay) => {}
            _ = shutdown.changed() => break,
        }
    }

    shared.state.store(ConnectionState::Disconnected);
    *shared.outbound.write() = None;
    shared.active.store(false, Ordering::SeqCst);
}

/// Transmit the auth handshake frame.
async fn send_auth(write: &mut WsWrite, credential: &SessionCredential) -> bool {
    let frame = ClientFrame::auth(credential.token.clone());
    match frame.to_json() {
        Ok(json) => {
            if write.send(Message::Text(json)).await.is_err() {
                warn!("failed to send auth frame");
                return false;
            }
            true
        }
        Err(e) => {
            warn!(error = %e, "failed to encode auth frame");
            false
        }
    }
}

/// Wait (bounded by the auth timeout) for the server to accept the
/// handshake. Frames other than `auth_success` arriving early are dropped.
async fn await_auth_success(
    read: &mut WsRead,
    shared: &Shared,
    shutdown: &mut watch::Receiver<bool>,
) -> bool {
    let wait = async {
        loop {
            match read.next().await {
                Some(Ok(Message::Text(text))) => match ServerFrame::from_json(&text) {
                    Ok(ServerFrame::AuthSuccess { .. }) => return true,
                    Ok(frame) => debug!(?frame, "ignoring frame before authentication"),
                    Err(e) => warn!(error = %e, "dropping malformed frame during handshake"),
                },
                Some(Ok(Message::Close(_))) | None => return false,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(error = %e, "socket error during handshake");
                    return false;
                }
            }
        }
    };

    tokio::select! {
        result = timeout(shared.config.auth_timeout, wait) => match result {
            Ok(authed) => authed,
            Err(_) => {
                warn!(
                    timeout_secs = shared.config.auth_timeout.as_secs(),
                    "authentication timed out"
                );
                false
            }
        },
        _ = shutdown.changed() => false,
    }
}

/// The authenticated delivery loop: inbound frames go to the dispatcher,
/// outbound frames to the socket, and a shutdown signal closes the socket
/// with the normal-closure code.
async fn run_connection(
    mut read: WsRead,
    mut write: WsWrite,
    mut outbound: mpsc::Receiver<ClientFrame>,
    bus: &EventBus,
    shutdown: &mut watch::Receiver<bool>,
) -> CloseReason {
    loop {
        tokio::select! {
            msg = read.next() => match msg {
                Some(Ok(Message::Text(text))) => dispatch::dispatch_text(&text, bus),
                Some(Ok(Message::Close(_))) => {
                    return CloseReason::Remote("server closed connection".to_string());
                }
                Some(Ok(_)) => {} // Ping, Pong, Binary
                Some(Err(e)) => return CloseReason::Remote(format!("socket error: {e}")),
                None => return CloseReason::Remote("connection closed".to_string()),
            },
            frame = outbound.recv() => match frame {
                Some(frame) => match frame.to_json() {
                    Ok(json) => {
                        if write.send(Message::Text(json)).await.is_err() {
                            return CloseReason::Remote("write failed".to_string());
                        }
                    }
                    Err(e) => warn!(error = %e, "failed to encode outbound frame"),
                },
                // Sender cleared: the client is tearing this connection down.
                None => {
                    send_normal_close(&mut write).await;
                    return CloseReason::Local;
                }
            },
            _ = shutdown.changed() => {
                send_normal_close(&mut write).await;
                return CloseReason::Local;
            }
        }
    }
}

async fn send_normal_close(write: &mut WsWrite) {
    let close = Message::Close(Some(CloseFrame {
        code: CloseCode::Normal,
        reason: "client disconnect".into(),
    }));
    if write.send(close).await.is_err() {
        debug!("close frame not delivered");
    }
}
