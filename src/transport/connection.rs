//! WebSocket connection and event loop.
//!
//! This module owns the single stream to the remote peer: it performs the
//! client handshake, transmits outbound text frames and hands inbound text
//! frames to the registered handler.
//!
//! # Event Loop
//!
//! [`Connection::open`] spawns a tokio task that handles:
//!
//! - The client handshake (bounded by a connect timeout)
//! - Incoming text frames, dispatched to the handler in arrival order
//! - Outgoing text queued by [`Connection::send`]
//! - Lifecycle transitions published through a watch channel
//!
//! Any failure ends the task and leaves the connection [`ConnectionState::Closed`].
//! There is no reconnection.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, trace, warn};
use url::Url;

use crate::error::{Error, Result};

use super::state::ConnectionState;

// ============================================================================
// Constants
// ============================================================================

/// Default timeout for the client handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Types
// ============================================================================

/// Inbound message handler callback type.
///
/// Called once per inbound text frame with the raw frame text. The handler
/// runs without the slot locked, so it may register a replacement.
pub type MessageHandler = Arc<dyn Fn(String) + Send + Sync>;

/// Handler slot shared between the handle and the event loop.
type HandlerSlot = Arc<Mutex<Option<MessageHandler>>>;

// ============================================================================
// ConnectionCommand
// ============================================================================

/// Internal commands for the event loop.
enum ConnectionCommand {
    /// Transmit one text frame.
    Send(String),
    /// Close the socket and stop.
    Shutdown,
}

// ============================================================================
// Backend
// ============================================================================

/// The event loop's side of a connection.
struct Backend {
    /// Commands from the handle.
    command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
    /// Lifecycle state publisher.
    state_tx: watch::Sender<ConnectionState>,
    /// Inbound handler (shared with the handle).
    handler: HandlerSlot,
}

impl Backend {
    /// Moves the state forward. Backward or repeated transitions are ignored.
    fn advance(&self, next: ConnectionState) -> bool {
        self.state_tx.send_if_modified(|current| {
            if current.can_advance_to(next) {
                debug!(from = %current, to = %next, "Connection state changed");
                *current = next;
                true
            } else {
                false
            }
        })
    }

    /// Hands one inbound text to the registered handler.
    fn dispatch(&self, text: String) {
        let handler = self.handler.lock().clone();
        match handler {
            Some(handler) => handler(text),
            None => trace!("No message handler registered, frame dropped"),
        }
    }

    /// Enters the terminal state and releases the handler.
    fn finish(&self) {
        self.advance(ConnectionState::Closed);
        // Dropping the handler ends channel subscriptions.
        self.handler.lock().take();
    }
}

// ============================================================================
// Connection
// ============================================================================

/// The single WebSocket stream to the remote peer.
///
/// A `Connection` is not `Clone`: exactly one handle owns the stream, and
/// dropping it closes the socket.
///
/// # Example
///
/// ```ignore
/// use chat_relay::transport::Connection;
///
/// let connection = Connection::open("ws://localhost:8080")?;
/// connection.on_message(|text| println!("peer: {text}"));
/// connection.wait_open(Duration::from_secs(5)).await?;
/// connection.send("hello")?;
/// ```
pub struct Connection {
    /// Target address.
    address: String,
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<ConnectionCommand>,
    /// Lifecycle state (published by the event loop).
    state_rx: watch::Receiver<ConnectionState>,
    /// Inbound handler (shared with the event loop).
    handler: HandlerSlot,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("address", &self.address)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Connection - Constructors
// ============================================================================

impl Connection {
    /// Opens a connection to `address` with the default connect timeout.
    ///
    /// Returns immediately in [`ConnectionState::Connecting`]. The handshake
    /// runs in the background; its outcome is observable through
    /// [`state`](Self::state) and [`wait_open`](Self::wait_open).
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidAddress`] if `address` is not a `ws://` or `wss://` URL
    /// - [`Error::Config`] if called outside a Tokio runtime
    pub fn open(address: impl Into<String>) -> Result<Self> {
        Self::open_with_timeout(address, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Opens a connection with a custom connect timeout.
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open).
    pub fn open_with_timeout(address: impl Into<String>, connect_timeout: Duration) -> Result<Self> {
        let address = address.into();
        parse_address(&address)?;

        let runtime = Handle::try_current()
            .map_err(|_| Error::config("Connection::open must be called within a Tokio runtime"))?;

        let (connection, backend) = Self::with_backend(address.clone());
        runtime.spawn(Self::run(address, connect_timeout, backend));

        Ok(connection)
    }

    /// Creates a handle and its event loop side, not yet connected to anything.
    fn with_backend(address: String) -> (Self, Backend) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let handler: HandlerSlot = Arc::new(Mutex::new(None));

        let connection = Self {
            address,
            command_tx,
            state_rx,
            handler: Arc::clone(&handler),
        };
        let backend = Backend {
            command_rx,
            state_tx,
            handler,
        };

        (connection, backend)
    }
}

// ============================================================================
// Connection - Public API
// ============================================================================

impl Connection {
    /// Returns the target address.
    #[inline]
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Returns `true` if the stream is open.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }

    /// Queues `text` for transmission as a single text frame.
    ///
    /// The text is sent verbatim. Nothing is transmitted unless the stream is
    /// open. A write failure discovered later closes the connection.
    ///
    /// # Errors
    ///
    /// - [`Error::NotOpen`] if the stream is connecting or closed
    pub fn send(&self, text: impl Into<String>) -> Result<()> {
        let state = self.state();
        if !state.is_open() {
            return Err(Error::not_open(state));
        }

        self.command_tx
            .send(ConnectionCommand::Send(text.into()))
            .map_err(|_| Error::not_open(ConnectionState::Closed))
    }

    /// Registers the inbound message handler.
    ///
    /// Only the most recently registered handler is active.
    pub fn on_message<F>(&self, handler: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.install(Arc::new(handler));
    }

    /// Registers a handler that forwards inbound text into a channel.
    ///
    /// Replaces any previously registered handler. The receiver yields `None`
    /// once the connection has closed and every delivered message was read.
    #[must_use]
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.install(Arc::new(move |text| {
            let _ = tx.send(text);
        }));
        rx
    }

    /// Waits for the handshake to finish.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the connection closed instead of opening
    /// - [`Error::ConnectionTimeout`] if still connecting after `wait`
    pub async fn wait_open(&self, wait: Duration) -> Result<()> {
        let mut state_rx = self.state_rx.clone();
        let result = timeout(
            wait,
            state_rx.wait_for(|state| *state != ConnectionState::Connecting),
        )
        .await;

        let state = match result {
            Ok(Ok(state)) => *state,
            Ok(Err(_)) => return Err(Error::ConnectionClosed),
            Err(_) => return Err(Error::connection_timeout(wait.as_millis() as u64)),
        };

        if state.is_open() {
            Ok(())
        } else {
            Err(Error::ConnectionClosed)
        }
    }

    /// Waits until the connection reaches its terminal state.
    pub async fn wait_closed(&self) {
        let mut state_rx = self.state_rx.clone();
        let _ = state_rx.wait_for(|state| state.is_closed()).await;
    }

    /// Stores `handler` in the slot, unless the event loop already finished.
    fn install(&self, handler: MessageHandler) {
        *self.handler.lock() = Some(handler);

        // The event loop clears the slot after entering Closed; a handler
        // installed after that would never be released.
        if self.state().is_closed() {
            self.handler.lock().take();
        }
    }
}

// ============================================================================
// Connection - Event Loop
// ============================================================================

impl Connection {
    /// Connection task: handshake, then frame I/O until failure or shutdown.
    async fn run(address: String, connect_timeout: Duration, mut backend: Backend) {
        let handshake = timeout(connect_timeout, connect_async(address.as_str()));

        let ws_stream = tokio::select! {
            result = handshake => match result {
                Ok(Ok((ws_stream, response))) => {
                    debug!(status = %response.status(), "WebSocket handshake completed");
                    ws_stream
                }
                Ok(Err(e)) => {
                    warn!(%address, error = %e, "WebSocket connect failed");
                    backend.finish();
                    return;
                }
                Err(_) => {
                    warn!(
                        %address,
                        timeout_ms = connect_timeout.as_millis() as u64,
                        "WebSocket connect timed out"
                    );
                    backend.finish();
                    return;
                }
            },

            // Only shutdown can arrive before the stream is open.
            _ = backend.command_rx.recv() => {
                debug!("Connection dropped while connecting");
                backend.finish();
                return;
            }
        };

        backend.advance(ConnectionState::Open);
        info!(%address, "WebSocket connection established");

        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                // Incoming frames from the peer
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            trace!(len = text.as_str().len(), "Text frame received");
                            backend.dispatch(text.as_str().to_owned());
                        }

                        Some(Ok(Message::Close(frame))) => {
                            debug!(?frame, "WebSocket closed by remote");
                            // Flushes the queued close reply.
                            let _ = ws_write.close().await;
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            break;
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break;
                        }

                        // Ignore Binary, Ping, Pong, Frame
                        _ => {}
                    }
                }

                // Commands from the handle
                command = backend.command_rx.recv() => {
                    match command {
                        Some(ConnectionCommand::Send(text)) => {
                            let len = text.len();
                            if let Err(e) = ws_write.send(Message::Text(text.into())).await {
                                warn!(error = %e, "Failed to transmit message");
                                break;
                            }
                            trace!(len, "Text frame sent");
                        }

                        Some(ConnectionCommand::Shutdown) => {
                            debug!("Shutdown command received");
                            let _ = ws_write.close().await;
                            break;
                        }

                        None => {
                            debug!("Command channel closed");
                            let _ = ws_write.close().await;
                            break;
                        }
                    }
                }
            }
        }

        backend.finish();
        debug!("Event loop terminated");
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        let _ = self.command_tx.send(ConnectionCommand::Shutdown);
    }
}

// ============================================================================
// Address Validation
// ============================================================================

/// Parses `address` as a WebSocket URL.
///
/// # Errors
///
/// Returns [`Error::InvalidAddress`] unless `address` is a `ws://` or
/// `wss://` URL with a host.
pub fn parse_address(address: &str) -> Result<Url> {
    let url = Url::parse(address).map_err(|e| Error::invalid_address(address, e.to_string()))?;

    if !matches!(url.scheme(), "ws" | "wss") {
        return Err(Error::invalid_address(
            address,
            format!("scheme must be ws or wss, got {}", url.scheme()),
        ));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(Error::invalid_address(address, "missing host"));
    }

    Ok(url)
}

// ============================================================================
// Test Support
// ============================================================================

/// Socket-less peer for driving a [`Connection`] in tests.
#[cfg(test)]
pub(crate) struct TestPeer {
    backend: Backend,
}

#[cfg(test)]
impl TestPeer {
    /// Creates a connection whose event loop side is controlled by the test.
    pub(crate) fn connect(state: ConnectionState) -> (Connection, Self) {
        let (connection, backend) = Connection::with_backend("ws://test.invalid".to_owned());
        let peer = Self { backend };
        peer.backend.advance(state);
        if state.is_closed() {
            peer.backend.finish();
        }
        (connection, peer)
    }

    /// Delivers one inbound text frame.
    pub(crate) fn deliver(&self, text: &str) {
        self.backend.dispatch(text.to_owned());
    }

    /// Completes the handshake.
    pub(crate) fn open(&self) {
        self.backend.advance(ConnectionState::Open);
    }

    /// Simulates a transport failure.
    pub(crate) fn close(&self) {
        self.backend.finish();
    }

    /// Drains every frame the connection has queued for transmission.
    pub(crate) fn sent(&mut self) -> Vec<String> {
        let mut frames = Vec::new();
        while let Ok(command) = self.backend.command_rx.try_recv() {
            if let ConnectionCommand::Send(text) = command {
                frames.push(text);
            }
        }
        frames
    }
}

// ============================================================================
// Tests
// ============================================================================
