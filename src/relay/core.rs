//! Message relay between the user, the transcript and the connection.
//!
//! # Example
//!
//! ```no_run
//! use chat_relay::{Connection, LineInput, MessageRelay, WriterTranscript};
//!
//! # async fn example() -> chat_relay::Result<()> {
//! let connection = Connection::open("ws://localhost:8080")?;
//! let mut relay = MessageRelay::new(connection, LineInput::new(), WriterTranscript::stdout());
//! relay.wait_open().await?;
//!
//! relay.input_mut().set("Hello");
//! relay.submit()?;
//!
//! while relay.pump().await {}
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::protocol::Message;
use crate::surface::{InputSource, Transcript, is_blank};
use crate::transport::{Connection, ConnectionState};

use super::options::{RelayOptions, SendPolicy};

// ============================================================================
// Submitted
// ============================================================================

/// Outcome of [`MessageRelay::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    /// Input was empty or whitespace; nothing happened.
    Ignored,
    /// Appended to the transcript and queued for transmission.
    Sent,
    /// Appended to the transcript but not transmitted.
    Undelivered,
}

// ============================================================================
// MessageRelay
// ============================================================================

/// Wires user input and peer messages into the transcript.
///
/// The relay owns the [`Connection`], so there is exactly one stream per
/// relay. It subscribes to inbound text once, at construction.
pub struct MessageRelay<I, T> {
    /// The stream to the peer.
    connection: Connection,
    /// Inbound text, in arrival order.
    inbound: mpsc::UnboundedReceiver<String>,
    /// Pending user text.
    input: I,
    /// Display collaborator.
    transcript: T,
    /// Behavior settings.
    options: RelayOptions,
}

impl<I, T> fmt::Debug for MessageRelay<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageRelay")
            .field("connection", &self.connection)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// MessageRelay - Constructors
// ============================================================================

impl<I, T> MessageRelay<I, T>
where
    I: InputSource,
    T: Transcript,
{
    /// Creates a relay with default options.
    #[must_use]
    pub fn new(connection: Connection, input: I, transcript: T) -> Self {
        Self::with_options(connection, input, transcript, RelayOptions::default())
    }

    /// Creates a relay with explicit options.
    ///
    /// Takes over the connection's inbound handler slot.
    #[must_use]
    pub fn with_options(
        connection: Connection,
        input: I,
        transcript: T,
        options: RelayOptions,
    ) -> Self {
        let inbound = connection.subscribe();

        Self {
            connection,
            inbound,
            input,
            transcript,
            options,
        }
    }
}

// ============================================================================
// MessageRelay - Message Flow
// ============================================================================

impl<I, T> MessageRelay<I, T>
where
    I: InputSource,
    T: Transcript,
{
    /// Sends the pending input.
    ///
    /// Blank input (empty or whitespace only) is ignored and left in place.
    /// Otherwise the original, untrimmed text is appended as an outgoing
    /// entry, handed to the connection, and the input is cleared.
    ///
    /// With [`SendPolicy::Optimistic`] the entry is appended even when the
    /// connection is not open; the result is then [`Submitted::Undelivered`].
    ///
    /// # Errors
    ///
    /// - [`Error::NotOpen`] under [`SendPolicy::ConfirmOpen`] when the connection
    ///   is not open. Nothing is appended and the input is kept.
    pub fn submit(&mut self) -> Result<Submitted> {
        let text = self.input.pending();
        if is_blank(&text) {
            trace!("Blank input ignored");
            return Ok(Submitted::Ignored);
        }

        if self.options.send_policy == SendPolicy::ConfirmOpen {
            let state = self.connection.state();
            if !state.is_open() {
                debug!(%state, "Submit refused, connection not open");
                return Err(Error::not_open(state));
            }
        }

        let message = Message::outgoing(text);
        self.transcript.append(message.direction(), message.text());

        let outcome = match self.connection.send(message.into_text()) {
            Ok(()) => Submitted::Sent,
            Err(e) => {
                warn!(error = %e, "Outgoing message shown but not transmitted");
                Submitted::Undelivered
            }
        };

        self.input.clear();
        Ok(outcome)
    }

    /// Appends one inbound frame as an incoming entry.
    ///
    /// Inbound text is not trimmed or validated.
    pub fn receive(&mut self, frame: String) {
        let message = Message::incoming(self.options.inbound_format.render(frame));
        self.transcript.append(message.direction(), message.text());
    }

    /// Waits for the next inbound frame and appends it.
    ///
    /// Returns `false` once the connection has closed and every delivered
    /// frame has been appended. Cancel-safe.
    pub async fn pump(&mut self) -> bool {
        match self.inbound.recv().await {
            Some(frame) => {
                self.receive(frame);
                true
            }
            None => {
                debug!("Inbound stream ended");
                false
            }
        }
    }

    /// Waits for the handshake, bounded by the configured connect timeout.
    ///
    /// # Errors
    ///
    /// See [`Connection::wait_open`].
    pub async fn wait_open(&self) -> Result<()> {
        self.connection.wait_open(self.options.connect_timeout).await
    }
}

// ============================================================================
// MessageRelay - Accessors
// ============================================================================

impl<I, T> MessageRelay<I, T> {
    /// Returns the peer address.
    ///
    /// The connection itself is not exposed: its handler slot belongs to the
    /// relay.
    #[inline]
    #[must_use]
    pub fn address(&self) -> &str {
        self.connection.address()
    }

    /// Returns the connection state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Returns the options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &RelayOptions {
        &self.options
    }

    /// Returns the input source.
    #[inline]
    #[must_use]
    pub fn input(&self) -> &I {
        &self.input
    }

    /// Returns the input source mutably.
    #[inline]
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Returns the transcript.
    #[inline]
    #[must_use]
    pub fn transcript(&self) -> &T {
        &self.transcript
    }

    /// Returns the transcript mutably.
    #[inline]
    pub fn transcript_mut(&mut self) -> &mut T {
        &mut self.transcript
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use proptest::prelude::*;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    use crate::protocol::{Direction, InboundFormat};
    use crate::relay::RelayBuilder;
    use crate::surface::{LineInput, MemoryTranscript};
    use crate::transport::connection::TestPeer;

    type TestRelay = MessageRelay<LineInput, MemoryTranscript>;

    fn relay_with(state: ConnectionState, options: RelayOptions) -> (TestRelay, TestPeer) {
        let (connection, peer) = TestPeer::connect(state);
        let relay = MessageRelay::with_options(
            connection,
            LineInput::new(),
            MemoryTranscript::new(),
            options,
        );
        (relay, peer)
    }

    fn relay(state: ConnectionState) -> (TestRelay, TestPeer) {
        relay_with(state, RelayOptions::default())
    }

    #[test]
    fn test_submit_while_open() {
        let (mut relay, mut peer) = relay(ConnectionState::Open);
        relay.input_mut().set("Hello");

        assert_eq!(relay.submit().expect("submit"), Submitted::Sent);
        assert_eq!(
            relay.transcript().pairs(),
            [(Direction::Outgoing, "Hello")]
        );
        assert_eq!(peer.sent(), ["Hello"]);
        assert!(relay.input().is_empty());
    }

    #[test]
    fn test_submit_keeps_untrimmed_text() {
        let (mut relay, mut peer) = relay(ConnectionState::Open);
        relay.input_mut().set("  Hello  ");

        relay.submit().expect("submit");

        assert_eq!(
            relay.transcript().pairs(),
            [(Direction::Outgoing, "  Hello  ")]
        );
        assert_eq!(peer.sent(), ["  Hello  "]);
    }

    #[test]
    fn test_submit_whitespace_is_noop() {
        let (mut relay, mut peer) = relay(ConnectionState::Open);
        relay.input_mut().set("   ");

        assert_eq!(relay.submit().expect("submit"), Submitted::Ignored);
        assert!(relay.transcript().is_empty());
        assert!(peer.sent().is_empty());
        assert_eq!(relay.input().as_str(), "   ");
    }

    #[test]
    fn test_submit_blank_uses_browser_whitespace() {
        let (mut relay, mut peer) = relay(ConnectionState::Open);

        relay.input_mut().set("\u{FEFF}");
        assert_eq!(relay.submit().expect("submit"), Submitted::Ignored);

        relay.input_mut().set("\u{85}");
        assert_eq!(relay.submit().expect("submit"), Submitted::Sent);
        assert_eq!(peer.sent(), ["\u{85}"]);
    }

    #[test]
    fn test_submit_while_closed_shows_undelivered_message() {
        let (mut relay, mut peer) = relay(ConnectionState::Closed);
        relay.input_mut().set("Hello");

        assert_eq!(relay.submit().expect("submit"), Submitted::Undelivered);
        assert_eq!(
            relay.transcript().pairs(),
            [(Direction::Outgoing, "Hello")]
        );
        assert!(peer.sent().is_empty());
        assert!(relay.input().is_empty());
    }

    #[test]
    fn test_submit_while_connecting_is_undelivered() {
        let (mut relay, mut peer) = relay(ConnectionState::Connecting);
        relay.input_mut().set("early");

        assert_eq!(relay.submit().expect("submit"), Submitted::Undelivered);
        assert_eq!(relay.transcript().len(), 1);
        assert!(peer.sent().is_empty());
    }

    #[test]
    fn test_confirm_open_refuses_while_closed() {
        let options = RelayOptions::new().with_send_policy(SendPolicy::ConfirmOpen);
        let (mut relay, mut peer) = relay_with(ConnectionState::Closed, options);
        relay.input_mut().set("Hello");

        let err = relay.submit().unwrap_err();

        assert!(matches!(
            err,
            Error::NotOpen {
                state: ConnectionState::Closed
            }
        ));
        assert!(relay.transcript().is_empty());
        assert!(peer.sent().is_empty());
        assert_eq!(relay.input().as_str(), "Hello");
    }

    #[test]
    fn test_confirm_open_sends_after_handshake() {
        let options = RelayOptions::new().with_send_policy(SendPolicy::ConfirmOpen);
        let (mut relay, mut peer) = relay_with(ConnectionState::Connecting, options);
        relay.input_mut().set("Hello");

        assert!(relay.submit().is_err());
        peer.open();

        assert_eq!(relay.submit().expect("submit"), Submitted::Sent);
        assert_eq!(peer.sent(), ["Hello"]);
        assert_eq!(relay.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_receive_appends_incoming() {
        let (mut relay, peer) = relay(ConnectionState::Open);
        peer.deliver("Hi there");

        assert!(relay.pump().await);
        assert_eq!(
            relay.transcript().pairs(),
            [(Direction::Incoming, "Hi there")]
        );
    }

    #[tokio::test]
    async fn test_inbound_keeps_delivery_order() {
        let (mut relay, peer) = relay(ConnectionState::Open);
        peer.deliver("A");
        peer.deliver("B");

        assert!(relay.pump().await);
        assert!(relay.pump().await);
        assert_eq!(
            relay.transcript().pairs(),
            [(Direction::Incoming, "A"), (Direction::Incoming, "B")]
        );
    }

    #[tokio::test]
    async fn test_inbound_is_not_trimmed() {
        let (mut relay, peer) = relay(ConnectionState::Open);
        peer.deliver("   ");

        assert!(relay.pump().await);
        assert_eq!(relay.transcript().pairs(), [(Direction::Incoming, "   ")]);
    }

    #[tokio::test]
    async fn test_submit_and_receive_interleave() {
        let (mut relay, peer) = relay(ConnectionState::Open);
        relay.input_mut().set("Hello");
        relay.submit().expect("submit");
        peer.deliver("Hi there");
        assert!(relay.pump().await);

        assert_eq!(
            relay.transcript().pairs(),
            [
                (Direction::Outgoing, "Hello"),
                (Direction::Incoming, "Hi there")
            ]
        );
    }

    #[tokio::test]
    async fn test_pump_drains_then_stops_after_close() {
        let (mut relay, peer) = relay(ConnectionState::Open);
        peer.deliver("last");
        peer.close();

        assert!(relay.pump().await);
        assert!(!relay.pump().await);
        assert_eq!(relay.state(), ConnectionState::Closed);
        assert_eq!(relay.transcript().pairs(), [(Direction::Incoming, "last")]);
    }

    #[test]
    fn test_observers_reflect_connection() {
        let (relay, peer) = relay(ConnectionState::Connecting);
        assert_eq!(relay.address(), "ws://test.invalid");
        assert_eq!(relay.state(), ConnectionState::Connecting);

        peer.open();
        assert_eq!(relay.state(), ConnectionState::Open);
    }

    #[tokio::test]
    async fn test_envelope_format_renders_text() {
        let options = RelayOptions::new().with_inbound_format(InboundFormat::Envelope);
        let (mut relay, peer) = relay_with(ConnectionState::Open, options);
        peer.deliver(r#"{"text":"Hi","timestamp":"12:00:00","latency":5,"type":"bot"}"#);
        peer.deliver("not json");

        assert!(relay.pump().await);
        assert!(relay.pump().await);
        assert_eq!(
            relay.transcript().pairs(),
            [
                (Direction::Incoming, "Hi"),
                (Direction::Incoming, "not json")
            ]
        );
    }

    #[tokio::test]
    async fn test_end_to_end_echo() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let mut ws = accept_async(stream).await.expect("upgrade");
            while let Some(Ok(message)) = ws.next().await {
                if message.is_text() && ws.send(message).await.is_err() {
                    break;
                }
            }
        });

        let mut relay = RelayBuilder::new()
            .address(format!("ws://127.0.0.1:{port}"))
            .connect_timeout(Duration::from_secs(5))
            .connect(LineInput::new(), MemoryTranscript::new())
            .expect("connect");
        relay.wait_open().await.expect("open");

        relay.input_mut().set("Hello");
        assert_eq!(relay.submit().expect("submit"), Submitted::Sent);
        assert!(relay.pump().await);

        assert_eq!(
            relay.transcript().pairs(),
            [
                (Direction::Outgoing, "Hello"),
                (Direction::Incoming, "Hello")
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_blank_input_is_noop(text in "[ \t\r\n]{0,16}") {
            let (mut relay, mut peer) = relay(ConnectionState::Open);
            relay.input_mut().set(text.clone());

            prop_assert_eq!(relay.submit().expect("submit"), Submitted::Ignored);
            prop_assert!(relay.transcript().is_empty());
            prop_assert!(peer.sent().is_empty());
            prop_assert_eq!(relay.input().as_str(), text.as_str());
        }

        #[test]
        fn prop_non_blank_input_sent_once(text in "[ \t]{0,4}[a-zA-Z0-9!?.,]{1,12}[ \t]{0,4}") {
            let (mut relay, mut peer) = relay(ConnectionState::Open);
            relay.input_mut().set(text.clone());

            prop_assert_eq!(relay.submit().expect("submit"), Submitted::Sent);
            prop_assert_eq!(
                relay.transcript().pairs(),
                vec![(Direction::Outgoing, text.as_str())]
            );
            prop_assert_eq!(peer.sent(), vec![text.clone()]);
            prop_assert!(relay.input().is_empty());
        }
    }
}
