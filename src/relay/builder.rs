//! Builder pattern for relay configuration.
//!
//! Provides a fluent API for opening the connection and creating a
//! [`MessageRelay`] around it.
//!
//! # Example
//!
//! ```no_run
//! use chat_relay::{LineInput, RelayBuilder, WriterTranscript};
//!
//! # async fn example() -> chat_relay::Result<()> {
//! let mut relay = RelayBuilder::new()
//!     .address("ws://localhost:8080")
//!     .connect(LineInput::new(), WriterTranscript::stdout())?;
//!
//! relay.wait_open().await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::InboundFormat;
use crate::surface::{InputSource, Transcript};
use crate::transport::{Connection, parse_address};

use super::core::MessageRelay;
use super::options::{RelayOptions, SendPolicy};

// ============================================================================
// Constants
// ============================================================================

/// Address used when none is configured.
pub const DEFAULT_ADDRESS: &str = "ws://localhost:8080";

// ============================================================================
// RelayBuilder
// ============================================================================

/// Builder for configuring a [`MessageRelay`].
#[derive(Debug, Default, Clone)]
pub struct RelayBuilder {
    /// Peer address.
    address: Option<String>,
    /// Relay options.
    options: RelayOptions,
}

// ============================================================================
// RelayBuilder Implementation
// ============================================================================

impl RelayBuilder {
    /// Creates a builder with default configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the peer address (`ws://` or `wss://`).
    #[inline]
    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Replaces all options.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: RelayOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the handshake timeout.
    #[inline]
    #[must_use]
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.options.connect_timeout = connect_timeout;
        self
    }

    /// Sets the send policy.
    #[inline]
    #[must_use]
    pub fn send_policy(mut self, send_policy: SendPolicy) -> Self {
        self.options.send_policy = send_policy;
        self
    }

    /// Sets the inbound format.
    #[inline]
    #[must_use]
    pub fn inbound_format(mut self, inbound_format: InboundFormat) -> Self {
        self.options.inbound_format = inbound_format;
        self
    }

    /// Opens the connection and wires it to `input` and `transcript`.
    ///
    /// Returns as soon as the handshake has started.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidAddress`] if the address is not a WebSocket URL
    /// - [`Error::Config`] if the connect timeout is zero or no Tokio runtime is running
    pub fn connect<I, T>(self, input: I, transcript: T) -> Result<MessageRelay<I, T>>
    where
        I: InputSource,
        T: Transcript,
    {
        let address = self.validate_address()?;
        self.validate_options()?;

        debug!(%address, options = ?self.options, "Opening relay connection");

        let connection = Connection::open_with_timeout(address, self.options.connect_timeout)?;
        Ok(MessageRelay::with_options(
            connection,
            input,
            transcript,
            self.options,
        ))
    }
}

// ============================================================================
// Validation
// ============================================================================

impl RelayBuilder {
    /// Validates the address configuration.
    fn validate_address(&self) -> Result<String> {
        let address = self
            .address
            .clone()
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_owned());

        parse_address(&address)?;
        Ok(address)
    }

    /// Validates the relay options.
    fn validate_options(&self) -> Result<()> {
        if self.options.connect_timeout.is_zero() {
            return Err(Error::config(
                "Connect timeout must be greater than zero.\n\
                 Example: RelayBuilder::new().connect_timeout(Duration::from_secs(5))",
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
