//! Relay configuration options.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use chat_relay::{InboundFormat, RelayOptions, SendPolicy};
//!
//! let options = RelayOptions::new()
//!     .with_connect_timeout(Duration::from_secs(5))
//!     .with_send_policy(SendPolicy::ConfirmOpen)
//!     .with_inbound_format(InboundFormat::Envelope);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::protocol::InboundFormat;
use crate::transport::DEFAULT_CONNECT_TIMEOUT;

// ============================================================================
// SendPolicy
// ============================================================================

/// What `submit` does when the connection is not open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendPolicy {
    /// Always append the outgoing entry, then attempt the send.
    ///
    /// A failed send is reported but the entry stays in the transcript.
    #[default]
    Optimistic,

    /// Append and send only while the connection is open.
    ///
    /// Otherwise nothing is appended and the input is kept.
    ConfirmOpen,
}

// ============================================================================
// RelayOptions
// ============================================================================

/// Relay behavior settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayOptions {
    /// Maximum time for the WebSocket handshake.
    pub connect_timeout: Duration,

    /// Submit behavior while the connection is not open.
    pub send_policy: SendPolicy,

    /// How inbound frames become transcript text.
    pub inbound_format: InboundFormat,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl RelayOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            send_policy: SendPolicy::Optimistic,
            inbound_format: InboundFormat::Raw,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl RelayOptions {
    /// Sets the handshake timeout.
    #[inline]
    #[must_use]
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Sets the send policy.
    #[inline]
    #[must_use]
    pub fn with_send_policy(mut self, send_policy: SendPolicy) -> Self {
        self.send_policy = send_policy;
        self
    }

    /// Sets the inbound format.
    #[inline]
    #[must_use]
    pub fn with_inbound_format(mut self, inbound_format: InboundFormat) -> Self {
        self.inbound_format = inbound_format;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RelayOptions::default();
        assert_eq!(options.connect_timeout, Duration::from_secs(30));
        assert_eq!(options.send_policy, SendPolicy::Optimistic);
        assert_eq!(options.inbound_format, InboundFormat::Raw);
        assert_eq!(options, RelayOptions::new());
    }

    #[test]
    fn test_builder_methods_chain() {
        let options = RelayOptions::new()
            .with_connect_timeout(Duration::from_millis(250))
            .with_send_policy(SendPolicy::ConfirmOpen)
            .with_inbound_format(InboundFormat::Envelope);

        assert_eq!(options.connect_timeout, Duration::from_millis(250));
        assert_eq!(options.send_policy, SendPolicy::ConfirmOpen);
        assert_eq!(options.inbound_format, InboundFormat::Envelope);
    }
}
