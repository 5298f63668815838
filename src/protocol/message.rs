//! Direction-tagged transcript messages.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::Serialize;

// ============================================================================
// Direction
// ============================================================================

/// Which side produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Produced locally and sent to the peer.
    Outgoing,
    /// Received from the peer.
    Incoming,
}

impl Direction {
    /// Returns the lowercase direction name.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Outgoing => "outgoing",
            Self::Incoming => "incoming",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Message
// ============================================================================

/// An immutable unit of text with a fixed direction.
///
/// There is no constructor taking a [`Direction`]: the direction comes from
/// the code path that builds the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    direction: Direction,
    text: String,
}

impl Message {
    /// Creates a message typed by the local user.
    #[inline]
    #[must_use]
    pub fn outgoing(text: impl Into<String>) -> Self {
        Self {
            direction: Direction::Outgoing,
            text: text.into(),
        }
    }

    /// Creates a message received from the peer.
    #[inline]
    #[must_use]
    pub fn incoming(text: impl Into<String>) -> Self {
        Self {
            direction: Direction::Incoming,
            text: text.into(),
        }
    }

    /// Returns the direction.
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the text.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consumes the message, returning its text.
    #[inline]
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_fix_direction() {
        let sent = Message::outgoing("Hello");
        let received = Message::incoming("Hi there");

        assert_eq!(sent.direction(), Direction::Outgoing);
        assert_eq!(sent.text(), "Hello");
        assert_eq!(received.direction(), Direction::Incoming);
        assert_eq!(received.into_text(), "Hi there");
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&Message::incoming("Hi")).expect("serialize");
        assert_eq!(json, r#"{"direction":"incoming","text":"Hi"}"#);
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::Outgoing.to_string(), "outgoing");
        assert_eq!(Direction::Incoming.to_string(), "incoming");
    }
}
