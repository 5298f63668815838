//! Connection lifecycle states.
//!
//! ```text
//! Connecting ──► Open ──► Closed
//!      │                    ▲
//!      └────────────────────┘
//! ```
//!
//! Transitions only move forward. `Closed` is terminal.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

// ============================================================================
// ConnectionState
// ============================================================================

/// Lifecycle state of the stream.
///
/// Variant order is the transition order, so `a < b` means `b` is reachable from `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ConnectionState {
    /// Handshake in progress. Entered at construction.
    #[default]
    Connecting,
    /// Ready to send and receive.
    Open,
    /// Terminal. Entered on remote close or any transport failure.
    Closed,
}

impl ConnectionState {
    /// Returns `true` if sends are currently accepted.
    #[inline]
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns `true` if this is the terminal state.
    #[inline]
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns `true` if moving from `self` to `next` is a legal transition.
    #[inline]
    #[must_use]
    pub fn can_advance_to(self, next: Self) -> bool {
        next > self
    }

    /// Returns the lowercase state name.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_connecting() {
        assert_eq!(ConnectionState::default(), ConnectionState::Connecting);
    }

    #[test]
    fn test_forward_transitions_allowed() {
        use ConnectionState::*;

        assert!(Connecting.can_advance_to(Open));
        assert!(Connecting.can_advance_to(Closed));
        assert!(Open.can_advance_to(Closed));
    }

    #[test]
    fn test_backward_and_self_transitions_rejected() {
        use ConnectionState::*;

        assert!(!Open.can_advance_to(Connecting));
        assert!(!Closed.can_advance_to(Open));
        assert!(!Closed.can_advance_to(Connecting));
        assert!(!Closed.can_advance_to(Closed));
        assert!(!Open.can_advance_to(Open));
    }

    #[test]
    fn test_predicates() {
        assert!(ConnectionState::Open.is_open());
        assert!(!ConnectionState::Connecting.is_open());
        assert!(ConnectionState::Closed.is_closed());
    }

    #[test]
    fn test_display() {
        assert_eq!(ConnectionState::Open.to_string(), "open");
    }
}
