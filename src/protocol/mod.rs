//! Message types.
//!
//! # Overview
//!
//! | Type | Direction | Purpose |
//! |------|-----------|---------|
//! | [`Message`] | both | Direction-tagged transcript entry |
//! | [`Envelope`] | Remote → Local | Optional JSON wrapper around reply text |
//!
//! On the wire every message is one WebSocket text frame. Outbound text is
//! never wrapped.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `envelope` | Inbound envelope decoding |
//! | `message` | `Direction` and `Message` |

// ============================================================================
// Submodules
// ============================================================================

/// Inbound envelope decoding.
pub mod envelope;

/// Direction-tagged messages.
pub mod message;

// ============================================================================
// Re-exports
// ============================================================================

pub use envelope::{Envelope, EnvelopeKind, InboundFormat};
pub use message::{Direction, Message};
