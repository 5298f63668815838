//! Relay between user input, the transcript and the connection.
//!
//! ```text
//!   InputSource ──submit──► MessageRelay ──send──► Connection ──► peer
//!                              │  ▲
//!                   append     │  │ inbound text (single subscriber)
//!                              ▼  │
//!                          Transcript ◄───────────── Connection ◄── peer
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `builder` | Fluent construction from an address |
//! | `core` | The relay itself |
//! | `options` | Send policy, inbound format, timeouts |

// ============================================================================
// Submodules
// ============================================================================

/// Builder for relay configuration.
pub mod builder;

/// The message relay.
pub mod core;

/// Relay configuration options.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::{DEFAULT_ADDRESS, RelayBuilder};
pub use self::core::{MessageRelay, Submitted};
pub use options::{RelayOptions, SendPolicy};
