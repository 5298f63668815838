//! WebSocket transport layer.
//!
//! This module owns the one stream between the client and the remote peer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Connection     │                              │  Remote peer    │
//! │  (handle)       │         WebSocket            │                 │
//! │    │ commands   │◄────────────────────────────►│  ws://host:port │
//! │    ▼            │       text frames            │                 │
//! │  event loop     │                              │                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `Connection::open` - Validate the address, spawn the event loop (`Connecting`)
//! 2. Handshake completes (`Open`) or fails (`Closed`)
//! 3. `Connection::send` - Queue text frames while `Open`
//! 4. Inbound text frames reach the single registered handler
//! 5. Remote close or any transport error (`Closed`, permanent)
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | WebSocket connection and event loop |
//! | `state` | Lifecycle state machine |

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket connection and event loop.
pub mod connection;

/// Connection lifecycle states.
pub mod state;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, DEFAULT_CONNECT_TIMEOUT, MessageHandler, parse_address};
pub use state::ConnectionState;
