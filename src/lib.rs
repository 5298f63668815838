//! chat-relay - Single-stream WebSocket chat client.
//!
//! This library keeps one WebSocket stream to a remote peer and mirrors
//! everything exchanged over it into a transcript.
//!
//! # Architecture
//!
//! - **Connection**: owns the stream; opens it, sends text frames, hands
//!   inbound text frames to one registered handler
//! - **MessageRelay**: reads user input into `Connection::send` and inbound
//!   text into the transcript, tagging each entry with its direction
//!
//! Key design principles:
//!
//! - One [`Connection`] per [`MessageRelay`], passed in by value (no globals)
//! - Lifecycle only moves forward: `Connecting` → `Open` → `Closed`
//! - No reconnection: `Closed` is permanent
//! - Text is sent and shown verbatim
//!
//! # Quick Start
//!
//! ```no_run
//! use chat_relay::{LineInput, RelayBuilder, Result, WriterTranscript};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut relay = RelayBuilder::new()
//!         .address("ws://localhost:8080")
//!         .connect(LineInput::new(), WriterTranscript::stdout())?;
//!
//!     relay.wait_open().await?;
//!
//!     relay.input_mut().set("Hello");
//!     relay.submit()?;
//!
//!     // Show replies until the peer goes away
//!     while relay.pump().await {}
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error types and [`Result`] alias |
//! | [`protocol`] | [`Message`], [`Direction`], inbound envelopes |
//! | [`relay`] | [`MessageRelay`], builder and options |
//! | [`surface`] | [`Transcript`] and [`InputSource`] collaborators |
//! | [`transport`] | [`Connection`] and its event loop |

// ============================================================================
// Modules
// ============================================================================

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Message types.
pub mod protocol;

/// The message relay.
///
/// Use [`RelayBuilder`] to open a connection and wire it up in one step.
pub mod relay;

/// Transcript and input collaborators.
pub mod surface;

/// WebSocket transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Error types
pub use error::{Error, Result};

// Protocol types
pub use protocol::{Direction, Envelope, EnvelopeKind, InboundFormat, Message};

// Relay types
pub use relay::{DEFAULT_ADDRESS, MessageRelay, RelayBuilder, RelayOptions, SendPolicy, Submitted};

// Surface types
pub use surface::{InputSource, LineInput, MemoryTranscript, Transcript, WriterTranscript};

// Transport types
pub use transport::{Connection, ConnectionState};
