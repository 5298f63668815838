//! User-facing collaborators of the relay.
//!
//! The relay never renders or reads a terminal itself. It talks to two traits:
//!
//! | Trait | Role | Provided implementations |
//! |-------|------|--------------------------|
//! | [`Transcript`] | Shows direction-tagged entries | [`MemoryTranscript`], [`WriterTranscript`] |
//! | [`InputSource`] | Holds text waiting to be sent | [`LineInput`] |

// ============================================================================
// Submodules
// ============================================================================

/// Input sources.
pub mod input;

/// Transcript sinks.
pub mod transcript;

// ============================================================================
// Re-exports
// ============================================================================

pub use input::{InputSource, LineInput, is_blank};
pub use transcript::{MemoryTranscript, Transcript, WriterTranscript};
