//! JSON envelopes streamed by chat servers.
//!
//! Some peers wrap each reply chunk in an envelope instead of sending bare text:
//!
//! ```json
//! {
//!   "text": "Hello",
//!   "timestamp": "14:03:11",
//!   "latency": 42,
//!   "type": "bot"
//! }
//! ```
//!
//! `type` is `"bot"` for normal output and `"error"` when the server failed to
//! produce a reply.

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use tracing::warn;

use crate::error::Result;

// ============================================================================
// InboundFormat
// ============================================================================

/// How inbound frames are turned into transcript text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InboundFormat {
    /// Frame text is appended verbatim.
    #[default]
    Raw,
    /// Frames are decoded as [`Envelope`]s; undecodable frames fall back to verbatim.
    Envelope,
}

impl InboundFormat {
    /// Returns the transcript text for one inbound frame.
    #[must_use]
    pub fn render(self, frame: String) -> String {
        match self {
            Self::Raw => frame,
            Self::Envelope => match Envelope::parse(&frame) {
                Ok(envelope) => envelope.into_display_text(),
                Err(e) => {
                    warn!(error = %e, "Inbound frame is not an envelope, keeping raw text");
                    frame
                }
            },
        }
    }
}

// ============================================================================
// Envelope
// ============================================================================

/// Kind of envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeKind {
    /// Regular reply output.
    Bot,
    /// Server-side failure report.
    Error,
    /// Any other tag.
    #[serde(other)]
    Other,
}

/// A decoded envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Envelope {
    /// Reply text.
    pub text: String,

    /// Server wall-clock time, `HH:MM:SS`.
    #[serde(default)]
    pub timestamp: Option<String>,

    /// Upstream latency in milliseconds.
    #[serde(default)]
    pub latency: Option<u64>,

    /// Envelope kind.
    #[serde(rename = "type")]
    pub kind: EnvelopeKind,
}

impl Envelope {
    /// Decodes an envelope from frame text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if `frame` is not an envelope.
    pub fn parse(frame: &str) -> Result<Self> {
        Ok(serde_json::from_str(frame)?)
    }

    /// Returns `true` if this envelope reports a server failure.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == EnvelopeKind::Error
    }

    /// Consumes the envelope, returning the text to show.
    #[must_use]
    pub fn into_display_text(self) -> String {
        if self.is_error() {
            format!("error: {}", self.text)
        } else {
            self.text
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
