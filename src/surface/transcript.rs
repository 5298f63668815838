//! Transcript sinks.
//!
//! A [`Transcript`] receives every message the relay shows to the user, in
//! order. Implementations decide how to render; they must keep the latest
//! entry visible.

// ============================================================================
// Imports
// ============================================================================

use std::io::{self, Write};

use tracing::warn;

use crate::protocol::{Direction, Message};

// ============================================================================
// Transcript
// ============================================================================

/// Append-only display of direction-tagged text.
pub trait Transcript {
    /// Appends one entry.
    fn append(&mut self, direction: Direction, text: &str);
}

impl<T: Transcript + ?Sized> Transcript for &mut T {
    fn append(&mut self, direction: Direction, text: &str) {
        (**self).append(direction, text);
    }
}

impl<T: Transcript + ?Sized> Transcript for Box<T> {
    fn append(&mut self, direction: Direction, text: &str) {
        (**self).append(direction, text);
    }
}

// ============================================================================
// MemoryTranscript
// ============================================================================

/// Transcript kept in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTranscript {
    entries: Vec<Message>,
}

impl MemoryTranscript {
    /// Creates an empty transcript.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all entries in append order.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    /// Returns the most recent entry.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been appended.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns entries as `(direction, text)` pairs.
    #[must_use]
    pub fn pairs(&self) -> Vec<(Direction, &str)> {
        self.entries
            .iter()
            .map(|message| (message.direction(), message.text()))
            .collect()
    }
}

impl Transcript for MemoryTranscript {
    fn append(&mut self, direction: Direction, text: &str) {
        let message = match direction {
            Direction::Outgoing => Message::outgoing(text),
            Direction::Incoming => Message::incoming(text),
        };
        self.entries.push(message);
    }
}

// ============================================================================
// WriterTranscript
// ============================================================================

/// Transcript that writes labelled lines to a writer.
///
/// ```text
/// [you] Hello
/// [peer] Hi there
/// ```
///
/// The writer is flushed after every entry.
#[derive(Debug)]
pub struct WriterTranscript<W: Write> {
    writer: W,
}

impl WriterTranscript<io::Stdout> {
    /// Creates a transcript on standard output.
    #[inline]
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> WriterTranscript<W> {
    /// Wraps `writer`.
    #[inline]
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the line label for `direction`.
    #[inline]
    #[must_use]
    pub const fn label(direction: Direction) -> &'static str {
        match direction {
            Direction::Outgoing => "you",
            Direction::Incoming => "peer",
        }
    }

    /// Consumes the transcript, returning the writer.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_entry(&mut self, direction: Direction, text: &str) -> io::Result<()> {
        writeln!(self.writer, "[{}] {}", Self::label(direction), text)?;
        self.writer.flush()
    }
}

impl<W: Write> Transcript for WriterTranscript<W> {
    fn append(&mut self, direction: Direction, text: &str) {
        if let Err(e) = self.write_entry(direction, text) {
            warn!(error = %e, %direction, "Failed to write transcript entry");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_transcript_keeps_order() {
        let mut transcript = MemoryTranscript::new();
        transcript.append(Direction::Outgoing, "Hello");
        transcript.append(Direction::Incoming, "Hi there");

        assert_eq!(
            transcript.pairs(),
            [
                (Direction::Outgoing, "Hello"),
                (Direction::Incoming, "Hi there")
            ]
        );
        assert_eq!(transcript.last(), Some(&Message::incoming("Hi there")));
    }

    #[test]
    fn test_writer_transcript_lines() {
        let mut transcript = WriterTranscript::new(Vec::new());
        transcript.append(Direction::Outgoing, "Hello");
        transcript.append(Direction::Incoming, " spaced ");

        let output = String::from_utf8(transcript.into_inner()).expect("utf8");
        assert_eq!(output, "[you] Hello\n[peer]  spaced \n");
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn push(mut sink: impl Transcript) {
            sink.append(Direction::Incoming, "x");
        }

        let mut transcript = MemoryTranscript::new();
        push(&mut transcript);
        assert_eq!(transcript.len(), 1);
    }
}
