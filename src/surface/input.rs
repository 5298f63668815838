//! Input sources.
//!
//! An [`InputSource`] holds the text the user is about to send. The relay
//! peeks at it on submit and clears it only once the text has been accepted.

// ============================================================================
// InputSource
// ============================================================================

/// Pending user text.
pub trait InputSource {
    /// Returns the current pending text without consuming it.
    fn pending(&self) -> String;

    /// Resets the pending text to empty.
    fn clear(&mut self);

    /// Returns the pending text and resets it.
    fn read_and_clear(&mut self) -> String {
        let text = self.pending();
        self.clear();
        text
    }
}

impl<T: InputSource + ?Sized> InputSource for &mut T {
    fn pending(&self) -> String {
        (**self).pending()
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}

// ============================================================================
// Blank Detection
// ============================================================================

/// Returns `true` if `text` has nothing to send.
///
/// Uses the ECMAScript whitespace set rather than Unicode `White_Space`:
/// U+FEFF counts as blank and U+0085 does not.
#[must_use]
pub fn is_blank(text: &str) -> bool {
    text.chars().all(is_blank_char)
}

fn is_blank_char(c: char) -> bool {
    match c {
        '\u{FEFF}' => true,
        '\u{85}' => false,
        _ => c.is_whitespace(),
    }
}

// ============================================================================
// LineInput
// ============================================================================

/// A single editable line, fed by the front-end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInput {
    line: String,
}

impl LineInput {
    /// Creates an empty line.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the pending text.
    #[inline]
    pub fn set(&mut self, text: impl Into<String>) {
        self.line = text.into();
    }

    /// Appends to the pending text.
    #[inline]
    pub fn push_str(&mut self, text: &str) {
        self.line.push_str(text);
    }

    /// Returns the pending text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.line
    }

    /// Returns `true` if nothing is pending.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }
}

impl InputSource for LineInput {
    fn pending(&self) -> String {
        self.line.clone()
    }

    fn clear(&mut self) {
        self.line.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_does_not_consume() {
        let mut input = LineInput::new();
        input.set("Hello");

        assert_eq!(input.pending(), "Hello");
        assert_eq!(input.as_str(), "Hello");
    }

    #[test]
    fn test_read_and_clear() {
        let mut input = LineInput::new();
        input.set("Hel");
        input.push_str("lo");

        assert_eq!(input.read_and_clear(), "Hello");
        assert!(input.is_empty());
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \t\r\n"));
        assert!(is_blank("\u{A0}\u{3000}\u{2028}"));
        assert!(is_blank("\u{FEFF}"));
        assert!(!is_blank("\u{85}"));
        assert!(!is_blank(" x "));
    }
}
