//! When accumulated text becomes visible.

/// Flush once the buffer holds more than this many characters.
pub const FLUSH_THRESHOLD_CHARS: usize = 40;

/// Per-submission accumulation buffer.
///
/// Text is released when it grows past [`FLUSH_THRESHOLD_CHARS`] or ends at a
/// natural break (`.`, `!`, `?` or a newline). Whatever is left is released
/// by [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct FlushBuffer {
    buffer: String,
    chars: usize,
}

impl FlushBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn should_flush(&self) -> bool {
        self.chars > FLUSH_THRESHOLD_CHARS
            || self
                .buffer
                .ends_with(|c: char| matches!(c, '.' | '!' | '?' | '\n'))
    }

    /// Add text; returns the buffered text if it is due.
    pub fn push(&mut self, text: &str) -> Option<String> {
        if text.is_empty() {
            return None;
        }
        self.buffer.push_str(text);
        self.chars += text.chars().count();

        if self.should_flush() {
            self.take()
        } else {
            None
        }
    }

    /// Add text without checking the flush policy.
    pub fn hold(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.chars += text.chars().count();
    }

    /// Release the remainder at end of stream.
    pub fn finish(&mut self) -> Option<String> {
        self.take()
    }

    fn take(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        self.chars = 0;
        Some(std::mem::take(&mut self.buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holds_short_fragments() {
        let mut buf = FlushBuffer::new();
        assert_eq!(buf.push("He"), None);
        assert_eq!(buf.push("llo "), None);
        assert_eq!(buf.push("world."), Some("Hello world.".to_string()));
        assert!(buf.is_empty());
        assert_eq!(buf.push(""), None);
        assert_eq!(buf.finish(), None);
    }

    #[test]
    fn test_flushes_on_terminal_punctuation_and_newline() {
        let mut buf = FlushBuffer::new();
        assert_eq!(buf.push("Really?"), Some("Really?".to_string()));
        assert_eq!(buf.push("Yes!"), Some("Yes!".to_string()));
        assert_eq!(buf.push("line\n"), Some("line\n".to_string()));
        assert_eq!(buf.push("a, b"), None);
    }

    #[test]
    fn test_flushes_past_threshold_counting_chars() {
        let mut buf = FlushBuffer::new();
        assert_eq!(buf.push(&"é".repeat(FLUSH_THRESHOLD_CHARS)), None);
        let flushed = buf.push("x").unwrap();
        assert_eq!(flushed.chars().count(), FLUSH_THRESHOLD_CHARS + 1);
    }

    #[test]
    fn test_finish_returns_remainder() {
        let mut buf = FlushBuffer::new();
        buf.push("trailing words");
        assert_eq!(buf.finish(), Some("trailing words".to_string()));
        assert_eq!(buf.finish(), None);
    }
}
