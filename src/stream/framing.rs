//! Normalization of decoded response text.
//!
//! The text endpoint answers either with raw text or with Server-Sent Events
//! (`data: ...` lines separated by blank lines). Both are reduced to the
//! plain answer text, and the two-character escape `\n` becomes a newline.
//! The result does not depend on how the body was split into chunks.

const SSE_MARKERS: [&str; 2] = ["data:", "event:"];

/// End-of-stream sentinel some backends send as a final data line.
const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Framing {
    Undecided,
    Plain,
    Sse,
}

/// Stateful text normalizer. Feed decoded text with [`push`](Self::push),
/// then call [`finish`](Self::finish) once.
#[derive(Debug)]
pub struct StreamNormalizer {
    framing: Framing,
    /// Undecided prefix, partial SSE line, or a trailing backslash.
    carry: String,
    /// Whether the current SSE event already produced a data line.
    event_has_data: bool,
}

impl Default for StreamNormalizer {
    fn default() -> Self {
        Self {
            framing: Framing::Undecided,
            carry: String::new(),
            event_has_data: false,
        }
    }
}

/// Replace every `\n` escape with a newline.
pub fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Framing of a body starting with `prefix`, or `None` while it could still
/// become an SSE marker.
fn detect(prefix: &str) -> Option<Framing> {
    if SSE_MARKERS.iter().any(|m| prefix.starts_with(m)) {
        return Some(Framing::Sse);
    }
    if SSE_MARKERS.iter().any(|m| m.starts_with(prefix)) {
        return None;
    }
    Some(Framing::Plain)
}

impl StreamNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the body has been recognized as SSE.
    pub fn is_sse(&self) -> bool {
        self.framing == Framing::Sse
    }

    pub fn push(&mut self, text: &str) -> String {
        match self.framing {
            Framing::Undecided => {
                self.carry.push_str(text);
                match detect(&self.carry) {
                    None => String::new(),
                    Some(framing) => {
                        self.framing = framing;
                        let buffered = std::mem::take(&mut self.carry);
                        self.push(&buffered)
                    }
                }
            }
            Framing::Plain => self.push_plain(text),
            Framing::Sse => self.push_sse(text),
        }
    }

    /// Flush whatever is still held back.
    pub fn finish(&mut self) -> String {
        let rest = std::mem::take(&mut self.carry);
        match self.framing {
            Framing::Undecided | Framing::Plain => unescape_newlines(&rest),
            Framing::Sse => {
                let line = rest.strip_suffix('\r').unwrap_or(&rest);
                self.sse_line(line)
            }
        }
    }

    fn push_plain(&mut self, text: &str) -> String {
        let mut joined = std::mem::take(&mut self.carry);
        joined.push_str(text);

        // A trailing backslash may be the first half of an escape.
        if joined.ends_with('\\') {
            joined.pop();
            self.carry.push('\\');
        }
        unescape_newlines(&joined)
    }

    fn push_sse(&mut self, text: &str) -> String {
        self.carry.push_str(text);
        let mut out = String::new();

        while let Some(pos) = self.carry.find('\n') {
            let line: String = self.carry.drain(..=pos).collect();
            let line = line.trim_end_matches('\n');
            let line = line.strip_suffix('\r').unwrap_or(line);
            out.push_str(&self.sse_line(line));
        }
        out
    }

    fn sse_line(&mut self, line: &str) -> String {
        if line.is_empty() {
            self.event_has_data = false;
            return String::new();
        }

        let Some(rest) = line.strip_prefix("data:") else {
            // event:, id:, retry: and comments carry no answer text.
            return String::new();
        };
        let payload = rest.strip_prefix(' ').unwrap_or(rest);
        if payload.trim() == DONE_SENTINEL {
            return String::new();
        }

        let mut out = String::new();
        if self.event_has_data {
            out.push('\n');
        }
        self.event_has_data = true;
        out.push_str(&unescape_newlines(payload));
        out
    }
}
