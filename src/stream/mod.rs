//! Turning a chunked response body into answer text.
//!
//! bytes -> [`Utf8StreamDecoder`] -> [`StreamNormalizer`] -> [`FlushBuffer`]
//!
//! [`TextAssembler`] wires the three stages together for one submission.

mod decoder;
mod flush;
mod framing;

pub use decoder::Utf8StreamDecoder;
pub use flush::{FlushBuffer, FLUSH_THRESHOLD_CHARS};
pub use framing::{unescape_newlines, StreamNormalizer};

use crate::error::StreamError;

/// Per-submission pipeline from raw chunks to flushable text.
#[derive(Debug, Default)]
pub struct TextAssembler {
    decoder: Utf8StreamDecoder,
    normalizer: StreamNormalizer,
    buffer: FlushBuffer,
}

impl TextAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one network chunk. Returns text that is due for display.
    ///
    /// On invalid UTF-8 the text decoded before the bad sequence is kept
    /// buffered for [`drain`](Self::drain).
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Option<String>, StreamError> {
        let text = match self.decoder.decode(chunk) {
            Ok(text) => text,
            Err(err) => {
                let recovered = self.decoder.take_recovered();
                let normalized = self.normalizer.push(&recovered);
                self.buffer.hold(&normalized);
                return Err(err);
            }
        };
        let normalized = self.normalizer.push(&text);
        Ok(self.buffer.push(&normalized))
    }

    /// End of body. Returns whatever is still buffered.
    ///
    /// On a truncated trailing character the buffered text stays available
    /// through [`drain`](Self::drain).
    pub fn finish(&mut self) -> Result<Option<String>, StreamError> {
        self.decoder.finish()?;
        Ok(self.drain())
    }

    /// Release everything held by the normalizer and buffer, ignoring any
    /// undecoded bytes.
    pub fn drain(&mut self) -> Option<String> {
        let tail = self.normalizer.finish();
        let mut rest = self.buffer.finish().unwrap_or_default();
        rest.push_str(&tail);
        if rest.is_empty() {
            None
        } else {
            Some(rest)
        }
    }
}
