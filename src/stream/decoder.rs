//! Incremental UTF-8 decoding across chunk boundaries.

use crate::error::StreamError;

/// Decodes a byte stream chunk by chunk.
///
/// A multi-byte character split between two chunks is held back until its
/// remaining bytes arrive. Invalid sequences are an error, never replaced;
/// the valid text in front of them stays available through
/// [`take_recovered`](Self::take_recovered).
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
    /// Bytes already turned into text.
    consumed: usize,
    recovered: String,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `chunk` (plus any held-back bytes) as possible.
    pub fn decode(&mut self, chunk: &[u8]) -> Result<String, StreamError> {
        self.pending.extend_from_slice(chunk);

        let valid_len = match std::str::from_utf8(&self.pending).map(|_| ()) {
            Ok(()) => self.pending.len(),
            Err(e) => match e.error_len() {
                Some(_) => return Err(self.reject(e.valid_up_to())),
                None => e.valid_up_to(),
            },
        };

        let rest = self.pending.split_off(valid_len);
        let bytes = std::mem::replace(&mut self.pending, rest);
        self.consumed += bytes.len();

        // Validated above.
        String::from_utf8(bytes).map_err(|e| StreamError::InvalidEncoding {
            offset: self.consumed + e.utf8_error().valid_up_to(),
        })
    }

    /// Set aside the valid prefix and drop the rest of the pending bytes.
    fn reject(&mut self, valid_up_to: usize) -> StreamError {
        let offset = self.consumed + valid_up_to;
        self.recovered
            .push_str(&String::from_utf8_lossy(&self.pending[..valid_up_to]));
        self.pending.clear();
        self.consumed = offset;
        StreamError::InvalidEncoding { offset }
    }

    /// Text that preceded an invalid sequence in the failing chunk.
    pub fn take_recovered(&mut self) -> String {
        std::mem::take(&mut self.recovered)
    }

    /// Number of bytes waiting for the rest of their character.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// End of input: any held-back bytes form a truncated character.
    pub fn finish(&mut self) -> Result<(), StreamError> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            let pending_bytes = self.pending.len();
            self.pending.clear();
            Err(StreamError::TruncatedCharacter { pending_bytes })
        }
    }
}
