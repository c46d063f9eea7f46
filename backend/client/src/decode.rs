//! Stateful incremental UTF-8 decoding.
//!
//! The transport delivers chunks at arbitrary byte offsets, so a multi-byte
//! character can be split across reads even though the emitter nominally
//! flushes per word. The decoder buffers an incomplete trailing sequence
//! until the next read supplies the rest of it.

use mentor_core::MentorError;

#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of the buffered input as possible. Returns the decoded
    /// text (possibly empty, if the buffer holds only a partial character);
    /// genuinely invalid bytes are a `Decode` error.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<String, MentorError> {
        self.pending.extend_from_slice(bytes);

        match std::str::from_utf8(&self.pending) {
            Ok(_) => {
                let complete = std::mem::take(&mut self.pending);
                String::from_utf8(complete)
                    .map_err(|e| MentorError::Decode(e.to_string()))
            }
            Err(e) => {
                if e.error_len().is_some() {
                    // Not a split boundary: the bytes themselves are invalid.
                    return Err(MentorError::Decode(format!(
                        "invalid UTF-8 at byte offset {}",
                        e.valid_up_to()
                    )));
                }
                let rest = self.pending.split_off(e.valid_up_to());
                let prefix = std::mem::replace(&mut self.pending, rest);
                String::from_utf8(prefix).map_err(|e| MentorError::Decode(e.to_string()))
            }
        }
    }

    /// Must be called at end-of-stream: a leftover partial character means
    /// the stream was truncated mid-character.
    pub fn finish(&mut self) -> Result<(), MentorError> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(MentorError::Decode(format!(
                "stream ended inside a multi-byte character ({} byte(s) pending)",
                self.pending.len()
            )))
        }
    }
}
