//! Chunked Emitter.
//!
//! The synthesizer hands over a complete response string; this module drips it
//! out word-by-word with a jittered delay to simulate typing. Each piece keeps
//! its trailing whitespace run, so the concatenation of all emitted chunks
//! reproduces the full text byte-for-byte.

use std::convert::Infallible;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::body::{Body, Bytes};
use futures::StreamExt;
use rand::Rng;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

/// Inter-chunk delay range for the simulated typing cadence.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            min_delay_ms: 50,
            max_delay_ms: 100,
        }
    }
}

impl Pacing {
    /// No delay between chunks. Used by tests and by callers that only want
    /// the chunking behavior.
    pub const fn immediate() -> Self {
        Self {
            min_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    fn jitter(&self) -> Duration {
        if self.max_delay_ms == 0 {
            return Duration::ZERO;
        }
        let ms = rand::thread_rng().gen_range(self.min_delay_ms..=self.max_delay_ms);
        Duration::from_millis(ms)
    }
}

/// Destination for emitted chunks.
///
/// A send error means the receiving side went away; the emit loop stops and
/// the partial output is simply abandoned (there is no mid-stream error
/// signal on this path).
#[async_trait]
pub trait ChunkSink: Send {
    async fn send(&mut self, chunk: &str) -> Result<()>;

    /// Signal end-of-stream. For channel-backed sinks this is a no-op since
    /// dropping the sender closes the channel.
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl ChunkSink for mpsc::Sender<String> {
    async fn send(&mut self, chunk: &str) -> Result<()> {
        mpsc::Sender::send(self, chunk.to_string())
            .await
            .map_err(|_| anyhow!("chunk receiver dropped"))
    }
}

/// Split into word-sized pieces, each carrying the whitespace run that
/// follows it. Lossless: `pieces.concat() == text`.
pub fn split_keeping_whitespace(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut in_whitespace = false;
    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            in_whitespace = true;
        } else if in_whitespace {
            pieces.push(&text[start..i]);
            start = i;
            in_whitespace = false;
        }
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

/// Write `full_text` to `sink` one word at a time, strictly in order, sleeping
/// a jittered interval between writes, then close the sink.
pub async fn emit<S: ChunkSink>(full_text: &str, sink: &mut S, pacing: Pacing) -> Result<()> {
    let pieces = split_keeping_whitespace(full_text);
    debug!(pieces = pieces.len(), "Emitting response");

    let mut first = true;
    for piece in pieces {
        if !first {
            sleep(pacing.jitter()).await;
        }
        first = false;
        sink.send(piece).await?;
    }
    sink.close().await
}

/// Wire the emit loop to an HTTP response body.
///
/// The loop runs on its own task feeding an mpsc channel; the receiver side
/// becomes the body stream, so every chunk is flushed to the client as soon
/// as it is written rather than buffered until the end. Dropping the sender
/// when the loop finishes closes the response.
pub fn stream_body(full_text: String, pacing: Pacing) -> Body {
    let (tx, rx) = mpsc::channel::<String>(16);
    tokio::spawn(async move {
        let mut tx = tx;
        if let Err(e) = emit(&full_text, &mut tx, pacing).await {
            debug!(error = %e, "Stream client disconnected mid-emit");
        }
    });

    let stream = ReceiverStream::new(rx).map(|chunk| Ok::<_, Infallible>(Bytes::from(chunk)));
    Body::from_stream(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct VecSink {
        chunks: Vec<String>,
        closed: bool,
    }

    impl VecSink {
        fn new() -> Self {
            Self {
                chunks: Vec::new(),
                closed: false,
            }
        }
    }

    #[async_trait]
    impl ChunkSink for VecSink {
        async fn send(&mut self, chunk: &str) -> Result<()> {
            assert!(!self.closed, "send after close");
            self.chunks.push(chunk.to_string());
            Ok(())
        }

        async fn close(&mut self) -> Result<()> {
            assert!(!self.closed, "double close");
            self.closed = true;
            Ok(())
        }
    }

    #[test]
    fn test_split_is_lossless() {
        let cases = [
            "",
            "single",
            "two words",
            "line one\nline two",
            "  leading and trailing  ",
            "tabs\tand\nnewlines mixed  up",
            "héllo wörld — ünïcode",
            "### 🐞 Debug Report\n\n```javascript\nlet x = 2\n```",
        ];
        for case in cases {
            let pieces = split_keeping_whitespace(case);
            assert_eq!(pieces.concat(), case, "lossy split for {case:?}");
        }
    }

    #[test]
    fn test_split_yields_word_sized_pieces() {
        assert_eq!(split_keeping_whitespace("one two three"), vec!["one ", "two ", "three"]);
        assert_eq!(split_keeping_whitespace("a b\nc"), vec!["a ", "b\n", "c"]);
    }

    #[test]
    fn test_whitespace_stays_attached_to_preceding_word() {
        let pieces = split_keeping_whitespace("end.  \n\nNext");
        assert_eq!(pieces, vec!["end.  \n\n", "Next"]);
    }

    #[tokio::test]
    async fn test_emit_preserves_full_text() {
        let text = "### ⚡ Optimization Result\n\nThe complexity has been reduced.";
        let mut sink = VecSink::new();
        emit(text, &mut sink, Pacing::immediate()).await.unwrap();
        assert_eq!(sink.chunks.concat(), text);
        assert!(sink.closed);
    }

    #[tokio::test]
    async fn test_emit_empty_text_closes_immediately() {
        let mut sink = VecSink::new();
        emit("", &mut sink, Pacing::immediate()).await.unwrap();
        assert!(sink.chunks.is_empty());
        assert!(sink.closed);
    }

    #[tokio::test]
    async fn test_emit_order_is_strict() {
        let mut sink = VecSink::new();
        emit("a b c d e", &mut sink, Pacing::immediate()).await.unwrap();
        assert_eq!(sink.chunks, vec!["a ", "b ", "c ", "d ", "e"]);
    }

    #[tokio::test]
    async fn test_emit_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel::<String>(1);
        drop(rx);
        let mut tx = tx;
        let err = emit("a b c", &mut tx, Pacing::immediate()).await;
        assert!(err.is_err());
    }
}
