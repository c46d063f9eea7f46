//! CodeMentor client library.
//!
//! Consumes the gateway's chunked chat stream incrementally and maintains a
//! conversation transcript. The synthesizer lives only behind the HTTP
//! boundary; this side knows nothing about personas beyond their tags.

pub mod cancel;
pub mod consumer;
pub mod decode;
pub mod transcript;

pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use consumer::{consume, StreamHandler, TurnRequest};
pub use decode::Utf8Decoder;
pub use transcript::{ChatClient, Transcript};
