//! CodeMentor Gateway HTTP server.
//!
//! One chat endpoint plus a health check. The chat endpoint validates,
//! synthesizes a full persona response, and streams it back word-by-word.

pub mod chat_api;
pub mod emitter;
pub mod health_api;
pub mod server;

pub use emitter::{emit, split_keeping_whitespace, ChunkSink, Pacing};
pub use server::{router, start_server, GatewayState};
