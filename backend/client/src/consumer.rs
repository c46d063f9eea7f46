//! Stream Consumer.
//!
//! Opens the chat request and forwards the response body to a handler as it
//! arrives: every decoded fragment goes out immediately, in arrival order,
//! and exactly one of `on_complete` / `on_error` fires per call, with all
//! chunks delivered first.

use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;

use mentor_core::{AttachedFile, MentorError, Persona, TurnMessage};

use crate::cancel::CancelToken;
use crate::decode::Utf8Decoder;

/// Callbacks driven by one `consume` call. Invoked from the read loop's
/// task, so implementations only need `&mut self`.
pub trait StreamHandler: Send {
    fn on_chunk(&mut self, text: &str);
    fn on_complete(&mut self);
    fn on_error(&mut self, error: MentorError);
}

/// One outbound chat turn.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub persona: Persona,
    /// Trailing window of the conversation, last entry being the new user
    /// message.
    pub messages: Vec<TurnMessage>,
    pub files: Vec<AttachedFile>,
}

impl TurnRequest {
    fn build_form(&self) -> Result<Form, MentorError> {
        let messages = serde_json::to_string(&self.messages)
            .map_err(|e| MentorError::MalformedInput(e.to_string()))?;
        let mut form = Form::new()
            .text("mode", self.persona.tag())
            .text("messages", messages);
        for file in &self.files {
            form = form.part(
                "files",
                Part::bytes(file.data.clone()).file_name(file.name.clone()),
            );
        }
        Ok(form)
    }
}

/// Issue the request and pump the response through `handler`.
pub async fn consume<H: StreamHandler>(
    http: &Client,
    base_url: &str,
    turn: &TurnRequest,
    cancel: CancelToken,
    handler: &mut H,
) {
    match drive(http, base_url, turn, cancel, handler).await {
        Ok(()) => handler.on_complete(),
        Err(e) => handler.on_error(e),
    }
}

async fn drive<H: StreamHandler>(
    http: &Client,
    base_url: &str,
    turn: &TurnRequest,
    mut cancel: CancelToken,
    handler: &mut H,
) -> Result<(), MentorError> {
    if cancel.is_cancelled() {
        return Err(MentorError::Cancelled);
    }

    let url = format!("{}/api/chat", base_url.trim_end_matches('/'));
    let response = http
        .post(&url)
        .multipart(turn.build_form()?)
        .send()
        .await
        .map_err(|e| MentorError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(MentorError::Transport(format!(
            "server returned {status}: {body}"
        )));
    }

    let mut stream = response.bytes_stream();
    let mut decoder = Utf8Decoder::new();
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(MentorError::Cancelled),
            next = stream.next() => next,
        };
        match next {
            Some(Ok(bytes)) => {
                let text = decoder.feed(&bytes)?;
                if !text.is_empty() {
                    handler.on_chunk(&text);
                }
            }
            Some(Err(e)) => return Err(MentorError::Transport(e.to_string())),
            None => break,
        }
    }
    decoder.finish()?;
    debug!(mode = %turn.persona, "Stream complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentor_core::Role;
    use mentor_gateway::{router, GatewayState, Pacing};
    use std::net::SocketAddr;

    /// Records callbacks for assertion.
    #[derive(Default)]
    struct Recorder {
        chunks: Vec<String>,
        completes: usize,
        errors: Vec<MentorError>,
    }

    impl StreamHandler for Recorder {
        fn on_chunk(&mut self, text: &str) {
            assert_eq!(self.completes, 0, "chunk after completion");
            assert!(self.errors.is_empty(), "chunk after error");
            self.chunks.push(text.to_string());
        }

        fn on_complete(&mut self) {
            self.completes += 1;
        }

        fn on_error(&mut self, error: MentorError) {
            self.errors.push(error);
        }
    }

    async fn spawn_gateway_with(pacing: Pacing) -> SocketAddr {
        let app = router(GatewayState { pacing });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    async fn spawn_gateway() -> SocketAddr {
        spawn_gateway_with(Pacing::immediate()).await
    }

    fn turn(persona: Persona, content: &str) -> TurnRequest {
        TurnRequest {
            persona,
            messages: vec![TurnMessage {
                role: Role::User,
                content: content.to_string(),
            }],
            files: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_chunks_reassemble_full_response() {
        let addr = spawn_gateway().await;
        let http = Client::new();
        let mut rec = Recorder::default();

        consume(
            &http,
            &format!("http://{addr}"),
            &turn(Persona::Debugger, "var x = 2"),
            CancelToken::never(),
            &mut rec,
        )
        .await;

        assert_eq!(rec.completes, 1);
        assert!(rec.errors.is_empty());
        let full = rec.chunks.concat();
        let expected = mentor_synthesizer::synthesize(Persona::Debugger, "var x = 2", &[]);
        assert_eq!(full, expected);
        assert!(full.contains("let x = 2"));
    }

    #[tokio::test]
    async fn test_multiple_chunks_arrive_incrementally() {
        // A short real delay between writes keeps the transport from
        // coalescing the whole body into one read.
        let addr = spawn_gateway_with(Pacing {
            min_delay_ms: 1,
            max_delay_ms: 2,
        })
        .await;
        let http = Client::new();
        let mut rec = Recorder::default();

        consume(
            &http,
            &format!("http://{addr}"),
            &turn(Persona::Evaluator, "let x = 1;"),
            CancelToken::never(),
            &mut rec,
        )
        .await;

        // The emitter writes word-sized pieces; even after transport
        // coalescing there should be more than one delivery.
        assert!(rec.chunks.len() > 1, "got {} chunk(s)", rec.chunks.len());
        assert_eq!(rec.completes, 1);
    }

    #[tokio::test]
    async fn test_unreachable_server_reports_transport_error() {
        // Port 1 is never listening.
        let http = Client::new();
        let mut rec = Recorder::default();

        consume(
            &http,
            "http://127.0.0.1:1",
            &turn(Persona::Optimizer, "x"),
            CancelToken::never(),
            &mut rec,
        )
        .await;

        assert_eq!(rec.completes, 0);
        assert_eq!(rec.errors.len(), 1);
        assert!(matches!(rec.errors[0], MentorError::Transport(_)));
        assert!(rec.chunks.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status_reports_error_without_reads() {
        let addr = spawn_gateway().await;
        let http = Client::new();
        let mut rec = Recorder::default();

        // Wrong path: 404 from the router.
        let url = format!("http://{addr}/missing");
        let response = http.get(&url).send().await.unwrap();
        assert_eq!(response.status(), 404);

        // And through consume, a 404 surfaces as a transport error.
        consume(
            &http,
            &format!("http://{addr}/nope"),
            &turn(Persona::Debugger, "x"),
            CancelToken::never(),
            &mut rec,
        )
        .await;
        assert_eq!(rec.errors.len(), 1);
        assert_eq!(rec.completes, 0);
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_skips_request() {
        let (handle, token) = crate::cancel::cancel_pair();
        handle.cancel();
        let http = Client::new();
        let mut rec = Recorder::default();

        consume(
            &http,
            "http://127.0.0.1:1",
            &turn(Persona::Debugger, "x"),
            token,
            &mut rec,
        )
        .await;

        assert_eq!(rec.errors.len(), 1);
        assert!(matches!(rec.errors[0], MentorError::Cancelled));
        assert_eq!(rec.completes, 0);
    }

    #[tokio::test]
    async fn test_invalid_mode_rejected_by_server() {
        // The typed client cannot produce a bad tag, so go in raw.
        let addr = spawn_gateway().await;
        let http = Client::new();
        let form = Form::new().text("mode", "nonexistent").text("messages", "[]");
        let response = http
            .post(format!("http://{addr}/api/chat"))
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Invalid agent mode");
    }

    #[tokio::test]
    async fn test_malformed_messages_rejected_by_server() {
        let addr = spawn_gateway().await;
        let http = Client::new();
        let form = Form::new().text("mode", "debugger").text("messages", "{broken");
        let response = http
            .post(format!("http://{addr}/api/chat"))
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Invalid messages format");
    }

    #[tokio::test]
    async fn test_file_upload_acknowledged() {
        let addr = spawn_gateway().await;
        let http = Client::new();
        let mut rec = Recorder::default();

        let mut request = turn(Persona::Debugger, "ignored");
        request.files = vec![
            AttachedFile::new("a.py", b"print('a')".to_vec()),
            AttachedFile::new("b.py", b"print('b')".to_vec()),
        ];

        consume(
            &http,
            &format!("http://{addr}"),
            &request,
            CancelToken::never(),
            &mut rec,
        )
        .await;

        let full = rec.chunks.concat();
        assert!(full.contains("2 file(s)"));
        assert!(full.contains("**a.py, b.py**"));
        assert_eq!(rec.completes, 1);
    }
}
