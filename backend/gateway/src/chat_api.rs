//! `POST /api/chat` handler.
//!
//! Accepts a multipart form (`mode`, JSON-encoded `messages`, repeated
//! `files` parts), validates before any stream opens, then hands the
//! synthesized response to the emitter. Once streaming has started there are
//! no further error responses; a transport failure just ends the body.

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{info, warn};
use uuid::Uuid;

use mentor_core::{last_user_content, AttachedFile, Persona, TurnMessage};
use mentor_synthesizer::synthesize;

use crate::emitter::stream_body;
use crate::server::GatewayState;

/// Request-rejection responses. Both map to 400 with the structured JSON body
/// the web client expects.
#[derive(Debug, PartialEq, Eq)]
pub enum ApiError {
    InvalidMode,
    InvalidMessages,
}

impl ApiError {
    fn message(&self) -> &'static str {
        match self {
            ApiError::InvalidMode => "Invalid agent mode",
            ApiError::InvalidMessages => "Invalid messages format",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(error = self.message(), "Rejecting chat request");
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": self.message() })),
        )
            .into_response()
    }
}

/// Raw fields pulled out of the multipart body, before validation.
#[derive(Default)]
struct ChatForm {
    mode: Option<String>,
    messages_raw: Option<String>,
    files: Vec<AttachedFile>,
}

/// A validated chat turn.
#[derive(Debug)]
struct ChatTurn {
    persona: Persona,
    messages: Vec<TurnMessage>,
    files: Vec<AttachedFile>,
}

fn parse_turn(form: ChatForm) -> Result<ChatTurn, ApiError> {
    let persona: Persona = form
        .mode
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|_| ApiError::InvalidMode)?;

    // Absent `messages` is an empty history; present but unparseable is a 400.
    let messages = match form.messages_raw {
        Some(raw) => serde_json::from_str(&raw).map_err(|_| ApiError::InvalidMessages)?,
        None => Vec::new(),
    };

    Ok(ChatTurn {
        persona,
        messages,
        files: form.files,
    })
}

async fn read_form(multipart: &mut Multipart) -> Result<ChatForm, ApiError> {
    let mut form = ChatForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::InvalidMessages)?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "mode" => {
                form.mode = Some(field.text().await.map_err(|_| ApiError::InvalidMessages)?);
            }
            "messages" => {
                form.messages_raw =
                    Some(field.text().await.map_err(|_| ApiError::InvalidMessages)?);
            }
            "files" => {
                let file_name = field.file_name().unwrap_or("upload.bin").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::InvalidMessages)?;
                form.files.push(AttachedFile::new(file_name, data.to_vec()));
            }
            _ => {}
        }
    }
    Ok(form)
}

fn preview(text: &str) -> String {
    text.chars().take(50).collect()
}

/// Handler for `POST /api/chat`.
pub async fn handle_chat(
    State(state): State<GatewayState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = read_form(&mut multipart).await?;
    let turn = parse_turn(form)?;

    let request_id = Uuid::new_v4();
    let last = last_user_content(&turn.messages);
    info!(
        request_id = %request_id,
        mode = %turn.persona,
        preview = %preview(last),
        files = turn.files.len(),
        "Chat request"
    );

    let full_response = synthesize(turn.persona, last, &turn.files);

    // Chunks are flushed as they are produced; caching would defeat the
    // incremental-delivery contract.
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(stream_body(full_response, state.pacing))
        .expect("static response parts are valid");

    Ok(response)
}
