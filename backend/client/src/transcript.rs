//! Conversation Renderer.
//!
//! `Transcript` owns the ordered message list for one persona's
//! conversation; `ChatClient::send_turn` drives a full round trip against
//! the gateway, mutating the transcript as chunks arrive. Messages are plain
//! serializable data so a caller-side store can persist them; nothing here
//! deletes history.

use std::collections::HashSet;

use reqwest::Client;
use tracing::debug;

use mentor_core::{
    trailing_window, AttachedFile, ConversationMessage, MentorError, Persona, TurnMessage,
    TURN_WINDOW,
};

use crate::cancel::CancelToken;
use crate::consumer::{consume, StreamHandler, TurnRequest};

/// Shown in the assistant placeholder until the first chunk lands.
const PLACEHOLDER_TEXT: &str = "...";

pub struct Transcript {
    persona: Persona,
    messages: Vec<ConversationMessage>,
    next_id: u64,
    /// Placeholder ids that have not received their first chunk yet; the
    /// first chunk replaces the fallback text instead of appending to it.
    pending: HashSet<u64>,
}

impl Transcript {
    /// A fresh conversation, seeded with the persona's greeting.
    pub fn new(persona: Persona) -> Self {
        let mut transcript = Self {
            persona,
            messages: Vec::new(),
            next_id: 0,
            pending: HashSet::new(),
        };
        let id = transcript.allocate_id();
        transcript
            .messages
            .push(ConversationMessage::assistant(id, persona.profile().greeting));
        transcript
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// Append the user's message. Happens synchronously, before any network
    /// activity for the turn.
    pub fn push_user(&mut self, text: impl Into<String>, attachments: Vec<String>) -> u64 {
        let id = self.allocate_id();
        self.messages
            .push(ConversationMessage::user(id, text, attachments));
        id
    }

    /// Append the streaming assistant placeholder and return its id. Each
    /// turn gets a distinct id, so overlapping turns target the right
    /// message.
    pub fn begin_assistant(&mut self) -> u64 {
        let id = self.allocate_id();
        self.messages
            .push(ConversationMessage::assistant_placeholder(id, PLACEHOLDER_TEXT));
        self.pending.insert(id);
        id
    }

    fn message_mut(&mut self, id: u64) -> Option<&mut ConversationMessage> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    /// Accumulate one chunk into the target message's running text.
    pub fn append_chunk(&mut self, id: u64, chunk: &str) {
        let fresh = self.pending.remove(&id);
        if let Some(msg) = self.message_mut(id) {
            if fresh {
                msg.text.clear();
            }
            msg.text.push_str(chunk);
        }
    }

    /// Mark the target message complete, leaving its accumulated text final.
    pub fn finalize(&mut self, id: u64) {
        self.pending.remove(&id);
        if let Some(msg) = self.message_mut(id) {
            msg.streaming = false;
        }
    }

    /// Replace the target message's text with an error description. Chunks
    /// already accumulated are discarded, but the message itself stays
    /// visible with its error flag set.
    pub fn fail(&mut self, id: u64, error: &MentorError) {
        self.pending.remove(&id);
        if let Some(msg) = self.message_mut(id) {
            msg.text = format!("Error: {error}");
            msg.streaming = false;
            msg.error = true;
        }
    }

    /// The `{role, content}` view of the conversation sent to the server.
    /// Messages still streaming (in-flight placeholders) are skipped.
    pub fn turn_messages(&self) -> Vec<TurnMessage> {
        self.messages
            .iter()
            .filter(|m| !m.streaming)
            .map(|m| TurnMessage {
                role: m.role,
                content: m.text.clone(),
            })
            .collect()
    }
}

/// Routes consumer callbacks into one transcript message.
struct TranscriptHandler<'a> {
    transcript: &'a mut Transcript,
    target: u64,
}

impl StreamHandler for TranscriptHandler<'_> {
    fn on_chunk(&mut self, text: &str) {
        self.transcript.append_chunk(self.target, text);
    }

    fn on_complete(&mut self) {
        self.transcript.finalize(self.target);
    }

    fn on_error(&mut self, error: MentorError) {
        self.transcript.fail(self.target, &error);
    }
}

/// Client for one gateway instance.
pub struct ChatClient {
    http: Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Run one full turn: append the user message, open the stream, and
    /// fill the assistant placeholder as chunks arrive. Returns the
    /// assistant message's id.
    pub async fn send_turn(
        &self,
        transcript: &mut Transcript,
        text: &str,
        files: Vec<AttachedFile>,
        cancel: CancelToken,
    ) -> u64 {
        let names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
        transcript.push_user(text, names);

        let all = transcript.turn_messages();
        let messages = trailing_window(&all, TURN_WINDOW).to_vec();

        let assistant_id = transcript.begin_assistant();
        debug!(mode = %transcript.persona(), assistant_id, "Dispatching turn");

        let turn = TurnRequest {
            persona: transcript.persona(),
            messages,
            files,
        };
        let mut handler = TranscriptHandler {
            transcript,
            target: assistant_id,
        };
        consume(&self.http, &self.base_url, &turn, cancel, &mut handler).await;

        assistant_id
    }
}
