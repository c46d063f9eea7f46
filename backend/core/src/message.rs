use serde::{Deserialize, Serialize};

/// Who authored a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in a conversation transcript.
///
/// The assistant side is created in `streaming` state the moment a turn is
/// dispatched, has chunks appended to `text` as they arrive, and is finalized
/// (or flagged with `error`) when the stream ends. Everything here is
/// serializable so an external history store can persist the transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Unique within a transcript, monotonically increasing by creation order.
    pub id: u64,
    pub role: Role,
    pub text: String,
    /// Names of files attached to this message, if any.
    #[serde(default)]
    pub attachments: Vec<String>,
    /// True while the message is being incrementally filled.
    #[serde(default)]
    pub streaming: bool,
    #[serde(default)]
    pub error: bool,
}

impl ConversationMessage {
    pub fn user(id: u64, text: impl Into<String>, attachments: Vec<String>) -> Self {
        Self {
            id,
            role: Role::User,
            text: text.into(),
            attachments,
            streaming: false,
            error: false,
        }
    }

    /// An assistant placeholder, created before the stream opens.
    pub fn assistant_placeholder(id: u64, fallback_text: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::Assistant,
            text: fallback_text.into(),
            attachments: Vec::new(),
            streaming: true,
            error: false,
        }
    }

    /// A finalized assistant message (greetings, loaded history).
    pub fn assistant(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::Assistant,
            text: text.into(),
            attachments: Vec::new(),
            streaming: false,
            error: false,
        }
    }
}

/// One `{role, content}` pair as sent in the `messages` form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnMessage {
    pub role: Role,
    pub content: String,
}

/// How many trailing messages a turn request carries. The full history stays
/// client-side; the payload only needs enough context to find the last user
/// message.
pub const TURN_WINDOW: usize = 20;

/// The trailing window of `messages` included in a turn request.
pub fn trailing_window(messages: &[TurnMessage], window: usize) -> &[TurnMessage] {
    let start = messages.len().saturating_sub(window);
    &messages[start..]
}

/// The content of the last user message in a turn payload, if any.
pub fn last_user_content(messages: &[TurnMessage]) -> &str {
    messages
        .last()
        .map(|m| m.content.as_str())
        .unwrap_or_default()
}

/// A file uploaded alongside a turn. Only the name is ever surfaced in
/// responses; the bytes are carried but not inspected.
#[derive(Debug, Clone)]
pub struct AttachedFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl AttachedFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}
