use thiserror::Error;

/// Top-level error type for the CodeMentor service.
#[derive(Debug, Error)]
pub enum MentorError {
    #[error("invalid agent mode: {0}")]
    InvalidPersona(String),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("decode failure: {0}")]
    Decode(String),

    #[error("stream cancelled")]
    Cancelled,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MentorError {
    /// Whether this error maps to a client-side 400 (raised before any stream opens).
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            MentorError::InvalidPersona(_) | MentorError::MalformedInput(_)
        )
    }
}
