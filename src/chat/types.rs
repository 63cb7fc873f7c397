use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Conversation sent upstream
// ---------------------------------------------------------------------------

/// Role of a message in an upstream conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A single message in an upstream conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Inbound request / outbound reply
// ---------------------------------------------------------------------------

/// Body accepted from the chat widget. `message` is optional at the decoding
/// level so a missing field is reported as a validation error.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

/// How a reply was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// Text came from the upstream model.
    Answered,
    /// No provider is configured.
    Offline,
    /// The provider answered with no text.
    Empty,
    /// The upstream call failed; the error was logged and masked.
    UpstreamFailure,
}

impl ReplyKind {
    pub fn is_degraded(self) -> bool {
        !matches!(self, ReplyKind::Answered)
    }
}

/// Reply returned by the relay. Always carries displayable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub message: String,
    pub kind: ReplyKind,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur in the chat subsystem.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("no API key configured for provider: {0}")]
    MissingApiKey(String),

    #[error("LLM request failed: {0}")]
    RequestFailed(String),

    #[error("provider error: {0}")]
    ProviderError(String),

    #[error("failed to parse LLM response: {0}")]
    ParseError(String),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("failed to load persona: {0}")]
    Persona(String),
}

impl ChatError {
    /// Whether this error came from talking to a provider (and so is masked
    /// behind a degraded reply rather than reported to the caller).
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ChatError::RequestFailed(_) | ChatError::ProviderError(_) | ChatError::ParseError(_)
        )
    }
}
