use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::LlmConfig;

use super::prompt::{PersonaPrompt, SystemPromptProvider};
use super::providers::{self, LlmProvider};
use super::types::*;

// ---------------------------------------------------------------------------
// Fixed replies
// ---------------------------------------------------------------------------

/// Returned for every valid request when no provider is configured.
pub const OFFLINE_MESSAGE: &str = "I'm currently offline. Please reach out directly through \
                                   the contact section and I'll get back to you soon.";

/// Returned when the provider answers with no text.
pub const EMPTY_REPLY_MESSAGE: &str =
    "Sorry, I couldn't generate a response. Could you rephrase your question?";

/// Returned when the upstream call fails for any reason.
pub const UPSTREAM_FAILURE_MESSAGE: &str =
    "I'm having trouble connecting right now. Please try again in a moment.";

pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const INVALID_BODY: &str = "Invalid request body";

// ---------------------------------------------------------------------------
// ChatRelay
// ---------------------------------------------------------------------------

/// Relays a visitor's message to the first available provider, grounded in
/// the persona system prompt. Holds no per-request state.
pub struct ChatRelay {
    providers: Vec<Arc<dyn LlmProvider>>,
    prompt: Arc<dyn SystemPromptProvider>,
}

impl ChatRelay {
    /// Create a relay over an ordered provider list. Only the first provider
    /// is ever called; the rest are kept for status reporting.
    pub fn new(
        providers: Vec<Arc<dyn LlmProvider>>,
        prompt: Arc<dyn SystemPromptProvider>,
    ) -> Arc<Self> {
        Arc::new(Self { providers, prompt })
    }

    /// Build providers and the persona prompt from configuration.
    pub fn from_config(config: &LlmConfig) -> Result<Arc<Self>, ChatError> {
        let providers = providers::create_providers(config)?;
        let prompt = PersonaPrompt::load(config.persona_file.as_deref())?;
        Ok(Self::new(providers, Arc::new(prompt)))
    }

    /// Whether at least one provider has a key configured.
    pub fn is_available(&self) -> bool {
        !self.providers.is_empty()
    }

    /// The provider that will serve requests, if any.
    pub fn active_provider(&self) -> Option<&dyn LlmProvider> {
        self.providers.first().map(|p| p.as_ref())
    }

    // -----------------------------------------------------------------------
    // Request handling
    // -----------------------------------------------------------------------

    /// Decode and validate a raw request body, returning the message.
    pub fn parse_request(raw: &[u8]) -> Result<String, ChatError> {
        let req: ChatRequest = serde_json::from_slice(raw)
            .map_err(|_| ChatError::InvalidRequest(INVALID_BODY.to_string()))?;

        match req.message {
            Some(m) if !m.is_empty() => Ok(m),
            _ => Err(ChatError::InvalidRequest(MESSAGE_REQUIRED.to_string())),
        }
    }

    /// Full request cycle: validate, then relay. Only malformed input is
    /// reported as an error; upstream problems become degraded replies.
    pub async fn handle_chat_request(&self, raw: &[u8]) -> Result<ChatReply, ChatError> {
        let message = Self::parse_request(raw)?;
        Ok(self.relay(&message).await)
    }

    /// Send a validated message upstream and map the outcome to a reply.
    pub async fn relay(&self, message: &str) -> ChatReply {
        let Some(provider) = self.active_provider() else {
            info!("no chat provider configured; replying offline");
            return ChatReply {
                message: OFFLINE_MESSAGE.to_string(),
                kind: ReplyKind::Offline,
            };
        };

        let conversation = self.build_conversation(message);
        debug!(provider = provider.name(), model = provider.model(), "relaying chat message");

        match provider.complete(&conversation).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    warn!(provider = provider.name(), "provider returned an empty reply");
                    ChatReply {
                        message: EMPTY_REPLY_MESSAGE.to_string(),
                        kind: ReplyKind::Empty,
                    }
                } else {
                    ChatReply {
                        message: text.to_string(),
                        kind: ReplyKind::Answered,
                    }
                }
            }
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "chat provider call failed");
                ChatReply {
                    message: UPSTREAM_FAILURE_MESSAGE.to_string(),
                    kind: ReplyKind::UpstreamFailure,
                }
            }
        }
    }

    fn build_conversation(&self, message: &str) -> [ChatMessage; 2] {
        [
            ChatMessage::system(self.prompt.system_prompt()),
            ChatMessage::user(message),
        ]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
