#[cfg(test)]
pub(crate) mod mock;
pub mod prompt;
pub mod providers;
pub mod service;
pub mod types;

pub use prompt::{Persona, PersonaPrompt, StaticPrompt, SystemPromptProvider};
pub use providers::{LlmProvider, OpenAiCompatible};
pub use service::ChatRelay;
pub use types::{ChatError, ChatMessage, ChatReply, ReplyKind, Role};
