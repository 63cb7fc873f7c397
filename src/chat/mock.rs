//! Scripted provider used by unit tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::providers::LlmProvider;
use super::types::{ChatError, ChatMessage};

pub enum Script {
    Reply(&'static str),
    Fail,
}

/// Replays a fixed outcome and records every conversation it receives.
pub struct MockProvider {
    name: &'static str,
    script: Script,
    calls: AtomicUsize,
    pub seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockProvider {
    pub fn new(name: &'static str, script: Script) -> Arc<Self> {
        Arc::new(Self {
            name,
            script,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LlmProvider for MockProvider {
    fn complete<'a>(
        &'a self,
        conversation: &'a [ChatMessage],
    ) -> Pin<Box<dyn Future<Output = Result<String, ChatError>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(conversation.to_vec());
            match self.script {
                Script::Reply(text) => Ok(text.to_string()),
                Script::Fail => Err(ChatError::RequestFailed("connection refused".into())),
            }
        })
    }

    fn name(&self) -> &str {
        self.name
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}
