use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::CompletionError;
use crate::llm::CompletionService;

/// Completion service that replays queued replies in order
///
/// Once the queue is drained every call returns the default reply.
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    default: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn new(replies: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            default: String::new(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_default(reply: &str) -> Self {
        Self {
            default: reply.to_string(),
            ..Self::new(Vec::new())
        }
    }

    pub fn reply(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn failing(message: &str) -> Self {
        Self::new(vec![Err(CompletionError::Unavailable(message.to_string()))])
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn generate(
        &self,
        prompt: &str,
        _system_prompt: Option<&str>,
    ) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(self.default.clone()))
    }
}
