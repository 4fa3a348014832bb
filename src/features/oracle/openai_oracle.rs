//! OpenAI chat-completion backend for [`Oracle`].
//!
//! The `openai` crate reads its key from the environment, so the binary exports
//! `OPENAI_API_KEY`/`OPENAI_KEY` once at startup; the model is fixed per process.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use openai::chat::{ChatCompletion, ChatCompletionMessage, ChatCompletionMessageRole};

use super::{Oracle, OracleMessage, OracleRole, RetryPolicy};
use crate::features::analytics::UsageTracker;

pub struct OpenAiOracle {
    model: String,
    retry: RetryPolicy,
    usage_tracker: Option<UsageTracker>,
}

impl OpenAiOracle {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            retry: RetryPolicy::none(),
            usage_tracker: None,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_usage_tracker(mut self, tracker: UsageTracker) -> Self {
        self.usage_tracker = Some(tracker);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete_once(&self, messages: Vec<ChatCompletionMessage>) -> Result<String> {
        let chat_completion = ChatCompletion::builder(&self.model, messages)
            .create()
            .await
            .map_err(|e| anyhow!("OpenAI API error: {}", e))?;

        if let (Some(usage), Some(tracker)) = (&chat_completion.usage, &self.usage_tracker) {
            tracker.log_chat(
                &self.model,
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens,
            );
        }

        Ok(chat_completion
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default())
    }
}

fn to_completion_message(message: &OracleMessage) -> ChatCompletionMessage {
    let role = match message.role {
        OracleRole::System => ChatCompletionMessageRole::System,
        OracleRole::User => ChatCompletionMessageRole::User,
        OracleRole::Assistant => ChatCompletionMessageRole::Assistant,
    };
    ChatCompletionMessage {
        role,
        content: Some(message.content.clone()),
        name: None,
        function_call: None,
        tool_call_id: None,
        tool_calls: None,
    }
}

#[async_trait]
impl Oracle for OpenAiOracle {
    async fn call(&self, messages: &[OracleMessage]) -> Result<String> {
        debug!(
            "OpenAI request: model={}, {} messages",
            self.model,
            messages.len()
        );
        self.retry
            .run(|| {
                let payload: Vec<ChatCompletionMessage> =
                    messages.iter().map(to_completion_message).collect();
                self.complete_once(payload)
            })
            .await
    }
}
