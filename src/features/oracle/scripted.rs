//! Test oracle that replays queued replies and records every request.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{Oracle, OracleMessage};

enum Reply {
    Text(String),
    Failure(String),
}

/// Replies are consumed in order; once the queue is empty every call fails
/// (or returns the fallback text, if one is set).
#[derive(Default)]
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<Reply>>,
    fallback: Option<String>,
    requests: Mutex<Vec<Vec<OracleMessage>>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// An oracle that is always down
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// An oracle that answers every call with the same text
    pub fn always(text: &str) -> Self {
        Self {
            fallback: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Text(text.to_string()));
        self
    }

    pub fn fail(self, reason: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Failure(reason.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<Vec<OracleMessage>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn call(&self, messages: &[OracleMessage]) -> Result<String> {
        self.requests.lock().unwrap().push(messages.to_vec());
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Failure(reason)) => Err(anyhow!("OpenAI API error: {reason}")),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| anyhow!("OpenAI API error: service unavailable")),
        }
    }
}
