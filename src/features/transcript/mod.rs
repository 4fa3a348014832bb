//! # Feature: Transcript
//!
//! Append-only message log shared by every part of the debate loop, plus JSON
//! persistence and terminal rendering.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Accept legacy `content` field when loading transcripts
//! - 1.0.0: Initial message log with save/load

pub mod persistence;
pub mod render;

pub use render::{format_message, render_transcript};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub speaker: String,
    #[serde(alias = "content")]
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// Ordered, append-only list of messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Append a message stamped with the current time. The timestamp never
    /// goes backwards relative to the previous message.
    pub fn append(
        &mut self,
        speaker: impl Into<String>,
        text: impl Into<String>,
        reply_to: Option<String>,
    ) -> &Message {
        let now = Utc::now();
        let timestamp = match self.messages.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };
        self.messages.push(Message {
            speaker: speaker.into(),
            text: text.into(),
            timestamp,
            reply_to,
        });
        &self.messages[self.messages.len() - 1]
    }

    /// The `n` most recent messages, oldest first
    pub fn recent(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
