//! # Oracle Feature
//!
//! The text-generation seam. Everything that needs generated text (character
//! creation, speaker selection, turns, summaries) goes through [`Oracle`], so
//! the debate core can run against OpenAI in production and a scripted stand-in
//! under test.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Configurable retry with capped exponential backoff
//! - 1.0.0: OpenAI chat completion backend

pub mod openai_oracle;
pub mod retry;

#[cfg(test)]
pub mod scripted;

pub use openai_oracle::OpenAiOracle;
pub use retry::RetryPolicy;

use anyhow::Result;
use async_trait::async_trait;

/// Role of one line in an oracle request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleRole {
    System,
    User,
    Assistant,
}

/// One entry in an oracle request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleMessage {
    pub role: OracleRole,
    pub content: String,
}

impl OracleMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: OracleRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: OracleRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: OracleRole::Assistant,
            content: content.into(),
        }
    }
}

/// A text-generation service: ordered messages in, text out
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn call(&self, messages: &[OracleMessage]) -> Result<String>;
}
