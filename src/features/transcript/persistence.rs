//! JSON save/load for the message log. The file is exactly the list of
//! messages, pretty-printed; there is no schema version.

use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use super::{Message, MessageLog};
use crate::core::write_atomic;

impl MessageLog {
    /// Write the whole log to `path` (temp file + rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.messages)
            .context("Failed to serialize transcript")?;
        write_atomic(path, json.as_bytes())?;
        info!("💾 Saved {} messages to {}", self.len(), path.display());
        Ok(())
    }

    /// Read a log from `path`
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript {}", path.display()))?;
        let messages: Vec<Message> = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid transcript JSON in {}", path.display()))?;
        info!("📄 Loaded {} messages from {}", messages.len(), path.display());
        Ok(Self::from_messages(messages))
    }
}
