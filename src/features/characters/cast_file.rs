//! # Cast File Schema
//!
//! YAML file holding a prepared cast, so a debate can skip generation or be
//! resumed with the same characters as a saved transcript.
//!
//! ```yaml
//! topic: Should cities ban cars?
//! characters:
//!   - name: Ada
//!     background: Civil engineer
//!     worldview: technologist
//!     summary: Build more transit
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{Character, SpeakerDirectory};
use crate::core::write_atomic;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CastFile {
    /// Debate question the cast was created for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub characters: Vec<Character>,
}

impl CastFile {
    pub fn new(topic: Option<String>, characters: Vec<Character>) -> Self {
        Self { topic, characters }
    }

    /// Load and validate a cast file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read cast file {}", path.display()))?;
        let cast = Self::from_yaml(&contents)
            .with_context(|| format!("Invalid cast file {}", path.display()))?;
        Ok(cast)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let cast: CastFile = serde_yaml::from_str(contents)?;
        cast.validate()?;
        Ok(cast)
    }

    /// Same rules as a live session: non-empty, unique, no reserved names
    pub fn validate(&self) -> Result<()> {
        SpeakerDirectory::new(self.characters.clone())?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        write_atomic(path, yaml.as_bytes())
    }
}
