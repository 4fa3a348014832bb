//! # Feature: Characters
//!
//! The debate cast: generated characters plus the synthetic Moderator.
//! Characters are created once per session (from the oracle or a cast file)
//! and never change afterwards.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: YAML cast files
//! - 1.0.0: Topic-driven character generation and speaker directory

pub mod builder;
pub mod cast_file;
pub mod directory;

pub use builder::{generate_characters, parse_characters_from_response, sanitize_characters};
pub use cast_file::CastFile;
pub use directory::SpeakerDirectory;

use serde::{Deserialize, Serialize};

/// Name used for the neutral moderator voice
pub const MODERATOR_NAME: &str = "Moderator";
/// Name used for messages typed by the human participant
pub const USER_NAME: &str = "User";

const MODERATOR_BACKGROUND: &str = "a neutral debate moderator";
const MODERATOR_STANCE: &str = "Neutral moderator";

/// A fictional discussant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub worldview: String,
    /// One-sentence stance on the debate question
    #[serde(default, alias = "stance")]
    pub summary: String,
}

impl Character {
    pub fn new(
        name: impl Into<String>,
        background: impl Into<String>,
        worldview: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            background: background.into(),
            worldview: worldview.into(),
            summary: summary.into(),
        }
    }

    /// "Name (worldview)", or just the name when the worldview is blank
    pub fn label(&self) -> String {
        if self.worldview.trim().is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.worldview)
        }
    }
}

/// Case-insensitive name comparison with full Unicode case folding
pub fn names_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Whether a name collides with one of the built-in roles
pub fn is_reserved_name(name: &str) -> bool {
    names_match(name, MODERATOR_NAME) || names_match(name, USER_NAME)
}

/// Anyone the turn generator can speak as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker<'a> {
    Character(&'a Character),
    Moderator,
}

impl<'a> Speaker<'a> {
    pub fn name(&self) -> &str {
        match self {
            Speaker::Character(c) => &c.name,
            Speaker::Moderator => MODERATOR_NAME,
        }
    }

    pub fn background(&self) -> &str {
        match self {
            Speaker::Character(c) => &c.background,
            Speaker::Moderator => MODERATOR_BACKGROUND,
        }
    }

    pub fn stance(&self) -> &str {
        match self {
            Speaker::Character(c) if c.summary.trim().is_empty() => "No stance provided.",
            Speaker::Character(c) => &c.summary,
            Speaker::Moderator => MODERATOR_STANCE,
        }
    }
}

impl<'a> From<&'a Character> for Speaker<'a> {
    fn from(character: &'a Character) -> Self {
        Speaker::Character(character)
    }
}
