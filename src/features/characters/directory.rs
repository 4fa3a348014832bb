//! Speaker directory: the session's fixed cast.

use super::{is_reserved_name, names_match, Character, Speaker, MODERATOR_NAME, USER_NAME};
use crate::core::DebateError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerDirectory {
    characters: Vec<Character>,
}

impl SpeakerDirectory {
    /// Build a directory, rejecting an empty cast, reserved names and duplicates
    pub fn new(characters: Vec<Character>) -> Result<Self, DebateError> {
        if characters.is_empty() {
            return Err(DebateError::NoCharacters);
        }

        for (i, character) in characters.iter().enumerate() {
            let name = character.name.trim();
            if name.is_empty() {
                return Err(DebateError::InvalidCast(format!(
                    "character #{} has no name",
                    i + 1
                )));
            }
            if is_reserved_name(name) {
                return Err(DebateError::InvalidCast(format!(
                    "'{name}' is a reserved name"
                )));
            }
            if characters[..i]
                .iter()
                .any(|other| names_match(&other.name, name))
            {
                return Err(DebateError::InvalidCast(format!(
                    "duplicate character name '{name}'"
                )));
            }
        }

        Ok(Self { characters })
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// Case-insensitive lookup
    pub fn find(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| names_match(&c.name, name))
    }

    /// Resolve a speaker name to a [`Speaker`], covering the Moderator too
    pub fn speaker(&self, name: &str) -> Option<Speaker<'_>> {
        if name == MODERATOR_NAME {
            Some(Speaker::Moderator)
        } else {
            self.find(name).map(Speaker::Character)
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.characters.iter().map(|c| c.name.as_str()).collect()
    }

    /// True for speakers whose messages are part of the debate proper
    /// (characters and the user, not the moderator)
    pub fn is_debater(&self, speaker: &str) -> bool {
        speaker == USER_NAME || self.characters.iter().any(|c| c.name == speaker)
    }

    /// Label for transcript display: characters show their worldview
    pub fn display_name(&self, speaker: &str) -> String {
        match self.characters.iter().find(|c| c.name == speaker) {
            Some(character) => character.label(),
            None => speaker.to_string(),
        }
    }
}
