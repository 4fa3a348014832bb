//! Character generation from a debate topic
//!
//! One templated oracle request, parsed leniently: strict JSON first, then the
//! first bracketed array found in the reply, then nothing.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use super::{is_reserved_name, names_match, Character};
use crate::core::preview;
use crate::features::oracle::{Oracle, OracleMessage};

const CHARACTER_GEN_PROMPT: &str = include_str!("../../../prompt/character_generation.md");

fn array_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)\[.*\]").expect("static regex is valid"))
}

/// Build the generation prompt for a topic
pub fn build_character_prompt(topic: &str) -> String {
    CHARACTER_GEN_PROMPT.replace("${question}", topic.trim())
}

/// Ask the oracle for a cast. Oracle failures propagate; an unusable reply
/// yields an empty list, which callers must treat as "cannot start".
pub async fn generate_characters(oracle: &dyn Oracle, topic: &str) -> Result<Vec<Character>> {
    let prompt = build_character_prompt(topic);
    let raw_response = oracle
        .call(&[OracleMessage::system(prompt)])
        .await
        .context("Character generation request failed")?;

    let characters = sanitize_characters(parse_characters_from_response(&raw_response));
    if characters.is_empty() {
        warn!(
            "Character generation returned no usable characters: {}",
            preview(&raw_response, 120)
        );
    } else {
        info!(
            "Generated {} characters for '{}': {}",
            characters.len(),
            topic,
            characters
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(characters)
}

/// Parse the oracle reply into characters without validating names
pub fn parse_characters_from_response(raw_response: &str) -> Vec<Character> {
    if let Some(values) = parse_array(raw_response.trim()) {
        return characters_from_values(values);
    }

    if let Some(found) = array_pattern().find(raw_response) {
        debug!("Strict parse failed, retrying on embedded array");
        if let Some(values) = parse_array(found.as_str()) {
            return characters_from_values(values);
        }
    }

    Vec::new()
}

fn parse_array(text: &str) -> Option<Vec<Value>> {
    serde_json::from_str::<Vec<Value>>(text).ok()
}

fn characters_from_values(values: Vec<Value>) -> Vec<Character> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Character>(value) {
            Ok(character) => Some(character),
            Err(e) => {
                debug!("Skipping malformed character entry: {e}");
                None
            }
        })
        .collect()
}

/// Trim names and drop blank, reserved and duplicate (case-insensitive) entries
pub fn sanitize_characters(characters: Vec<Character>) -> Vec<Character> {
    let mut kept: Vec<Character> = Vec::with_capacity(characters.len());
    for mut character in characters {
        character.name = character.name.trim().to_string();
        if character.name.is_empty() {
            continue;
        }
        if is_reserved_name(&character.name) {
            warn!("Dropping character with reserved name '{}'", character.name);
            continue;
        }
        if kept
            .iter()
            .any(|c| names_match(&c.name, &character.name))
        {
            warn!("Dropping duplicate character '{}'", character.name);
            continue;
        }
        kept.push(character);
    }
    kept
}
