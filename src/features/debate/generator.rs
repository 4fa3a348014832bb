//! Turn generation: speak as a character, or recap as the moderator.

use anyhow::Result;
use log::debug;

use super::prompts::{format_conversation, format_line, turn_system_prompt, TurnMode, NEW_DIRECTION};
use crate::core::preview;
use crate::features::characters::Speaker;
use crate::features::oracle::{Oracle, OracleMessage};
use crate::features::transcript::Message;

/// Build the oracle request for one turn.
///
/// Each window message becomes a "speaker: text" line; lines the speaker said
/// themselves go in as assistant turns, everyone else's as user turns.
pub fn build_turn_messages(
    speaker: &Speaker<'_>,
    recent_messages: &[Message],
    mode: TurnMode,
    topic: Option<&str>,
) -> Vec<OracleMessage> {
    let mut messages = Vec::with_capacity(recent_messages.len() + 1);
    messages.push(OracleMessage::system(turn_system_prompt(speaker, mode, topic)));

    for message in recent_messages {
        let line = format_line(message);
        if message.speaker == speaker.name() {
            messages.push(OracleMessage::assistant(line));
        } else {
            messages.push(OracleMessage::user(line));
        }
    }
    messages
}

/// Generate one utterance for `speaker`. The raw reply is returned as-is
/// (including empty text); oracle errors propagate.
pub async fn generate(
    oracle: &dyn Oracle,
    speaker: &Speaker<'_>,
    recent_messages: &[Message],
    mode: TurnMode,
    topic: Option<&str>,
) -> Result<String> {
    let messages = build_turn_messages(speaker, recent_messages, mode, topic);
    let text = oracle.call(&messages).await?;
    debug!("{} ({:?}): {}", speaker.name(), mode, preview(&text, 80));
    Ok(text)
}

/// Ask the oracle for a fresh direction or question to push the debate on
pub async fn suggest_direction(oracle: &dyn Oracle, recent_messages: &[Message]) -> Result<String> {
    let messages = [
        OracleMessage::system(NEW_DIRECTION.trim_end()),
        OracleMessage::user(format_conversation(recent_messages)),
    ];
    let direction = oracle.call(&messages).await?;
    Ok(direction.trim().to_string())
}
