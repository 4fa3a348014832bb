//! Prompt templates (embedded at compile time from `prompt/*.md`) and the
//! helpers that fill them in.

use crate::features::characters::{Character, Speaker};
use crate::features::transcript::Message;

const SPEAKER_SELECTION: &str = include_str!("../../../prompt/speaker_selection.md");
const TURN_NORMAL: &str = include_str!("../../../prompt/turn_normal.md");
const TURN_SUMMARY: &str = include_str!("../../../prompt/turn_summary.md");
pub(crate) const NEW_DIRECTION: &str = include_str!("../../../prompt/new_direction.md");

/// How the generator should speak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnMode {
    /// Argue in character
    Normal,
    /// Neutral recap of the debate so far
    Summary,
}

/// One "speaker: text" line per message, oldest first
pub fn format_conversation(messages: &[Message]) -> String {
    messages
        .iter()
        .map(format_line)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_line(message: &Message) -> String {
    format!("{}: {}", message.speaker, message.text)
}

pub fn speaker_selection_prompt(
    characters: &[Character],
    recent_history: &[Message],
    last_speaker: &str,
) -> String {
    let character_summaries = characters
        .iter()
        .map(|c| format!("- {} ({}): {}", c.name, c.worldview, c.summary))
        .collect::<Vec<_>>()
        .join("\n");

    SPEAKER_SELECTION
        .replace("${characters}", &character_summaries)
        .replace("${conversation}", &format_conversation(recent_history))
        .replace("${last_speaker}", last_speaker)
}

/// System instruction framing the oracle as `speaker`
pub fn turn_system_prompt(speaker: &Speaker<'_>, mode: TurnMode, topic: Option<&str>) -> String {
    let mut prompt = format!(
        "You are {}, {}. Your stance: {}.\n\n",
        speaker.name(),
        speaker.background(),
        speaker.stance().trim_end_matches('.')
    );
    prompt.push_str(match mode {
        TurnMode::Normal => TURN_NORMAL.trim_end(),
        TurnMode::Summary => TURN_SUMMARY.trim_end(),
    });
    if let Some(topic) = topic.filter(|t| !t.trim().is_empty()) {
        prompt.push_str(&format!("\n\nThe debate question is: \"{}\"", topic.trim()));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::transcript::MessageLog;

    #[test]
    fn test_selection_prompt_lists_everyone() {
        let characters = vec![
            Character::new("Ada", "", "technologist", "Build it"),
            Character::new("Bo", "", "rural mayor", "Leave it"),
        ];
        let mut log = MessageLog::new();
        log.append("Ada", "x", None);
        log.append("Bo", "y", None);

        let prompt = speaker_selection_prompt(&characters, log.messages(), "Bo");
        assert!(prompt.contains("- Ada (technologist): Build it"));
        assert!(prompt.contains("- Bo (rural mayor): Leave it"));
        assert!(prompt.contains("Ada: x\nBo: y"));
        assert!(prompt.contains("The last speaker was: Bo"));
        assert!(!prompt.contains("${"));
    }

    #[test]
    fn test_turn_prompt_embeds_persona_verbatim() {
        let ada = Character::new("Ada", "a civil engineer from Lyon", "technologist", "Build more transit.");
        let prompt = turn_system_prompt(&Speaker::from(&ada), TurnMode::Normal, Some("Cars?"));
        assert!(prompt.starts_with(
            "You are Ada, a civil engineer from Lyon. Your stance: Build more transit."
        ));
        assert!(prompt.contains("strong, clear stance"));
        assert!(prompt.ends_with("The debate question is: \"Cars?\""));
    }

    #[test]
    fn test_summary_prompt_is_neutral() {
        let prompt = turn_system_prompt(&Speaker::Moderator, TurnMode::Summary, None);
        assert!(prompt.starts_with("You are Moderator, a neutral debate moderator."));
        assert!(prompt.contains("1-3 sentences"));
        assert!(!prompt.contains("strong, clear stance"));
        assert!(!prompt.contains("debate question is"));
    }
}
