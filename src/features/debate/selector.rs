//! Turn selection: who speaks next.
//!
//! The oracle proposes a name; anything it says that does not resolve to an
//! eligible character falls back to the first character who is not the last
//! speaker, so the result is deterministic whenever the oracle is unhelpful.

use anyhow::Result;
use log::debug;

use super::prompts::speaker_selection_prompt;
use crate::core::{preview, DebateError};
use crate::features::characters::{names_match, Character};
use crate::features::oracle::{Oracle, OracleMessage};
use crate::features::transcript::Message;

/// Outcome of a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<'a> {
    pub character: &'a Character,
    /// The oracle reply could not be used
    pub used_fallback: bool,
}

/// Pick the next speaker. Oracle failures are returned to the caller, which
/// is expected to apply [`fallback_speaker`] itself.
pub async fn choose_next<'a>(
    oracle: &dyn Oracle,
    characters: &'a [Character],
    recent_history: &[Message],
    last_speaker: &str,
) -> Result<Selection<'a>> {
    let first = characters.first().ok_or(DebateError::NoCharacters)?;
    if characters.len() == 1 {
        return Ok(Selection {
            character: first,
            used_fallback: false,
        });
    }

    let prompt = speaker_selection_prompt(characters, recent_history, last_speaker);
    let response = oracle.call(&[OracleMessage::system(prompt)]).await?;

    if let Some(character) = match_reply(characters, &response, last_speaker) {
        debug!("Selector picked {}", character.name);
        return Ok(Selection {
            character,
            used_fallback: false,
        });
    }

    debug!(
        "Selector reply '{}' not usable, falling back",
        preview(&response, 60)
    );
    Ok(Selection {
        character: fallback_speaker(characters, last_speaker).unwrap_or(first),
        used_fallback: true,
    })
}

/// First character whose name differs from `last_speaker`, else the first
/// character. `None` only for an empty cast.
pub fn fallback_speaker<'a>(characters: &'a [Character], last_speaker: &str) -> Option<&'a Character> {
    characters
        .iter()
        .find(|c| c.name != last_speaker)
        .or_else(|| characters.first())
}

/// Resolve an oracle reply to an eligible character.
///
/// The first non-empty line, stripped of quoting and emphasis, must be a
/// character's whole name (case-insensitive). Anything else is unrecognized.
pub fn match_reply<'a>(
    characters: &'a [Character],
    reply: &str,
    last_speaker: &str,
) -> Option<&'a Character> {
    let line = reply.lines().map(str::trim).find(|l| !l.is_empty())?;
    let cleaned = line.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '"' | '\'' | '*' | '`' | '.' | ',' | '!' | ':' | '_')
    });

    characters
        .iter()
        .filter(|c| c.name != last_speaker)
        .find(|c| names_match(&c.name, cleaned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::oracle::scripted::ScriptedOracle;
    use crate::features::transcript::MessageLog;

    fn abc() -> Vec<Character> {
        vec![
            Character::new("A", "", "economist", "Tax it"),
            Character::new("B", "", "mayor", "Subsidise it"),
            Character::new("C", "", "activist", "Ban it"),
        ]
    }

    fn history() -> MessageLog {
        let mut log = MessageLog::new();
        log.append("A", "x", None);
        log.append("B", "y", None);
        log
    }

    #[tokio::test]
    async fn test_unrecognized_reply_falls_back_to_first_eligible() {
        let characters = abc();
        let oracle = ScriptedOracle::new().reply("Z");
        let log = history();

        let selection = choose_next(&oracle, &characters, log.messages(), "A")
            .await
            .unwrap();
        assert_eq!(selection.character.name, "B");
        assert!(selection.used_fallback);
    }

    #[tokio::test]
    async fn test_recognized_reply_is_case_insensitive() {
        let characters = abc();
        let oracle = ScriptedOracle::new().reply("c\n");
        let log = history();

        let selection = choose_next(&oracle, &characters, log.messages(), "A")
            .await
            .unwrap();
        assert_eq!(selection.character.name, "C");
        assert!(!selection.used_fallback);
    }

    #[tokio::test]
    async fn test_reply_naming_last_speaker_is_rejected() {
        let characters = abc();
        let oracle = ScriptedOracle::new().reply("A");
        let log = history();

        let selection = choose_next(&oracle, &characters, log.messages(), "A")
            .await
            .unwrap();
        assert_ne!(selection.character.name, "A");
        assert_eq!(selection.character.name, "B");
    }

    #[tokio::test]
    async fn test_single_character_needs_no_oracle() {
        let characters = vec![Character::new("A", "", "", "")];
        let oracle = ScriptedOracle::unavailable();
        let log = history();

        for last in ["A", "B", "User", ""] {
            let selection = choose_next(&oracle, &characters, log.messages(), last)
                .await
                .unwrap();
            assert_eq!(selection.character.name, "A");
        }
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_cast_is_an_error() {
        let oracle = ScriptedOracle::always("A");
        let err = choose_next(&oracle, &[], &[], "A").await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<DebateError>(),
            Some(&DebateError::NoCharacters)
        );
    }

    #[tokio::test]
    async fn test_oracle_failure_propagates() {
        let characters = abc();
        let oracle = ScriptedOracle::unavailable();
        assert!(choose_next(&oracle, &characters, &[], "A").await.is_err());
    }

    #[tokio::test]
    async fn test_prompt_carries_window_and_last_speaker() {
        let characters = abc();
        let oracle = ScriptedOracle::new().reply("B");
        let log = history();

        choose_next(&oracle, &characters, log.messages(), "B")
            .await
            .unwrap();
        let request = &oracle.requests()[0];
        assert_eq!(request.len(), 1);
        assert!(request[0].content.contains("A: x\nB: y"));
        assert!(request[0].content.contains("The last speaker was: B"));
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let characters = abc();
        for _ in 0..5 {
            assert_eq!(fallback_speaker(&characters, "A").unwrap().name, "B");
            assert_eq!(fallback_speaker(&characters, "User").unwrap().name, "A");
        }
        let solo = vec![Character::new("A", "", "", "")];
        assert_eq!(fallback_speaker(&solo, "A").unwrap().name, "A");
        assert!(fallback_speaker(&[], "A").is_none());
    }

    #[test]
    fn test_match_reply_strips_decoration() {
        let characters = vec![
            Character::new("Maria Lopez", "", "", ""),
            Character::new("Tom", "", "", ""),
        ];
        assert_eq!(
            match_reply(&characters, "**Maria Lopez**", "Tom").unwrap().name,
            "Maria Lopez"
        );
        assert_eq!(
            match_reply(&characters, "\"Tom.\"", "Maria Lopez").unwrap().name,
            "Tom"
        );
        assert!(match_reply(&characters, "Next up: Tom, for balance", "Maria Lopez").is_none());
        assert!(match_reply(&characters, "", "Tom").is_none());
    }

    #[test]
    fn test_match_reply_requires_whole_name() {
        let characters = vec![
            Character::new("Al", "", "", ""),
            Character::new("Alice", "", "", ""),
            Character::new("Bob", "", "", ""),
        ];
        assert!(match_reply(&characters, "Probably Alice or Al", "Bob").is_none());
        assert!(match_reply(&characters, "Alicia", "Bob").is_none());
        assert_eq!(match_reply(&characters, "al", "Bob").unwrap().name, "Al");
        assert_eq!(match_reply(&characters, "ALICE", "Bob").unwrap().name, "Alice");
    }

    #[tokio::test]
    async fn test_name_inside_longer_unknown_name_falls_back() {
        let characters = abc();
        let oracle = ScriptedOracle::new().reply("Zac");
        let log = history();

        let selection = choose_next(&oracle, &characters, log.messages(), "A")
            .await
            .unwrap();
        assert_eq!(selection.character.name, "B");
        assert!(selection.used_fallback);

        let characters = vec![
            Character::new("Ed", "", "", ""),
            Character::new("Maya", "", "", ""),
            Character::new("Sam", "", "", ""),
        ];
        let oracle = ScriptedOracle::new().reply("Samantha");
        let selection = choose_next(&oracle, &characters, &[], "Maya")
            .await
            .unwrap();
        assert_eq!(selection.character.name, "Ed");
        assert!(selection.used_fallback);
    }

    #[tokio::test]
    async fn test_non_ascii_reply_matches_case_insensitively() {
        let characters = vec![
            Character::new("Émile", "", "", ""),
            Character::new("Bo", "", "", ""),
        ];
        let oracle = ScriptedOracle::new().reply("ÉMILE");
        let selection = choose_next(&oracle, &characters, &[], "Bo").await.unwrap();
        assert_eq!(selection.character.name, "Émile");
        assert!(!selection.used_fallback);
    }
}
