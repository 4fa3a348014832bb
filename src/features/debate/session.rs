//! Debate session state: the cast, the message log and turn bookkeeping.
//!
//! All appends go through [`DebateSession::record`], which keeps `turn_count`
//! equal to the number of logged messages and `last_speaker` equal to the
//! author of the newest one.

use anyhow::Result;
use log::info;
use std::fmt;
use std::path::Path;
use uuid::Uuid;

use crate::core::DebateError;
use crate::features::characters::{Character, SpeakerDirectory, MODERATOR_NAME, USER_NAME};
use crate::features::transcript::{Message, MessageLog};

/// The four things a user can do between turns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Continue,
    JumpIn,
    ReplyTo,
    NewDirection,
}

impl UserAction {
    pub fn all() -> &'static [UserAction] {
        &[
            UserAction::Continue,
            UserAction::JumpIn,
            UserAction::ReplyTo,
            UserAction::NewDirection,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserAction::Continue => "Let the debate continue",
            UserAction::JumpIn => "Jump in (add your message)",
            UserAction::ReplyTo => "Reply to a character",
            UserAction::NewDirection => "Ask for a new direction",
        }
    }
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Messages logged since the session started. The moderator's opening
    /// counts as turn 1, so the first summary follows four debate turns
    /// rather than the five a count starting at 0 would give.
    pub turn_count: usize,
    pub last_speaker: String,
    /// Action the front end is currently composing, if any
    pub pending_action: Option<UserAction>,
}

#[derive(Debug, Clone)]
pub struct DebateSession {
    id: Uuid,
    topic: String,
    directory: SpeakerDirectory,
    log: MessageLog,
    state: SessionState,
}

impl DebateSession {
    /// Start a debate: the moderator poses the question as the first message
    pub fn new(topic: impl Into<String>, characters: Vec<Character>) -> Result<Self, DebateError> {
        let topic = topic.into();
        let directory = SpeakerDirectory::new(characters)?;
        let mut session = Self {
            id: Uuid::new_v4(),
            topic,
            directory,
            log: MessageLog::new(),
            state: SessionState {
                turn_count: 0,
                last_speaker: MODERATOR_NAME.to_string(),
                pending_action: None,
            },
        };

        let opening = format!("Let's begin our debate. The question is: {}", session.topic);
        session.record(MODERATOR_NAME, opening, None);
        info!(
            "🎙️ Debate session {} started on '{}' with {}",
            session.id,
            session.topic,
            session.directory.names().join(", ")
        );
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn directory(&self) -> &SpeakerDirectory {
        &self.directory
    }

    pub fn characters(&self) -> &[Character] {
        self.directory.characters()
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn turn_count(&self) -> usize {
        self.state.turn_count
    }

    pub fn last_speaker(&self) -> &str {
        &self.state.last_speaker
    }

    /// Most recent `n` messages spoken by characters or the user, oldest first
    pub fn recent_debate_messages(&self, n: usize) -> Vec<Message> {
        let debate: Vec<&Message> = self
            .log
            .iter()
            .filter(|m| self.directory.is_debater(&m.speaker))
            .collect();
        let start = debate.len().saturating_sub(n);
        debate[start..].iter().map(|m| (*m).clone()).collect()
    }

    /// Append a message and advance the bookkeeping
    pub(crate) fn record(
        &mut self,
        speaker: &str,
        text: impl Into<String>,
        reply_to: Option<String>,
    ) -> Message {
        let message = self.log.append(speaker, text, reply_to).clone();
        self.state.turn_count += 1;
        self.state.last_speaker = message.speaker.clone();
        message
    }

    pub fn begin_action(&mut self, action: UserAction) {
        self.state.pending_action = Some(action);
    }

    pub fn cancel_action(&mut self) {
        self.state.pending_action = None;
    }

    pub(crate) fn take_pending_action(&mut self) -> Option<UserAction> {
        self.state.pending_action.take()
    }

    /// Replace the log wholesale. This restarts the session bookkeeping from
    /// the loaded messages.
    pub fn replace_log(&mut self, log: MessageLog) {
        self.state = SessionState {
            turn_count: log.len(),
            last_speaker: log
                .last()
                .map(|m| m.speaker.clone())
                .unwrap_or_else(|| MODERATOR_NAME.to_string()),
            pending_action: None,
        };
        self.log = log;
        info!(
            "Session {} now holds {} messages (last speaker: {})",
            self.id, self.state.turn_count, self.state.last_speaker
        );
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.log.save(path)
    }

    /// Load a transcript; on failure the current log is left untouched.
    /// Every speaker and reply target must belong to this session's cast.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let log = MessageLog::load(path)?;
        self.check_speakers(&log)?;
        self.replace_log(log);
        Ok(())
    }

    /// Names must match the cast exactly, as written by [`Self::record`]
    fn check_speakers(&self, log: &MessageLog) -> Result<(), DebateError> {
        for (i, message) in log.iter().enumerate() {
            let known = message.speaker == USER_NAME
                || self
                    .directory
                    .speaker(&message.speaker)
                    .is_some_and(|s| s.name() == message.speaker);
            if !known {
                return Err(DebateError::InvalidCast(format!(
                    "transcript message #{} is from '{}', who is not in this cast",
                    i + 1,
                    message.speaker
                )));
            }

            if let Some(target) = &message.reply_to {
                if !self.directory.find(target).is_some_and(|c| &c.name == target) {
                    return Err(DebateError::InvalidCast(format!(
                        "transcript message #{} replies to '{target}', who is not in this cast",
                        i + 1
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cast() -> Vec<Character> {
        vec![
            Character::new("Ada", "engineer", "technologist", "Build it"),
            Character::new("Bo", "farmer", "rural mayor", "Leave it"),
        ]
    }

    #[test]
    fn test_new_session_logs_opening() {
        let session = DebateSession::new("Cars?", cast()).unwrap();
        assert_eq!(session.turn_count(), 1);
        assert_eq!(session.last_speaker(), MODERATOR_NAME);
        assert_eq!(
            session.log().last().unwrap().text,
            "Let's begin our debate. The question is: Cars?"
        );
    }

    #[test]
    fn test_zero_characters_refused() {
        assert_eq!(
            DebateSession::new("foo", vec![]).unwrap_err(),
            DebateError::NoCharacters
        );
    }

    #[test]
    fn test_record_tracks_bookkeeping() {
        let mut session = DebateSession::new("Cars?", cast()).unwrap();
        session.record("Ada", "x", None);
        session.record("User", "y", Some("Ada".to_string()));
        assert_eq!(session.turn_count(), 3);
        assert_eq!(session.turn_count(), session.log().len());
        assert_eq!(session.last_speaker(), "User");
    }

    #[test]
    fn test_recent_debate_messages_skip_moderator() {
        let mut session = DebateSession::new("Cars?", cast()).unwrap();
        session.record("Ada", "a1", None);
        session.record(MODERATOR_NAME, "summary", None);
        session.record("User", "u1", None);
        session.record("Bo", "b1", None);

        let texts: Vec<String> = session
            .recent_debate_messages(10)
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["a1", "u1", "b1"]);

        let last_two: Vec<String> = session
            .recent_debate_messages(2)
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(last_two, vec!["u1", "b1"]);
    }

    #[test]
    fn test_pending_action_lifecycle() {
        let mut session = DebateSession::new("Cars?", cast()).unwrap();
        assert!(session.state().pending_action.is_none());
        session.begin_action(UserAction::ReplyTo);
        assert_eq!(session.state().pending_action, Some(UserAction::ReplyTo));
        session.cancel_action();
        assert!(session.state().pending_action.is_none());
    }

    #[test]
    fn test_save_and_load_resets_bookkeeping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.json");

        let mut original = DebateSession::new("Cars?", cast()).unwrap();
        original.record("Ada", "x", None);
        original.record("Bo", "y", None);
        original.save(&path).unwrap();

        let mut resumed = DebateSession::new("Cars?", cast()).unwrap();
        resumed.load(&path).unwrap();
        assert_eq!(resumed.log(), original.log());
        assert_eq!(resumed.turn_count(), 3);
        assert_eq!(resumed.last_speaker(), "Bo");
    }

    #[test]
    fn test_failed_load_keeps_log() {
        let mut session = DebateSession::new("Cars?", cast()).unwrap();
        session.record("Ada", "x", None);
        let before = session.log().clone();

        assert!(session.load(Path::new("/nonexistent/t.json")).is_err());
        assert_eq!(session.log(), &before);
        assert_eq!(session.turn_count(), 2);
    }

    #[test]
    fn test_load_rejects_foreign_speakers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.json");

        let other_cast = vec![
            Character::new("Cy", "", "", ""),
            Character::new("Di", "", "", ""),
        ];
        let mut other = DebateSession::new("Cars?", other_cast).unwrap();
        other.record("Cy", "x", None);
        other.save(&path).unwrap();

        let mut session = DebateSession::new("Cars?", cast()).unwrap();
        session.record("Ada", "mine", None);
        let before = session.log().clone();

        let err = session.load(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DebateError>(),
            Some(DebateError::InvalidCast(msg)) if msg.contains("'Cy'")
        ));
        assert_eq!(session.log(), &before);
        assert_eq!(session.turn_count(), 2);
        assert_eq!(session.last_speaker(), "Ada");
    }

    #[test]
    fn test_load_rejects_foreign_reply_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reply.json");

        let mut log = MessageLog::new();
        log.append(MODERATOR_NAME, "Let's begin.", None);
        log.append(USER_NAME, "You there?", Some("Cy".to_string()));
        log.save(&path).unwrap();

        let mut session = DebateSession::new("Cars?", cast()).unwrap();
        let err = session.load(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DebateError>(),
            Some(DebateError::InvalidCast(msg)) if msg.contains("replies to 'Cy'")
        ));
        assert_eq!(session.turn_count(), 1);
    }

    #[test]
    fn test_load_requires_exact_speaker_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("case.json");

        let mut log = MessageLog::new();
        log.append("ada", "lowercase", None);
        log.save(&path).unwrap();

        let mut session = DebateSession::new("Cars?", cast()).unwrap();
        assert!(session.load(&path).is_err());
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(UserAction::all().len(), 4);
        assert_eq!(UserAction::Continue.to_string(), "Let the debate continue");
    }
}
