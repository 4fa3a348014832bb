//! # Debate Orchestrator
//!
//! The conversation driver. Each user submission becomes one [`DebateEvent`];
//! [`DebateOrchestrator::step`] runs it to completion, then applies the
//! periodic moderator intervention at most once.

use anyhow::{anyhow, Result};
use log::{debug, error, info, warn};
use std::sync::Arc;

use super::generator::{self, suggest_direction};
use super::prompts::TurnMode;
use super::selector::{choose_next, fallback_speaker};
use super::session::{DebateSession, UserAction};
use crate::core::{DebateError, DebateSettings};
use crate::features::characters::{generate_characters, Speaker, MODERATOR_NAME, USER_NAME};
use crate::features::oracle::Oracle;
use crate::features::transcript::Message;

/// One user submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebateEvent {
    /// Let the next character speak
    ContinueDebate,
    /// Add a user message, then let a character respond
    UserJumpIn(String),
    /// Address a specific character, who answers next
    UserReplyTo { target: String, text: String },
    /// Steer the debate; blank text asks the oracle for a direction
    UserNewDirection(String),
}

impl DebateEvent {
    pub fn action(&self) -> UserAction {
        match self {
            DebateEvent::ContinueDebate => UserAction::Continue,
            DebateEvent::UserJumpIn(_) => UserAction::JumpIn,
            DebateEvent::UserReplyTo { .. } => UserAction::ReplyTo,
            DebateEvent::UserNewDirection(_) => UserAction::NewDirection,
        }
    }
}

/// What a step did
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    /// Messages appended, in order
    pub appended: Vec<Message>,
    /// Non-fatal problems to show the user
    pub warnings: Vec<String>,
    /// A moderator summary was inserted
    pub intervened: bool,
}

/// Moderator steps in on every positive multiple of `interval` (0 disables)
pub fn should_intervene(turn_count: usize, interval: usize) -> bool {
    interval != 0 && turn_count != 0 && turn_count % interval == 0
}

pub struct DebateOrchestrator {
    oracle: Arc<dyn Oracle>,
    settings: DebateSettings,
}

impl DebateOrchestrator {
    pub fn new(oracle: Arc<dyn Oracle>, settings: DebateSettings) -> Self {
        Self { oracle, settings }
    }

    /// Generate a cast for `topic` and open a session. An empty cast is
    /// refused with [`DebateError::NoCharacters`].
    pub async fn start_session(&self, topic: &str) -> Result<DebateSession> {
        let characters = generate_characters(self.oracle.as_ref(), topic).await?;
        if characters.is_empty() {
            return Err(DebateError::NoCharacters.into());
        }
        Ok(DebateSession::new(topic, characters)?)
    }

    /// Process one event. Errors mean the event was rejected before anything
    /// was appended; generation problems during the event become warnings.
    pub async fn step(&self, session: &mut DebateSession, event: DebateEvent) -> Result<StepReport> {
        session.take_pending_action();
        let mut report = StepReport::default();
        debug!("Processing {:?} at turn {}", event.action(), session.turn_count());

        match event {
            DebateEvent::ContinueDebate => {
                self.continue_debate(session, &mut report).await;
            }
            DebateEvent::UserJumpIn(text) => {
                let text = non_blank(text)?;
                report.appended.push(session.record(USER_NAME, text, None));
                self.continue_debate(session, &mut report).await;
            }
            DebateEvent::UserReplyTo { target, text } => {
                let target = session
                    .directory()
                    .find(&target)
                    .map(|c| c.name.clone())
                    .ok_or(DebateError::UnknownSpeaker(target))?;
                let text = non_blank(text)?;
                report
                    .appended
                    .push(session.record(USER_NAME, text, Some(target.clone())));
                self.speak_as(session, target, &mut report).await;
            }
            DebateEvent::UserNewDirection(text) => {
                let direction = if text.trim().is_empty() {
                    let window = session.log().recent(self.settings.direction_window);
                    let suggested = suggest_direction(self.oracle.as_ref(), window).await?;
                    if suggested.is_empty() {
                        return Err(anyhow!("The oracle did not suggest a new direction"));
                    }
                    info!("🧭 Suggested direction: {suggested}");
                    suggested
                } else {
                    text.trim().to_string()
                };
                report.appended.push(session.record(USER_NAME, direction, None));
                self.moderate(session, TurnMode::Normal, &mut report).await;
            }
        }

        self.maybe_intervene(session, &mut report).await;
        Ok(report)
    }

    /// Selector picks, generator speaks. Selector failures fall back to the
    /// first eligible character.
    async fn continue_debate(&self, session: &mut DebateSession, report: &mut StepReport) {
        let next = {
            let characters = session.characters();
            let last_speaker = session.last_speaker();
            let window = session.log().recent(self.settings.selector_window);
            match choose_next(self.oracle.as_ref(), characters, window, last_speaker).await {
                Ok(selection) => Some(selection.character.name.clone()),
                Err(e) => {
                    let fallback = fallback_speaker(characters, last_speaker).map(|c| c.name.clone());
                    warn!("Error choosing next speaker: {e}");
                    report.warnings.push(format!(
                        "Error choosing next speaker: {e}. Falling back to {}.",
                        fallback.as_deref().unwrap_or("nobody")
                    ));
                    fallback
                }
            }
        };

        match next {
            Some(name) => self.speak_as(session, name, report).await,
            None => error!("No characters in session {}", session.id()),
        }
    }

    /// Run the generator for a character in normal mode and log the result
    async fn speak_as(&self, session: &mut DebateSession, name: String, report: &mut StepReport) {
        let result = {
            let Some(character) = session.directory().find(&name) else {
                error!("Speaker '{name}' is not part of the cast");
                return;
            };
            let window = session.log().recent(self.settings.turn_window);
            generator::generate(
                self.oracle.as_ref(),
                &Speaker::Character(character),
                window,
                TurnMode::Normal,
                Some(session.topic()),
            )
            .await
        };

        match result {
            Ok(text) => {
                let message = session.record(&name, text, None);
                info!("🎭 Turn {}: {}", session.turn_count(), name);
                report.appended.push(message);
            }
            Err(e) => {
                error!("Failed to generate turn for {name}: {e}");
                report
                    .warnings
                    .push(format!("{name} seems lost in thought... (skipping turn: {e})"));
            }
        }
    }

    /// Moderator turn. Summaries only look at what characters and the user
    /// said; normal moderator turns see the plain recent window.
    async fn moderate(&self, session: &mut DebateSession, mode: TurnMode, report: &mut StepReport) -> bool {
        let window = match mode {
            TurnMode::Summary => session.recent_debate_messages(self.settings.turn_window),
            TurnMode::Normal => session.log().recent(self.settings.turn_window).to_vec(),
        };

        let result = generator::generate(
            self.oracle.as_ref(),
            &Speaker::Moderator,
            &window,
            mode,
            Some(session.topic()),
        )
        .await;

        match result {
            Ok(text) => {
                report.appended.push(session.record(MODERATOR_NAME, text, None));
                true
            }
            Err(e) => {
                error!("Moderator failed to respond: {e}");
                report
                    .warnings
                    .push(format!("The moderator could not respond: {e}"));
                false
            }
        }
    }

    async fn maybe_intervene(&self, session: &mut DebateSession, report: &mut StepReport) {
        if !should_intervene(session.turn_count(), self.settings.intervention_interval) {
            return;
        }
        if session.log().last().map(|m| m.speaker.as_str()) == Some(MODERATOR_NAME) {
            return;
        }

        info!("📋 Moderator summarising at turn {}", session.turn_count());
        if self.moderate(session, TurnMode::Summary, report).await {
            report.intervened = true;
        }
    }
}

fn non_blank(text: String) -> Result<String, DebateError> {
    if text.trim().is_empty() {
        Err(DebateError::EmptyMessage)
    } else {
        Ok(text)
    }
}
