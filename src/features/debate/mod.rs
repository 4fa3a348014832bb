//! # Feature: Debate
//!
//! Runs a moderated multi-party debate: picks who speaks next, generates each
//! turn in character, and lets the moderator recap at a fixed cadence.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Event-driven orchestrator with user interjections and replies
//! - 1.1.0: Periodic moderator summaries
//! - 1.0.0: Initial implementation with oracle-driven speaker selection

pub mod generator;
pub mod orchestrator;
pub mod prompts;
pub mod selector;
pub mod session;

pub use generator::{build_turn_messages, generate, suggest_direction};
pub use orchestrator::{should_intervene, DebateEvent, DebateOrchestrator, StepReport};
pub use prompts::TurnMode;
pub use selector::{choose_next, fallback_speaker, Selection};
pub use session::{DebateSession, SessionState, UserAction};
