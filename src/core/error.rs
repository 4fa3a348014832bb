//! Domain errors the front end needs to match on.
//!
//! Transport, I/O and parse failures travel as `anyhow::Error`; these are the
//! cases where the caller must react differently (ask for a new topic, pick a
//! different reply target, and so on).

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DebateError {
    /// Character generation produced nobody, so there is no one to debate
    #[error("no characters available to debate")]
    NoCharacters,
    /// A reply target that is not part of the cast
    #[error("unknown speaker: {0}")]
    UnknownSpeaker(String),
    /// User interjection with nothing in it
    #[error("message text is empty")]
    EmptyMessage,
    /// Cast rejected by validation
    #[error("invalid cast: {0}")]
    InvalidCast(String),
}
