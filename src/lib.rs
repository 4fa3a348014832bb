// Core layer - configuration, errors and shared helpers
pub mod core;

// Features layer - all feature modules
pub mod features;

pub use core::{Config, DebateError, DebateSettings};

pub use features::{
    // Analytics
    UsageTracker,
    // Characters
    CastFile, Character, Speaker, SpeakerDirectory,
    // Debate
    DebateEvent, DebateOrchestrator, DebateSession, StepReport, UserAction,
    // Oracle
    OpenAiOracle, Oracle, OracleMessage, OracleRole, RetryPolicy,
    // Transcript
    Message, MessageLog,
};
