// Analytics - OpenAI usage and cost
pub mod analytics;

// Characters - cast generation, cast files and the speaker directory
pub mod characters;

// Debate - selection, generation and the conversation driver
pub mod debate;

// Oracle - text generation backends
pub mod oracle;

// Transcript - message log, persistence and rendering
pub mod transcript;

pub use analytics::UsageTracker;
pub use characters::{CastFile, Character, Speaker, SpeakerDirectory};
pub use debate::{DebateEvent, DebateOrchestrator, DebateSession, StepReport, UserAction};
pub use oracle::{OpenAiOracle, Oracle, OracleMessage, OracleRole, RetryPolicy};
pub use transcript::{Message, MessageLog};
