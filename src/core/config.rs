//! Environment-driven configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: OpenAI credentials, logging, transcript directory and debate tuning

use anyhow::{anyhow, Result};
use log::warn;
use std::env;
use std::path::PathBuf;

/// Model used when neither `OPENAI_MODEL` nor `MODEL` is set
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Tuning knobs for the turn loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebateSettings {
    /// History window shown to the speaker selector
    pub selector_window: usize,
    /// History window shown to the turn generator
    pub turn_window: usize,
    /// History window used when suggesting a new direction
    pub direction_window: usize,
    /// Moderator summarises every N turns (0 disables)
    pub intervention_interval: usize,
}

impl Default for DebateSettings {
    fn default() -> Self {
        Self {
            selector_window: 10,
            turn_window: 3,
            direction_window: 10,
            intervention_interval: 5,
        }
    }
}

impl DebateSettings {
    /// Read overrides from `DEBATE_*` variables, keeping defaults for the rest
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            selector_window: read_usize("DEBATE_SELECTOR_WINDOW", defaults.selector_window),
            turn_window: read_usize("DEBATE_TURN_WINDOW", defaults.turn_window),
            direction_window: read_usize("DEBATE_DIRECTION_WINDOW", defaults.direction_window),
            intervention_interval: read_usize(
                "DEBATE_INTERVENTION_INTERVAL",
                defaults.intervention_interval,
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_model: String,
    /// Attempts per oracle call, including the first
    pub openai_max_attempts: usize,
    pub log_level: String,
    pub transcript_dir: PathBuf,
    pub debate: DebateSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY must be set (environment or .env file)"))?;
        if openai_api_key.trim().is_empty() {
            return Err(anyhow!("OPENAI_API_KEY is empty"));
        }

        let openai_model = env::var("OPENAI_MODEL")
            .or_else(|_| env::var("MODEL"))
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Config {
            openai_api_key,
            openai_model,
            openai_max_attempts: read_usize("OPENAI_MAX_ATTEMPTS", 1).max(1),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            transcript_dir: env::var("SYMPOSIUM_TRANSCRIPT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            debate: DebateSettings::from_env(),
        })
    }
}

fn read_usize(key: &str, default: usize) -> usize {
    match env::var(key) {
        Ok(raw) => parse_usize_or(key, &raw, default),
        Err(_) => default,
    }
}

fn parse_usize_or(key: &str, raw: &str, default: usize) -> usize {
    match raw.trim().parse::<usize>() {
        Ok(value) => value,
        Err(_) => {
            warn!("Ignoring invalid value for {key}: '{raw}' (using {default})");
            default
        }
    }
}
