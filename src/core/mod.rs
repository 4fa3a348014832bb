//! # Core Module
//!
//! Configuration, error taxonomy, and shared text/file helpers.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial creation with config, error, response and file_utils modules

pub mod config;
pub mod error;
pub mod file_utils;
pub mod response;

// Re-export commonly used items
pub use config::{Config, DebateSettings};
pub use error::DebateError;
pub use file_utils::{default_transcript_path, sanitize_filename, write_atomic};
pub use response::{preview, wrap_text, DISPLAY_WIDTH};
