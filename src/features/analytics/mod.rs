//! # Analytics Feature
//!
//! Session-level OpenAI usage tracking.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod usage_tracker;

pub use usage_tracker::{pricing, ModelUsage, UsageSummary, UsageTracker};
