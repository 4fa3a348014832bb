//! # Feature: OpenAI Usage Tracking
//!
//! Accumulates chat-completion token counts and an estimated cost for the
//! current session, broken down by model.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: In-memory per-model totals with estimated cost

use log::debug;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// OpenAI API pricing constants (as of January 2025)
pub mod pricing {
    // GPT-4o pricing (per 1K tokens)
    pub const GPT4O_INPUT_PER_1K: f64 = 0.0025; // $2.50/1M input
    pub const GPT4O_OUTPUT_PER_1K: f64 = 0.01; // $10/1M output

    // GPT-4o-mini pricing (per 1K tokens)
    pub const GPT4O_MINI_INPUT_PER_1K: f64 = 0.00015; // $0.15/1M input
    pub const GPT4O_MINI_OUTPUT_PER_1K: f64 = 0.0006; // $0.60/1M output

    // GPT-4 Turbo pricing (per 1K tokens)
    pub const GPT4_TURBO_INPUT_PER_1K: f64 = 0.01; // $10/1M input
    pub const GPT4_TURBO_OUTPUT_PER_1K: f64 = 0.03; // $30/1M output

    // GPT-4 pricing (per 1K tokens)
    pub const GPT4_INPUT_PER_1K: f64 = 0.03; // $30/1M input
    pub const GPT4_OUTPUT_PER_1K: f64 = 0.06; // $60/1M output

    // GPT-3.5 Turbo pricing (per 1K tokens)
    pub const GPT35_TURBO_INPUT_PER_1K: f64 = 0.0005; // $0.50/1M input
    pub const GPT35_TURBO_OUTPUT_PER_1K: f64 = 0.0015; // $1.50/1M output

    /// Calculate cost for ChatCompletion based on model
    pub fn calculate_chat_cost(model: &str, input_tokens: u32, output_tokens: u32) -> f64 {
        let model_lower = model.to_lowercase();

        let (input_rate, output_rate) = if model_lower.contains("gpt-4o-mini") {
            (GPT4O_MINI_INPUT_PER_1K, GPT4O_MINI_OUTPUT_PER_1K)
        } else if model_lower.contains("gpt-4o") {
            (GPT4O_INPUT_PER_1K, GPT4O_OUTPUT_PER_1K)
        } else if model_lower.contains("gpt-4-turbo") {
            (GPT4_TURBO_INPUT_PER_1K, GPT4_TURBO_OUTPUT_PER_1K)
        } else if model_lower.contains("gpt-4") {
            (GPT4_INPUT_PER_1K, GPT4_OUTPUT_PER_1K)
        } else {
            // Default to GPT-3.5 Turbo pricing
            (GPT35_TURBO_INPUT_PER_1K, GPT35_TURBO_OUTPUT_PER_1K)
        };

        (input_tokens as f64 / 1000.0 * input_rate) + (output_tokens as f64 / 1000.0 * output_rate)
    }
}

/// Running totals for one model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelUsage {
    pub requests: u32,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub estimated_cost: f64,
}

/// Snapshot of everything tracked so far
#[derive(Debug, Clone, Default)]
pub struct UsageSummary {
    pub by_model: BTreeMap<String, ModelUsage>,
}

impl UsageSummary {
    pub fn total_requests(&self) -> u32 {
        self.by_model.values().map(|u| u.requests).sum()
    }

    pub fn total_tokens(&self) -> u64 {
        self.by_model.values().map(|u| u.total_tokens).sum()
    }

    pub fn total_cost(&self) -> f64 {
        self.by_model.values().map(|u| u.estimated_cost).sum()
    }
}

impl fmt::Display for UsageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.by_model.is_empty() {
            return write!(f, "No OpenAI requests made");
        }
        for (model, usage) in &self.by_model {
            writeln!(
                f,
                "{model}: {} requests, {} tokens ({} in / {} out), ~${:.4}",
                usage.requests,
                usage.total_tokens,
                usage.input_tokens,
                usage.output_tokens,
                usage.estimated_cost
            )?;
        }
        write!(
            f,
            "Total: {} requests, {} tokens, ~${:.4}",
            self.total_requests(),
            self.total_tokens(),
            self.total_cost()
        )
    }
}

/// Shared, cloneable handle to the session's usage totals
#[derive(Clone, Default)]
pub struct UsageTracker {
    totals: Arc<Mutex<BTreeMap<String, ModelUsage>>>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one ChatCompletion response
    pub fn log_chat(&self, model: &str, input_tokens: u32, output_tokens: u32, total_tokens: u32) {
        let cost = pricing::calculate_chat_cost(model, input_tokens, output_tokens);
        // Totals stay valid after a poisoned lock
        let mut totals = self.totals.lock().unwrap_or_else(|e| e.into_inner());
        let entry = totals.entry(model.to_string()).or_default();
        entry.requests += 1;
        entry.input_tokens += u64::from(input_tokens);
        entry.output_tokens += u64::from(output_tokens);
        entry.total_tokens += u64::from(total_tokens);
        entry.estimated_cost += cost;

        debug!(
            "Logged chat usage: {} tokens (model: {}, cost: ${:.6})",
            total_tokens, model, cost
        );
    }

    pub fn summary(&self) -> UsageSummary {
        let totals = self.totals.lock().unwrap_or_else(|e| e.into_inner());
        UsageSummary {
            by_model: totals.clone(),
        }
    }
}
