//! Prompts for marketing-concept generation.
//!
//! Everything the model is told lives here so prompt changes touch exactly
//! one file and unit tests can inspect the prompts without a network call.
//! Callers can override the persona via
//! [`crate::config::ToolConfig::system_prompt`]; the task template is fixed.

/// System message: who the model should act as.
pub const SYSTEM_PERSONA: &str =
    "You are an expert marketer with deep domain knowledge in Ayurveda.";

/// Shown in place of concepts when generation fails.
pub const FAILURE_PLACEHOLDER: &str = "Failed to generate concepts.";

/// Opening instruction of the user message.
pub const TASK_INSTRUCTION: &str = "You are an expert marketer in Ayurvedic herbs. \
Given the following research summary, generate three innovative and engaging marketing concepts \
that highlight the benefits, unique qualities, and potential market positioning of these herbs.";

/// Build the user message around the normalised research text.
///
/// The text is embedded verbatim; no truncation happens on this side.
pub fn concept_prompt(research_summary: &str) -> String {
    format!(
        "{TASK_INSTRUCTION}\n\nResearch Summary:\n{research_summary}\n\nMarketing Concepts:"
    )
}
