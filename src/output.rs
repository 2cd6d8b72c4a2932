//! Result types produced by the workflow stages.
//!
//! Stages that talk to the outside world never return `Err` for a
//! recoverable failure: they return one of these values with the error stored
//! inside, so the shell always has something valid to display.

use crate::error::{GenerationError, ParseError};
use crate::prompts::FAILURE_PLACEHOLDER;
use serde::{Deserialize, Serialize};

/// Text pulled out of a PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// One `--- Page N ---` marker plus page text per extracted page.
    pub text: String,
    /// Pages the document declares (0 when it could not be opened).
    pub page_count: usize,
    /// Pages whose text made it into `text`.
    pub pages_extracted: usize,
    /// Why extraction stopped early, if it did.
    pub error: Option<ParseError>,
}

impl Extraction {
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && self.pages_extracted == self.page_count
    }

    /// True when at least one non-whitespace character was extracted
    /// outside the page markers.
    pub fn has_content(&self) -> bool {
        self.text
            .lines()
            .filter(|line| !crate::pipeline::extract::is_page_marker(line))
            .any(|line| !line.trim().is_empty())
    }
}

/// Extraction plus its normalised form, ready for generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedDocument {
    pub extraction: Extraction,
    /// Whitespace-collapsed copy of `extraction.text`.
    pub normalized: String,
}

/// Outcome of one concept-generation call.
///
/// `concepts` is always displayable: on failure it holds
/// [`FAILURE_PLACEHOLDER`] and `error` says what went wrong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub concepts: String,
    pub model: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub duration_ms: u64,
    pub error: Option<GenerationError>,
}

impl Generation {
    /// Placeholder result carrying `error`.
    pub fn failed(model: impl Into<String>, error: GenerationError, duration_ms: u64) -> Self {
        Self {
            concepts: FAILURE_PLACEHOLDER.to_string(),
            model: model.into(),
            prompt_tokens: 0,
            completion_tokens: 0,
            duration_ms,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_generation_uses_placeholder() {
        let g = Generation::failed("gpt-3.5-turbo", GenerationError::EmptyResponse, 12);
        assert_eq!(g.concepts, "Failed to generate concepts.");
        assert!(!g.is_success());
    }

    #[test]
    fn markers_alone_are_not_content() {
        let e = Extraction {
            text: "\n\n--- Page 1 ---\n\n\n\n--- Page 2 ---\n\n".into(),
            page_count: 2,
            pages_extracted: 2,
            error: None,
        };
        assert!(!e.has_content());
        assert!(e.is_complete());
    }

    #[test]
    fn generation_serialises_without_credential() {
        let g = Generation {
            concepts: "Concept 1".into(),
            model: "gpt-3.5-turbo".into(),
            prompt_tokens: 10,
            completion_tokens: 3,
            duration_ms: 5,
            error: None,
        };
        let json = serde_json::to_string(&g).unwrap();
        assert!(json.contains("\"concepts\":\"Concept 1\""));
    }
}
