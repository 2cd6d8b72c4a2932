//! Configuration types for the research-to-concepts workflow.
//!
//! Every knob lives in [`ToolConfig`], built via [`ToolConfigBuilder`]. The
//! credential is deliberately *not* part of the config: it is a separate
//! [`Credential`] value handed to each call that needs it, so nothing in the
//! process holds it as ambient state.

use crate::error::HerbcopyError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default OpenAI-compatible API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default feedback log, relative to the working directory.
pub const DEFAULT_FEEDBACK_FILE: &str = "feedback.txt";

/// Secret used as the bearer token for the completion service.
///
/// `Debug` never prints the secret, and the type is not `Serialize`, so it
/// cannot leak into logs or JSON output by accident.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw secret. Only the HTTP layer should call this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// True for an empty or whitespace-only secret.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Configuration for extraction, generation and feedback recording.
///
/// Built via [`ToolConfig::builder()`] or using [`ToolConfig::default()`].
///
/// # Example
/// ```rust
/// use herbcopy::ToolConfig;
///
/// let config = ToolConfig::builder()
///     .model("gpt-4o-mini")
///     .request_timeout_secs(30)
///     .feedback_path("ratings.txt")
///     .build()
///     .unwrap();
/// assert_eq!(config.max_tokens, 300);
/// ```
#[derive(Clone)]
pub struct ToolConfig {
    /// Chat model identifier. Default: `gpt-3.5-turbo`.
    pub model: String,

    /// API root; `/chat/completions` and `/models` are appended. Default: OpenAI.
    pub base_url: String,

    /// Sampling temperature. Default: 0.7.
    pub temperature: f32,

    /// Ceiling on generated tokens. Default: 300.
    pub max_tokens: u32,

    /// Persona sent as the system message. If None, uses [`crate::prompts::SYSTEM_PERSONA`].
    pub system_prompt: Option<String>,

    /// HTTP client timeout in seconds. Default: 60.
    pub request_timeout_secs: u64,

    /// Where feedback records are appended. Default: `feedback.txt`.
    pub feedback_path: PathBuf,

    /// Line format for feedback records. Default: [`FeedbackFormat::Delimited`].
    pub feedback_format: FeedbackFormat,

    /// Optional stage-level progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.7,
            max_tokens: 300,
            system_prompt: None,
            request_timeout_secs: 60,
            feedback_path: PathBuf::from(DEFAULT_FEEDBACK_FILE),
            feedback_format: FeedbackFormat::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ToolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("system_prompt", &self.system_prompt.as_ref().map(|p| p.len()))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("feedback_path", &self.feedback_path)
            .field("feedback_format", &self.feedback_format)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn WorkflowProgressCallback>"),
            )
            .finish()
    }
}

impl ToolConfig {
    /// Create a new builder for `ToolConfig`.
    pub fn builder() -> ToolConfigBuilder {
        ToolConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ToolConfig`].
#[derive(Debug)]
pub struct ToolConfigBuilder {
    config: ToolConfig,
}

impl ToolConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = n.max(1);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn feedback_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.feedback_path = path.into();
        self
    }

    pub fn feedback_format(mut self, format: FeedbackFormat) -> Self {
        self.config.feedback_format = format;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ToolConfig, HerbcopyError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(HerbcopyError::InvalidConfig(
                "Model identifier must not be empty".into(),
            ));
        }
        if !(c.base_url.starts_with("http://") || c.base_url.starts_with("https://")) {
            return Err(HerbcopyError::InvalidConfig(format!(
                "Base URL must start with http:// or https://, got '{}'",
                c.base_url
            )));
        }
        if c.request_timeout_secs == 0 {
            return Err(HerbcopyError::InvalidConfig(
                "Request timeout must be ≥ 1 second".into(),
            ));
        }
        if c.feedback_path.as_os_str().is_empty() {
            return Err(HerbcopyError::InvalidConfig(
                "Feedback path must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How feedback records are laid out in the log.
///
/// | Format | Line |
/// |--------|------|
/// | `Delimited` | `Rating: Good \| Comments: … \| Concepts: …` (default, unescaped) |
/// | `JsonLines` | `{"rating":"Good","comments":"…","concepts":"…"}` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeedbackFormat {
    /// Legacy pipe-delimited line. Embedded `|` or newlines are not escaped.
    #[default]
    Delimited,
    /// One JSON object per line; safe for any field content.
    JsonLines,
}
