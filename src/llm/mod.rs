//! Completion-service access.
//!
//! [`CompletionService`] is the seam between the workflow and whatever answers
//! chat requests. [`OpenAiClient`] is the production implementation: it
//! speaks the OpenAI wire format over `reqwest`, so any compatible endpoint
//! (OpenAI, Azure proxies, vLLM, Ollama's `/v1`, a test mock) works by
//! changing the base URL.

pub mod client;
pub mod types;

pub use client::OpenAiClient;
pub use types::{ChatMessage, Completion};

use crate::error::GenerationError;
use async_trait::async_trait;

/// Something that can list models and answer a chat request.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// List model identifiers visible to the credential.
    ///
    /// Used as a cheap probe: success means the credential is accepted.
    async fn list_models(&self) -> Result<Vec<String>, GenerationError>;

    /// Send one chat request. Exactly one attempt; no retries.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Completion, GenerationError>;

    /// Model the requests are sent to.
    fn model_name(&self) -> &str;
}
