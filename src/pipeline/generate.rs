//! Concept generation: one chat request per call.
//!
//! All prompt text lives in [`crate::prompts`]; this module only assembles
//! the two-message exchange, sends it once and shapes the answer. There is
//! no retry or backoff: a failed call is reported and the user can simply
//! trigger it again.

use crate::config::ToolConfig;
use crate::error::GenerationError;
use crate::llm::{ChatMessage, CompletionService};
use crate::output::Generation;
use crate::prompts::{concept_prompt, SYSTEM_PERSONA};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Build the system + user messages for `research_summary`.
pub fn build_messages(research_summary: &str, config: &ToolConfig) -> Vec<ChatMessage> {
    let persona = config.system_prompt.as_deref().unwrap_or(SYSTEM_PERSONA);
    vec![
        ChatMessage::system(persona),
        ChatMessage::user(concept_prompt(research_summary)),
    ]
}

/// Ask `service` for three marketing concepts, propagating failures.
///
/// On success the first choice's text is returned trimmed.
pub async fn try_generate_with_service(
    service: &dyn CompletionService,
    research_summary: &str,
    config: &ToolConfig,
) -> Result<Generation, GenerationError> {
    if research_summary.trim().is_empty() {
        return Err(GenerationError::EmptyInput);
    }

    let start = Instant::now();
    let messages = build_messages(research_summary, config);
    debug!(
        "Generating with model {}, summary length: {}",
        service.model_name(),
        research_summary.len()
    );

    let completion = service
        .complete(&messages, config.temperature, config.max_tokens)
        .await?;
    let duration_ms = start.elapsed().as_millis() as u64;

    info!(
        "Concepts generated: {} prompt tokens, {} completion tokens, {}ms",
        completion.prompt_tokens, completion.completion_tokens, duration_ms
    );

    Ok(Generation {
        concepts: completion.content.trim().to_string(),
        model: service.model_name().to_string(),
        prompt_tokens: completion.prompt_tokens,
        completion_tokens: completion.completion_tokens,
        duration_ms,
        error: None,
    })
}

/// Ask `service` for concepts; never fails.
///
/// Any error is logged and stored in [`Generation::error`], with the fixed
/// placeholder in [`Generation::concepts`].
pub async fn generate_with_service(
    service: &dyn CompletionService,
    research_summary: &str,
    config: &ToolConfig,
) -> Generation {
    let start = Instant::now();
    match try_generate_with_service(service, research_summary, config).await {
        Ok(generation) => generation,
        Err(e) => {
            warn!("{}", e);
            Generation::failed(
                service.model_name(),
                e,
                start.elapsed().as_millis() as u64,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Completion;
    use crate::prompts::FAILURE_PLACEHOLDER;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Service that records what it was sent and replies from a script.
    struct ScriptedService {
        reply: Result<Completion, GenerationError>,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedService {
        fn replying(reply: Result<Completion, GenerationError>) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionService for ScriptedService {
        async fn list_models(&self) -> Result<Vec<String>, GenerationError> {
            Ok(vec!["scripted".into()])
        }

        async fn complete(
            &self,
            messages: &[ChatMessage],
            _temperature: f32,
            _max_tokens: u32,
        ) -> Result<Completion, GenerationError> {
            self.seen.lock().unwrap().push(messages.to_vec());
            self.reply.clone()
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn ok(content: &str) -> Result<Completion, GenerationError> {
        Ok(Completion {
            content: content.to_string(),
            prompt_tokens: 42,
            completion_tokens: 7,
        })
    }

    #[test]
    fn messages_use_default_persona() {
        let msgs = build_messages("text", &ToolConfig::default());
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, "system");
        assert_eq!(msgs[0].content.as_deref(), Some(SYSTEM_PERSONA));
        assert!(msgs[1].content.as_deref().unwrap().contains("text"));
    }

    #[test]
    fn messages_honour_persona_override() {
        let config = ToolConfig::builder()
            .system_prompt("You are an expert marketer with deep domain knowledge in Kampo.")
            .build()
            .unwrap();
        let msgs = build_messages("text", &config);
        assert!(msgs[0].content.as_deref().unwrap().contains("Kampo"));
    }

    #[tokio::test]
    async fn success_is_trimmed() {
        let svc = ScriptedService::replying(ok("\n  Concept 1...Concept 2...Concept 3...  \n"));
        let g = generate_with_service(&svc, "Tulsi supports immunity.", &ToolConfig::default()).await;
        assert!(g.is_success());
        assert_eq!(g.concepts, "Concept 1...Concept 2...Concept 3...");
        assert_eq!(g.prompt_tokens, 42);
        assert_eq!(g.model, "scripted");
    }

    #[tokio::test]
    async fn failure_becomes_placeholder() {
        let svc = ScriptedService::replying(Err(GenerationError::Authentication {
            status: 401,
            message: "bad key".into(),
        }));
        let g = generate_with_service(&svc, "Tulsi supports immunity.", &ToolConfig::default()).await;
        assert_eq!(g.concepts, FAILURE_PLACEHOLDER);
        assert!(g.error.as_ref().unwrap().is_auth_error());
    }

    #[tokio::test]
    async fn empty_input_skips_the_call() {
        let svc = ScriptedService::replying(ok("unused"));
        let err = try_generate_with_service(&svc, "   ", &ToolConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err, GenerationError::EmptyInput);
        assert!(svc.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn exactly_one_attempt_with_verbatim_text() {
        let text = "Ashwagandha reduces stress. Turmeric has anti-inflammatory properties.";
        let svc = ScriptedService::replying(Err(GenerationError::RateLimited {
            message: "slow down".into(),
        }));
        let _ = generate_with_service(&svc, text, &ToolConfig::default()).await;
        let seen = svc.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0][1].content.as_deref().unwrap().contains(text));
    }
}
