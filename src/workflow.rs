//! Workflow entry points: the operations a shell calls in response to user
//! actions.
//!
//! Every function here is stateless. The shell passes in what it holds (the
//! uploaded bytes, the credential, the config) and gets back values it can
//! display. Nothing is cached between calls, so re-running any step is always
//! safe.
//!
//! | Action | Function | Failure surface |
//! |--------|----------|-----------------|
//! | "Test API key" | [`validate_credential`] | `Err(GenerationError)` |
//! | Upload | [`prepare_document`] | [`Extraction::error`] |
//! | "Generate" | [`generate_concepts`] | [`Generation::error`] + placeholder |
//! | "Submit feedback" | [`submit_feedback`] | `Err(WriteError)` |

use crate::config::{Credential, ToolConfig};
use crate::error::{GenerationError, ParseError, WriteError};
use crate::llm::{CompletionService, OpenAiClient};
use crate::output::{Extraction, Generation, PreparedDocument};
use crate::pipeline::feedback::{append_record, FeedbackRecord, Rating};
use crate::pipeline::{extract, generate, normalize};
use crate::progress::Stage;
use std::time::Instant;
use tracing::{info, warn};

/// Probe the completion service with a model listing.
///
/// `Ok` carries the visible model ids; the shell should refuse to generate
/// on `Err`.
pub async fn validate_credential(
    credential: &Credential,
    config: &ToolConfig,
) -> Result<Vec<String>, GenerationError> {
    start(config, Stage::ValidateCredential);
    let result = match client_for(credential, config) {
        Ok(client) => client.list_models().await,
        Err(e) => Err(e),
    };
    finish(config, Stage::ValidateCredential, result.as_ref().err());
    result
}

/// Same as [`validate_credential`] against a caller-supplied service.
pub async fn validate_with_service(
    service: &dyn CompletionService,
    config: &ToolConfig,
) -> Result<Vec<String>, GenerationError> {
    start(config, Stage::ValidateCredential);
    let result = service.list_models().await;
    finish(config, Stage::ValidateCredential, result.as_ref().err());
    result
}

/// Extract and normalise an uploaded PDF.
///
/// Parsing runs on the blocking pool; a parser panic is reported as
/// [`ParseError::Internal`] instead of unwinding into the caller.
pub async fn prepare_document(pdf_bytes: Vec<u8>, config: &ToolConfig) -> PreparedDocument {
    start(config, Stage::Extract);
    let extraction = tokio::task::spawn_blocking(move || extract::extract_text(&pdf_bytes))
        .await
        .unwrap_or_else(|e| Extraction {
            error: Some(ParseError::Internal(format!("extraction task failed: {e}"))),
            ..Extraction::default()
        });
    let parse_error = extraction.error.as_ref().map(|e| e.to_string());
    finish(config, Stage::Extract, parse_error.as_ref());
    info!(
        "Extracted {}/{} pages, {} chars",
        extraction.pages_extracted,
        extraction.page_count,
        extraction.text.len()
    );

    start(config, Stage::Normalize);
    let normalized = normalize::normalize_whitespace(&extraction.text);
    finish::<String>(config, Stage::Normalize, None);

    PreparedDocument {
        extraction,
        normalized,
    }
}

/// Generate marketing concepts for `research_summary`; never fails.
///
/// On failure the returned [`Generation`] holds the fixed placeholder and the
/// typed error.
pub async fn generate_concepts(
    research_summary: &str,
    credential: &Credential,
    config: &ToolConfig,
) -> Generation {
    let started = Instant::now();
    match try_generate_concepts(research_summary, credential, config).await {
        Ok(generation) => generation,
        Err(e) => Generation::failed(
            config.model.clone(),
            e,
            started.elapsed().as_millis() as u64,
        ),
    }
}

/// Generate marketing concepts, returning the typed error on failure.
pub async fn try_generate_concepts(
    research_summary: &str,
    credential: &Credential,
    config: &ToolConfig,
) -> Result<Generation, GenerationError> {
    start(config, Stage::Generate);
    let result = match client_for(credential, config) {
        Ok(client) => {
            generate::try_generate_with_service(&client, research_summary, config).await
        }
        Err(e) => Err(e),
    };
    if let Err(ref e) = result {
        warn!("{}", e);
    }
    finish(config, Stage::Generate, result.as_ref().err());
    result
}

/// Same as [`generate_concepts`] against a caller-supplied service.
pub async fn generate_with_service(
    service: &dyn CompletionService,
    research_summary: &str,
    config: &ToolConfig,
) -> Generation {
    start(config, Stage::Generate);
    let generation = generate::generate_with_service(service, research_summary, config).await;
    finish(config, Stage::Generate, generation.error.as_ref());
    generation
}

/// Blocking wrapper around [`generate_concepts`].
///
/// Creates a temporary tokio runtime internally; do not call from inside an
/// async context.
pub fn generate_concepts_sync(
    research_summary: &str,
    credential: &Credential,
    config: &ToolConfig,
) -> Generation {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(generate_concepts(research_summary, credential, config)),
        Err(e) => Generation::failed(
            config.model.clone(),
            GenerationError::Client(format!("Failed to create tokio runtime: {e}")),
            0,
        ),
    }
}

/// Record the user's rating of `concepts` in the configured feedback log.
pub fn submit_feedback(
    rating: Rating,
    comments: &str,
    concepts: &str,
    config: &ToolConfig,
) -> Result<FeedbackRecord, WriteError> {
    start(config, Stage::RecordFeedback);
    let record = FeedbackRecord::new(rating, comments, concepts);
    let result = append_record(&config.feedback_path, &record, config.feedback_format);
    if let Err(ref e) = result {
        warn!("{}", e);
    }
    finish(config, Stage::RecordFeedback, result.as_ref().err());
    result.map(|_| record)
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn client_for(credential: &Credential, config: &ToolConfig) -> Result<OpenAiClient, GenerationError> {
    if credential.is_blank() {
        return Err(GenerationError::MissingCredential);
    }
    OpenAiClient::new(config, credential.clone())
}

fn start(config: &ToolConfig, stage: Stage) {
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_start(stage);
    }
}

fn finish<E: std::fmt::Display>(config: &ToolConfig, stage: Stage, error: Option<&E>) {
    if let Some(ref cb) = config.progress_callback {
        match error {
            None => cb.on_stage_complete(stage),
            Some(e) => cb.on_stage_error(stage, &e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatMessage, Completion};
    use crate::progress::WorkflowProgressCallback;
    use crate::prompts::FAILURE_PLACEHOLDER;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Default)]
    struct StageLog(Mutex<Vec<(Stage, bool)>>);

    impl WorkflowProgressCallback for StageLog {
        fn on_stage_complete(&self, stage: Stage) {
            self.0.lock().unwrap().push((stage, true));
        }

        fn on_stage_error(&self, stage: Stage, _error: &str) {
            self.0.lock().unwrap().push((stage, false));
        }
    }

    /// Answers every request with a fixed completion, optionally after a delay.
    struct FixedService {
        delay: Duration,
        reply: Result<Completion, GenerationError>,
    }

    impl FixedService {
        fn ok(content: &str) -> Self {
            Self {
                delay: Duration::ZERO,
                reply: Ok(Completion {
                    content: content.to_string(),
                    prompt_tokens: 9,
                    completion_tokens: 4,
                }),
            }
        }
    }

    #[async_trait]
    impl CompletionService for FixedService {
        async fn list_models(&self) -> Result<Vec<String>, GenerationError> {
            Ok(vec!["fixed-1".into(), "fixed-2".into()])
        }

        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _temperature: f32,
            _max_tokens: u32,
        ) -> Result<Completion, GenerationError> {
            tokio::time::sleep(self.delay).await;
            self.reply.clone()
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn service_entry_points_report_success_stages() {
        let log = Arc::new(StageLog::default());
        let config = ToolConfig::builder()
            .progress_callback(log.clone())
            .build()
            .unwrap();
        let service = FixedService::ok("  Concept 1\nConcept 2\nConcept 3 ");

        let models = validate_with_service(&service, &config).await.unwrap();
        assert_eq!(models, vec!["fixed-1", "fixed-2"]);

        let g = generate_with_service(&service, "Tulsi supports immunity.", &config).await;
        assert!(g.is_success());
        assert_eq!(g.concepts, "Concept 1\nConcept 2\nConcept 3");
        assert_eq!(g.model, "fixed");
        assert_eq!(g.prompt_tokens, 9);

        assert_eq!(
            *log.0.lock().unwrap(),
            vec![(Stage::ValidateCredential, true), (Stage::Generate, true)]
        );
    }

    #[tokio::test]
    async fn service_failure_is_reported_as_stage_error() {
        let log = Arc::new(StageLog::default());
        let config = ToolConfig::builder()
            .progress_callback(log.clone())
            .build()
            .unwrap();
        let service = FixedService {
            delay: Duration::from_millis(30),
            reply: Err(GenerationError::Timeout { secs: 60 }),
        };

        let g = generate_with_service(&service, "Tulsi supports immunity.", &config).await;
        assert_eq!(g.concepts, FAILURE_PLACEHOLDER);
        assert_eq!(g.error, Some(GenerationError::Timeout { secs: 60 }));
        assert!(g.duration_ms >= 30, "duration_ms = {}", g.duration_ms);
        assert_eq!(*log.0.lock().unwrap(), vec![(Stage::Generate, false)]);
    }

    #[tokio::test]
    async fn failed_generation_records_elapsed_time() {
        // Accepts connections and never answers, so the client times out.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let config = ToolConfig::builder()
            .base_url(format!("http://{addr}"))
            .request_timeout_secs(1)
            .build()
            .unwrap();
        let g = generate_concepts("Tulsi supports immunity.", &Credential::new("sk"), &config).await;
        assert_eq!(g.error, Some(GenerationError::Timeout { secs: 1 }));
        assert!(g.duration_ms >= 900, "duration_ms = {}", g.duration_ms);
    }

    #[tokio::test]
    async fn document_and_feedback_stages_complete() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(StageLog::default());
        let config = ToolConfig::builder()
            .feedback_path(dir.path().join("feedback.txt"))
            .progress_callback(log.clone())
            .build()
            .unwrap();

        let _ = prepare_document(b"garbage".to_vec(), &config).await;
        submit_feedback(Rating::Good, "fine", "C1", &config).unwrap();

        assert_eq!(
            *log.0.lock().unwrap(),
            vec![
                (Stage::Extract, false),
                (Stage::Normalize, true),
                (Stage::RecordFeedback, true),
            ]
        );
    }

    #[tokio::test]
    async fn blank_credential_never_reaches_the_network() {
        let log = Arc::new(StageLog::default());
        let config = ToolConfig::builder()
            .base_url("http://127.0.0.1:9")
            .progress_callback(log.clone())
            .build()
            .unwrap();

        let g = generate_concepts("Tulsi supports immunity.", &Credential::new(""), &config).await;
        assert_eq!(g.concepts, FAILURE_PLACEHOLDER);
        assert_eq!(g.error, Some(GenerationError::MissingCredential));

        let probe = validate_credential(&Credential::new("  "), &config).await;
        assert_eq!(probe.unwrap_err(), GenerationError::MissingCredential);

        let events = log.0.lock().unwrap();
        assert_eq!(
            *events,
            vec![(Stage::Generate, false), (Stage::ValidateCredential, false)]
        );
    }

    #[tokio::test]
    async fn prepare_reports_parse_error_and_still_normalises() {
        let prepared = prepare_document(b"garbage".to_vec(), &ToolConfig::default()).await;
        assert!(prepared.extraction.error.is_some());
        assert_eq!(prepared.normalized, "");
    }

    #[test]
    fn feedback_goes_to_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ratings.txt");
        let config = ToolConfig::builder().feedback_path(&path).build().unwrap();

        let record = submit_feedback(Rating::Excellent, "love it", "C1 C2 C3", &config).unwrap();
        assert_eq!(record.rating, Rating::Excellent);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Rating: Excellent | Comments: love it | Concepts: C1 C2 C3\n"
        );
    }

    #[test]
    fn sync_wrapper_is_fail_soft() {
        let config = ToolConfig::default();
        let g = generate_concepts_sync("text", &Credential::new(""), &config);
        assert_eq!(g.concepts, FAILURE_PLACEHOLDER);
    }
}
