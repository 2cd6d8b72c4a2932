//! # herbcopy
//!
//! Turn a herbal-medicine research PDF into three marketing concepts with a
//! chat LLM, and keep a local log of how useful the user found them.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Extract    page-marked plain text (lopdf, blocking pool)
//!  ├─ 2. Normalize  collapse whitespace runs
//!  ├─ 3. Generate   one chat-completion call (persona + prompt, T=0.7, 300 tokens)
//!  └─ 4. Feedback   append "Rating | Comments | Concepts" to feedback.txt
//! ```
//!
//! Each step is a stateless function. Failures at the three I/O boundaries
//! come back as typed values ([`ParseError`], [`GenerationError`],
//! [`WriteError`]) and nothing panics, so a shell can always show a message
//! and let the user try again.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use herbcopy::{generate_concepts, prepare_document, submit_feedback, Credential, Rating, ToolConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ToolConfig::default();
//!     let key = Credential::new("sk-...");
//!
//!     let doc = prepare_document(std::fs::read("study.pdf")?, &config).await;
//!     let generation = generate_concepts(&doc.normalized, &key, &config).await;
//!     println!("{}", generation.concepts);
//!
//!     submit_feedback(Rating::Good, "clear and on-brand", &generation.concepts, &config)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `herbcopy` binary (clap + anyhow + tracing-subscriber + indicatif + console) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod workflow;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{Credential, FeedbackFormat, ToolConfig, ToolConfigBuilder};
pub use error::{GenerationError, HerbcopyError, ParseError, WriteError};
pub use llm::{CompletionService, OpenAiClient};
pub use output::{Extraction, Generation, PreparedDocument};
pub use pipeline::extract::extract_text;
pub use pipeline::feedback::{record_feedback, FeedbackRecord, Rating};
pub use pipeline::input::{read_upload, Upload};
pub use pipeline::normalize::normalize_whitespace;
pub use progress::{NoopProgressCallback, ProgressCallback, Stage, WorkflowProgressCallback};
pub use workflow::{
    generate_concepts, generate_concepts_sync, generate_with_service, prepare_document,
    submit_feedback, try_generate_concepts, validate_credential, validate_with_service,
};
