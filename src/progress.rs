//! Progress-callback trait for workflow stage events.
//!
//! Inject an [`Arc<dyn WorkflowProgressCallback>`] via
//! [`crate::config::ToolConfigBuilder::progress_callback`] to be told when
//! each stage starts, finishes or fails. The library never prints anything
//! itself; the shell decides how to surface these events (spinner, status
//! line, web socket…).
//!
//! # Example
//!
//! ```rust
//! use herbcopy::{Stage, ToolConfig, WorkflowProgressCallback};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl WorkflowProgressCallback for Printer {
//!     fn on_stage_error(&self, stage: Stage, error: &str) {
//!         eprintln!("{stage} failed: {error}");
//!     }
//! }
//!
//! let config = ToolConfig::builder()
//!     .progress_callback(Arc::new(Printer) as Arc<dyn WorkflowProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::fmt;
use std::sync::Arc;

/// One step of the research-to-concepts workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    ValidateCredential,
    Extract,
    Normalize,
    Generate,
    RecordFeedback,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::ValidateCredential => "credential check",
            Stage::Extract => "text extraction",
            Stage::Normalize => "preprocessing",
            Stage::Generate => "concept generation",
            Stage::RecordFeedback => "feedback",
        };
        f.write_str(label)
    }
}

/// Called by the workflow functions as they move through each stage.
///
/// Implementations must be `Send + Sync`: extraction runs on a blocking
/// thread and the config may be shared across tasks. All methods default to
/// no-ops so callers only override what they care about.
pub trait WorkflowProgressCallback: Send + Sync {
    /// Called just before a stage begins.
    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called when a stage finished without error.
    fn on_stage_complete(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called when a stage failed. `error` is the human-readable message.
    fn on_stage_error(&self, stage: Stage, error: &str) {
        let _ = (stage, error);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl WorkflowProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ToolConfig`].
pub type ProgressCallback = Arc<dyn WorkflowProgressCallback>;
