//! Error types for the herbcopy library.
//!
//! Each external boundary fails with its own type so callers can tell the
//! failure paths apart and test them one by one:
//!
//! * [`ParseError`] — the PDF could not be read, or one of its pages failed.
//!   Stored inside [`crate::output::Extraction`]; the text gathered before the
//!   failure is still returned.
//!
//! * [`GenerationError`] — the completion service call failed (network,
//!   authentication, quota, malformed response). Stored inside
//!   [`crate::output::Generation`] next to the failure placeholder.
//!
//! * [`WriteError`] — the feedback log could not be opened or appended to.
//!
//! * [`HerbcopyError`] — everything the shell treats as fatal for the current
//!   action: unreadable input file, invalid configuration, and the three typed
//!   errors above when a caller chooses to propagate them with `?`.

use std::path::PathBuf;
use thiserror::Error;

/// Crate-level error for shell-side failures.
#[derive(Debug, Error)]
pub enum HerbcopyError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file does not carry a `.pdf` extension.
    #[error("'{path}' is not a PDF file (expected a .pdf extension)")]
    NotAPdfFile { path: PathBuf },

    /// The file exists but reading it failed part-way.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Boundary errors ───────────────────────────────────────────────────
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Write(#[from] WriteError),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// PDF text extraction failure.
#[derive(Debug, Clone, Error, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ParseError {
    /// The byte stream is not a readable PDF (bad header, xref, trailer…).
    #[error("Error extracting text: document is not a readable PDF: {detail}")]
    InvalidDocument { detail: String },

    /// A single page could not be decoded. `page` is 1-based.
    #[error("Error extracting text: page {page} could not be parsed: {detail}")]
    Page { page: usize, detail: String },

    /// The parser panicked or its worker thread was lost.
    #[error("Error extracting text: {0}")]
    Internal(String),
}

/// Completion-service failure.
#[derive(Debug, Clone, Error, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum GenerationError {
    /// Nothing to send: the normalised text is empty.
    #[error("Error generating concepts: the research text is empty")]
    EmptyInput,

    /// No credential was supplied; no request is attempted.
    #[error("Error generating concepts: no API key supplied")]
    MissingCredential,

    /// The request never produced an HTTP response (DNS, TLS, connection reset…).
    #[error("Error generating concepts: request failed: {reason}")]
    Request { reason: String },

    /// The service did not answer within the client timeout.
    #[error("Error generating concepts: request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// 401/403: the credential was rejected.
    #[error("Error generating concepts: authentication failed ({status}): {message}")]
    Authentication { status: u16, message: String },

    /// 429 with an `insufficient_quota` error body.
    #[error("Error generating concepts: quota exceeded: {message}")]
    QuotaExceeded { message: String },

    /// 429 for any other reason.
    #[error("Error generating concepts: rate limit exceeded: {message}")]
    RateLimited { message: String },

    /// 404: the configured model does not exist or is not available.
    #[error("Error generating concepts: model '{model}' not found: {message}")]
    ModelNotFound { model: String, message: String },

    /// Any other non-success status.
    #[error("Error generating concepts: service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Error generating concepts: malformed response: {detail}")]
    MalformedResponse { detail: String },

    /// The response decoded but carried no completion choice.
    #[error("Error generating concepts: response contained no choices")]
    EmptyResponse,

    /// The HTTP client could not be constructed.
    #[error("Error generating concepts: HTTP client setup failed: {0}")]
    Client(String),
}

impl GenerationError {
    /// True when the credential itself is the problem.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::MissingCredential)
    }
}

/// Feedback log write failure.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The log could not be created or opened for appending.
    #[error("Error saving feedback: cannot open '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The log opened but the write or flush failed.
    #[error("Error saving feedback: cannot write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
