//! Feedback recording: one appended line per submission.
//!
//! The log is opened in create+append mode for every record and closed when
//! the handle drops, whatever happens. Nothing here ever reads the log back.
//!
//! The default [`FeedbackFormat::Delimited`] line is
//! `Rating: <rating> | Comments: <text> | Concepts: <text>` with no escaping:
//! a `|` or line break inside a field makes the line ambiguous for
//! line-oriented readers. Such records are still written as-is (existing
//! readers depend on the exact layout) and a warning is logged.
//! [`FeedbackFormat::JsonLines`] avoids the problem entirely.

use crate::config::FeedbackFormat;
use crate::error::WriteError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// The four rating choices offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    Excellent,
    Good,
    Average,
    Poor,
}

impl Rating {
    /// All ratings in menu order.
    pub const ALL: [Rating; 4] = [Rating::Excellent, Rating::Good, Rating::Average, Rating::Poor];

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Average => "Average",
            Rating::Poor => "Poor",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = String;

    /// Accepts the label (any case) or its 1-based menu position.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|i| Rating::ALL.get(i).copied())
                .ok_or_else(|| format!("Rating number must be 1–4, got {n}"));
        }
        Rating::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown rating '{s}': expected Excellent, Good, Average or Poor"))
    }
}

/// One user judgement of a set of generated concepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub rating: Rating,
    pub comments: String,
    pub concepts: String,
}

impl FeedbackRecord {
    pub fn new(rating: Rating, comments: impl Into<String>, concepts: impl Into<String>) -> Self {
        Self {
            rating,
            comments: comments.into(),
            concepts: concepts.into(),
        }
    }

    /// Render the record as a single log line (without terminator).
    pub fn to_line(&self, format: FeedbackFormat) -> String {
        match format {
            FeedbackFormat::Delimited => format!(
                "Rating: {} | Comments: {} | Concepts: {}",
                self.rating, self.comments, self.concepts
            ),
            // A struct of strings and a unit enum cannot fail to serialise.
            FeedbackFormat::JsonLines => serde_json::to_string(self).unwrap_or_default(),
        }
    }

    /// True when a delimited rendering would be ambiguous to parse back.
    pub fn breaks_delimited_format(&self) -> bool {
        [&self.comments, &self.concepts]
            .iter()
            .any(|field| field.contains('|') || field.contains('\n') || field.contains('\r'))
    }
}

/// Append `line` followed by a newline to the log at `path`.
///
/// The file is created if missing. Prior content is never touched.
pub fn record_feedback(path: &Path, line: &str) -> Result<(), WriteError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| WriteError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');

    file.write_all(buf.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|source| WriteError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    debug!("Appended {} bytes to {}", buf.len(), path.display());
    Ok(())
}

/// Render `record` in `format` and append it to `path`.
pub fn append_record(
    path: &Path,
    record: &FeedbackRecord,
    format: FeedbackFormat,
) -> Result<(), WriteError> {
    if format == FeedbackFormat::Delimited && record.breaks_delimited_format() {
        warn!(
            "Feedback contains '|' or a line break; the delimited record in {} will not split cleanly",
            path.display()
        );
    }
    record_feedback(path, &record.to_line(format))
}
