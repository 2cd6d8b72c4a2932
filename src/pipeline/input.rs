//! Upload handling: read a user-chosen PDF file into memory.
//!
//! The extractor works on bytes, so this is the only place that touches the
//! file system on the input side. Only existence, permission and the `.pdf`
//! extension are checked here; whether the bytes really are a PDF is the
//! extractor's call, so that failure surfaces as a [`crate::error::ParseError`].

use crate::error::HerbcopyError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Raw document bytes plus the name they were uploaded under.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// True when the bytes start with the `%PDF` magic.
    pub fn looks_like_pdf(&self) -> bool {
        self.bytes.starts_with(b"%PDF")
    }
}

/// Check whether `path` carries a `.pdf` extension (any case).
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Read the PDF at `path` into an [`Upload`].
pub fn read_upload(path: impl AsRef<Path>) -> Result<Upload, HerbcopyError> {
    let path = path.as_ref();
    let owned: PathBuf = path.to_path_buf();

    if !path.exists() {
        return Err(HerbcopyError::FileNotFound { path: owned });
    }
    if !has_pdf_extension(path) {
        return Err(HerbcopyError::NotAPdfFile { path: owned });
    }

    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => HerbcopyError::PermissionDenied {
            path: owned.clone(),
        },
        std::io::ErrorKind::NotFound => HerbcopyError::FileNotFound {
            path: owned.clone(),
        },
        _ => HerbcopyError::ReadFailed {
            path: owned.clone(),
            source: e,
        },
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.pdf".to_string());

    let upload = Upload { name, bytes };
    if !upload.looks_like_pdf() {
        warn!("{} does not start with %PDF", path.display());
    }
    debug!("Read upload {} ({} bytes)", upload.name, upload.bytes.len());
    Ok(upload)
}
