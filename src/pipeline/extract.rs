//! PDF text extraction: bytes in, page-marked plain text out.
//!
//! Uses `lopdf`, which parses the document entirely in memory, so no file
//! path or native library is needed. Text comes out in content-stream order
//! with no layout; that is all the downstream prompt needs.
//!
//! Failures never escape: an unreadable document, a page that fails to
//! decode, or a page whose font encoding lopdf cannot map to text ends
//! extraction, and the [`Extraction`] carries the text gathered
//! so far together with the [`ParseError`].

use crate::error::ParseError;
use crate::output::Extraction;
use lopdf::Document;
use tracing::{debug, info, warn};

/// Separator inserted before each page's text. `page` is 1-based.
pub fn page_marker(page: usize) -> String {
    format!("\n\n--- Page {page} ---\n\n")
}

/// True when `line` is the visible part of a [`page_marker`].
pub fn is_page_marker(line: &str) -> bool {
    line.strip_prefix("--- Page ")
        .and_then(|rest| rest.strip_suffix(" ---"))
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Stand-ins lopdf emits instead of text when it cannot decode a font's
/// encoding (Type0/CID fonts, mostly).
const UNDECODED_ENCODING_MARKERS: [&str; 4] = [
    "Identity-H Unimplemented",
    "Identity-V Unimplemented",
    "CIDFont Unimplemented",
    "ToUnicode Unimplemented",
];

/// The lopdf placeholder found in `page_text`, if any.
fn undecoded_encoding(page_text: &str) -> Option<&'static str> {
    UNDECODED_ENCODING_MARKERS
        .into_iter()
        .find(|marker| page_text.contains(marker))
}

/// Extract the text of every page of `pdf_bytes`, in page order.
///
/// Each page contributes [`page_marker`] followed by its text, so an empty
/// page still yields its marker. A zero-page document yields an empty string.
pub fn extract_text(pdf_bytes: &[u8]) -> Extraction {
    let document = match Document::load_mem(pdf_bytes) {
        Ok(doc) => doc,
        Err(e) => {
            warn!("PDF could not be opened: {}", e);
            return Extraction {
                error: Some(ParseError::InvalidDocument {
                    detail: e.to_string(),
                }),
                ..Extraction::default()
            };
        }
    };

    // BTreeMap keyed by 1-based page number, so iteration is ascending.
    let pages = document.get_pages();
    let page_count = pages.len();
    info!("PDF loaded: {} pages", page_count);

    let mut text = String::new();
    let mut pages_extracted = 0;
    let mut error = None;

    for &page_number in pages.keys() {
        match document.extract_text(&[page_number]) {
            Ok(page_text) => {
                if let Some(marker) = undecoded_encoding(&page_text) {
                    warn!("Page {}: font encoding not decodable ({})", page_number, marker);
                    error = Some(ParseError::Page {
                        page: page_number as usize,
                        detail: format!("unsupported font encoding ({marker})"),
                    });
                    break;
                }
                debug!("Page {}: {} chars", page_number, page_text.len());
                text.push_str(&page_marker(page_number as usize));
                text.push_str(&page_text);
                pages_extracted += 1;
            }
            Err(e) => {
                warn!("Page {}: text extraction failed: {}", page_number, e);
                error = Some(ParseError::Page {
                    page: page_number as usize,
                    detail: e.to_string(),
                });
                break;
            }
        }
    }

    drop(document);

    Extraction {
        text,
        page_count,
        pages_extracted,
        error,
    }
}
