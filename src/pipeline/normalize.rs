//! Whitespace normalisation of extracted text.

/// Collapse every run of whitespace (spaces, tabs, newlines…) into a single
/// space and drop leading/trailing whitespace.
///
/// Tokens are kept in order and unchanged, so the result is never longer than
/// the input and normalising twice is the same as normalising once.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
