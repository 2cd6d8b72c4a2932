//! Pipeline stages for turning a research PDF into rated marketing concepts.
//!
//! Each submodule implements exactly one step and can be called on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ normalize ──▶ generate ──▶ feedback
//! (file)    (lopdf)     (whitespace)  (chat LLM)   (append log)
//! ```
//!
//! 1. [`input`]     — read the chosen file into memory
//! 2. [`extract`]   — page-marked plain text from PDF bytes
//! 3. [`normalize`] — collapse whitespace runs
//! 4. [`generate`]  — one chat request; the only stage with network I/O
//! 5. [`feedback`]  — append a rating line to the local log

pub mod extract;
pub mod feedback;
pub mod generate;
pub mod input;
pub mod normalize;
