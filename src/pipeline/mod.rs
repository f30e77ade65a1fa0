//! Pipeline stages for PDF text extraction.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap
//! implementations (e.g. switch the extraction backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ reader ──▶ normalize ──▶ assemble
//! (URL/path)  (pdfium)  (cleanup)    (delimiters)
//! ```
//!
//! 1. [`input`]     — canonicalise the user-supplied path or URL to a local
//!    file and validate the PDF magic bytes
//! 2. [`reader`]    — per-page plain-text extraction via pdfium; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 3. [`normalize`] — deterministic text-cleanup rules for engine quirks
//!    (CRLF endings, NULs, trailing whitespace)
//!
//! Assembly (delimiter rendering and concatenation) lives in
//! [`crate::extract`] next to the entry points that use it.

pub mod input;
pub mod normalize;
pub mod reader;
