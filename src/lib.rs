//! # pdf2text
//!
//! Extract plain text from PDF documents, page by page.
//!
//! ## What this crate does (and doesn't)
//!
//! pdf2text is a thin, well-typed shell around pdfium's text extraction: it
//! resolves the input (local path or URL), asks pdfium for each page's plain
//! text, inserts a numbered delimiter line before every page, and writes the
//! concatenation to a UTF-8 file. PDF binary parsing, font decoding, and
//! reading-order inference are entirely pdfium's job — this crate makes no
//! fidelity promise about the extracted content, only about the structure
//! around it: page order, delimiter form, typed errors, and all-or-nothing
//! output.
//!
//! Out of scope: layout/structure preservation, OCR, and batch processing.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      resolve local file or download from URL
//!  ├─ 2. Read       per-page text via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 3. Normalize  line endings, NULs, trailing whitespace
//!  └─ 4. Assemble   "\n--- Page N ---\n" + text + "\n" per page
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2text::{extract, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     let output = extract("document.pdf", &config).await?;
//!     println!("{}", output.text);
//!     eprintln!("{} pages, {} chars",
//!         output.stats.extracted_pages,
//!         output.stats.total_chars);
//!     Ok(())
//! }
//! ```
//!
//! ## Output format
//!
//! For each page, in source order: a delimiter line `\n--- Page N ---\n`
//! (N is 1-based), the page's extracted text, and a trailing newline. A
//! two-page document whose pages read "Hello" and "World" produces exactly:
//!
//! ```text
//! \n--- Page 1 ---\nHello\n\n--- Page 2 ---\nWorld\n
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2text` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdf2text = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, PageDelimiter, PageSelection};
pub use error::Pdf2TextError;
pub use extract::{
    assemble_text, default_output_path, extract, extract_from_bytes, extract_sync,
    extract_to_file, inspect,
};
pub use output::{DocumentMetadata, ExtractionOutput, ExtractionStats, PageText};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stream::{extract_stream, PageStream};
