//! Eager (full-document) extraction entry points.
//!
//! The primary API is [`extract`]: resolve the input, read every selected
//! page's text through pdfium, normalise, and assemble the delimited output
//! buffer in page order. Extraction is all-or-nothing — if any page fails,
//! the call returns an error and [`extract_to_file`] writes nothing, so a
//! destination file on disk always reflects a complete, successful run.

use crate::config::{ExtractionConfig, PageDelimiter};
use crate::error::Pdf2TextError;
use crate::output::{DocumentMetadata, ExtractionOutput, ExtractionStats, PageText};
use crate::pipeline::{input, normalize, reader};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Extract plain text from a PDF file or URL.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_str` — Local file path or HTTP/HTTPS URL to a PDF
/// * `config` — Extraction configuration
///
/// # Errors
/// Returns `Err(Pdf2TextError)` for any failure: file not found, not a valid
/// PDF, an out-of-range page selection, or an engine error on any page. There
/// is no partial success.
pub async fn extract(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Pdf2TextError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting extraction: {}", input_str);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let pdf_path = resolved.path().to_path_buf();

    // ── Step 2: Extract metadata ─────────────────────────────────────────
    let metadata = reader::extract_metadata(&pdf_path, config.password.as_deref()).await?;
    let total_pages = metadata.page_count;
    info!("PDF has {} pages", total_pages);

    // ── Step 3: Compute page indices ─────────────────────────────────────
    let page_indices = config.pages.to_indices(total_pages);
    if page_indices.is_empty() && total_pages > 0 {
        return Err(Pdf2TextError::PageOutOfRange {
            page: config.pages.first_requested(),
            total: total_pages,
        });
    }
    debug!("Selected {} pages for extraction", page_indices.len());

    // ── Step 4: Extract page text ────────────────────────────────────────
    let extract_start = Instant::now();
    let raw = reader::extract_pages(&pdf_path, config, &page_indices).await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    info!(
        "Extracted {} pages in {}ms",
        raw.len(),
        extract_duration_ms
    );

    // ── Step 5: Normalise ────────────────────────────────────────────────
    let pages: Vec<PageText> = raw
        .into_iter()
        .map(|(idx, text)| PageText {
            page_num: idx + 1,
            text: if config.normalize {
                normalize::normalize_page(&text)
            } else {
                text
            },
        })
        .collect();

    // ── Step 6: Assemble output buffer ───────────────────────────────────
    let text = assemble_text(&pages, &config.delimiter);

    // ── Step 7: Compute stats ────────────────────────────────────────────
    let total_chars = pages.iter().map(|p| p.len()).sum();
    let stats = ExtractionStats {
        total_pages,
        extracted_pages: pages.len(),
        empty_pages: pages.iter().filter(|p| p.is_empty()).count(),
        total_chars,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        extract_duration_ms,
    };

    info!(
        "Extraction complete: {}/{} pages, {} chars, {}ms total",
        stats.extracted_pages, total_pages, total_chars, stats.total_duration_ms
    );

    Ok(ExtractionOutput {
        text,
        pages,
        metadata,
        stats,
    })
}

/// Extract a PDF and write the text to a file.
///
/// Uses atomic write (temp file + rename) so a crash mid-write never leaves a
/// truncated destination. An existing destination is an error unless
/// `config.overwrite` is set — the original behaviour of clobbering output
/// files without warning is deliberately not reproduced.
///
/// A zero-page document still writes an (empty) file.
pub async fn extract_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, Pdf2TextError> {
    let path = output_path.as_ref();

    if !config.overwrite && path.exists() {
        return Err(Pdf2TextError::OutputExists {
            path: path.to_path_buf(),
        });
    }

    let output = extract(input_str, config).await?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Pdf2TextError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    // Atomic write: write to temp, then rename
    let tmp_path = tmp_sibling(path);
    tokio::fs::write(&tmp_path, &output.text)
        .await
        .map_err(|e| Pdf2TextError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(Pdf2TextError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        });
    }

    info!("Wrote {} bytes to {}", output.text.len(), path.display());

    Ok(output.stats)
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Pdf2TextError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2TextError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract(input_str, config))
}

/// Extract text from PDF bytes in memory.
///
/// This avoids the need for the caller to create a temporary file. Internally
/// the library writes `bytes` to a managed [`tempfile`] and cleans it up
/// automatically on return or panic. This is the recommended API when PDF
/// data comes from a database, network stream, or in-memory buffer rather
/// than a file on disk.
pub async fn extract_from_bytes(
    bytes: &[u8],
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Pdf2TextError> {
    let mut tmp = tempfile::Builder::new()
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| Pdf2TextError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| Pdf2TextError::Internal(format!("tempfile write: {e}")))?;
    let path = tmp.path().to_string_lossy().to_string();
    // `tmp` is dropped (and the file deleted) when `extract` returns
    extract(&path, config).await
}

/// Extract PDF metadata without reading any page text.
///
/// Honours `config.password` (for encrypted documents) and
/// `config.download_timeout_secs` (for URL inputs); all other fields are
/// ignored.
pub async fn inspect(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<DocumentMetadata, Pdf2TextError> {
    let resolved = input::resolve_input(input_str.as_ref(), config.download_timeout_secs).await?;
    let pdf_path = resolved.path().to_path_buf();
    reader::extract_metadata(&pdf_path, config.password.as_deref()).await
}

/// Temp path next to `path` for the atomic write.
///
/// `.tmp` is appended to the whole file name rather than swapped in as an
/// extension, so `a.txt` and `a.json` in the same directory get distinct
/// temp files (`a.txt.tmp` and `a.json.tmp`).
fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| std::ffi::OsString::from("output"));
    name.push(".tmp");
    path.with_file_name(name)
}

// ── Assembly ─────────────────────────────────────────────────────────────

/// Assemble the final text buffer from per-page results.
///
/// For each page, in page order: the rendered delimiter, the page's text, and
/// a trailing newline. An empty page slice assembles to the empty string, so
/// a zero-page document produces an empty output file.
///
/// With the default [`PageDelimiter::Numbered`], two pages reading `"Hello"`
/// and `"World"` assemble to exactly
/// `"\n--- Page 1 ---\nHello\n\n--- Page 2 ---\nWorld\n"`.
pub fn assemble_text(pages: &[PageText], delimiter: &PageDelimiter) -> String {
    let mut buf = String::with_capacity(
        pages.iter().map(|p| p.text.len() + 24).sum(),
    );
    for page in pages {
        buf.push_str(&delimiter.render(page.page_num));
        buf.push_str(&page.text);
        buf.push('\n');
    }
    buf
}

/// Derive the default destination path for a source PDF.
///
/// Strips a trailing `.pdf` (case-insensitive) and appends `_extracted.txt`;
/// a source without the suffix simply gets `_extracted.txt` appended:
/// `report.pdf` → `report_extracted.txt`.
pub fn default_output_path(source: &Path) -> PathBuf {
    let s = source.to_string_lossy();
    let stem = match source.extension() {
        // ".pdf" is ASCII, so slicing 4 bytes off the end is char-safe here.
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => &s[..s.len() - 4],
        _ => &s[..],
    };
    PathBuf::from(format!("{stem}_extracted.txt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: usize, text: &str) -> PageText {
        PageText {
            page_num: n,
            text: text.to_string(),
        }
    }

    #[test]
    fn assemble_matches_fixed_two_page_form() {
        let pages = vec![page(1, "Hello"), page(2, "World")];
        assert_eq!(
            assemble_text(&pages, &PageDelimiter::Numbered),
            "\n--- Page 1 ---\nHello\n\n--- Page 2 ---\nWorld\n"
        );
    }

    #[test]
    fn assemble_empty_slice_is_empty_string() {
        assert_eq!(assemble_text(&[], &PageDelimiter::Numbered), "");
    }

    #[test]
    fn assemble_keeps_empty_page_slot() {
        // An unextractable page still gets its delimiter and newline.
        let pages = vec![page(1, ""), page(2, "text")];
        assert_eq!(
            assemble_text(&pages, &PageDelimiter::Numbered),
            "\n--- Page 1 ---\n\n\n--- Page 2 ---\ntext\n"
        );
    }

    #[test]
    fn assemble_n_pages_has_n_delimiters_in_order() {
        let pages: Vec<PageText> = (1..=7).map(|n| page(n, "x")).collect();
        let text = assemble_text(&pages, &PageDelimiter::Numbered);

        let positions: Vec<usize> = (1..=7)
            .map(|n| {
                text.find(&format!("\n--- Page {n} ---\n"))
                    .unwrap_or_else(|| panic!("delimiter for page {n} missing"))
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(text.matches("--- Page ").count(), 7);
    }

    #[test]
    fn assemble_with_no_delimiter() {
        let pages = vec![page(1, "a"), page(2, "b")];
        assert_eq!(assemble_text(&pages, &PageDelimiter::None), "a\nb\n");
    }

    #[test]
    fn default_output_path_replaces_pdf_suffix() {
        assert_eq!(
            default_output_path(Path::new("report.pdf")),
            PathBuf::from("report_extracted.txt")
        );
        assert_eq!(
            default_output_path(Path::new("/docs/Thesis.PDF")),
            PathBuf::from("/docs/Thesis_extracted.txt")
        );
    }

    #[test]
    fn default_output_path_without_pdf_suffix_appends() {
        assert_eq!(
            default_output_path(Path::new("notes")),
            PathBuf::from("notes_extracted.txt")
        );
    }

    #[test]
    fn tmp_sibling_keeps_full_destination_name() {
        assert_eq!(
            tmp_sibling(Path::new("/out/a.txt")),
            PathBuf::from("/out/a.txt.tmp")
        );
        // Destinations differing only in extension must not share a temp file.
        assert_eq!(
            tmp_sibling(Path::new("/out/a.json")),
            PathBuf::from("/out/a.json.tmp")
        );
        assert_eq!(tmp_sibling(Path::new("bare")), PathBuf::from("bare.tmp"));
    }

    #[tokio::test]
    async fn extract_missing_file_is_typed_not_found() {
        let err = extract("/no/such/file.pdf", &ExtractionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2TextError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn extract_to_file_refuses_existing_destination() {
        let existing = tempfile::NamedTempFile::new().unwrap();
        let err = extract_to_file(
            "/no/such/file.pdf",
            existing.path(),
            &ExtractionConfig::default(),
        )
        .await
        .unwrap_err();
        // The overwrite check fires before the input is even opened.
        assert!(matches!(err, Pdf2TextError::OutputExists { .. }));
    }

    #[tokio::test]
    async fn extract_to_file_missing_source_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.txt");
        let err = extract_to_file("/no/such/file.pdf", &dest, &ExtractionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2TextError::FileNotFound { .. }));
        assert!(!dest.exists(), "no output file may exist after a failed run");
    }
}
