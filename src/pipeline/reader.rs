//! PDF text extraction: read selected pages' plain text via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! `tokio::task::spawn_blocking` moves the work onto a dedicated thread pool
//! thread designed for blocking operations, preventing the Tokio worker
//! threads from stalling while pdfium walks content streams.
//!
//! ## What this stage does NOT do
//!
//! Extraction fidelity (font decoding, reading order, layout inference) is
//! entirely pdfium's responsibility. A page that yields an empty or garbled
//! string is passed through unchanged; only an engine *error* is treated as a
//! failure, and that failure is fatal to the whole run.

use crate::config::ExtractionConfig;
use crate::error::Pdf2TextError;
use crate::output::DocumentMetadata;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Extract plain text from the selected pages of a PDF.
///
/// This runs inside `spawn_blocking` since pdfium operations are CPU-bound.
///
/// # Returns
/// A vector of `(page_index_0based, text)` tuples in ascending page order.
///
/// # Errors
/// Any engine failure — opening the document, loading a page, or reading its
/// text — aborts the run. No partial results are returned.
pub async fn extract_pages(
    pdf_path: &Path,
    config: &ExtractionConfig,
    page_indices: &[usize],
) -> Result<Vec<(usize, String)>, Pdf2TextError> {
    let path = pdf_path.to_path_buf();
    let password = config.password.clone();
    let indices = page_indices.to_vec();
    let callback = config.progress_callback.clone();

    tokio::task::spawn_blocking(move || {
        extract_pages_blocking(&path, password.as_deref(), &indices, callback.as_deref())
    })
    .await
    .map_err(|e| Pdf2TextError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Blocking implementation of page text extraction.
fn extract_pages_blocking(
    pdf_path: &Path,
    password: Option<&str>,
    page_indices: &[usize],
    callback: Option<&dyn crate::progress::ExtractionProgressCallback>,
) -> Result<Vec<(usize, String)>, Pdf2TextError> {
    let mut results = Vec::with_capacity(page_indices.len());
    walk_pages_blocking(pdf_path, password, page_indices, callback, |idx, text| {
        results.push((idx, text));
        true
    })?;
    Ok(results)
}

/// Open a document and feed each selected page's text to `sink`, in order.
///
/// `sink` returning `false` stops the walk early without error (used by the
/// streaming API when the receiver is dropped). Shared by the eager and
/// streaming entry points so pdfium is only driven from one place.
pub(crate) fn walk_pages_blocking(
    pdf_path: &Path,
    password: Option<&str>,
    page_indices: &[usize],
    callback: Option<&dyn crate::progress::ExtractionProgressCallback>,
    mut sink: impl FnMut(usize, String) -> bool,
) -> Result<(), Pdf2TextError> {
    let pdfium = bind_pdfium()?;

    let document = load_document(&pdfium, pdf_path, password)?;
    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    if let Some(cb) = callback {
        cb.on_extraction_start(page_indices.len());
    }

    let selected = page_indices.len();
    let mut total_chars = 0usize;

    for &idx in page_indices {
        if idx >= total_pages {
            return Err(Pdf2TextError::PageOutOfRange {
                page: idx + 1,
                total: total_pages,
            });
        }

        if let Some(cb) = callback {
            cb.on_page_start(idx + 1, selected);
        }

        let page = pages
            .get(idx as u16)
            .map_err(|e| Pdf2TextError::ExtractionFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?;

        let text = page
            .text()
            .map_err(|e| Pdf2TextError::ExtractionFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?
            .all();

        debug!("Extracted page {} → {} bytes", idx + 1, text.len());
        total_chars += text.len();

        if let Some(cb) = callback {
            cb.on_page_extracted(idx + 1, selected, text.len());
        }

        if !sink(idx, text) {
            debug!("Page sink closed; stopping extraction early");
            return Ok(());
        }
    }

    if let Some(cb) = callback {
        cb.on_extraction_complete(selected, total_chars);
    }

    Ok(())
}

/// Extract document metadata from a PDF without reading page text.
pub async fn extract_metadata(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, Pdf2TextError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(|s| s.to_string());

    tokio::task::spawn_blocking(move || extract_metadata_blocking(&path, pwd.as_deref()))
        .await
        .map_err(|e| Pdf2TextError::Internal(format!("Metadata task panicked: {}", e)))?
}

/// Blocking implementation of metadata extraction.
fn extract_metadata_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, Pdf2TextError> {
    let pdfium = bind_pdfium()?;

    let document = load_document(&pdfium, pdf_path, password)?;
    let metadata = document.metadata();
    let pages = document.pages();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    Ok(DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
        page_count: pages.len() as usize,
        pdf_version: format!("{:?}", document.version()),
    })
}

/// Bind to a pdfium shared library, honouring `PDFIUM_LIB_PATH`.
///
/// Binding failures surface as `PdfiumBindingFailed` rather than a panic, so
/// a missing libpdfium on the host is an ordinary typed error.
fn bind_pdfium() -> Result<Pdfium, Pdf2TextError> {
    bind_pdfium_at(std::env::var("PDFIUM_LIB_PATH").ok().as_deref())
}

fn bind_pdfium_at(lib_path: Option<&str>) -> Result<Pdfium, Pdf2TextError> {
    let bindings = match lib_path {
        Some(p) if !p.is_empty() => Pdfium::bind_to_library(p),
        _ => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| Pdf2TextError::PdfiumBindingFailed(format!("{:?}", e)))?;
    Ok(Pdfium::new(bindings))
}

/// Open a document, mapping pdfium's opaque errors to typed password/corrupt
/// variants.
fn load_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, Pdf2TextError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                Pdf2TextError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                Pdf2TextError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            Pdf2TextError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bogus_library_path_is_typed_binding_failure() {
        let err = match bind_pdfium_at(Some("/no/such/libpdfium.so")) {
            Err(e) => e,
            Ok(_) => panic!("binding to a nonexistent library must fail"),
        };
        assert!(matches!(err, Pdf2TextError::PdfiumBindingFailed(_)));
        assert!(err.to_string().contains("PDFIUM_LIB_PATH"));
    }
}
