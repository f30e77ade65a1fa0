//! Streaming extraction API: emit pages as they are read.
//!
//! ## Why stream?
//!
//! The eager [`crate::extract`] buffers every page's text before returning.
//! For a thousand-page document that means holding the whole book in memory
//! and waiting for the last page before seeing the first. [`extract_stream`]
//! instead yields each [`PageText`] as pdfium produces it, so callers can
//! write pages to disk incrementally or show partial results immediately.
//!
//! Pages always arrive in ascending page order — pdfium is driven
//! sequentially from one blocking worker thread. Dropping the stream cancels
//! the remaining work.

use crate::config::ExtractionConfig;
use crate::error::Pdf2TextError;
use crate::output::PageText;
use crate::pipeline::{input, normalize, reader};
use futures::stream::{Stream, StreamExt};
use std::pin::Pin;
use tokio::sync::mpsc::Receiver;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};

/// A boxed stream of page results.
pub type PageStream = Pin<Box<dyn Stream<Item = Result<PageText, Pdf2TextError>> + Send>>;

/// Extract a PDF's text, streaming pages as they are read.
///
/// Returns an error immediately for fatal setup failures (file not found, not
/// a PDF, empty page selection). Engine failures on a page surface as an
/// `Err` item on the stream, after which the stream ends — the all-or-nothing
/// contract of the eager API becomes "all items up to the first error" here,
/// and it is the caller's responsibility not to persist a partial document.
pub async fn extract_stream(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<PageStream, Pdf2TextError> {
    let input_str = input_str.as_ref();
    info!("Starting streaming extraction: {}", input_str);

    // ── Resolve input ────────────────────────────────────────────────────
    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;

    // ── Extract metadata for page count ──────────────────────────────────
    let metadata =
        reader::extract_metadata(resolved.path(), config.password.as_deref()).await?;
    let total_pages = metadata.page_count;

    // ── Compute page indices ─────────────────────────────────────────────
    let page_indices = config.pages.to_indices(total_pages);
    if page_indices.is_empty() && total_pages > 0 {
        return Err(Pdf2TextError::PageOutOfRange {
            page: config.pages.first_requested(),
            total: total_pages,
        });
    }

    // ── Drive pdfium from a blocking worker, bridge via channel ──────────
    let (tx, rx) = tokio::sync::mpsc::channel::<Result<PageText, Pdf2TextError>>(8);
    let password = config.password.clone();
    let callback = config.progress_callback.clone();
    let normalize_pages = config.normalize;

    let handle = tokio::task::spawn_blocking(move || {
        // `resolved` moves in so a downloaded temp file outlives the walk.
        let pdf_path = resolved.path().to_path_buf();
        let result = reader::walk_pages_blocking(
            &pdf_path,
            password.as_deref(),
            &page_indices,
            callback.as_deref(),
            |idx, text| {
                let page = PageText {
                    page_num: idx + 1,
                    text: if normalize_pages {
                        normalize::normalize_page(&text)
                    } else {
                        text
                    },
                };
                tx.blocking_send(Ok(page)).is_ok()
            },
        );
        if let Err(e) = result {
            if tx.blocking_send(Err(e)).is_err() {
                warn!("Stream receiver dropped before error could be delivered");
            }
        }
    });

    Ok(bridge(rx, handle))
}

/// Turn the channel plus the worker's join handle into one stream.
///
/// The join handle is awaited after the channel drains so a panic in the
/// blocking worker surfaces as a final `Err` item instead of looking like a
/// clean end of document.
fn bridge(rx: Receiver<Result<PageText, Pdf2TextError>>, handle: JoinHandle<()>) -> PageStream {
    let tail = futures::stream::once(async move {
        match handle.await {
            Ok(()) => None,
            Err(e) => Some(Err(Pdf2TextError::Internal(format!(
                "Extraction worker panicked: {e}"
            )))),
        }
    })
    .filter_map(|item| async move { item });

    Box::pin(ReceiverStream::new(rx).chain(tail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn worker_panic_surfaces_as_internal_error() {
        let (tx, rx) = tokio::sync::mpsc::channel::<Result<PageText, Pdf2TextError>>(8);
        let handle = tokio::task::spawn_blocking(move || {
            tx.blocking_send(Ok(PageText {
                page_num: 1,
                text: "first".into(),
            }))
            .unwrap();
            panic!("engine fell over");
        });

        let mut stream = bridge(rx, handle);
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.page_num, 1);

        let second = stream.next().await.unwrap();
        assert!(matches!(second, Err(Pdf2TextError::Internal(_))));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn clean_worker_ends_stream_without_extra_items() {
        let (tx, rx) = tokio::sync::mpsc::channel::<Result<PageText, Pdf2TextError>>(8);
        let handle = tokio::task::spawn_blocking(move || {
            tx.blocking_send(Ok(PageText {
                page_num: 1,
                text: "only".into(),
            }))
            .unwrap();
        });

        let mut stream = bridge(rx, handle);
        assert!(stream.next().await.unwrap().is_ok());
        assert!(stream.next().await.is_none());
    }
}
