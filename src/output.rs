//! Output types returned by the extraction entry points.
//!
//! Everything here is plain serialisable data: the CLI's `--json` mode dumps
//! [`ExtractionOutput`] directly with `serde_json`.

use serde::{Deserialize, Serialize};

/// The result of a completed extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// The assembled document text: for each page, its delimiter line,
    /// extracted text, and a trailing newline, in page order.
    pub text: String,

    /// Per-page results, sorted by page number.
    pub pages: Vec<PageText>,

    /// Document metadata read from the PDF.
    pub metadata: DocumentMetadata,

    /// Timing and page counts for this run.
    pub stats: ExtractionStats,
}

/// Extracted text for a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    /// 1-indexed page number in the source document.
    pub page_num: usize,

    /// The page's plain text as produced by the engine (and optionally
    /// normalised). May be empty for pages without extractable text.
    pub text: String,
}

impl PageText {
    /// Byte length of the page's text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the engine yielded no text at all for this page.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Document metadata extracted from the PDF information dictionary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    /// Total pages in the document (not the selected subset).
    pub page_count: usize,
    /// PDF format version as reported by the engine.
    pub pdf_version: String,
}

/// Statistics for a completed extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Total pages in the source document.
    pub total_pages: usize,
    /// Pages actually extracted (the selected subset).
    pub extracted_pages: usize,
    /// Pages whose extraction yielded an empty string.
    pub empty_pages: usize,
    /// Total bytes of extracted text across all pages (excluding delimiters).
    pub total_chars: usize,
    /// Wall-clock duration of the whole run in milliseconds.
    pub total_duration_ms: u64,
    /// Time spent inside the PDF engine in milliseconds.
    pub extract_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_text_len_and_empty() {
        let p = PageText {
            page_num: 1,
            text: String::new(),
        };
        assert!(p.is_empty());
        assert_eq!(p.len(), 0);

        let p = PageText {
            page_num: 2,
            text: "Hello".into(),
        };
        assert!(!p.is_empty());
        assert_eq!(p.len(), 5);
    }

    #[test]
    fn output_round_trips_through_json() {
        let out = ExtractionOutput {
            text: "\n--- Page 1 ---\nHello\n".into(),
            pages: vec![PageText {
                page_num: 1,
                text: "Hello".into(),
            }],
            metadata: DocumentMetadata {
                title: Some("Sample".into()),
                author: None,
                subject: None,
                creator: None,
                producer: None,
                creation_date: None,
                modification_date: None,
                page_count: 1,
                pdf_version: "Pdf17".into(),
            },
            stats: ExtractionStats {
                total_pages: 1,
                extracted_pages: 1,
                empty_pages: 0,
                total_chars: 5,
                total_duration_ms: 3,
                extract_duration_ms: 2,
            },
        };

        let json = serde_json::to_string(&out).unwrap();
        let back: ExtractionOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.text, out.text);
        assert_eq!(back.pages.len(), 1);
        assert_eq!(back.metadata.page_count, 1);
        assert_eq!(back.stats.total_chars, 5);
    }
}
