//! Configuration types for PDF text extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across threads and to diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! The builder pattern lets callers set only what they care about and rely on
//! documented defaults for the rest, and survives new fields without breaking
//! call sites.

use crate::error::Pdf2TextError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for a PDF text extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2text::{ExtractionConfig, PageSelection};
///
/// let config = ExtractionConfig::builder()
///     .pages(PageSelection::Range(1, 5))
///     .overwrite(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Page selection. Default: all pages.
    pub pages: PageSelection,

    /// Delimiter emitted before each page's text. Default: [`PageDelimiter::Numbered`].
    pub delimiter: PageDelimiter,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Apply deterministic text normalisation to each page. Default: true.
    ///
    /// Normalisation fixes line endings, strips invisible Unicode, and trims
    /// trailing whitespace. It never alters already-clean text, so turning it
    /// off only matters when byte-exact engine output is required.
    pub normalize: bool,

    /// Allow [`crate::extract_to_file`] to replace an existing destination.
    /// Default: false.
    ///
    /// The destination is never silently clobbered; without this flag an
    /// existing file yields [`Pdf2TextError::OutputExists`].
    pub overwrite: bool,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Per-page progress callback. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            pages: PageSelection::default(),
            delimiter: PageDelimiter::default(),
            password: None,
            normalize: true,
            overwrite: false,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("pages", &self.pages)
            .field("delimiter", &self.delimiter)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("normalize", &self.normalize)
            .field("overwrite", &self.overwrite)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn delimiter(mut self, delimiter: PageDelimiter) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn normalize(mut self, v: bool) -> Self {
        self.config.normalize = v;
        self
    }

    pub fn overwrite(mut self, v: bool) -> Self {
        self.config.overwrite = v;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs.max(1);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, Pdf2TextError> {
        let c = &self.config;
        if let PageDelimiter::Custom(ref s) = c.delimiter {
            if s.is_empty() {
                return Err(Pdf2TextError::InvalidConfig(
                    "Custom delimiter must not be empty; use PageDelimiter::None instead".into(),
                ));
            }
        }
        if let PageSelection::Range(start, end) = c.pages {
            if start == 0 || start > end {
                return Err(Pdf2TextError::InvalidConfig(format!(
                    "Invalid page range {start}-{end}: pages are 1-indexed and start must be <= end"
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Specifies which pages of the PDF to extract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PageSelection {
    /// Extract all pages (default).
    #[default]
    All,
    /// Extract a single page (1-indexed).
    Single(usize),
    /// Extract a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Extract specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// The first page number the selection asks for (1-indexed).
    ///
    /// Used for out-of-range reporting when [`Self::to_indices`] expands to
    /// nothing, so the error names the page the caller actually requested.
    pub fn first_requested(&self) -> usize {
        match self {
            PageSelection::All => 1,
            PageSelection::Single(p) => *p,
            PageSelection::Range(start, _) => *start,
            PageSelection::Set(pages) => pages.iter().copied().min().unwrap_or(1),
        }
    }
}

/// The marker line emitted before each page's extracted text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PageDelimiter {
    /// Numbered marker: `"\n--- Page N ---\n"` with N 1-indexed. (default)
    #[default]
    Numbered,
    /// No marker; page texts are concatenated bare.
    None,
    /// Custom marker rendered as `"\n{s}\n"`. The literal `{page}` is
    /// replaced with the 1-indexed page number.
    Custom(String),
}

impl PageDelimiter {
    /// Render the delimiter string for the given page number (1-indexed).
    pub fn render(&self, page_num: usize) -> String {
        match self {
            PageDelimiter::Numbered => format!("\n--- Page {} ---\n", page_num),
            PageDelimiter::None => String::new(),
            PageDelimiter::Custom(s) => {
                format!("\n{}\n", s.replace("{page}", &page_num.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_delimiter_exact_form() {
        assert_eq!(PageDelimiter::Numbered.render(1), "\n--- Page 1 ---\n");
        assert_eq!(PageDelimiter::Numbered.render(42), "\n--- Page 42 ---\n");
    }

    #[test]
    fn custom_delimiter_substitutes_page() {
        let d = PageDelimiter::Custom("=== {page} ===".into());
        assert_eq!(d.render(3), "\n=== 3 ===\n");
    }

    #[test]
    fn none_delimiter_is_empty() {
        assert_eq!(PageDelimiter::None.render(1), "");
    }

    #[test]
    fn page_selection_to_indices() {
        assert_eq!(PageSelection::All.to_indices(5), vec![0, 1, 2, 3, 4]);
        assert_eq!(PageSelection::Single(3).to_indices(5), vec![2]);
        assert_eq!(PageSelection::Single(6).to_indices(5), Vec::<usize>::new());
        assert_eq!(PageSelection::Range(2, 4).to_indices(5), vec![1, 2, 3]);
        assert_eq!(
            PageSelection::Set(vec![3, 1, 3]).to_indices(5),
            vec![0, 2] // deduplicated and sorted
        );
    }

    #[test]
    fn first_requested_names_the_asked_for_page() {
        assert_eq!(PageSelection::All.first_requested(), 1);
        assert_eq!(PageSelection::Single(9).first_requested(), 9);
        assert_eq!(PageSelection::Range(4, 8).first_requested(), 4);
        assert_eq!(PageSelection::Set(vec![7, 3, 5]).first_requested(), 3);
        assert_eq!(PageSelection::Set(vec![]).first_requested(), 1);
    }

    #[test]
    fn all_on_empty_document_is_empty() {
        assert_eq!(PageSelection::All.to_indices(0), Vec::<usize>::new());
    }

    #[test]
    fn builder_rejects_empty_custom_delimiter() {
        let err = ExtractionConfig::builder()
            .delimiter(PageDelimiter::Custom(String::new()))
            .build()
            .unwrap_err();
        assert!(matches!(err, Pdf2TextError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_inverted_range() {
        let err = ExtractionConfig::builder()
            .pages(PageSelection::Range(5, 2))
            .build()
            .unwrap_err();
        assert!(matches!(err, Pdf2TextError::InvalidConfig(_)));
    }

    #[test]
    fn default_config_matches_documented_defaults() {
        let c = ExtractionConfig::default();
        assert!(c.normalize);
        assert!(!c.overwrite);
        assert_eq!(c.download_timeout_secs, 120);
        assert!(matches!(c.delimiter, PageDelimiter::Numbered));
    }
}
