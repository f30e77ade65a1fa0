//! Normalisation: deterministic cleanup of engine-extracted text.
//!
//! ## Why normalise at all?
//!
//! pdfium reproduces whatever the PDF's content streams encode, which often
//! includes artefacts that are *faithful* but unpleasant in a plain-text file:
//!
//! - Windows-style `\r\n` line endings (or bare `\r` from old producers)
//! - NUL bytes and zero-width/invisible Unicode left over from font decoding
//! - Trailing whitespace where justified text was padded
//! - Runs of blank lines where vertical whitespace was significant on the page
//!
//! This module applies cheap, pure `&str → String` rules in a fixed order.
//! Crucially, every rule is the identity on already-clean text, so
//! normalisation never perturbs simple extractions — a page that reads
//! `"Hello"` stays exactly `"Hello"`.
//!
//! ## Rule Order
//!
//! Line endings must be normalised before per-line trimming, and blank-line
//! collapsing must run after trimming so whitespace-only lines count as blank.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all normalisation rules to one page's extracted text.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF / CR → LF)
/// 2. Strip NULs and invisible Unicode (zero-width spaces, BOM, word joiners)
/// 3. Trim trailing whitespace per line
/// 4. Collapse 3+ consecutive blank lines down to 2
/// 5. Trim trailing blank lines (the assembler adds the single page-final newline)
pub fn normalize_page(input: &str) -> String {
    let s = normalize_line_endings(input);
    let s = strip_invisible_chars(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    trim_trailing_blank_lines(&s)
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalize_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Strip NULs and invisible Unicode ─────────────────────────────────

static RE_INVISIBLE: Lazy<Regex> = Lazy::new(|| {
    // NUL, zero-width space/non-joiner/joiner, word joiner, BOM
    Regex::new("[\u{0000}\u{200B}\u{200C}\u{200D}\u{2060}\u{FEFF}]").unwrap()
});

fn strip_invisible_chars(input: &str) -> String {
    RE_INVISIBLE.replace_all(input, "").to_string()
}

// ── Rule 3: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 4: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n\n").to_string()
}

// ── Rule 5: Trim trailing blank lines ────────────────────────────────────────

fn trim_trailing_blank_lines(input: &str) -> String {
    input.trim_end_matches('\n').to_string()
}
