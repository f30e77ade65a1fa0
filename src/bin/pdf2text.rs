//! CLI binary for pdf2text.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig`, prints results, and exits non-zero on failure.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2text::{
    default_output_path, extract, extract_to_file, inspect, ExtractionConfig,
    ExtractionProgressCallback, PageDelimiter, PageSelection, ProgressCallback,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar while pages are
/// extracted. Page extraction is sequential, so unlike network-bound tools
/// there is no out-of-order completion to handle.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set by
    /// `on_extraction_start` (called once the PDF has been opened).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_extraction_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_pages: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Extracting");
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_extracted(&self, _page_num: usize, _total: usize, _text_len: usize) {
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, total_pages: usize, total_chars: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages extracted  {}",
            green("✔"),
            bold(&total_pages.to_string()),
            dim(&format!("{total_chars} chars")),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic extraction (writes document_extracted.txt)
  pdf2text document.pdf

  # Explicit output path
  pdf2text document.pdf -o output.txt

  # Print to stdout instead of a file
  pdf2text document.pdf --stdout

  # Specific pages only
  pdf2text --pages 3-15 report.pdf

  # Extract from a URL
  pdf2text https://arxiv.org/pdf/1706.03762 -o attention.txt

  # Inspect PDF metadata, no extraction
  pdf2text --inspect-only document.pdf

  # Structured JSON output (pages, metadata, stats)
  pdf2text --json document.pdf > output.json

PAGE DELIMITERS:
  By default each page's text is preceded by a marker line:

      --- Page N ---

  Use --delimiter none for bare concatenation, or --delimiter '<custom>'
  where the literal {page} is replaced with the page number.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH    Path to an existing libpdfium shared library
  RUST_LOG           Tracing filter (overrides -v/-q)
"#;

/// Extract plain text from PDF files and URLs.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2text",
    version,
    about = "Extract plain text from PDF files and URLs, page by page",
    long_about = "Extract plain text from PDF documents (local files or URLs) into a UTF-8 \
text file, one numbered delimiter line per page. PDF parsing and text extraction are \
delegated to the pdfium engine.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Write text to this file. Default: input path with `.pdf` replaced by
    /// `_extracted.txt`.
    #[arg(short, long, env = "PDF2TEXT_OUTPUT")]
    output: Option<PathBuf>,

    /// Print the text to stdout instead of writing a file.
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF2TEXT_PAGES", default_value = "all")]
    pages: String,

    /// Page delimiter: numbered, none, or a custom string ({page} is substituted).
    #[arg(long, env = "PDF2TEXT_DELIMITER", default_value = "numbered")]
    delimiter: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2TEXT_PASSWORD")]
    password: Option<String>,

    /// Overwrite the output file if it already exists.
    #[arg(short, long)]
    force: bool,

    /// Disable text normalisation (keep engine output byte-exact).
    #[arg(long, env = "PDF2TEXT_NO_NORMALIZE")]
    no_normalize: bool,

    /// Output structured JSON (text, pages, metadata, stats) to stdout.
    #[arg(long, env = "PDF2TEXT_JSON", conflicts_with = "output")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PDF2TEXT_NO_PROGRESS")]
    no_progress: bool,

    /// Print PDF metadata only, no extraction.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2TEXT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2TEXT_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDF2TEXT_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active; the
    // bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.stdout;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        // No progress bar for inspection, but --password and
        // --download-timeout still apply.
        let config = build_config(&cli, None)?;
        let meta = inspect(&cli.input, &config)
            .await
            .context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialise metadata")?
            );
        } else {
            println!("File:         {}", cli.input);
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run extraction ───────────────────────────────────────────────────
    if cli.stdout || cli.json {
        let output = extract(&cli.input, &config)
            .await
            .context("Extraction failed")?;

        if cli.json {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(output.text.as_bytes())
                .context("Failed to write to stdout")?;
        }

        if !cli.quiet && !cli.json {
            eprintln!(
                "Extracted {}/{} pages in {}ms",
                output.stats.extracted_pages,
                output.stats.total_pages,
                output.stats.total_duration_ms
            );
        }
    } else {
        let output_path = match cli.output.clone() {
            Some(p) => p,
            None => {
                if cli.input.starts_with("http://") || cli.input.starts_with("https://") {
                    anyhow::bail!(
                        "URL inputs need an explicit destination; pass -o <FILE> or --stdout"
                    );
                }
                default_output_path(&PathBuf::from(&cli.input))
            }
        };

        let stats = extract_to_file(&cli.input, &output_path, &config)
            .await
            .context("Extraction failed")?;

        // Summary line (the callback already printed the green tick).
        if !cli.quiet {
            eprintln!(
                "{}  {}/{} pages  {}ms  →  {}",
                green("✔"),
                stats.extracted_pages,
                stats.total_pages,
                stats.total_duration_ms,
                bold(&output_path.display().to_string()),
            );
            if stats.empty_pages > 0 {
                eprintln!(
                    "   {}",
                    dim(&format!(
                        "{} pages yielded no extractable text",
                        stats.empty_pages
                    ))
                );
            }
        }
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let pages = parse_pages(&cli.pages)?;
    let delimiter = parse_delimiter(&cli.delimiter);

    let mut builder = ExtractionConfig::builder()
        .pages(pages)
        .delimiter(delimiter)
        .normalize(!cli.no_normalize)
        .overwrite(cli.force)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.as_str());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!(
                "Invalid page range '{}-{}': start must be <= end",
                start,
                end
            );
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .context(format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        for &p in &pages {
            if p < 1 {
                anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
            }
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}

/// Parse `--delimiter` string into `PageDelimiter`.
fn parse_delimiter(s: &str) -> PageDelimiter {
    match s.to_lowercase().as_str() {
        "numbered" => PageDelimiter::Numbered,
        "none" => PageDelimiter::None,
        _ => PageDelimiter::Custom(s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pages_variants() {
        assert!(matches!(parse_pages("all").unwrap(), PageSelection::All));
        assert!(matches!(
            parse_pages("5").unwrap(),
            PageSelection::Single(5)
        ));
        assert!(matches!(
            parse_pages("3-15").unwrap(),
            PageSelection::Range(3, 15)
        ));
        assert!(matches!(
            parse_pages("1,3,5").unwrap(),
            PageSelection::Set(_)
        ));
        assert!(parse_pages("0").is_err());
        assert!(parse_pages("9-2").is_err());
        assert!(parse_pages("x").is_err());
    }

    #[test]
    fn parse_delimiter_variants() {
        assert!(matches!(
            parse_delimiter("numbered"),
            PageDelimiter::Numbered
        ));
        assert!(matches!(parse_delimiter("none"), PageDelimiter::None));
        assert!(matches!(
            parse_delimiter("== {page} =="),
            PageDelimiter::Custom(_)
        ));
    }
}
