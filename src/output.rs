//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Every post is shown by its positional index and title, with filesystem
//! paths and URLs as indented context lines. The output reads as a content
//! inventory while still letting users trace each post back to its folder.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Posts
//! 001 Pi day (14 March 2020)
//!     Source: 2020_3_14_pi_day/pi_day.ipynb
//!     URL: /blog/pi_day
//!
//! Unpublished
//!     2020_4_1_draft/
//!
//! Config
//!     config.toml
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 Pi day → blog-posts/pi_day.html (rendered)
//! 002 Observing random variables → blog-posts/observing_random_variables.html (up to date)
//!
//! Index
//!     blog-post-pages/blog0.html
//!
//! 1 up to date, 1 rendered (2 total), 1 index page
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::config::CONFIG_FILENAME;
use crate::generate::GenerateReport;
use crate::render::RenderStatus;
use crate::scan::Manifest;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

/// `path` relative to `base` when possible, for compact display.
fn relative_display(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output showing discovered posts.
///
/// `config_present` says whether a `config.toml` was found; the caller checks
/// so this function stays free of I/O.
pub fn format_scan_output(manifest: &Manifest, config_present: bool) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Posts".to_string());
    if manifest.posts.is_empty() {
        lines.push("    (none)".to_string());
    }
    for (i, post) in manifest.posts.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            post.title,
            post.display_date()
        ));
        lines.push(format!(
            "    Source: {}/{}",
            post.folder,
            post.notebook_filename()
        ));
        lines.push(format!("    URL: {}", post.url()));
    }

    if !manifest.unpublished.is_empty() {
        lines.push(String::new());
        lines.push("Unpublished".to_string());
        for folder in &manifest.unpublished {
            lines.push(format!("    {}/", folder));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if config_present {
        lines.push(format!("    {}", CONFIG_FILENAME));
    } else {
        lines.push("    (stock defaults)".to_string());
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    let config_present = source_root.join(CONFIG_FILENAME).exists();
    for line in format_scan_output(manifest, config_present) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

pub fn format_check_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = vec![format!(
        "{} OK",
        plural(manifest.posts.len(), "published post")
    )];
    if !manifest.unpublished.is_empty() {
        lines.push(format!(
            "{} skipped (no_publish)",
            plural(manifest.unpublished.len(), "folder")
        ));
    }
    lines
}

pub fn print_check_output(manifest: &Manifest) {
    for line in format_check_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2+3: Build output
// ============================================================================

/// Format build output: one line per post with its render status, then the
/// index pages and a summary.
pub fn format_generate_output(report: &GenerateReport, output_dir: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, outcome) in report.posts.iter().enumerate() {
        let status = match outcome.status {
            RenderStatus::Rendered => "rendered",
            RenderStatus::Skipped => "up to date",
        };
        lines.push(format!(
            "{} {} \u{2192} blog-posts/{} ({})",
            format_index(i + 1),
            outcome.post.title,
            outcome.post.output_filename(),
            status
        ));
    }

    if !report.posts.is_empty() {
        lines.push(String::new());
    }
    lines.push("Index".to_string());
    for page in &report.index_pages {
        lines.push(format!("    {}", relative_display(page, output_dir)));
    }

    lines.push(String::new());
    lines.push(format!(
        "{}, {}",
        report.stats,
        plural(report.index_pages.len(), "index page")
    ));

    lines
}

/// Print build output to stdout.
pub fn print_generate_output(report: &GenerateReport, output_dir: &Path) {
    for line in format_generate_output(report, output_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
