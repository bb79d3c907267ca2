//! CLI output formatting — readable summaries of build and check runs.
//!
//! # The Display Philosophy: Information First
//!
//! Reports lead with the documents themselves. Every written file appears as
//! `title → path`, grouped by kind, so a build's output reads like a site
//! map rather than a log:
//!
//! ```text
//! Pages
//!     Welcome → index.html
//!     News → news/index.html
//!     News (page 2) → news/page/2/index.html
//!
//! Posts
//!     Rest is productive → blog/rest-is-productive/index.html
//!
//! Skipped sections
//!     legacy: sectionGallery: unknown section type
//!
//! Generated 3 pages, 1 posts, 2 static assets
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects — so tests assert on exact
//! lines without capturing stdout.

use crate::generate::{BuildReport, CheckReport, PageSkip, WrittenFile};

// ============================================================================
// Build output
// ============================================================================

/// Format a build report as displayable lines.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.pages.is_empty() {
        lines.push("Pages".to_string());
        for file in &report.pages {
            lines.push(file_line(file));
        }
    }

    if !report.posts.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Posts".to_string());
        for file in &report.posts {
            lines.push(file_line(file));
        }
    }

    lines.extend(skip_section(&report.skips));

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Generated {} pages, {} posts, {} static assets",
        report.pages.len(),
        report.posts.len(),
        report.assets_copied
    ));

    lines
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format a check report as displayable lines.
pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!(
        "Checked {} pages, {} posts \u{2192} {} HTML documents",
        report.pages, report.posts, report.documents
    ));

    lines.extend(skip_section(&report.skips));

    lines.push(String::new());
    if report.skips.is_empty() {
        lines.push("All sections transform cleanly".to_string());
    } else {
        lines.push(format!("{} sections render nothing", report.skips.len()));
    }

    lines
}

/// Print check output to stdout.
pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Shared helpers (pure)
// ============================================================================

/// One written file: `title → path`.
fn file_line(file: &WrittenFile) -> String {
    format!("    {} \u{2192} {}", file.label, file.path)
}

/// The skipped-sections block, empty when nothing was skipped.
fn skip_section(skips: &[PageSkip]) -> Vec<String> {
    if skips.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![String::new(), "Skipped sections".to_string()];
    for skip in skips {
        lines.push(format!("    {}", skip.describe()));
    }
    lines
}
