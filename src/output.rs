//! CLI output formatting.
//!
//! Each command has a `format_*` function returning lines (pure, testable)
//! and a `print_*` wrapper that writes them to stdout. Entities are listed
//! by what they are — folder title, photo count, pages — with the output
//! file path as trailing context:
//!
//! ```text
//! 001 Fixture Gallery → index.html
//! 002 Travel (3 photos) → travel/ [5 pages]
//! 003 Archive → archive/ [error: document not found]
//!
//! Rendered 3 folders, 7 pages, 1 error
//! ```

use crate::check::CheckedDocument;
use crate::render::{RenderSummary, RenderedFolder};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn folder_line(index: usize, folder: &RenderedFolder) -> String {
    let mut line = format!("{} {}", format_index(index), folder.title);
    if folder.is_album && folder.photo_count > 0 {
        line.push_str(&format!(" ({} photos)", folder.photo_count));
    }
    if folder.rel_path.is_empty() {
        line.push_str(" → index.html");
    } else {
        line.push_str(&format!(" → {}/", folder.rel_path));
    }
    if let Some(error) = &folder.error {
        line.push_str(&format!(" [error: {error}]"));
    } else if folder.pages_written > 1 {
        line.push_str(&format!(" [{} pages]", folder.pages_written));
    }
    line
}

/// Render-command output: one line per folder plus a totals footer.
pub fn format_render_output(summary: &RenderSummary) -> Vec<String> {
    let mut lines = Vec::new();
    for (pos, folder) in summary.folders.iter().enumerate() {
        lines.push(folder_line(pos + 1, folder));
        if !folder.content_complete && folder.error.is_none() {
            lines.push("    content incomplete (some items did not resolve)".to_string());
        }
    }
    lines.push(String::new());
    let errors = summary.error_count();
    let mut footer = format!(
        "Rendered {} folders, {} pages",
        summary.folders.len(),
        summary.pages_written()
    );
    if errors > 0 {
        footer.push_str(&format!(", {errors} errors"));
    }
    lines.push(footer);
    lines
}

pub fn print_render_output(summary: &RenderSummary) {
    for line in format_render_output(summary) {
        println!("{line}");
    }
}

/// Check-command output: failures first, then a totals footer.
pub fn format_check_output(documents: &[CheckedDocument]) -> Vec<String> {
    let mut lines = Vec::new();
    let failures: Vec<&CheckedDocument> =
        documents.iter().filter(|d| d.error.is_some()).collect();

    for doc in &failures {
        if let Some(error) = &doc.error {
            lines.push(format!("{}: {}", doc.rel_path, error));
        }
    }
    if !failures.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Checked {} documents, {} invalid",
        documents.len(),
        failures.len()
    ));
    lines
}

pub fn print_check_output(documents: &[CheckedDocument]) {
    for line in format_check_output(documents) {
        println!("{line}");
    }
}
