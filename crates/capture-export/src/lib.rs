//! Rendering of stored captures.
//!
//! Provides:
//! - Markdown export for note-taking apps
//! - Popup list (stats, relative times) as HTML or plain text

pub mod listing;
pub mod markdown;

pub use listing::{CaptureStats, ListItem, list_items, render_html, render_text, time_ago};
pub use markdown::{MarkdownRenderer, PAGE_PREVIEW_CHARS, page_preview};

use capture_common::debug::log_event;
use capture_core::schema::CaptureRecord;
use chrono::TimeZone;
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("No captures to export!")]
    Empty,
}

/// Render `captures` for export; an empty sequence is refused.
pub fn export_markdown<Tz: TimeZone>(
    captures: &[CaptureRecord],
    renderer: &MarkdownRenderer<Tz>,
) -> Result<String, ExportError>
where
    Tz::Offset: Display,
{
    if captures.is_empty() {
        return Err(ExportError::Empty);
    }

    let markdown = renderer.render(captures);
    log_event(
        "export",
        "markdown",
        None,
        &format!("captures={} bytes={}", captures.len(), markdown.len()),
    );
    Ok(markdown)
}
