//! Markdown rendering for note-taking apps.

use capture_core::schema::{Capture, CaptureRecord};
use chrono::{Local, NaiveDate, TimeZone};
use std::borrow::Cow;
use std::fmt::Display;

/// Characters of page text kept in an export.
pub const PAGE_PREVIEW_CHARS: usize = 500;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders captures as one Markdown document.
///
/// The heading date and the zone used for capture times are fixed at
/// construction, so the same input always renders to the same bytes.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer<Tz: TimeZone> {
    tz: Tz,
    date: NaiveDate,
}

impl MarkdownRenderer<Local> {
    /// Renderer for the local zone, dated today.
    pub fn local() -> Self {
        Self::new(Local, Local::now().date_naive())
    }
}

impl<Tz: TimeZone> MarkdownRenderer<Tz>
where
    Tz::Offset: Display,
{
    pub fn new(tz: Tz, date: NaiveDate) -> Self {
        Self { tz, date }
    }

    pub fn render(&self, captures: &[CaptureRecord]) -> String {
        let mut markdown = format!("# Captures - {}\n\n", self.date.format(DATE_FORMAT));

        for record in captures {
            self.render_record(&mut markdown, record);
        }

        markdown
    }

    fn render_record(&self, out: &mut String, record: &CaptureRecord) {
        let time = record.timestamp.with_timezone(&self.tz);

        out.push_str(&format!(
            "## {}: {}\n",
            record.capture_type().as_str().to_uppercase(),
            record.title
        ));
        out.push_str(&format!("- **Time**: {}\n", time.format(TIME_FORMAT)));
        out.push_str(&format!("- **URL**: [{}]({})\n", record.url, record.url));

        let body = match &record.capture {
            Capture::Text { content, .. } => blockquote(content),
            Capture::Image { content, .. } => format!("![Image]({})", content),
            Capture::Link { content, metadata } => {
                format!("- [{}]({})", metadata.link_text, content)
            }
            Capture::Page { content, .. } => page_preview(content).into_owned(),
            Capture::Video { content, .. } => format!("- [Video Link]({})", content),
        };
        out.push_str(&format!("\n{}\n", body));

        out.push_str("\n---\n\n");
    }
}

/// Quote every line of `content`.
fn blockquote(content: &str) -> String {
    let lines: Vec<String> = content.lines().map(|line| format!("> {}", line)).collect();
    if lines.is_empty() {
        ">".to_string()
    } else {
        lines.join("\n")
    }
}

/// Page text cut to [`PAGE_PREVIEW_CHARS`] characters, with "..." only when cut.
pub fn page_preview(content: &str) -> Cow<'_, str> {
    match content.char_indices().nth(PAGE_PREVIEW_CHARS) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &content[..cut])),
        None => Cow::Borrowed(content),
    }
}
