//! Capture list for the popup view.

use capture_core::schema::{CaptureRecord, CaptureType};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Per-type counts shown above the list.
///
/// Page and video captures only contribute to `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CaptureStats {
    pub total: usize,
    pub text: usize,
    pub image: usize,
    pub link: usize,
}

impl CaptureStats {
    pub fn from_captures(captures: &[CaptureRecord]) -> Self {
        captures.iter().fold(
            CaptureStats {
                total: captures.len(),
                ..CaptureStats::default()
            },
            |mut stats, record| {
                match record.capture_type() {
                    CaptureType::Text => stats.text += 1,
                    CaptureType::Image => stats.image += 1,
                    CaptureType::Link => stats.link += 1,
                    CaptureType::Page | CaptureType::Video => {}
                }
                stats
            },
        )
    }
}

/// One row of the popup list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub capture_type: CaptureType,
    pub time_ago: String,
    pub title: String,
}

/// Coarse age of `timestamp` at `now`; the largest nonzero unit wins.
pub fn time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(timestamp);

    let days = diff.num_days();
    let hours = diff.num_hours();
    let minutes = diff.num_minutes();

    if days > 0 {
        format!("{}d ago", days)
    } else if hours > 0 {
        format!("{}h ago", hours)
    } else if minutes > 0 {
        format!("{}m ago", minutes)
    } else {
        "Just now".to_string()
    }
}

/// Rows for `captures`, newest first.
pub fn list_items(captures: &[CaptureRecord], now: DateTime<Utc>) -> Vec<ListItem> {
    captures
        .iter()
        .rev()
        .map(|record| ListItem {
            capture_type: record.capture_type(),
            time_ago: time_ago(record.timestamp, now),
            title: if record.title.is_empty() {
                "Untitled".to_string()
            } else {
                record.title.clone()
            },
        })
        .collect()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const EMPTY_STATE_HTML: &str = r#"<div class="empty-state">
  <div class="empty-state-icon">📭</div>
  <div>No captures yet</div>
  <div class="empty-state-hint">Right-click anything to start capturing!</div>
</div>
"#;

/// HTML fragment: stats block followed by the capture list.
pub fn render_html(captures: &[CaptureRecord], now: DateTime<Utc>) -> String {
    let stats = CaptureStats::from_captures(captures);
    let mut html = format!(
        concat!(
            "<div class=\"stats\">\n",
            "  <span id=\"total-count\">{}</span>\n",
            "  <span id=\"text-count\">{}</span>\n",
            "  <span id=\"image-count\">{}</span>\n",
            "  <span id=\"link-count\">{}</span>\n",
            "</div>\n",
        ),
        stats.total, stats.text, stats.image, stats.link
    );

    html.push_str("<div id=\"captures-list\">\n");
    if captures.is_empty() {
        html.push_str(EMPTY_STATE_HTML);
    }
    for item in list_items(captures, now) {
        html.push_str(&format!(
            concat!(
                "<div class=\"capture-item\">\n",
                "  <span class=\"capture-type type-{kind}\">{kind}</span>\n",
                "  <span class=\"capture-time\">{time}</span>\n",
                "  <div class=\"capture-title\">{title}</div>\n",
                "</div>\n",
            ),
            kind = item.capture_type,
            time = item.time_ago,
            title = escape_html(&item.title),
        ));
    }
    html.push_str("</div>\n");

    html
}

/// Plain-text form of the popup for terminals.
pub fn render_text(captures: &[CaptureRecord], now: DateTime<Utc>) -> String {
    let stats = CaptureStats::from_captures(captures);
    let mut text = format!(
        "Total: {}  Text: {}  Images: {}  Links: {}\n",
        stats.total, stats.text, stats.image, stats.link
    );

    if captures.is_empty() {
        text.push_str("\nNo captures yet. Right-click anything to start capturing!\n");
        return text;
    }

    text.push('\n');
    for item in list_items(captures, now) {
        text.push_str(&format!(
            "[{}] {:<9} {}\n",
            item.capture_type, item.time_ago, item.title
        ));
    }
    text
}
