//! Capture schema - the record stored for every captured fragment.
//!
//! On the wire a record is a flat object
//! `{timestamp, url, title, type, content, metadata}`; the shape of
//! `metadata` is decided by `type`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest `articleText` kept from a page snapshot.
pub const MAX_ARTICLE_CHARS: usize = 2000;

/// Most images kept from a page snapshot.
pub const MAX_PAGE_IMAGES: usize = 5;

/// Images at or below this size (either side) are dropped from a snapshot.
pub const MIN_IMAGE_SIDE: u32 = 100;

/// Label used when a link carries no display text.
pub const NO_LINK_TEXT: &str = "No text";

/// Kind of captured content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureType {
    Text,
    Image,
    Link,
    Page,
    Video,
}

impl CaptureType {
    pub const ALL: [CaptureType; 5] = [
        CaptureType::Text,
        CaptureType::Image,
        CaptureType::Link,
        CaptureType::Page,
        CaptureType::Video,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureType::Text => "text",
            CaptureType::Image => "image",
            CaptureType::Link => "link",
            CaptureType::Page => "page",
            CaptureType::Video => "video",
        }
    }
}

impl fmt::Display for CaptureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata of a text selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMetadata {
    /// Selection length in characters
    #[serde(default)]
    pub length: usize,
}

/// Metadata of an image or video capture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    /// Page hosting the media element
    #[serde(default)]
    pub page_url: String,
}

/// Metadata of a link capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkMetadata {
    /// Display text of the link
    #[serde(default = "default_link_text")]
    pub link_text: String,
}

impl Default for LinkMetadata {
    fn default() -> Self {
        Self {
            link_text: default_link_text(),
        }
    }
}

fn default_link_text() -> String {
    NO_LINK_TEXT.to_string()
}

/// Image found on a captured page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageImage {
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// Metadata extracted from a full page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub og_title: String,
    #[serde(default)]
    pub og_description: String,
    #[serde(default)]
    pub og_image: String,
    /// Text of the main article element, if one was found
    #[serde(default)]
    pub article_text: String,
    #[serde(default)]
    pub images: Vec<PageImage>,
}

/// Answer to a `getPageContent` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    /// Visible text of the page body
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub metadata: PageMetadata,
}

impl PageContent {
    /// Apply the snapshot limits: article text, image count and image size.
    pub fn clamped(mut self) -> Self {
        if self.metadata.article_text.chars().count() > MAX_ARTICLE_CHARS {
            self.metadata.article_text = self
                .metadata
                .article_text
                .chars()
                .take(MAX_ARTICLE_CHARS)
                .collect();
        }

        self.metadata.images = std::mem::take(&mut self.metadata.images)
            .into_iter()
            .filter(|img| img.width > MIN_IMAGE_SIDE && img.height > MIN_IMAGE_SIDE)
            .take(MAX_PAGE_IMAGES)
            .collect();

        self
    }
}

/// Captured payload; each kind carries exactly its own metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Capture {
    /// Selected text
    Text {
        content: String,
        #[serde(default)]
        metadata: TextMetadata,
    },
    /// Image URL
    Image {
        content: String,
        #[serde(default)]
        metadata: MediaMetadata,
    },
    /// Link URL
    Link {
        content: String,
        #[serde(default)]
        metadata: LinkMetadata,
    },
    /// Extracted page text
    Page {
        content: String,
        #[serde(default)]
        metadata: PageMetadata,
    },
    /// Video URL
    Video {
        content: String,
        #[serde(default)]
        metadata: MediaMetadata,
    },
}

impl Capture {
    /// Text selection; the length is counted in characters.
    pub fn text(content: impl Into<String>) -> Self {
        let content = content.into();
        let length = content.chars().count();
        Capture::Text {
            content,
            metadata: TextMetadata { length },
        }
    }

    pub fn image(src_url: impl Into<String>, page_url: impl Into<String>) -> Self {
        Capture::Image {
            content: src_url.into(),
            metadata: MediaMetadata {
                page_url: page_url.into(),
            },
        }
    }

    /// Link; an absent or empty display text becomes "No text".
    pub fn link(link_url: impl Into<String>, link_text: Option<&str>) -> Self {
        let link_text = match link_text {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => default_link_text(),
        };
        Capture::Link {
            content: link_url.into(),
            metadata: LinkMetadata { link_text },
        }
    }

    pub fn page(page: PageContent) -> Self {
        Capture::Page {
            content: page.content,
            metadata: page.metadata,
        }
    }

    pub fn video(src_url: impl Into<String>, page_url: impl Into<String>) -> Self {
        Capture::Video {
            content: src_url.into(),
            metadata: MediaMetadata {
                page_url: page_url.into(),
            },
        }
    }

    pub fn capture_type(&self) -> CaptureType {
        match self {
            Capture::Text { .. } => CaptureType::Text,
            Capture::Image { .. } => CaptureType::Image,
            Capture::Link { .. } => CaptureType::Link,
            Capture::Page { .. } => CaptureType::Page,
            Capture::Video { .. } => CaptureType::Video,
        }
    }

    /// Type-dependent payload.
    pub fn content(&self) -> &str {
        match self {
            Capture::Text { content, .. }
            | Capture::Image { content, .. }
            | Capture::Link { content, .. }
            | Capture::Page { content, .. }
            | Capture::Video { content, .. } => content,
        }
    }
}

/// One captured fragment of a web page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRecord {
    /// Creation time (RFC 3339)
    pub timestamp: DateTime<Utc>,

    /// Source page URL
    #[serde(default)]
    pub url: String,

    /// Source page title
    #[serde(default)]
    pub title: String,

    /// Payload, flattened into `type`, `content` and `metadata`
    #[serde(flatten)]
    pub capture: Capture,
}

impl CaptureRecord {
    /// Create a record stamped with the current time.
    pub fn new(url: impl Into<String>, title: impl Into<String>, capture: Capture) -> Self {
        Self::at(Utc::now(), url, title, capture)
    }

    /// Create a record with an explicit timestamp.
    pub fn at(
        timestamp: DateTime<Utc>,
        url: impl Into<String>,
        title: impl Into<String>,
        capture: Capture,
    ) -> Self {
        Self {
            timestamp,
            url: url.into(),
            title: title.into(),
            capture,
        }
    }

    pub fn capture_type(&self) -> CaptureType {
        self.capture.capture_type()
    }

    pub fn content(&self) -> &str {
        self.capture.content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_text_capture_counts_characters() {
        let capture = Capture::text("héllo");
        assert_eq!(
            capture,
            Capture::Text {
                content: "héllo".to_string(),
                metadata: TextMetadata { length: 5 },
            }
        );
        assert_eq!(capture.capture_type(), CaptureType::Text);
    }

    #[test]
    fn test_link_text_defaults() {
        for text in [None, Some("")] {
            match Capture::link("https://a.test", text) {
                Capture::Link { metadata, .. } => assert_eq!(metadata.link_text, NO_LINK_TEXT),
                other => panic!("unexpected capture: {other:?}"),
            }
        }
    }

    #[test]
    fn test_serialization_is_flat() {
        let record = CaptureRecord::at(
            fixed_time(),
            "https://example.com",
            "Example",
            Capture::text("hello"),
        );
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["type"], "text");
        assert_eq!(value["content"], "hello");
        assert_eq!(value["metadata"]["length"], 5);
        assert_eq!(value["url"], "https://example.com");
        assert_eq!(value["timestamp"], "2024-03-01T12:30:00Z");
    }

    #[test]
    fn test_media_metadata_uses_camel_case() {
        let record = CaptureRecord::at(
            fixed_time(),
            "https://example.com",
            "Example",
            Capture::image("https://example.com/a.png", "https://example.com"),
        );
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"pageUrl\":\"https://example.com\""));
    }

    #[test]
    fn test_deserialize_browser_record() {
        let json = r#"{
            "timestamp": "2024-03-01T12:30:00.000Z",
            "url": "https://example.com",
            "title": "Example",
            "type": "link",
            "content": "https://example.com/next",
            "metadata": {}
        }"#;
        let record: CaptureRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.timestamp, fixed_time());
        assert_eq!(record.capture_type(), CaptureType::Link);
        assert_eq!(record.capture, Capture::link("https://example.com/next", None));
    }

    #[test]
    fn test_deserialize_page_record() {
        let json = r#"{
            "timestamp": "2024-03-01T12:30:00Z",
            "url": "https://example.com",
            "title": "Example",
            "type": "page",
            "content": "Body text",
            "metadata": {"ogTitle": "OG", "images": [{"src": "a.png", "width": 300, "height": 200}]}
        }"#;
        let record: CaptureRecord = serde_json::from_str(json).unwrap();

        match record.capture {
            Capture::Page { content, metadata } => {
                assert_eq!(content, "Body text");
                assert_eq!(metadata.og_title, "OG");
                assert_eq!(metadata.images.len(), 1);
                assert_eq!(metadata.images[0].alt, "");
            }
            other => panic!("unexpected capture: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let json = r#"{"timestamp": "2024-03-01T12:30:00Z", "type": "audio", "content": "x"}"#;
        assert!(serde_json::from_str::<CaptureRecord>(json).is_err());
    }

    #[test]
    fn test_page_content_clamped() {
        let image = |side: u32| PageImage {
            src: format!("{side}.png"),
            width: side,
            height: side,
            ..PageImage::default()
        };
        let page = PageContent {
            content: "body".to_string(),
            metadata: PageMetadata {
                article_text: "a".repeat(MAX_ARTICLE_CHARS + 10),
                images: vec![
                    image(50),
                    image(100),
                    image(101),
                    image(200),
                    image(300),
                    image(400),
                    image(500),
                    image(600),
                ],
                ..PageMetadata::default()
            },
        }
        .clamped();

        assert_eq!(page.metadata.article_text.chars().count(), MAX_ARTICLE_CHARS);
        let kept: Vec<&str> = page.metadata.images.iter().map(|i| i.src.as_str()).collect();
        assert_eq!(kept, ["101.png", "200.png", "300.png", "400.png", "500.png"]);
    }
}
