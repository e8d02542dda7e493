//! Context-menu entries and the triggers they produce.

use crate::schema::CaptureType;
use capture_common::input::MenuClick;
use serde::Serialize;
use thiserror::Error;

pub const PARENT_MENU_ID: &str = "obsidian-capture-parent";

/// Context-menu entry as registered with the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<&'static str>,
    pub title: &'static str,
    /// Browser contexts the entry is shown in
    pub contexts: &'static [&'static str],
}

/// Parent entry followed by one entry per capture kind.
pub const MENU_ITEMS: &[MenuItem] = &[
    MenuItem {
        id: PARENT_MENU_ID,
        parent_id: None,
        title: "Capture to Obsidian",
        contexts: &["all"],
    },
    MenuItem {
        id: "capture-selection",
        parent_id: Some(PARENT_MENU_ID),
        title: "📝 Capture Selection",
        contexts: &["selection"],
    },
    MenuItem {
        id: "capture-image",
        parent_id: Some(PARENT_MENU_ID),
        title: "🖼️ Capture Image",
        contexts: &["image"],
    },
    MenuItem {
        id: "capture-link",
        parent_id: Some(PARENT_MENU_ID),
        title: "🔗 Capture Link",
        contexts: &["link"],
    },
    MenuItem {
        id: "capture-page",
        parent_id: Some(PARENT_MENU_ID),
        title: "📄 Capture Full Page",
        contexts: &["page"],
    },
    MenuItem {
        id: "capture-video",
        parent_id: Some(PARENT_MENU_ID),
        title: "🎥 Capture Video",
        contexts: &["video"],
    },
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TriggerError {
    #[error("unknown menu item: {id}")]
    UnknownMenuItem { id: String },

    #[error("menu item {menu_item} requires {field}")]
    MissingField {
        menu_item: &'static str,
        field: &'static str,
    },
}

/// What a menu click asks to capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Selection { text: String },
    Image { src_url: String, page_url: String },
    Link { link_url: String, link_text: Option<String> },
    /// Content is fetched from the page responder.
    Page,
    Video { src_url: String, page_url: String },
}

impl Trigger {
    pub fn capture_type(&self) -> CaptureType {
        match self {
            Trigger::Selection { .. } => CaptureType::Text,
            Trigger::Image { .. } => CaptureType::Image,
            Trigger::Link { .. } => CaptureType::Link,
            Trigger::Page => CaptureType::Page,
            Trigger::Video { .. } => CaptureType::Video,
        }
    }
}

fn required(
    value: &Option<String>,
    menu_item: &'static str,
    field: &'static str,
) -> Result<String, TriggerError> {
    value
        .clone()
        .ok_or(TriggerError::MissingField { menu_item, field })
}

impl TryFrom<&MenuClick> for Trigger {
    type Error = TriggerError;

    fn try_from(click: &MenuClick) -> Result<Self, Self::Error> {
        // media pages default to the tab when the browser leaves pageUrl out
        let page_url = || click.page_url.clone().unwrap_or_else(|| click.tab.url.clone());

        match click.menu_item_id.as_str() {
            "capture-selection" => Ok(Trigger::Selection {
                text: required(&click.selection_text, "capture-selection", "selectionText")?,
            }),
            "capture-image" => Ok(Trigger::Image {
                src_url: required(&click.src_url, "capture-image", "srcUrl")?,
                page_url: page_url(),
            }),
            "capture-link" => Ok(Trigger::Link {
                link_url: required(&click.link_url, "capture-link", "linkUrl")?,
                link_text: click.link_text.clone(),
            }),
            "capture-page" => Ok(Trigger::Page),
            "capture-video" => Ok(Trigger::Video {
                src_url: required(&click.src_url, "capture-video", "srcUrl")?,
                page_url: page_url(),
            }),
            other => Err(TriggerError::UnknownMenuItem {
                id: other.to_string(),
            }),
        }
    }
}
