//! Request parsing from stdin.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{self, Read};

/// Browser tab the click happened in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    /// Tab identifier, used to address the page responder
    #[serde(default)]
    pub id: Option<i64>,

    /// Page URL
    #[serde(default)]
    pub url: String,

    /// Page title
    #[serde(default)]
    pub title: String,
}

/// Context-menu click as delivered by the browser.
///
/// Only the fields relevant to the clicked entry are populated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuClick {
    /// Id of the clicked menu entry (e.g., "capture-selection")
    pub menu_item_id: String,

    /// Selected text (selection context)
    #[serde(default)]
    pub selection_text: Option<String>,

    /// Media source URL (image and video contexts)
    #[serde(default)]
    pub src_url: Option<String>,

    /// Link target (link context)
    #[serde(default)]
    pub link_url: Option<String>,

    /// Link display text (link context)
    #[serde(default)]
    pub link_text: Option<String>,

    /// URL of the page hosting the clicked element
    #[serde(default)]
    pub page_url: Option<String>,

    /// Tab the click happened in
    #[serde(default)]
    pub tab: Tab,
}

impl MenuClick {
    /// Read and parse a menu click from stdin.
    pub fn from_stdin() -> anyhow::Result<Self> {
        read_stdin()
    }
}

/// Read stdin to the end and parse it as JSON.
pub fn read_stdin<T: DeserializeOwned>() -> anyhow::Result<T> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let parsed: T = serde_json::from_str(&input)?;
    Ok(parsed)
}
