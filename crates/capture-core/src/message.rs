//! Request/response messages exchanged with the host.

use crate::schema::{CaptureRecord, CaptureType};
use crate::trigger::MenuItem;
use serde::{Deserialize, Serialize};

/// Request, dispatched on its `action` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Answered by the page responder, never by the host
    GetPageContent,
    GetCaptures,
    ClearCaptures,
    ExportToObsidian {
        #[serde(default)]
        captures: Vec<CaptureRecord>,
    },
    GetMenus,
}

/// Response to any request; serialized without a wrapper.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Captures {
        captures: Vec<CaptureRecord>,
    },
    Export {
        success: bool,
        markdown: String,
    },
    Menus {
        menus: Vec<MenuItem>,
    },
    Status {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        badge: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl Response {
    pub fn success() -> Self {
        Response::Status {
            success: true,
            badge: None,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Response::Status {
            success: false,
            badge: None,
            error: Some(error.into()),
        }
    }

    /// Set the badge text on a status response.
    pub fn with_badge(mut self, text: impl Into<String>) -> Self {
        if let Response::Status { badge, .. } = &mut self {
            *badge = Some(text.into());
        }
        self
    }

    pub fn menus(items: &[MenuItem]) -> Self {
        Response::Menus {
            menus: items.to_vec(),
        }
    }
}

/// Acknowledgement written after a capture is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureAck {
    pub success: bool,
    #[serde(rename = "type")]
    pub capture_type: CaptureType,
    /// Store size after the append
    pub count: usize,
    /// Transient badge text
    pub badge: String,
}
