//! Debug logging for capture commands.
//!
//! Logs capture lifecycle events to a JSONL file.

use crate::config::default_data_dir;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;

const MAX_DETAIL_CHARS: usize = 200;

/// Debug log entry for a capture event
#[derive(Debug, Serialize)]
pub struct CaptureLog {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Component (e.g., "producer", "store", "export")
    pub component: String,
    /// Event name (e.g., "stored", "page_failed")
    pub action: String,
    /// Capture type involved, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_type: Option<String>,
    /// Free-form detail (truncated for large values)
    pub detail: String,
}

impl CaptureLog {
    pub fn new(component: &str, action: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            component: component.to_string(),
            action: action.to_string(),
            capture_type: None,
            detail: String::new(),
        }
    }

    pub fn with_type(mut self, capture_type: &str) -> Self {
        self.capture_type = Some(capture_type.to_string());
        self
    }

    pub fn with_detail(mut self, detail: &str) -> Self {
        self.detail = if detail.chars().count() > MAX_DETAIL_CHARS {
            let head: String = detail.chars().take(MAX_DETAIL_CHARS).collect();
            format!("{}...", head)
        } else {
            detail.to_string()
        };
        self
    }

    /// Write log entry to the configured file, if debug mode is enabled
    pub fn write(&self) -> std::io::Result<()> {
        if !is_debug_enabled() {
            return Ok(());
        }
        self.write_to(&debug_log_path())
    }

    /// Append log entry to `path`
    pub fn write_to(&self, path: &Utf8Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        let json = serde_json::to_string(self)?;
        writeln!(file, "{}", json)?;

        Ok(())
    }
}

/// Check if debug mode is enabled
pub fn is_debug_enabled() -> bool {
    std::env::var_os("CAPTURE_DEBUG").is_some()
}

/// Get debug log file path
pub fn debug_log_path() -> Utf8PathBuf {
    match std::env::var("CAPTURE_LOG_PATH") {
        Ok(path) if !path.is_empty() => Utf8PathBuf::from(path),
        _ => default_data_dir().join("logs").join("capture-debug.jsonl"),
    }
}

/// Quick helper to log an event; never fails the caller
pub fn log_event(component: &str, action: &str, capture_type: Option<&str>, detail: &str) {
    let mut log = CaptureLog::new(component, action).with_detail(detail);
    if let Some(capture_type) = capture_type {
        log = log.with_type(capture_type);
    }

    let _ = log.write();
}
