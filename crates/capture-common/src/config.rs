//! Environment configuration.

use camino::Utf8PathBuf;
use std::time::Duration;

/// Default bounded wait for the page responder.
pub const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    /// JSON document holding the `captures` key
    pub store_path: Utf8PathBuf,
    /// Shell command answering `getPageContent` (None = no responder)
    pub page_command: Option<String>,
    /// Upper bound on the page round trip
    pub page_timeout: Duration,
    /// Shell command receiving Markdown on stdin
    pub clipboard_command: String,
}

impl CaptureConfig {
    /// Load configuration from the process environment.
    ///
    /// - `CAPTURE_STORE_PATH` (default: `<config dir>/web-capture/storage.json`)
    /// - `CAPTURE_PAGE_COMMAND`
    /// - `CAPTURE_PAGE_TIMEOUT_SECS` (default: 10)
    /// - `CAPTURE_CLIPBOARD_COMMAND` (default: platform clipboard tool)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store_path = non_empty("CAPTURE_STORE_PATH")
            .map(Utf8PathBuf::from)
            .unwrap_or_else(|| default_data_dir().join("storage.json"));

        let page_timeout = non_empty("CAPTURE_PAGE_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_PAGE_TIMEOUT);

        Self {
            store_path,
            page_command: non_empty("CAPTURE_PAGE_COMMAND"),
            page_timeout,
            clipboard_command: non_empty("CAPTURE_CLIPBOARD_COMMAND")
                .unwrap_or_else(|| default_clipboard_command().to_string()),
        }
    }
}

/// Directory for the store document and logs.
pub fn default_data_dir() -> Utf8PathBuf {
    dirs::config_dir()
        .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
        .map(|dir| dir.join("web-capture"))
        .unwrap_or_else(|| Utf8PathBuf::from(".web-capture"))
}

fn default_clipboard_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "pbcopy"
    } else if cfg!(target_os = "windows") {
        "clip"
    } else {
        "xclip -selection clipboard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> CaptureConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CaptureConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert!(config.store_path.ends_with("web-capture/storage.json"));
        assert_eq!(config.page_command, None);
        assert_eq!(config.page_timeout, DEFAULT_PAGE_TIMEOUT);
        assert!(!config.clipboard_command.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("CAPTURE_STORE_PATH", "/tmp/captures.json"),
            ("CAPTURE_PAGE_COMMAND", "page-dump --json"),
            ("CAPTURE_PAGE_TIMEOUT_SECS", "3"),
            ("CAPTURE_CLIPBOARD_COMMAND", "cat > /dev/null"),
        ]);
        assert_eq!(config.store_path, Utf8PathBuf::from("/tmp/captures.json"));
        assert_eq!(config.page_command.as_deref(), Some("page-dump --json"));
        assert_eq!(config.page_timeout, Duration::from_secs(3));
        assert_eq!(config.clipboard_command, "cat > /dev/null");
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        for value in ["0", "soon", "-1", ""] {
            let config = config_from(&[("CAPTURE_PAGE_TIMEOUT_SECS", value)]);
            assert_eq!(config.page_timeout, DEFAULT_PAGE_TIMEOUT, "value {value:?}");
        }
    }

    #[test]
    fn test_blank_page_command_means_none() {
        let config = config_from(&[("CAPTURE_PAGE_COMMAND", "   ")]);
        assert_eq!(config.page_command, None);
    }
}
