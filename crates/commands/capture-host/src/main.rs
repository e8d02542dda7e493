//! Message host: answer popup requests about stored captures.
//!
//! Reads one `{action, ...}` request from stdin and writes the response.

use anyhow::Result;
use capture_common::prelude::*;
use capture_core::{CaptureStore, FileCaptureStore, MENU_ITEMS, Request, Response};
use capture_export::{MarkdownRenderer, export_markdown};
use chrono::TimeZone;
use std::fmt::Display;

fn main() -> Result<()> {
    let request: Request = read_stdin().context("Failed to parse request")?;

    let config = CaptureConfig::from_env();
    let store = FileCaptureStore::from_config(&config);

    let response = handle(request, &store, &MarkdownRenderer::local())?;
    write_stdout(&response)
}

fn handle<Tz: TimeZone>(
    request: Request,
    store: &dyn CaptureStore,
    renderer: &MarkdownRenderer<Tz>,
) -> Result<Response>
where
    Tz::Offset: Display,
{
    match request {
        Request::GetCaptures => Ok(Response::Captures {
            captures: store.list()?,
        }),
        Request::ClearCaptures => {
            store.clear()?;
            Ok(Response::success().with_badge(badge_text(0)))
        }
        Request::ExportToObsidian { captures } => match export_markdown(&captures, renderer) {
            Ok(markdown) => Ok(Response::Export {
                success: true,
                markdown,
            }),
            Err(e) => Ok(Response::failure(e.to_string())),
        },
        Request::GetMenus => Ok(Response::menus(MENU_ITEMS)),
        Request::GetPageContent => Ok(Response::failure(
            "getPageContent is answered by the page responder, not the host",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capture_core::{Capture, CaptureRecord, MemoryCaptureStore};
    use chrono::{NaiveDate, Utc};

    fn renderer() -> MarkdownRenderer<Utc> {
        MarkdownRenderer::new(Utc, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

    fn respond(request: Request, store: &MemoryCaptureStore) -> serde_json::Value {
        let response = handle(request, store, &renderer()).unwrap();
        serde_json::to_value(response).unwrap()
    }

    fn seeded() -> MemoryCaptureStore {
        let store = MemoryCaptureStore::new();
        store
            .append(&CaptureRecord::new(
                "https://example.com",
                "Example",
                Capture::text("hello"),
            ))
            .unwrap();
        store
            .append(&CaptureRecord::new(
                "https://example.com",
                "Example",
                Capture::link("https://example.com", Some("Example")),
            ))
            .unwrap();
        store
    }

    #[test]
    fn test_get_captures_oldest_first() {
        let value = respond(Request::GetCaptures, &seeded());
        let captures = value["captures"].as_array().unwrap();
        assert_eq!(captures.len(), 2);
        assert_eq!(captures[0]["type"], "text");
        assert_eq!(captures[1]["type"], "link");
    }

    #[test]
    fn test_clear_captures() {
        let store = seeded();
        let value = respond(Request::ClearCaptures, &store);
        assert_eq!(value, serde_json::json!({"success": true, "badge": ""}));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_export_renders_given_captures() {
        let store = seeded();
        let captures = store.list().unwrap();
        let value = respond(Request::ExportToObsidian { captures }, &MemoryCaptureStore::new());

        assert_eq!(value["success"], true);
        let markdown = value["markdown"].as_str().unwrap();
        let quote = markdown.find("> hello").unwrap();
        let link = markdown.find("[Example](https://example.com)").unwrap();
        assert!(quote < link);
    }

    #[test]
    fn test_empty_export_fails() {
        let value = respond(
            Request::ExportToObsidian {
                captures: Vec::new(),
            },
            &seeded(),
        );
        assert_eq!(
            value,
            serde_json::json!({"success": false, "error": "No captures to export!"})
        );
    }

    #[test]
    fn test_page_content_is_not_served_here() {
        let value = respond(Request::GetPageContent, &seeded());
        assert_eq!(value["success"], false);
    }

    #[test]
    fn test_menus() {
        let value = respond(Request::GetMenus, &MemoryCaptureStore::new());
        assert_eq!(value["menus"].as_array().unwrap().len(), 6);
    }
}
