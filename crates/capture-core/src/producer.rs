//! Capture producer: menu click → capture record → store.

use crate::message::Request;
use crate::schema::{Capture, CaptureRecord, CaptureType, PageContent};
use crate::storage::{CaptureStore, StoreError};
use crate::trigger::{Trigger, TriggerError};
use capture_common::config::CaptureConfig;
use capture_common::debug::log_event;
use capture_common::input::{MenuClick, Tab};
use capture_common::subprocess::{SubprocessError, run_command_with_input};
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

/// Failure of the page content round trip.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("no page responder is configured")]
    NoResponder,

    #[error(transparent)]
    Command(#[from] SubprocessError),

    #[error("page responder exited with {status:?}: {stderr}")]
    Failed { status: Option<i32>, stderr: String },

    #[error("page responder sent an invalid response: {0}")]
    InvalidResponse(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Trigger(#[from] TriggerError),

    #[error("full page capture failed: {0}")]
    Page(#[from] PageError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// In-page collaborator answering `getPageContent`.
pub trait PageResponder {
    fn page_content(&self, tab: &Tab) -> Result<PageContent, PageError>;
}

/// Responder used when none is configured; every request fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResponder;

impl PageResponder for NoResponder {
    fn page_content(&self, _tab: &Tab) -> Result<PageContent, PageError> {
        Err(PageError::NoResponder)
    }
}

/// Responder backed by a shell command.
///
/// The command receives `{"action":"getPageContent"}` on stdin and the tab in
/// `CAPTURE_TAB_ID`, `CAPTURE_TAB_URL` and `CAPTURE_TAB_TITLE`, and must print
/// `{content, metadata}` on stdout within the timeout.
#[derive(Debug, Clone)]
pub struct CommandResponder {
    command: String,
    timeout: Duration,
}

impl CommandResponder {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }
}

impl PageResponder for CommandResponder {
    fn page_content(&self, tab: &Tab) -> Result<PageContent, PageError> {
        let request =
            serde_json::to_vec(&Request::GetPageContent).map_err(PageError::InvalidResponse)?;
        let tab_id = tab.id.map(|id| id.to_string()).unwrap_or_default();

        let result = run_command_with_input(
            &self.command,
            &request,
            &[
                ("CAPTURE_TAB_ID", tab_id.as_str()),
                ("CAPTURE_TAB_URL", tab.url.as_str()),
                ("CAPTURE_TAB_TITLE", tab.title.as_str()),
            ],
            self.timeout,
        )?;

        if !result.success {
            return Err(PageError::Failed {
                status: result.exit_code,
                stderr: result.stderr.trim().to_string(),
            });
        }

        let page: PageContent =
            serde_json::from_str(&result.stdout).map_err(PageError::InvalidResponse)?;
        Ok(page.clamped())
    }
}

/// Pick the responder described by the configuration.
pub fn responder_from_config(config: &CaptureConfig) -> Box<dyn PageResponder> {
    match &config.page_command {
        Some(command) => Box::new(CommandResponder::new(command.clone(), config.page_timeout)),
        None => Box::new(NoResponder),
    }
}

/// A stored capture and the resulting store size.
#[derive(Debug, Clone)]
pub struct Captured {
    pub record: CaptureRecord,
    pub count: usize,
}

/// Turns menu clicks into stored capture records.
pub struct Producer<'a> {
    store: &'a dyn CaptureStore,
    responder: &'a dyn PageResponder,
}

impl<'a> Producer<'a> {
    pub fn new(store: &'a dyn CaptureStore, responder: &'a dyn PageResponder) -> Self {
        Self { store, responder }
    }

    /// Build the record for `click` without storing it.
    ///
    /// Full page clicks wait on the page responder; its failure aborts the capture.
    pub fn build(
        &self,
        click: &MenuClick,
        timestamp: DateTime<Utc>,
    ) -> Result<CaptureRecord, CaptureError> {
        let capture = match Trigger::try_from(click)? {
            Trigger::Selection { text } => Capture::text(text),
            Trigger::Image { src_url, page_url } => Capture::image(src_url, page_url),
            Trigger::Link {
                link_url,
                link_text,
            } => Capture::link(link_url, link_text.as_deref()),
            Trigger::Page => match self.responder.page_content(&click.tab) {
                Ok(page) => Capture::page(page),
                Err(e) => {
                    log_event(
                        "producer",
                        "page_failed",
                        Some(CaptureType::Page.as_str()),
                        &e.to_string(),
                    );
                    return Err(e.into());
                }
            },
            Trigger::Video { src_url, page_url } => Capture::video(src_url, page_url),
        };

        Ok(CaptureRecord::at(
            timestamp,
            click.tab.url.clone(),
            click.tab.title.clone(),
            capture,
        ))
    }

    /// Build the record for `click`, stamped now, and append it to the store.
    pub fn capture(&self, click: &MenuClick) -> Result<Captured, CaptureError> {
        let record = self.build(click, Utc::now())?;
        let count = self.store.append(&record)?;
        Ok(Captured { record, count })
    }
}
