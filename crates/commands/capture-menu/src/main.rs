//! Context-menu handler: capture the clicked fragment.
//!
//! Reads one menu click from stdin, stores the resulting capture and
//! acknowledges it with the transient badge.

use anyhow::Result;
use capture_common::prelude::*;
use capture_core::{CaptureAck, FileCaptureStore, Producer, responder_from_config};

fn main() -> Result<()> {
    let click = MenuClick::from_stdin()?;

    let config = CaptureConfig::from_env();
    let store = FileCaptureStore::from_config(&config);
    let responder = responder_from_config(&config);

    // A failed page round trip aborts here; nothing is stored
    let captured = Producer::new(&store, responder.as_ref())
        .capture(&click)
        .with_context(|| format!("Failed to capture {}", click.menu_item_id))?;

    write_stdout(&CaptureAck {
        success: true,
        capture_type: captured.record.capture_type(),
        count: captured.count,
        badge: BADGE_CHECKMARK.to_string(),
    })
}
