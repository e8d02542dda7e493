//! Response output for stdout.

use serde::Serialize;
use std::io::{self, Write};

/// Badge shown briefly after a successful capture.
pub const BADGE_CHECKMARK: &str = "✓";

/// Steady-state badge text for the given capture count.
///
/// An empty store clears the badge.
pub fn badge_text(count: usize) -> String {
    if count == 0 {
        String::new()
    } else {
        count.to_string()
    }
}

/// Write a response as a single JSON document to stdout.
pub fn write_stdout<T: Serialize>(response: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string(response)?;
    let mut stdout = io::stdout();
    stdout.write_all(json.as_bytes())?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}
