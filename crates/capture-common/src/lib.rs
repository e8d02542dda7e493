//! Common plumbing for the web capture commands.
//!
//! This crate provides shared functionality for every entry point:
//! - JSON request/response handling over stdin/stdout
//! - Key-value state file with an exclusive writer lock
//! - Subprocess execution with a bounded wait
//! - Environment configuration
//! - Debug logging

pub mod config;
pub mod debug;
pub mod input;
pub mod output;
pub mod state;
pub mod subprocess;

pub use config::CaptureConfig;
pub use debug::{CaptureLog, is_debug_enabled, log_event};
pub use input::{MenuClick, Tab, read_stdin};
pub use output::{BADGE_CHECKMARK, badge_text, write_stdout};
pub use state::{KvFile, KvLock, StateError};
pub use subprocess::{CommandResult, SubprocessError, run_command_with_input};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::CaptureConfig;
    pub use crate::debug::{CaptureLog, is_debug_enabled, log_event};
    pub use crate::input::{MenuClick, Tab, read_stdin};
    pub use crate::output::{BADGE_CHECKMARK, badge_text, write_stdout};
    pub use anyhow::{Context, Result};
    pub use serde::{Deserialize, Serialize};
}
