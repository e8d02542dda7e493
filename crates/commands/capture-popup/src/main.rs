//! Popup: browse, export and clear stored captures from a terminal.

use anyhow::{Result, bail};
use capture_common::prelude::*;
use capture_common::subprocess::run_command_with_input;
use capture_core::{CaptureStore, FileCaptureStore};
use capture_export::{MarkdownRenderer, export_markdown, render_html, render_text};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::time::Duration;

const CLIPBOARD_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Parser)]
#[command(name = "capture-popup", version, about = "Browse, export and clear web captures")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show capture counts and captures, newest first
    List {
        /// Render the popup HTML fragment instead of text
        #[arg(long)]
        html: bool,
    },
    /// Copy every capture to the clipboard as Markdown
    Export {
        /// Print the Markdown instead of copying it
        #[arg(long)]
        stdout: bool,
    },
    /// Remove every capture
    Clear {
        /// Confirm; clearing cannot be undone
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = CaptureConfig::from_env();
    let store = FileCaptureStore::from_config(&config);

    match cli.command {
        Command::List { html } => {
            let captures = store.list()?;
            let now = Utc::now();
            if html {
                print!("{}", render_html(&captures, now));
            } else {
                print!("{}", render_text(&captures, now));
            }
        }
        Command::Export { stdout } => {
            let captures = store.list()?;
            let markdown = export_markdown(&captures, &MarkdownRenderer::local())?;

            if stdout {
                print!("{}", markdown);
            } else {
                copy_to_clipboard(&config.clipboard_command, &markdown)?;
                println!("Markdown copied to clipboard! Paste it in Obsidian.");
            }
        }
        Command::Clear { yes } => {
            if !yes {
                bail!("Clear all captures? This cannot be undone. Re-run with --yes to confirm.");
            }
            store.clear()?;
            println!("Cleared all captures.");
        }
    }

    Ok(())
}

fn copy_to_clipboard(command: &str, text: &str) -> Result<()> {
    let result = run_command_with_input(command, text.as_bytes(), &[], CLIPBOARD_TIMEOUT)
        .with_context(|| format!("Failed to run clipboard command: {}", command))?;

    if !result.success {
        bail!(
            "Clipboard command `{}` failed: {}",
            command,
            result.stderr.trim()
        );
    }
    Ok(())
}
