//! Sharing the headline result.
//!
//! A platform share target is tried first when one is configured; without
//! one the text goes to the clipboard fallback. A failed platform share is
//! only logged. A failed clipboard copy is returned to the caller.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

pub const SHARE_TITLE: &str = "Future Career Potential Quiz";

/// Platform share primitive.
pub trait ShareTarget {
    fn name(&self) -> &str;
    fn share(&self, title: &str, text: &str) -> Result<()>;
}

/// Clipboard primitive used when no share target is available.
pub trait Clipboard {
    fn copy(&self, text: &str) -> Result<()>;
}

/// What happened to a share request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Handed to the named platform target.
    Shared(String),
    /// Copied to the clipboard fallback.
    Copied,
    /// The platform target failed; nothing visible happened.
    Failed,
}

/// Share `text`, falling back to the clipboard when `target` is `None`.
///
/// The clipboard copy gets `url` appended when one is given.
pub fn share_summary(
    text: &str,
    url: Option<&str>,
    target: Option<&dyn ShareTarget>,
    clipboard: &dyn Clipboard,
) -> Result<ShareOutcome> {
    if let Some(target) = target {
        return Ok(match target.share(SHARE_TITLE, text) {
            Ok(()) => {
                tracing::info!(target = target.name(), "result shared");
                ShareOutcome::Shared(target.name().to_string())
            }
            Err(e) => {
                tracing::warn!(target = target.name(), error = %e, "share failed");
                ShareOutcome::Failed
            }
        });
    }

    let payload = match url {
        Some(url) => format!("{text} {url}"),
        None => text.to_string(),
    };
    clipboard.copy(&payload)?;
    Ok(ShareOutcome::Copied)
}

/// Pipes the share text into an external command, e.g. `wl-copy` or a
/// desktop share helper.
#[derive(Debug, Clone)]
pub struct CommandShare {
    program: String,
    args: Vec<String>,
}

impl CommandShare {
    /// Build from a whitespace-separated command line. `None` if blank.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl ShareTarget for CommandShare {
    fn name(&self) -> &str {
        &self.program
    }

    fn share(&self, title: &str, text: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("APTITUDE_SHARE_TITLE", title)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to start share command '{}'", self.program))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }
        let status = child.wait()?;
        anyhow::ensure!(status.success(), "share command exited with {status}");
        Ok(())
    }
}

/// The desktop clipboard, via arboard.
#[derive(Debug, Clone, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("clipboard unavailable")?;
        clipboard
            .set_text(text.to_string())
            .context("failed to copy to clipboard")?;
        tracing::debug!(bytes = text.len(), "share text copied");
        Ok(())
    }
}
