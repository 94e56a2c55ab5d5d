//! Shared command context: configuration plus the stage controller.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use aptitude_core::{JsonFileStore, QuestionBank, SessionController};

use crate::config::AptitudeConfig;

pub struct App {
    pub config: AptitudeConfig,
    pub controller: SessionController<JsonFileStore>,
}

impl App {
    pub fn open(config: AptitudeConfig) -> Result<Self> {
        let bank = match &config.question_bank {
            Some(path) => QuestionBank::load(path)
                .with_context(|| format!("failed to load question bank {}", path.display()))?,
            None => QuestionBank::builtin().context("built-in question bank is invalid")?,
        };
        let store = JsonFileStore::new(&config.state_dir);
        let controller = SessionController::new(store, bank)
            .with_default_name(config.default_display_name.clone());
        Ok(Self { config, controller })
    }
}

/// Read one line. `None` at end of input.
pub fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Ask a yes/no question; anything but `y`/`yes` is no.
pub fn confirm(prompt: &str, input: &mut impl BufRead, out: &mut impl Write) -> Result<bool> {
    write!(out, "{prompt} [y/N] ")?;
    out.flush()?;
    Ok(read_line(input)?
        .map(|answer| matches!(answer.to_lowercase().as_str(), "y" | "yes"))
        .unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn confirm_accepts_only_yes() {
        let mut out = Vec::new();
        assert!(confirm("Reset?", &mut Cursor::new("y\n"), &mut out).unwrap());
        assert!(confirm("Reset?", &mut Cursor::new("YES\n"), &mut out).unwrap());
        assert!(!confirm("Reset?", &mut Cursor::new("\n"), &mut out).unwrap());
        assert!(!confirm("Reset?", &mut Cursor::new(""), &mut out).unwrap());
        assert!(String::from_utf8(out).unwrap().contains("[y/N]"));
    }

    #[test]
    fn read_line_trims_and_detects_eof() {
        let mut input = Cursor::new("  Mia  \n");
        assert_eq!(read_line(&mut input).unwrap().as_deref(), Some("Mia"));
        assert!(read_line(&mut input).unwrap().is_none());
    }
}
