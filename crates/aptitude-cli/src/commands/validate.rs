//! The `aptitude validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use aptitude_core::bank::validate_bank;
use aptitude_core::QuestionBank;

use crate::config::AptitudeConfig;

/// Check `bank_path`, else the configured bank, else the built-in one.
pub fn execute(config: AptitudeConfig, bank_path: Option<PathBuf>) -> Result<()> {
    let bank = match bank_path.or(config.question_bank) {
        Some(path) => QuestionBank::load(&path)
            .with_context(|| format!("failed to load question bank {}", path.display()))?,
        None => QuestionBank::builtin().context("built-in question bank is invalid")?,
    };

    println!("Question bank: {} ({} questions)", bank.name, bank.len());

    let warnings = validate_bank(&bank);
    for w in &warnings {
        let prefix = w
            .question_id
            .map(|id| format!("  [Q{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Question bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }
    Ok(())
}
