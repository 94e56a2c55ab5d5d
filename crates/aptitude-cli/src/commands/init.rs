//! The `aptitude init` command.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use aptitude_core::QuestionBank;

use crate::config::SAMPLE_CONFIG;

pub fn execute() -> Result<()> {
    let mut out = io::stdout().lock();
    run(Path::new("."), &mut out)
}

pub fn run<W: Write>(dir: &Path, out: &mut W) -> Result<()> {
    write_once(&dir.join("aptitude.toml"), SAMPLE_CONFIG, out)?;
    write_once(
        &dir.join("question-bank.toml"),
        QuestionBank::builtin_source(),
        out,
    )?;

    writeln!(out, "\nNext steps:")?;
    writeln!(out, "  1. Edit aptitude.toml (uncomment question_bank to use your copy)")?;
    writeln!(out, "  2. Run: aptitude validate --bank question-bank.toml")?;
    writeln!(out, "  3. Run: aptitude start")?;
    Ok(())
}

fn write_once<W: Write>(path: &Path, content: &str, out: &mut W) -> Result<()> {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    if path.exists() {
        writeln!(out, "{name} already exists, skipping.")?;
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        writeln!(out, "Created {name}")?;
    }
    Ok(())
}
