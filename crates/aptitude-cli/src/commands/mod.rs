//! Subcommand implementations.
//!
//! Interactive commands take their input and output as parameters so the
//! flows can be driven from tests; `execute` wires them to stdin/stdout.

pub mod export;
pub mod init;
pub mod quiz;
pub mod report;
pub mod reset;
pub mod share;
pub mod start;
pub mod validate;

use std::io::Write;

use anyhow::Result;

/// Printed when a stage is entered without its upstream record.
pub(crate) fn redirect_hint(out: &mut impl Write, missing: &str) -> Result<()> {
    writeln!(out, "No {missing} found. Run `aptitude start` to begin a new quiz.")?;
    Ok(())
}
