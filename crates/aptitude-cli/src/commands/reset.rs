//! The `aptitude reset` command.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use crate::app::{confirm, App};
use crate::config::AptitudeConfig;

pub fn execute(config: AptitudeConfig, yes: bool) -> Result<()> {
    let app = App::open(config)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();
    run(&app, yes, &mut input, &mut out)
}

pub fn run<R: BufRead, W: Write>(app: &App, yes: bool, input: &mut R, out: &mut W) -> Result<()> {
    if !yes && !confirm("Delete the session, answers and result?", input, out)? {
        writeln!(out, "Nothing deleted.")?;
        return Ok(());
    }
    app.controller.reset().context("failed to reset quiz data")?;
    writeln!(out, "Quiz data cleared.")?;
    Ok(())
}
