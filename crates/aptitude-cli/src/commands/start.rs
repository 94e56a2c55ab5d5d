//! The `aptitude start` command: intake, then straight into the quiz.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use aptitude_core::{Gate, Session};

use crate::app::{read_line, App};
use crate::config::AptitudeConfig;

use super::quiz;

pub fn execute(config: AptitudeConfig, name: Option<String>) -> Result<()> {
    let app = App::open(config)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();
    run(&app, name, &mut input, &mut out)
}

pub fn run<R: BufRead, W: Write>(
    app: &App,
    name: Option<String>,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let Some(session) = intake(app, name, input, out)? else {
        return Ok(());
    };
    writeln!(
        out,
        "Hi {}! {} questions ahead. Pick one or two answers for each.",
        session.display_name,
        app.controller.bank().len()
    )?;

    let Gate::Open(mut state) = app.controller.resume()? else {
        anyhow::bail!("session record vanished right after intake");
    };
    quiz::drive(app, &mut state, input, out)
}

/// Ask for a name unless one was given. End of input cancels intake
/// without touching the store.
pub fn intake<R: BufRead, W: Write>(
    app: &App,
    name: Option<String>,
    input: &mut R,
    out: &mut W,
) -> Result<Option<Session>> {
    let name = match name {
        Some(name) => name,
        None => {
            write!(
                out,
                "What's your child's name? (blank for \"{}\") ",
                app.config.default_display_name
            )?;
            out.flush()?;
            match read_line(input)? {
                Some(name) => name,
                None => {
                    writeln!(out, "\nIntake cancelled.")?;
                    return Ok(None);
                }
            }
        }
    };

    let session = app
        .controller
        .start(&name)
        .context("failed to start session")?;
    Ok(Some(session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aptitude_core::{RecordKey, RecordStore};
    use std::io::Cursor;

    fn app(dir: &std::path::Path) -> App {
        App::open(AptitudeConfig {
            state_dir: dir.to_path_buf(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn blank_name_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let mut out = Vec::new();

        let session = intake(&app, None, &mut Cursor::new("\n"), &mut out)
            .unwrap()
            .unwrap();
        assert_eq!(session.display_name, "Baby");
    }

    #[test]
    fn eof_at_prompt_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let mut out = Vec::new();

        assert!(intake(&app, None, &mut Cursor::new(""), &mut out)
            .unwrap()
            .is_none());
        assert!(app
            .controller
            .store()
            .read(RecordKey::Session)
            .unwrap()
            .is_none());
        assert!(String::from_utf8(out).unwrap().contains("cancelled"));
    }

    #[test]
    fn start_then_quit_keeps_session() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let mut out = Vec::new();

        run(
            &app,
            Some("Mia".into()),
            &mut Cursor::new("a\nquit\n"),
            &mut out,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Hi Mia!"));
        assert!(text.contains("unfinished (1/12 answered)"));
    }
}
