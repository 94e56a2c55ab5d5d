//! The `aptitude share` command.

use std::io::{self, Write};

use anyhow::{Context, Result};

use aptitude_core::view::{report_view, share_text, ReportView};
use aptitude_core::Gate;
use aptitude_report::share::{
    share_summary, Clipboard, CommandShare, ShareOutcome, ShareTarget, SystemClipboard,
};

use crate::app::App;
use crate::config::AptitudeConfig;

use super::redirect_hint;

pub fn execute(config: AptitudeConfig) -> Result<()> {
    let app = App::open(config)?;
    let mut out = io::stdout().lock();
    run(&app, &SystemClipboard, &mut out)
}

pub fn run<W: Write>(app: &App, clipboard: &dyn Clipboard, out: &mut W) -> Result<()> {
    let result = match app.controller.load_report().context("failed to load result")? {
        Gate::Open(result) => result,
        Gate::RedirectToIntake => return redirect_hint(out, "quiz result"),
    };
    let view = report_view(app.controller.bank(), &result);
    share_view(app, &view, clipboard, out)
}

/// Share through the configured command, else copy to `clipboard`.
pub fn share_view<W: Write>(
    app: &App,
    view: &ReportView,
    clipboard: &dyn Clipboard,
    out: &mut W,
) -> Result<()> {
    let text = share_text(view);
    let target = app
        .config
        .share_command
        .as_deref()
        .and_then(CommandShare::from_command_line);

    let outcome = share_summary(
        &text,
        app.config.share_url.as_deref(),
        target.as_ref().map(|t| t as &dyn ShareTarget),
        clipboard,
    )
    .context("failed to copy share text")?;

    match outcome {
        ShareOutcome::Shared(name) => writeln!(out, "Shared via {name}.")?,
        ShareOutcome::Copied => writeln!(out, "Copied to clipboard: {text}")?,
        ShareOutcome::Failed => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingClipboard(RefCell<Vec<String>>);

    impl Clipboard for RecordingClipboard {
        fn copy(&self, text: &str) -> Result<()> {
            self.0.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    struct DeniedClipboard;

    impl Clipboard for DeniedClipboard {
        fn copy(&self, _: &str) -> Result<()> {
            anyhow::bail!("no display")
        }
    }

    fn completed_app(dir: &std::path::Path, config: AptitudeConfig) -> App {
        let app = App::open(AptitudeConfig {
            state_dir: dir.to_path_buf(),
            ..config
        })
        .unwrap();
        app.controller.start("Mia").unwrap();
        let state = app.controller.resume().unwrap().open().unwrap();
        app.controller.complete(&state).unwrap();
        app
    }

    #[test]
    fn fallback_copies_text_with_link() {
        let dir = tempfile::tempdir().unwrap();
        let app = completed_app(
            dir.path(),
            AptitudeConfig {
                share_url: Some("https://example.org/quiz".into()),
                ..Default::default()
            },
        );
        let clipboard = RecordingClipboard::default();
        let mut out = Vec::new();

        run(&app, &clipboard, &mut out).unwrap();

        let copied = clipboard.0.borrow();
        assert_eq!(copied.len(), 1);
        assert!(copied[0].starts_with("I found out that Mia is a"));
        assert!(copied[0].ends_with(" https://example.org/quiz"));
        assert!(String::from_utf8(out)
            .unwrap()
            .starts_with("Copied to clipboard: I found out that Mia"));
    }

    #[test]
    fn clipboard_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let app = completed_app(dir.path(), AptitudeConfig::default());
        let mut out = Vec::new();

        let err = run(&app, &DeniedClipboard, &mut out).unwrap_err();
        assert!(format!("{err:#}").contains("no display"));
        assert!(out.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn configured_command_receives_text() {
        let dir = tempfile::tempdir().unwrap();
        let app = completed_app(
            dir.path(),
            AptitudeConfig {
                share_command: Some("cat".into()),
                ..Default::default()
            },
        );
        let clipboard = RecordingClipboard::default();
        let mut out = Vec::new();

        run(&app, &clipboard, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Shared via cat.\n");
        assert!(clipboard.0.borrow().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let app = completed_app(
            dir.path(),
            AptitudeConfig {
                share_command: Some("false".into()),
                ..Default::default()
            },
        );
        let mut out = Vec::new();
        run(&app, &DeniedClipboard, &mut out).unwrap();
        assert!(out.is_empty());
    }
}
