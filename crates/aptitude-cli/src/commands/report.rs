//! The `aptitude report` command.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use aptitude_core::view::{report_view, ReportView};
use aptitude_core::Gate;
use aptitude_report::html::{generate_html, write_html_report};
use aptitude_report::share::SystemClipboard;

use crate::app::{confirm, read_line, App};
use crate::config::AptitudeConfig;
use crate::render::render_report;

use super::{export, redirect_hint, share};

pub async fn execute(
    config: AptitudeConfig,
    format: String,
    output: Option<PathBuf>,
    interactive: bool,
) -> Result<()> {
    let app = App::open(config)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();
    run(
        &app,
        &format,
        output.as_deref(),
        interactive,
        &mut input,
        &mut out,
    )
    .await
}

pub async fn run<R: BufRead, W: Write>(
    app: &App,
    format: &str,
    output: Option<&Path>,
    interactive: bool,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let result = match app.controller.load_report().context("failed to load result")? {
        Gate::Open(result) => result,
        Gate::RedirectToIntake => return redirect_hint(out, "quiz result"),
    };
    let view = report_view(app.controller.bank(), &result);

    match (format, output) {
        ("html", Some(path)) => {
            write_html_report(&view, path)?;
            writeln!(out, "HTML report written to {}", path.display())?;
        }
        (_, output) => {
            let rendered = match format {
                "text" => render_report(&view),
                "html" => generate_html(&view),
                "json" => serde_json::to_string_pretty(&view)? + "\n",
                other => anyhow::bail!("unknown format '{other}' (expected text, html or json)"),
            };
            match output {
                Some(path) => {
                    std::fs::write(path, rendered)
                        .with_context(|| format!("failed to write report to {}", path.display()))?;
                    writeln!(out, "Report written to {}", path.display())?;
                }
                None => write!(out, "{rendered}")?,
            }
        }
    }

    if interactive {
        key_loop(app, &view, input, out).await?;
    }
    Ok(())
}

/// Single-key actions on the report screen.
async fn key_loop<R: BufRead, W: Write>(
    app: &App,
    view: &ReportView,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    loop {
        write!(out, "\n[s] save  [h] share  [r] start over  [q] quit > ")?;
        out.flush()?;
        let Some(key) = read_line(input)? else {
            return Ok(());
        };

        match key.to_lowercase().as_str() {
            "s" => match export::export_view(view, &app.config.export_dir).await {
                Ok(path) => writeln!(out, "Report saved to {}", path.display())?,
                Err(e) => writeln!(out, "Export failed: {e:#}")?,
            },
            "h" => share::share_view(app, view, &SystemClipboard, out)?,
            "r" => {
                if confirm("Start over? The current result will be deleted.", input, out)? {
                    app.controller.reset().context("failed to reset")?;
                    writeln!(out, "Cleared. Run `aptitude start` to take the quiz again.")?;
                    return Ok(());
                }
            }
            "q" => return Ok(()),
            "" => {}
            other => writeln!(out, "Unknown key '{other}'.")?,
        }
    }
}
