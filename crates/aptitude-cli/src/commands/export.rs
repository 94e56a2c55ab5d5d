//! The `aptitude export` command.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use aptitude_core::view::{report_view, ReportView};
use aptitude_core::Gate;
use aptitude_report::export::{export_report, HtmlPagesWriter, PageLayout, PngCapture};

use crate::app::App;
use crate::config::AptitudeConfig;

use super::redirect_hint;

pub async fn execute(config: AptitudeConfig, output_dir: Option<PathBuf>) -> Result<()> {
    let app = App::open(config)?;
    let mut out = io::stdout().lock();
    run(&app, output_dir.as_deref(), &mut out).await
}

pub async fn run<W: Write>(app: &App, output_dir: Option<&Path>, out: &mut W) -> Result<()> {
    let result = match app.controller.load_report().context("failed to load result")? {
        Gate::Open(result) => result,
        Gate::RedirectToIntake => return redirect_hint(out, "quiz result"),
    };
    let view = report_view(app.controller.bank(), &result);
    let dir = output_dir.unwrap_or(&app.config.export_dir);

    let path = export_view(&view, dir).await.context("export failed")?;
    writeln!(out, "Report saved to {}", path.display())?;
    Ok(())
}

/// Capture the report and write the paginated document into `dir`.
pub async fn export_view(view: &ReportView, dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;
    export_report(
        view,
        &PngCapture::default(),
        &HtmlPagesWriter,
        &PageLayout::A4,
        dir,
        Local::now().date_naive(),
    )
    .await
}
