//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined and the radar
//! chart embedded as SVG.

use std::path::Path;

use anyhow::{Context, Result};

use aptitude_core::view::ReportView;

use crate::html_escape;
use crate::radar::radar_svg;

const RADAR_SIZE: u32 = 420;

/// Generate an HTML report from a report view.
pub fn generate_html(view: &ReportView) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Aptitude report — {}</title>\n",
        html_escape(&view.display_name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n<main class=\"result-container\">\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!(
        "<h1><span class=\"name\">{}</span>'s future potential</h1>\n",
        html_escape(&view.display_name)
    ));
    html.push_str(&format!(
        "<p class=\"meta\">Completed {}</p>\n",
        view.completed_at.format("%Y-%m-%d %H:%M UTC")
    ));
    html.push_str("</header>\n");

    // Primary potential
    let primary = &view.primary;
    html.push_str("<section class=\"primary\">\n");
    html.push_str(&format!(
        "<div class=\"emoji\">{}</div>\n<h2>{}</h2>\n<p>{}</p>\n",
        html_escape(&primary.emoji),
        html_escape(&primary.name),
        html_escape(&primary.description)
    ));

    if !primary.careers.is_empty() {
        html.push_str("<h3>Possible careers</h3>\n<div class=\"careers\">\n");
        for career in &primary.careers {
            html.push_str(&format!(
                "<span class=\"career-item\">{}</span>\n",
                html_escape(career)
            ));
        }
        html.push_str("</div>\n");
    }

    if !primary.suggestions.is_empty() {
        html.push_str("<h3>How to encourage it</h3>\n<ul class=\"suggestions\">\n");
        for suggestion in &primary.suggestions {
            html.push_str(&format!(
                "<li class=\"suggestion-item\">{}</li>\n",
                html_escape(suggestion)
            ));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</section>\n");

    // Secondary potentials
    if !view.secondary.is_empty() {
        html.push_str("<section class=\"secondary\">\n<h2>Other potentials</h2>\n");
        for s in &view.secondary {
            html.push_str(&format!(
                "<div class=\"potential-talent-item\"><span>{}</span> {} ({}%)</div>\n",
                html_escape(&s.emoji),
                html_escape(&s.name),
                s.percentage
            ));
        }
        html.push_str("</section>\n");
    }

    // Radar chart
    html.push_str("<section class=\"chart\">\n<h2>Potential index</h2>\n");
    html.push_str(&radar_svg(&view.radar, RADAR_SIZE));
    html.push_str("</section>\n");

    html.push_str("</main>\n</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(view: &ReportView, path: &Path) -> Result<()> {
    let html = generate_html(view);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --accent: #ff69b4; --muted: #6b7280; --card: #fdf2f8; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --muted: #9ca3af; --card: #1f2937; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
.result-container { max-width: 720px; margin: 0 auto; }
h1, h2 { margin-top: 2rem; }
.name { color: var(--accent); }
.meta { color: var(--muted); }
.primary { background: var(--card); border-radius: 16px; padding: 1.5rem; text-align: center; }
.emoji { font-size: 3rem; }
.careers { display: flex; flex-wrap: wrap; gap: 0.5rem; justify-content: center; }
.career-item { border: 1px solid var(--accent); border-radius: 999px; padding: 0.25rem 0.75rem; }
.suggestions { text-align: left; }
.potential-talent-item { margin-bottom: 0.5rem; }
.chart { text-align: center; }
"#;
