//! Terminal rendering of view descriptions.

use comfy_table::{Cell, CellAlignment, Table};

use aptitude_core::view::{AdvanceLabel, QuizView, ReportView};

const BAR_WIDTH: usize = 20;

fn bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn render_question(view: &QuizView) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\nQuestion {}/{}  [{}] {:.0}%\n",
        view.number,
        view.total,
        bar(view.progress_percent),
        view.progress_percent
    ));
    out.push_str(&format!("{}\n", view.text));
    if !view.hint.is_empty() {
        out.push_str(&format!("  ({})\n", view.hint));
    }
    for option in &view.options {
        let mark = if option.selected { "x" } else { " " };
        out.push_str(&format!("  [{mark}] {}. {}\n", option.letter, option.text));
    }

    let forward = match view.advance_label {
        AdvanceLabel::Next => "next",
        AdvanceLabel::SeeResults => "next (see results)",
    };
    let mut actions = vec!["letter to toggle (up to two)".to_string()];
    if view.can_advance {
        actions.push(forward.to_string());
    }
    if view.can_go_back {
        actions.push("back".to_string());
    }
    actions.push("quit".to_string());
    out.push_str(&format!("> {}\n", actions.join(", ")));
    out
}

pub fn render_report(view: &ReportView) -> String {
    let mut out = String::new();
    let primary = &view.primary;

    out.push_str(&format!("\n{}'s future potential\n\n", view.display_name));
    out.push_str(&format!("{} {}\n", primary.emoji, primary.name));
    out.push_str(&format!("{}\n", primary.description));

    if !primary.careers.is_empty() {
        out.push_str(&format!("\nPossible careers: {}\n", primary.careers.join(", ")));
    }
    if !primary.suggestions.is_empty() {
        out.push_str("\nHow to encourage it:\n");
        for s in &primary.suggestions {
            out.push_str(&format!("  - {s}\n"));
        }
    }
    if !view.secondary.is_empty() {
        out.push_str("\nOther potentials:\n");
        for s in &view.secondary {
            out.push_str(&format!("  {} {} ({}%)\n", s.emoji, s.name, s.percentage));
        }
    }

    let mut table = Table::new();
    table.set_header(vec!["Potential", "Index", ""]);
    for point in &view.radar {
        table.add_row(vec![
            Cell::new(format!("{} {}", point.emoji, point.label)),
            Cell::new(format!("{}%", point.percentage)).set_alignment(CellAlignment::Right),
            Cell::new(bar(f64::from(point.percentage))),
        ]);
    }
    out.push_str(&format!("\n{table}\n"));
    out
}
