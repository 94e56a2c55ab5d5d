//! The `aptitude quiz` command: resume and drive the question loop.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use aptitude_core::recorder::Toggle;
use aptitude_core::view::{quiz_view, report_view, QuizView};
use aptitude_core::{Advance, Gate, QuizError, QuizResult, QuizState};

use crate::app::{read_line, App};
use crate::config::AptitudeConfig;
use crate::render::{render_question, render_report};

use super::redirect_hint;

/// How a run of the question loop ended.
#[derive(Debug)]
pub enum QuizExit {
    Completed(QuizResult),
    /// The user quit or input ran out; answers so far are saved.
    Paused,
}

enum Input<'a> {
    Next,
    Back,
    Quit,
    Choose(Vec<&'a str>),
}

impl<'a> Input<'a> {
    fn parse(line: &'a str) -> Self {
        match line.to_lowercase().as_str() {
            "" | "next" => Input::Next,
            "back" => Input::Back,
            "quit" | "exit" => Input::Quit,
            _ => Input::Choose(
                line.split(|c: char| c.is_whitespace() || c == ',')
                    .filter(|t| !t.is_empty())
                    .collect(),
            ),
        }
    }
}

/// Map a typed token to an option index: letter first, then 1-based number.
fn option_index(view: &QuizView, token: &str) -> Option<usize> {
    if let Some(option) = view
        .options
        .iter()
        .find(|o| o.letter.eq_ignore_ascii_case(token))
    {
        return Some(option.index);
    }
    token
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=view.options.len()).contains(n))
        .map(|n| n - 1)
}

pub fn execute(config: AptitudeConfig) -> Result<()> {
    let app = App::open(config)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();
    run(&app, &mut input, &mut out)
}

pub fn run<R: BufRead, W: Write>(app: &App, input: &mut R, out: &mut W) -> Result<()> {
    let mut state = match app.controller.resume().context("failed to load quiz")? {
        Gate::Open(state) => state,
        Gate::RedirectToIntake => return redirect_hint(out, "quiz session"),
    };
    drive(app, &mut state, input, out)
}

/// Run the loop and print the outcome.
pub fn drive<R: BufRead, W: Write>(
    app: &App,
    state: &mut QuizState,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    match run_quiz(app, state, input, out)? {
        QuizExit::Completed(result) => {
            let view = report_view(app.controller.bank(), &result);
            write!(out, "{}", render_report(&view))?;
            writeln!(
                out,
                "Run `aptitude export` to save this report or `aptitude share` to share it."
            )?;
        }
        QuizExit::Paused => {
            writeln!(
                out,
                "\nYour quiz is unfinished ({}/{} answered). Run `aptitude quiz` to continue.",
                state.sheet.len(),
                app.controller.bank().len()
            )?;
        }
    }
    Ok(())
}

pub fn run_quiz<R: BufRead, W: Write>(
    app: &App,
    state: &mut QuizState,
    input: &mut R,
    out: &mut W,
) -> Result<QuizExit> {
    let controller = &app.controller;

    loop {
        let Some(view) = quiz_view(controller.bank(), state) else {
            // Resumed with every question already answered.
            let result = controller.complete(state).context("failed to save result")?;
            return Ok(QuizExit::Completed(result));
        };

        write!(out, "{}", render_question(&view))?;
        out.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(QuizExit::Paused);
        };

        match Input::parse(&line) {
            Input::Quit => return Ok(QuizExit::Paused),
            Input::Back => {
                if !controller.back(state) {
                    writeln!(out, "Already at the first question.")?;
                }
            }
            Input::Next => match controller.next(state) {
                Ok(Advance::Question(_)) => {}
                Ok(Advance::Completed(result)) => return Ok(QuizExit::Completed(result)),
                Err(QuizError::NoSelection(_)) => {
                    writeln!(out, "Pick at least one option first.")?;
                }
                Err(e) => return Err(e).context("failed to advance quiz"),
            },
            Input::Choose(tokens) => {
                for token in tokens {
                    let Some(index) = option_index(&view, token) else {
                        writeln!(out, "Unknown choice '{token}'.")?;
                        continue;
                    };
                    if let Toggle::Replaced { evicted, .. } = controller.select(state, index)? {
                        if let Some(dropped) = view.options.iter().find(|o| o.index == evicted) {
                            writeln!(out, "Two answers at most: dropped {}.", dropped.letter)?;
                        }
                    }
                }
            }
        }
    }
}
