//! aptitude CLI — take the quiz, read the report, export and share it.

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod app;
mod commands;
mod config;
mod render;

use config::AptitudeConfig;

#[derive(Parser)]
#[command(
    name = "aptitude",
    version,
    about = "Single-session aptitude quiz with a scored report"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for session, answers and result records
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enter a name and start a new quiz
    Start {
        /// Display name; prompted for when omitted
        #[arg(long)]
        name: Option<String>,
    },

    /// Continue the quiz in progress
    Quiz,

    /// Show the result report
    Report {
        /// Output format: text, html, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Accept single-key commands after the report (s, h, r, q)
        #[arg(long)]
        interactive: bool,
    },

    /// Export the report as a paginated A4 document
    Export {
        /// Directory to write into (default: export_dir from config)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Share the headline result
    Share,

    /// Delete the session, answers and result
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Create a starter config and an editable question bank
    Init,

    /// Validate a question bank file
    Validate {
        /// Question bank TOML (default: configured or built-in bank)
        #[arg(long)]
        bank: Option<PathBuf>,
    },
}

fn load_config(cli_config: Option<PathBuf>, state_dir: Option<PathBuf>) -> Result<AptitudeConfig> {
    let mut config = config::load_config_from(cli_config.as_deref())?;
    if let Some(dir) = state_dir {
        config.state_dir = dir;
    }
    Ok(config)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("aptitude=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        command => match load_config(cli.config, cli.state_dir) {
            Err(e) => Err(e),
            Ok(config) => match command {
                Commands::Start { name } => commands::start::execute(config, name),
                Commands::Quiz => commands::quiz::execute(config),
                Commands::Report {
                    format,
                    output,
                    interactive,
                } => commands::report::execute(config, format, output, interactive).await,
                Commands::Export { output_dir } => {
                    commands::export::execute(config, output_dir).await
                }
                Commands::Share => commands::share::execute(config),
                Commands::Reset { yes } => commands::reset::execute(config, yes),
                Commands::Validate { bank } => commands::validate::execute(config, bank),
                Commands::Init => commands::init::execute(),
            },
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
