//! `meetmaster` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments and dispatch one protocol command per process.
//! - Map core errors to a user-facing message and a failing exit code.

mod commands;
mod config;
mod prompt;

use clap::{Parser, Subcommand, ValueEnum};
use meetmaster_core::RecordKind;
use std::path::PathBuf;
use std::process::ExitCode;

// ============================================================================
// CLI Types
// ============================================================================

/// MeetMaster - keep a meeting protocol of information, decisions and tasks
#[derive(Parser, Debug)]
#[command(name = "meetmaster", version = meetmaster_core::core_version(), long_about = None)]
struct Cli {
    /// Protocol file to read and rewrite
    #[arg(short, long, env = "MEETMASTER_FILE", default_value = config::DEFAULT_PROTOCOL_FILE, global = true)]
    file: PathBuf,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "MEETMASTER_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for log files; logging is off when unset
    #[arg(long, env = "MEETMASTER_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List item titles
    Show {
        /// Only show items of this type
        #[arg(short = 't', long = "type", value_enum)]
        kind: Option<KindArg>,

        /// Print full records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add an item, prompting for the remaining fields
    Add {
        /// Item type
        #[arg(value_enum)]
        kind: KindArg,

        /// Item title
        title: String,

        /// Description (prompted for when omitted)
        #[arg(short, long)]
        desc: Option<String>,
    },

    /// Remove the item at a position shown by `show`
    Remove {
        /// 0-based item position
        index: usize,
    },

    /// Remove all items
    Delete,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum KindArg {
    Information,
    Decision,
    Task,
}

impl From<KindArg> for RecordKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Information => RecordKind::Information,
            KindArg::Decision => RecordKind::Decision,
            KindArg::Task => RecordKind::Task,
        }
    }
}

// ============================================================================
// Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=command module=cli status=error error={err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = config::Settings::resolve(cli.file, cli.log_level, cli.log_dir)?;
    settings.init_logging()?;

    let service = settings.service();
    match cli.command {
        Commands::Show { kind, json } => commands::show(&service, kind.map(Into::into), json),
        Commands::Add { kind, title, desc } => commands::add(&service, kind.into(), &title, desc),
        Commands::Remove { index } => commands::remove(&service, index),
        Commands::Delete => commands::delete(&service),
    }
}
