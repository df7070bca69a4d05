//! Command-line entry point for replaying selection scripts.

use std::io;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::app::replay::{self, ReplayOptions};
use crate::domain::model::{CursorOverflow, SelectionMode, ShiftOverflow};
use crate::infra::config::Config;

#[derive(Debug, Parser)]
#[command(author, version, about = "Replay interval selection scripts", long_about = None)]
pub struct Cli {
    /// Emit debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run selection scripts and report failed expectations
    Run {
        /// Script files to replay
        #[arg(required = true)]
        scripts: Vec<PathBuf>,
        /// Selection mode for every model
        #[arg(long, value_enum)]
        mode: Option<SelectionMode>,
        /// Largest addressable index
        #[arg(long)]
        max_index: Option<usize>,
        /// Policy for cursors pushed past the max index
        #[arg(long, value_enum)]
        cursor_overflow: Option<CursorOverflow>,
        /// Policy for selected indices pushed past the max index
        #[arg(long, value_enum)]
        shift_overflow: Option<ShiftOverflow>,
        /// Worker threads (0 uses every core)
        #[arg(long)]
        threads: Option<usize>,
        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Parse arguments, install logging, and dispatch.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::init(cli.verbose);

    match cli.command {
        Commands::Run {
            scripts,
            mode,
            max_index,
            cursor_overflow,
            shift_overflow,
            threads,
            json,
        } => {
            let config = Config::load()?;
            let mut options = ReplayOptions::from_config(&config);
            if let Some(mode) = mode {
                options.model.mode = mode;
            }
            if let Some(max_index) = max_index {
                options.model.max_index = max_index;
            }
            if let Some(policy) = cursor_overflow {
                options.model.cursor_overflow = policy;
            }
            if let Some(policy) = shift_overflow {
                options.model.shift_overflow = policy;
            }
            if let Some(threads) = threads {
                options.threads = threads;
            }
            tracing::debug!(?options, scripts = scripts.len(), "replaying scripts");

            let report = replay::replay(&scripts, options)?;
            if json {
                println!("{}", report.render_json()?);
            } else {
                print!("{}", report.render_text());
            }
            if !report.is_success() {
                bail!("{} script(s) failed", report.failed());
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut io::stdout());
        }
    }
    Ok(())
}
