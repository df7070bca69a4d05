use anyhow::{Context, Result, bail};
use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::Command;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(author, version, about = "Project automation commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run cargo nextest with default configuration
    Nextest {
        #[arg(long)]
        profile: Option<String>,
        #[arg(long)]
        release: bool,
    },
    /// Replay every fixture script through the listsel binary
    Replay {
        /// Emit the JSON report
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Nextest { profile, release } => run_nextest(profile, release)?,
        Commands::Replay { json } => run_replay(json)?,
    }
    Ok(())
}

fn run_nextest(profile: Option<String>, release: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("nextest").arg("run");
    if let Some(profile) = profile {
        cmd.arg("--profile").arg(profile);
    }
    if release {
        cmd.arg("--release");
    }
    let status = cmd.status()?;
    if !status.success() {
        bail!("cargo nextest run failed");
    }
    Ok(())
}

fn run_replay(json: bool) -> Result<()> {
    let metadata = MetadataCommand::new()
        .no_deps()
        .exec()
        .context("failed to read cargo metadata")?;
    let fixtures = metadata
        .workspace_root
        .as_std_path()
        .join("crates/listsel/tests/fixtures");

    let mut scripts: Vec<PathBuf> = WalkDir::new(&fixtures)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "sel"))
        .collect();
    scripts.sort();
    if scripts.is_empty() {
        bail!("no fixture scripts under {}", fixtures.display());
    }

    let mut cmd = Command::new("cargo");
    cmd.args(["run", "--quiet", "-p", "listsel", "--", "run"]);
    if json {
        cmd.arg("--json");
    }
    cmd.args(&scripts);
    let status = cmd.status()?;
    if !status.success() {
        bail!("fixture replay failed");
    }
    Ok(())
}
