//! Parallel replay of selection scripts.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;

use crate::app::script::{RunOutcome, Script};
use crate::domain::model::{ModelOptions, SelectionSnapshot};
use crate::infra::config::Config;

/// Runtime options controlling a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayOptions {
    pub model: ModelOptions,
    /// Worker threads; `0` uses the global rayon pool.
    pub threads: usize,
}

impl ReplayOptions {
    /// Build options from configuration defaults.
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.model_options(),
            threads: config.replay.threads(),
        }
    }
}

/// Outcome of one script file.
#[derive(Debug)]
pub struct ScriptReport {
    pub path: PathBuf,
    pub result: Result<RunOutcome>,
}

impl ScriptReport {
    pub fn passed(&self) -> bool {
        self.result.as_ref().is_ok_and(RunOutcome::passed)
    }

    /// Human readable reason the script failed, if it did.
    pub fn failure(&self) -> Option<String> {
        match &self.result {
            Ok(outcome) => outcome.failure.as_ref().map(ToString::to_string),
            Err(err) => Some(format!("{err:#}")),
        }
    }
}

/// Outcomes of every replayed script, in input order.
#[derive(Debug, Default)]
pub struct ReplayReport {
    pub scripts: Vec<ScriptReport>,
}

#[derive(Serialize)]
struct ScriptSummary<'a> {
    path: String,
    passed: bool,
    failure: Option<String>,
    snapshot: Option<&'a SelectionSnapshot>,
}

impl ReplayReport {
    pub fn failed(&self) -> usize {
        self.scripts.iter().filter(|report| !report.passed()).count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// One line per script followed by a summary line.
    pub fn render_text(&self) -> String {
        let mut rendered = String::new();
        for report in &self.scripts {
            let path = report.path.display();
            match (&report.result, report.failure()) {
                (Ok(outcome), None) => {
                    let _ = writeln!(rendered, "ok    {path} ({} steps)", outcome.steps_run);
                }
                (_, failure) => {
                    let reason = failure.unwrap_or_default();
                    let _ = writeln!(rendered, "FAIL  {path}: {reason}");
                }
            }
        }
        let _ = writeln!(
            rendered,
            "{} script(s), {} failed",
            self.scripts.len(),
            self.failed()
        );
        rendered
    }

    /// JSON array with each script's status, failure and final snapshot.
    pub fn render_json(&self) -> Result<String> {
        let summaries: Vec<ScriptSummary<'_>> = self
            .scripts
            .iter()
            .map(|report| ScriptSummary {
                path: report.path.display().to_string(),
                passed: report.passed(),
                failure: report.failure(),
                snapshot: report.result.as_ref().ok().map(|outcome| &outcome.snapshot),
            })
            .collect();
        serde_json::to_string_pretty(&summaries).context("failed to serialize replay report")
    }
}

/// Replay every script in `paths`, in parallel.
pub fn replay(paths: &[PathBuf], options: ReplayOptions) -> Result<ReplayReport> {
    let run = || ReplayReport {
        scripts: paths
            .par_iter()
            .map(|path| ScriptReport {
                path: path.clone(),
                result: replay_file(path, options.model),
            })
            .collect(),
    };

    let report = if options.threads == 0 {
        run()
    } else {
        rayon::ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .build()
            .context("failed to build replay thread pool")?
            .install(run)
    };

    for script in report.scripts.iter().filter(|script| !script.passed()) {
        tracing::warn!(
            path = %script.path.display(),
            reason = %script.failure().unwrap_or_default(),
            "script failed"
        );
    }
    Ok(report)
}

fn replay_file(path: &Path, options: ModelOptions) -> Result<RunOutcome> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    let script = Script::parse(&source)
        .with_context(|| format!("failed to parse script {}", path.display()))?;
    Ok(script.run(options))
}
