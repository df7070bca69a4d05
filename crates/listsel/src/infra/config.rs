//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::model::{
    CursorOverflow, DEFAULT_MAX_INDEX, ModelOptions, SelectionMode, ShiftOverflow,
};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".listsel/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub model: Model,
    #[serde(default)]
    pub replay: Replay,
}

/// Options applied to every selection model the tooling creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Model {
    #[serde(default)]
    max_index: Option<usize>,
    #[serde(default)]
    mode: Option<SelectionMode>,
    #[serde(default)]
    cursor_overflow: Option<CursorOverflow>,
    #[serde(default)]
    shift_overflow: Option<ShiftOverflow>,
}

impl Model {
    pub fn max_index(&self) -> usize {
        self.max_index.unwrap_or(DEFAULT_MAX_INDEX)
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode.unwrap_or_default()
    }

    pub fn cursor_overflow(&self) -> CursorOverflow {
        self.cursor_overflow.unwrap_or_default()
    }

    pub fn shift_overflow(&self) -> ShiftOverflow {
        self.shift_overflow.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Replay {
    #[serde(default)]
    threads: Option<usize>,
}

impl Replay {
    /// Worker threads for script replay; `0` uses the global rayon pool.
    pub fn threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    max_index: Option<String>,
    mode: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            max_index: env::var("LISTSEL_MAX_INDEX").ok(),
            mode: env::var("LISTSEL_MODE").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(max_index: &str, mode: &str) -> Self {
        Self {
            max_index: Some(max_index.to_owned()),
            mode: Some(mode.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    /// Options for a new selection model.
    pub fn model_options(&self) -> ModelOptions {
        ModelOptions {
            max_index: self.model.max_index(),
            mode: self.model.mode(),
            cursor_overflow: self.model.cursor_overflow(),
            shift_overflow: self.model.shift_overflow(),
        }
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::parse_toml(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            tracing::debug!(path = %global_path.display(), "loading global config");
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            tracing::debug!(path = %workspace_path.display(), "loading workspace config");
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        apply_env_overrides(merged, env_overrides)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::parse_toml(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn parse_toml(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            model: merge_model(self.model, other.model),
            replay: merge_replay(self.replay, other.replay),
        }
    }
}

fn merge_model(mut base: Model, overlay: Model) -> Model {
    if let Some(value) = overlay.max_index {
        base.max_index = Some(value);
    }
    if let Some(value) = overlay.mode {
        base.mode = Some(value);
    }
    if let Some(value) = overlay.cursor_overflow {
        base.cursor_overflow = Some(value);
    }
    if let Some(value) = overlay.shift_overflow {
        base.shift_overflow = Some(value);
    }
    base
}

fn merge_replay(base: Replay, overlay: Replay) -> Replay {
    Replay {
        threads: overlay.threads.or(base.threads),
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("listsel/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Result<Config> {
    if let Some(max_index) = env.max_index {
        let value = max_index
            .trim()
            .parse::<usize>()
            .with_context(|| format!("invalid LISTSEL_MAX_INDEX '{max_index}'"))?;
        config.model.max_index = Some(value);
    }
    if let Some(mode) = env.mode {
        let value = mode.parse::<SelectionMode>().context("invalid LISTSEL_MODE")?;
        config.model.mode = Some(value);
    }
    Ok(config)
}
