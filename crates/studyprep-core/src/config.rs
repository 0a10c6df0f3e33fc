//! studyprep configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::grader::{Grader, SymbolicCapability};
use crate::session::DataPaths;
use crate::store::DEFAULT_USER_ID;

/// Top-level studyprep configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyprepConfig {
    /// Student the documents belong to.
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// Directory holding the study documents.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Compare expression answers symbolically.
    #[serde(default = "default_true")]
    pub symbolic_grading: bool,
    /// Score change (in points) below which `compare` reports no change.
    #[serde(default = "default_threshold")]
    pub regression_threshold: f64,
}

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}
fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_true() -> bool {
    true
}
fn default_threshold() -> f64 {
    1.0
}

impl Default for StudyprepConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            data_dir: default_data_dir(),
            symbolic_grading: true,
            regression_threshold: default_threshold(),
        }
    }
}

impl StudyprepConfig {
    pub fn grader(&self) -> Grader {
        Grader::new(SymbolicCapability::from_flag(self.symbolic_grading))
    }

    pub fn paths(&self) -> DataPaths {
        DataPaths::new(&self.data_dir)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        // Substituted values are inserted as-is, never rescanned.
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `studyprep.toml` in the current directory
/// 2. `~/.config/studyprep/config.toml`
///
/// Environment variable overrides: `STUDYPREP_DATA_DIR`, `STUDYPREP_USER_ID`.
pub fn load_config() -> Result<StudyprepConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<StudyprepConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("studyprep.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<StudyprepConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => StudyprepConfig::default(),
    };

    if let Ok(dir) = std::env::var("STUDYPREP_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    if let Ok(user) = std::env::var("STUDYPREP_USER_ID") {
        config.user_id = user;
    }

    config.data_dir = PathBuf::from(resolve_env_vars(&config.data_dir.to_string_lossy()));
    anyhow::ensure!(
        config.regression_threshold >= 0.0,
        "regression_threshold must not be negative"
    );

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("studyprep"))
}
