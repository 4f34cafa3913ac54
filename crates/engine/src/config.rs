// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration (`recflow.toml`)

use recflow_core::CallStyle;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name at the project root
pub const CONFIG_FILE: &str = "recflow.toml";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// How batch operations reach the external program
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    pub program: String,
    pub call_style: CallStyle,
    pub batch_flag: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            program: "matlab".to_string(),
            call_style: CallStyle::Matlab,
            batch_flag: "-batch".to_string(),
        }
    }
}

/// Settings for one project, with relative paths as written
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Root of the `<session>/rec_<n>.<ext>` input tree
    pub data_dir: PathBuf,
    /// Job store root
    pub workspace_dir: PathBuf,
    /// Products directory name inside each session directory
    pub products_dir_name: String,
    /// Logs directory name inside each products directory
    pub logs_dir_name: String,
    pub runner: RunnerConfig,
    /// Upper bound on aggregates processed at once
    pub max_parallel: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("recordings"),
            workspace_dir: PathBuf::from("workspace"),
            products_dir_name: "products".to_string(),
            logs_dir_name: "logs".to_string(),
            runner: RunnerConfig::default(),
            max_parallel: 1,
        }
    }
}

impl PipelineConfig {
    /// Parse configuration text
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, or the defaults when it does not exist and `required` is false
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_parallel == 0 {
            return Err(ConfigError::Invalid("max_parallel must be at least 1".to_string()));
        }
        if self.runner.program.trim().is_empty() {
            return Err(ConfigError::Invalid("runner.program must not be empty".to_string()));
        }
        for (key, name) in [
            ("products_dir_name", &self.products_dir_name),
            ("logs_dir_name", &self.logs_dir_name),
        ] {
            if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a plain directory name, got '{}'",
                    key, name
                )));
            }
        }
        Ok(())
    }
}

/// A configuration anchored at a project root
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: PipelineConfig,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, config: PipelineConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Open the project at `root`, reading `config` or `<root>/recflow.toml`
    pub fn open(root: impl Into<PathBuf>, config: Option<&Path>) -> Result<Self, ConfigError> {
        let root = root.into();
        let config = match config {
            Some(path) => PipelineConfig::load(&root.join(path), true)?,
            None => PipelineConfig::load(&root.join(CONFIG_FILE), false)?,
        };
        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// `path` as seen from the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.resolve(&self.config.data_dir)
    }

    pub fn workspace_dir(&self) -> PathBuf {
        self.resolve(&self.config.workspace_dir)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
