// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local process runner

use super::{ExitReport, ProcessError, ProcessRunner};
use async_trait::async_trait;
use recflow_core::Invocation;
use std::fs::File;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Runs invocations as child processes, stdout and stderr going to the log file
#[derive(Clone, Debug, Default)]
pub struct LocalProcessRunner {
    cwd: Option<PathBuf>,
}

impl LocalProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every process from `cwd` so relative paths resolve against it
    pub fn with_cwd(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
        }
    }
}

#[async_trait]
impl ProcessRunner for LocalProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ExitReport, ProcessError> {
        let log_path = match &self.cwd {
            Some(cwd) => cwd.join(&invocation.log_file),
            None => invocation.log_file.clone(),
        };
        let log_error = |e: std::io::Error| ProcessError::LogFile {
            path: log_path.display().to_string(),
            message: e.to_string(),
        };
        let stdout = File::create(&log_path).map_err(log_error)?;
        let stderr = stdout.try_clone().map_err(log_error)?;

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr));
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        let status = cmd
            .status()
            .await
            .map_err(|e| ProcessError::SpawnFailed {
                program: invocation.program.clone(),
                message: e.to_string(),
            })?;

        Ok(ExitReport {
            code: status.code(),
        })
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
