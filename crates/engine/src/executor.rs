// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation executor
//!
//! Runs one operation against one aggregate. The executor reports what
//! happened but never decides completion; the caller re-evaluates the
//! operation's postcondition afterwards.

use crate::config::RunnerConfig;
use recflow_adapters::{ProcessError, ProcessRunner};
use recflow_core::{
    batch_args, Action, ActionContext, ActionError, Aggregate, ArgSpec, ArtifactPaths, Invocation,
    Operation,
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Instrument;

/// Errors that can occur while running an operation
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error("{program} exited with status {}", .code.map(|c| c.to_string()).unwrap_or_else(|| "signal".to_string()))]
    ExitStatus { program: String, code: Option<i32> },
    #[error(transparent)]
    Action(#[from] ActionError),
}

/// Executes operations using the configured process runner
#[derive(Clone)]
pub struct Executor<R> {
    runner: R,
    config: RunnerConfig,
    root: PathBuf,
}

impl<R: ProcessRunner> Executor<R> {
    /// `root` is the directory relative artifact paths resolve against
    pub fn new(runner: R, config: RunnerConfig, root: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            config,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Invocation a batch operation would hand to the runner; `None` for in-process actions
    pub fn invocation(&self, op: &Operation, paths: &ArtifactPaths) -> Option<Invocation> {
        match &op.action {
            Action::Batch { script, args } => Some(self.batch_invocation(op, script, args, paths)),
            Action::InProcess(_) => None,
        }
    }

    fn batch_invocation(
        &self,
        op: &Operation,
        script: &str,
        args: &[ArgSpec],
        paths: &ArtifactPaths,
    ) -> Invocation {
        let mut resolved = Vec::new();
        for spec in args {
            match spec {
                ArgSpec::Artifact(kind) => resolved.push(path_arg(&paths.artifact(kind))),
                ArgSpec::BinaryFiles => {
                    resolved.extend(paths.binary_files().iter().map(|p| path_arg(p)))
                }
            }
        }
        Invocation {
            operation: op.name.clone(),
            aggregate: paths.aggregate().to_string(),
            program: self.config.program.clone(),
            args: batch_args(self.config.call_style, &self.config.batch_flag, script, &resolved),
            log_file: paths.log_file(&op.name),
            outputs: op.output_paths(paths),
        }
    }

    /// Run `op` once for `aggregate`
    pub async fn run(
        &self,
        op: &Operation,
        aggregate: &Aggregate,
        paths: &ArtifactPaths,
    ) -> Result<(), ExecuteError> {
        let span = tracing::info_span!("operation", op = %op.name, aggregate = %aggregate.key());

        async {
            let start = std::time::Instant::now();
            let result = self.run_inner(op, aggregate, paths).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "action completed"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "action failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run_inner(
        &self,
        op: &Operation,
        aggregate: &Aggregate,
        paths: &ArtifactPaths,
    ) -> Result<(), ExecuteError> {
        // Operations without outputs (cleaning) must not recreate the products directory
        if !op.outputs.is_empty() {
            self.create_dir(paths.products_dir())?;
        }

        match &op.action {
            Action::Batch { script, args } => {
                self.create_dir(paths.logs_dir())?;
                let invocation = self.batch_invocation(op, script, args, paths);
                let report = self.runner.run(&invocation).await?;
                if report.is_success() {
                    Ok(())
                } else {
                    Err(ExecuteError::ExitStatus {
                        program: invocation.program,
                        code: report.code,
                    })
                }
            }
            Action::InProcess(f) => {
                let f = f.clone();
                let operation = op.name.clone();
                let aggregate = aggregate.clone();
                let paths = paths.clone();
                let root = self.root.clone();
                tokio::task::spawn_blocking(move || {
                    f(&ActionContext {
                        operation: &operation,
                        aggregate: &aggregate,
                        paths: &paths,
                        root: &root,
                    })
                })
                .await
                .map_err(|e| ActionError::Failed(format!("action panicked: {}", e)))??;
                Ok(())
            }
        }
    }

    /// Create a directory under the root; existing directories are fine
    fn create_dir(&self, dir: &Path) -> Result<(), ExecuteError> {
        let path = self.root.join(dir);
        std::fs::create_dir_all(&path).map_err(|source| ExecuteError::CreateDir { path, source })
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
