// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod clean;
pub mod init;
pub mod run;
pub mod status;

use anyhow::Result;
use recflow_adapters::{FsArtifactStore, LocalProcessRunner, TracedProcessRunner};
use recflow_core::CoordinateSchema;
use recflow_engine::{Cleaner, EngineError, Executor, OperationGroup, Pipeline, Project, Runtime};
use recflow_storage::JobStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub type Runner = TracedProcessRunner<LocalProcessRunner>;

/// Everything a command needs: the project and its pipeline
pub struct Context {
    project: Project,
    pipeline: Pipeline,
}

impl Context {
    /// Open the project at `dir` (default: current directory)
    pub fn open(dir: Option<PathBuf>, config: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let root = match dir {
            Some(dir) => cwd.join(dir),
            None => cwd,
        };
        let project = Project::open(root, config)?;
        tracing::debug!(root = %project.root().display(), "project opened");
        Ok(Self {
            project,
            pipeline: Pipeline::reference()?,
        })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn store(&self) -> Result<JobStore> {
        Ok(JobStore::open(
            self.project.workspace_dir(),
            CoordinateSchema::recording(),
        )?)
    }

    /// Look up a runnable group by name
    pub fn group(&self, name: &str) -> Result<Arc<OperationGroup>, EngineError> {
        self.pipeline.get(name).ok_or_else(|| EngineError::UnknownGroup {
            name: name.to_string(),
            available: self
                .pipeline
                .names()
                .into_iter()
                .map(String::from)
                .collect(),
        })
    }

    /// Runtime whose actions run in, and whose artifacts live under, the project root
    pub fn runtime(&self, max_parallel: usize) -> Runtime<Runner, FsArtifactStore> {
        let root = self.project.root();
        let runner = TracedProcessRunner::new(LocalProcessRunner::with_cwd(root));
        let executor = Executor::new(runner, self.project.config().runner.clone(), root);
        Runtime::new(executor, FsArtifactStore::new(root), max_parallel)
    }

    pub fn cleaner(&self) -> Cleaner {
        Cleaner::new(self.project.root())
    }
}
