// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake process runner for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ExitReport, ProcessError, ProcessRunner};
use crate::artifact::FakeArtifactStore;
use async_trait::async_trait;
use recflow_core::Invocation;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Recorded process run
#[derive(Debug, Clone)]
pub struct ProcessCall {
    pub invocation: Invocation,
}

/// What the fake does when asked to run a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeBehavior {
    /// Produce every expected output and exit 0
    Succeed,
    /// Exit 0 without producing anything
    SucceedSilently,
    /// Exit with the given code, producing nothing
    Fail(i32),
    /// Fail to start
    SpawnError,
}

/// Fake process runner for testing.
///
/// Outputs are "produced" in the attached [`FakeArtifactStore`] if there is
/// one, otherwise as empty files on disk under `root`.
#[derive(Clone)]
pub struct FakeProcessRunner {
    calls: Arc<Mutex<Vec<ProcessCall>>>,
    default_behavior: FakeBehavior,
    /// Per-operation overrides
    behaviors: Arc<Mutex<HashMap<String, FakeBehavior>>>,
    store: Option<FakeArtifactStore>,
    root: Option<PathBuf>,
    /// File contents by extension; other outputs are written empty
    contents: HashMap<String, Vec<u8>>,
}

impl Default for FakeProcessRunner {
    fn default() -> Self {
        Self {
            calls: Arc::default(),
            default_behavior: FakeBehavior::Succeed,
            behaviors: Arc::default(),
            store: None,
            root: None,
            contents: HashMap::new(),
        }
    }
}

impl FakeProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record outputs in an in-memory store
    pub fn with_store(mut self, store: FakeArtifactStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Write outputs as files relative to `root`
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Write `contents` into every produced file with extension `ext`
    pub fn with_contents(mut self, ext: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.contents.insert(ext.to_string(), contents.into());
        self
    }

    /// Behavior for every operation without an override
    pub fn with_default(mut self, behavior: FakeBehavior) -> Self {
        self.default_behavior = behavior;
        self
    }

    /// Override the behavior for one operation
    pub fn set_behavior(&self, operation: &str, behavior: FakeBehavior) {
        self.behaviors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(operation.to_string(), behavior);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ProcessCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Operation names in call order
    pub fn operations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|c| c.invocation.operation)
            .collect()
    }

    fn behavior_for(&self, operation: &str) -> FakeBehavior {
        self.behaviors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(operation)
            .cloned()
            .unwrap_or_else(|| self.default_behavior.clone())
    }

    fn produce(&self, path: &Path) -> Result<(), ProcessError> {
        if let Some(store) = &self.store {
            store.insert(path);
            return Ok(());
        }
        let full = match &self.root {
            Some(root) => root.join(path),
            None => path.to_path_buf(),
        };
        let write = || -> std::io::Result<()> {
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = full
                .extension()
                .and_then(|ext| self.contents.get(&*ext.to_string_lossy()))
                .map(Vec::as_slice)
                .unwrap_or_default();
            std::fs::write(&full, contents)
        };
        write().map_err(|e| ProcessError::SpawnFailed {
            program: "fake".to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ProcessRunner for FakeProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ExitReport, ProcessError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ProcessCall {
                invocation: invocation.clone(),
            });

        match self.behavior_for(&invocation.operation) {
            FakeBehavior::Succeed => {
                for output in &invocation.outputs {
                    self.produce(output)?;
                }
                Ok(ExitReport::success())
            }
            FakeBehavior::SucceedSilently => Ok(ExitReport::success()),
            FakeBehavior::Fail(code) => Ok(ExitReport::failure(code)),
            FakeBehavior::SpawnError => Err(ProcessError::SpawnFailed {
                program: invocation.program.clone(),
                message: "fake spawn error".to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
