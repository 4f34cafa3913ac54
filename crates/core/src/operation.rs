// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation records: name, dependencies, postcondition and action

use crate::aggregate::Aggregate;
use crate::artifact::ArtifactStore;
use crate::paths::{ArtifactKind, ArtifactPaths};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Predicate deciding whether an operation already completed
pub type PredicateFn = Arc<dyn Fn(&ArtifactPaths, &dyn ArtifactStore) -> bool + Send + Sync>;

/// In-process action body
pub type ActionFn = Arc<dyn Fn(&ActionContext<'_>) -> Result<(), ActionError> + Send + Sync>;

/// Errors raised by in-process actions
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid input {path}: {message}")]
    InvalidInput { path: PathBuf, message: String },
    #[error("{0}")]
    Failed(String),
}

/// What an in-process action gets to work with
pub struct ActionContext<'a> {
    pub operation: &'a str,
    pub aggregate: &'a Aggregate,
    pub paths: &'a ArtifactPaths,
    /// Directory that relative artifact paths are resolved against
    pub root: &'a Path,
}

impl ActionContext<'_> {
    /// Location of an artifact of this aggregate on disk
    pub fn locate(&self, kind: &ArtifactKind) -> PathBuf {
        self.root.join(self.paths.artifact(kind))
    }
}

/// How completion of an operation is detected
#[derive(Clone)]
pub enum Postcondition {
    /// Every declared output exists
    Outputs,
    /// Custom predicate over the aggregate's paths
    Predicate(PredicateFn),
}

/// A positional argument of a batch action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgSpec {
    /// Path of an artifact of the aggregate
    Artifact(ArtifactKind),
    /// Raw recordings of every member, in member order
    BinaryFiles,
}

/// What running an operation does
#[derive(Clone)]
pub enum Action {
    /// Hand a batch script with resolved arguments to the process runner
    Batch { script: String, args: Vec<ArgSpec> },
    /// Run a function in this process
    InProcess(ActionFn),
}

/// A named processing step
#[derive(Clone)]
pub struct Operation {
    pub name: String,
    /// Operations that must be done before this one may run
    pub after: Vec<String>,
    pub outputs: Vec<ArtifactKind>,
    pub postcondition: Postcondition,
    pub action: Action,
}

impl Operation {
    /// Operation running a batch script through the process runner
    pub fn batch(name: impl Into<String>, script: impl Into<String>, args: Vec<ArgSpec>) -> Self {
        Self::new(
            name,
            Action::Batch {
                script: script.into(),
                args,
            },
        )
    }

    /// Operation running a function in-process
    pub fn in_process<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&ActionContext<'_>) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        Self::new(name, Action::InProcess(Arc::new(f)))
    }

    fn new(name: impl Into<String>, action: Action) -> Self {
        Self {
            name: name.into(),
            after: Vec::new(),
            outputs: Vec::new(),
            postcondition: Postcondition::Outputs,
            action,
        }
    }

    /// Add a dependency
    pub fn after(mut self, operation: impl Into<String>) -> Self {
        self.after.push(operation.into());
        self
    }

    /// Declare an output artifact
    pub fn output(mut self, kind: ArtifactKind) -> Self {
        self.outputs.push(kind);
        self
    }

    /// Replace the output-existence check with a custom predicate
    pub fn postcondition<F>(mut self, f: F) -> Self
    where
        F: Fn(&ArtifactPaths, &dyn ArtifactStore) -> bool + Send + Sync + 'static,
    {
        self.postcondition = Postcondition::Predicate(Arc::new(f));
        self
    }

    /// Evaluate the postcondition against external state
    pub fn is_done(&self, paths: &ArtifactPaths, store: &dyn ArtifactStore) -> bool {
        match &self.postcondition {
            Postcondition::Outputs => {
                !self.outputs.is_empty()
                    && self
                        .outputs
                        .iter()
                        .all(|kind| store.exists(&paths.artifact(kind)))
            }
            Postcondition::Predicate(f) => f(paths, store),
        }
    }

    /// Output paths for this operation on one aggregate
    pub fn output_paths(&self, paths: &ArtifactPaths) -> Vec<PathBuf> {
        self.outputs.iter().map(|kind| paths.artifact(kind)).collect()
    }

    pub fn is_in_process(&self) -> bool {
        matches!(self.action, Action::InProcess(_))
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match &self.action {
            Action::Batch { script, .. } => format!("batch({})", script),
            Action::InProcess(_) => "in-process".to_string(),
        };
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("after", &self.after)
            .field("outputs", &self.outputs)
            .field("action", &action)
            .finish()
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
