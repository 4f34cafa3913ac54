// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cleaner: removes derived products so a session can be processed afresh

use crate::error::EngineError;
use crate::pipeline::clean_grouping;
use recflow_core::{group, ActionContext, ActionError, Aggregate, ArtifactPaths, Job, SortBy};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Deletes products directories, one session at a time
#[derive(Debug, Clone)]
pub struct Cleaner {
    root: PathBuf,
}

impl Cleaner {
    /// `root` is the directory relative products paths resolve against
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Remove the products of `session`; returns the directories removed.
    ///
    /// Unknown sessions and already absent directories are not errors.
    pub fn clean(&self, jobs: Vec<Job>, session: &str) -> Result<Vec<PathBuf>, EngineError> {
        let aggregates = sessions(jobs)?
            .into_iter()
            .filter(|a| a.key() == session)
            .collect::<Vec<_>>();
        if aggregates.is_empty() {
            tracing::info!(session, "unknown session, nothing to clean");
        }
        self.remove_all(&aggregates)
    }

    /// Remove the products of every session
    pub fn clean_all(&self, jobs: Vec<Job>) -> Result<Vec<PathBuf>, EngineError> {
        self.remove_all(&sessions(jobs)?)
    }

    fn remove_all(&self, aggregates: &[Aggregate]) -> Result<Vec<PathBuf>, EngineError> {
        let mut removed = Vec::new();
        for aggregate in aggregates {
            let products_dir = ArtifactPaths::products_dir_of(aggregate)?;
            if self.remove(&products_dir)? {
                tracing::info!(session = aggregate.key(), dir = %products_dir.display(), "products removed");
                removed.push(products_dir);
            } else {
                tracing::debug!(session = aggregate.key(), "no products to remove");
            }
        }
        Ok(removed)
    }

    /// Whether the directory existed
    fn remove(&self, dir: &Path) -> Result<bool, EngineError> {
        let path = self.root.join(dir);
        remove_products(&path).map_err(|source| EngineError::Clean { path, source })
    }
}

/// Remove `path` recursively; `Ok(false)` when it was already absent
pub(crate) fn remove_products(path: &Path) -> std::io::Result<bool> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// In-process body of the `clean_products_dir` operation
pub(crate) fn clean_products_dir(ctx: &ActionContext<'_>) -> Result<(), ActionError> {
    let path = ctx.root.join(ctx.paths.products_dir());
    if remove_products(&path)? {
        tracing::info!(session = ctx.aggregate.key(), dir = %ctx.paths.products_dir().display(), "products removed");
    }
    Ok(())
}

fn sessions(jobs: Vec<Job>) -> Result<Vec<Aggregate>, EngineError> {
    Ok(group(jobs, &clean_grouping(), &SortBy::Input)?)
}

#[cfg(test)]
#[path = "cleaner_tests.rs"]
mod tests;
