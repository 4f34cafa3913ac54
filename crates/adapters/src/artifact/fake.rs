// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory artifact store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use recflow_core::ArtifactStore;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Set of paths that "exist"; clones share the same set
#[derive(Debug, Clone, Default)]
pub struct FakeArtifactStore {
    paths: Arc<Mutex<HashSet<PathBuf>>>,
}

impl FakeArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl AsRef<Path>) {
        self.paths
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.as_ref().to_path_buf());
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.paths
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(path.as_ref());
    }

    pub fn len(&self) -> usize {
        self.paths.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactStore for FakeArtifactStore {
    fn exists(&self, path: &Path) -> bool {
        self.paths
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(path)
    }

    fn exists_under(&self, dir: &Path) -> bool {
        self.paths
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|p| p.starts_with(dir))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
