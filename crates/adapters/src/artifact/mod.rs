// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Artifact stores answering whether derived files exist

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeArtifactStore;

use recflow_core::ArtifactStore;
use std::path::{Path, PathBuf};

/// Filesystem-backed store; relative paths resolve against `root`
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of `path` under this store
    pub fn locate(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl ArtifactStore for FsArtifactStore {
    fn exists(&self, path: &Path) -> bool {
        self.locate(path).is_file()
    }

    fn exists_under(&self, dir: &Path) -> bool {
        self.locate(dir).exists()
    }
}

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;
