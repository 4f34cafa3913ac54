// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Artifact store abstraction
//!
//! Completion of an operation is never recorded internally; it is read back
//! from wherever artifacts live. Implementations live in `recflow-adapters`.

use std::path::Path;
use std::sync::Arc;

/// Answers "does this artifact exist?"
pub trait ArtifactStore: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    /// Whether anything at all lives at or below `dir`
    fn exists_under(&self, dir: &Path) -> bool;
}

impl<T: ArtifactStore + ?Sized> ArtifactStore for &T {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn exists_under(&self, dir: &Path) -> bool {
        (**self).exists_under(dir)
    }
}

impl<T: ArtifactStore + ?Sized> ArtifactStore for Arc<T> {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn exists_under(&self, dir: &Path) -> bool {
        (**self).exists_under(dir)
    }
}
