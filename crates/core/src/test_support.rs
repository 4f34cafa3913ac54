// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for unit tests

use crate::artifact::ArtifactStore;
use crate::document::{Document, RecordingDoc};
use crate::job::Job;
use crate::recording::recording_state_point;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Job for `data/<session>/rec_<index>.bin` with a fully populated document
pub fn recording_job(session: &str, index: u32) -> Job {
    let products = PathBuf::from(format!("data/{}/products", session));
    let typed = RecordingDoc::derive(
        session,
        PathBuf::from(format!("data/{}/rec_{}.bin", session, index)),
        products.clone(),
        products.join("logs"),
        index,
    );
    let mut doc = Document::new();
    for (key, value) in typed.entries() {
        doc.set(key, value);
    }
    Job::new(recording_state_point(session, index)).with_doc(doc)
}

/// In-memory artifact store
#[derive(Default)]
pub struct SetStore {
    paths: Mutex<HashSet<PathBuf>>,
}

impl SetStore {
    pub fn touch(&self, path: impl Into<PathBuf>) {
        self.paths.lock().unwrap().insert(path.into());
    }
}

impl ArtifactStore for SetStore {
    fn exists(&self, path: &Path) -> bool {
        self.paths.lock().unwrap().contains(path)
    }

    fn exists_under(&self, dir: &Path) -> bool {
        self.paths.lock().unwrap().iter().any(|p| p.starts_with(dir))
    }
}
