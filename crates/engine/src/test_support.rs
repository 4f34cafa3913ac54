// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for unit tests

use crate::config::{PipelineConfig, Project};
use crate::discovery::discover;
use recflow_core::{recording_state_point, CoordinateSchema, Document, Job, RecordingDoc};
use recflow_storage::JobStore;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Job for `recordings/<session>/rec_<index>.bin` with a fully populated document
pub fn recording_job(session: &str, index: u32) -> Job {
    let products = PathBuf::from(format!("recordings/{}/products", session));
    let typed = RecordingDoc::derive(
        session,
        PathBuf::from(format!("recordings/{}/rec_{}.bin", session, index)),
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

/// Write `count` four-byte recordings per session under `<root>/recordings`
pub fn write_recordings(root: &Path, sessions: &[&str], count: u32) {
    for session in sessions {
        let dir = root.join("recordings").join(session);
        fs::create_dir_all(&dir).unwrap();
        for i in 0..count {
            fs::write(dir.join(format!("rec_{}.bin", i)), [i as u8; 4]).unwrap();
        }
    }
}

pub fn open_store(project: &Project) -> JobStore {
    JobStore::open(project.workspace_dir(), CoordinateSchema::recording()).unwrap()
}

/// A temporary project with recordings already discovered
pub fn discovered_project(sessions: &[&str], count: u32) -> (TempDir, Project, JobStore) {
    let dir = TempDir::new().unwrap();
    write_recordings(dir.path(), sessions, count);
    let project = Project::new(dir.path(), PipelineConfig::default());
    let mut store = open_store(&project);
    discover(&project, &mut store).unwrap();
    (dir, project, store)
}
