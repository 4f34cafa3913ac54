// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Discovery: seed the job store from the recordings tree
//!
//! The tree is `<data_dir>/<session>/rec_<index>.<ext>`. Every recording
//! becomes a job whose document holds its file locations and grouping
//! fields. Running discovery again on an unchanged tree changes nothing.

use crate::config::Project;
use recflow_core::{
    is_recording_name, parse_recording_name, recording_state_point, RecordingDoc,
};
use recflow_storage::{JobStore, StoreError};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that stop discovery as a whole
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("cannot scan {path}: {source}")]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// An input entry that was not turned into a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub path: PathBuf,
    pub reason: String,
}

/// What a discovery pass found and did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveryReport {
    /// Session directories, sorted
    pub sessions: Vec<String>,
    pub created: usize,
    pub existing: usize,
    /// Jobs whose document was rewritten with different values
    pub changed: usize,
    pub skipped: Vec<Skipped>,
}

impl DiscoveryReport {
    pub fn recordings(&self) -> usize {
        self.created + self.existing
    }
}

impl fmt::Display for DiscoveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Found {} sessions: {}",
            self.sessions.len(),
            self.sessions.join(", ")
        )?;
        write!(
            f,
            "Recordings: {} ({} new, {} existing, {} updated)",
            self.recordings(),
            self.created,
            self.existing,
            self.changed
        )?;
        for skipped in &self.skipped {
            write!(f, "\nSkipped {}: {}", skipped.path.display(), skipped.reason)?;
        }
        Ok(())
    }
}

/// Scan the project's data directory and bring the job store up to date
pub fn discover(project: &Project, store: &mut JobStore) -> Result<DiscoveryReport, DiscoveryError> {
    let config = project.config();
    let data_dir = project.data_dir();
    tracing::info!(data_dir = %data_dir.display(), "discovering recordings");

    let mut report = DiscoveryReport::default();
    for session in list(&data_dir, EntryKind::Dir, &mut report.skipped)? {
        let session_dir = data_dir.join(&session);
        // Paths in documents stay as written in the config, so they remain
        // relative to the project root when the config is
        let doc_session_dir = config.data_dir.join(&session);
        let products_dir = doc_session_dir.join(&config.products_dir_name);
        let logs_dir = products_dir.join(&config.logs_dir_name);

        let recordings: Vec<String> = list(&session_dir, EntryKind::File, &mut report.skipped)?
            .into_iter()
            .filter(|name| is_recording_name(name))
            .collect();
        tracing::debug!(session, count = recordings.len(), "session scanned");

        for name in recordings {
            let index = match parse_recording_name(&name) {
                Ok(index) => index,
                Err(e) => {
                    let path = session_dir.join(&name);
                    tracing::warn!(path = %path.display(), error = %e, "skipping recording");
                    report.skipped.push(Skipped {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let state_point = recording_state_point(&session, index);
            let is_new = store.find(&state_point).is_none();
            let job = store.open_or_create(&state_point)?;

            let doc = RecordingDoc::derive(
                &session,
                doc_session_dir.join(&name),
                products_dir.clone(),
                logs_dir.clone(),
                index,
            );
            let changed = store.update(&job.id, doc.entries())?;
            if is_new {
                report.created += 1;
            } else {
                report.existing += 1;
                if changed {
                    report.changed += 1;
                }
            }
        }
        report.sessions.push(session);
    }

    tracing::info!(
        sessions = report.sessions.len(),
        created = report.created,
        existing = report.existing,
        changed = report.changed,
        skipped = report.skipped.len(),
        "discovery finished"
    );
    Ok(report)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Dir,
    File,
}

/// Names of visible entries of one kind, sorted.
///
/// Entries of that kind whose name is not UTF-8 are added to `skipped`.
fn list(
    dir: &Path,
    kind: EntryKind,
    skipped: &mut Vec<Skipped>,
) -> Result<Vec<String>, DiscoveryError> {
    let scan_error = |source: std::io::Error| DiscoveryError::Scan {
        path: dir.to_path_buf(),
        source,
    };
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(scan_error)? {
        let entry = entry.map_err(scan_error)?;
        let path = entry.path();
        let matches = match kind {
            EntryKind::Dir => path.is_dir(),
            EntryKind::File => path.is_file(),
        };
        if !matches {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) if name.starts_with('.') => {}
            Some(name) => names.push(name.to_string()),
            None => {
                tracing::warn!(path = %path.display(), "skipping non UTF-8 name");
                skipped.push(Skipped {
                    path,
                    reason: "name is not valid UTF-8".to_string(),
                });
            }
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
