// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file-backed job store
//!
//! Layout: `<root>/<job_id>/state_point.json` and `<root>/<job_id>/document.json`.
//! Everything is loaded on open and written through on change.

use recflow_core::{CoordinateError, CoordinateSchema, Document, Job, JobId, StatePoint};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const STATE_POINT_FILE: &str = "state_point.json";
pub const DOCUMENT_FILE: &str = "document.json";

/// Errors from job store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    MalformedCoordinate(#[from] CoordinateError),
    #[error("unknown job: {0}")]
    UnknownJob(String),
    #[error("job directory {dir} holds state point of job {actual}")]
    Corrupt { dir: PathBuf, actual: JobId },
}

/// Maps state points to jobs and owns their documents
#[derive(Debug)]
pub struct JobStore {
    root: PathBuf,
    schema: CoordinateSchema,
    jobs: BTreeMap<JobId, Job>,
}

impl JobStore {
    /// Open (creating if needed) the store at `root`, loading every job in it
    pub fn open(root: impl Into<PathBuf>, schema: CoordinateSchema) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        let mut jobs = BTreeMap::new();
        for entry in fs::read_dir(&root)? {
            let dir = entry?.path();
            let sp_path = dir.join(STATE_POINT_FILE);
            if !dir.is_dir() || !sp_path.is_file() {
                continue;
            }
            let state_point: StatePoint = read_json(&sp_path)?;
            schema.validate(&state_point)?;

            let id = JobId::of(&state_point);
            if dir.file_name().map(|n| n != id.as_str()).unwrap_or(true) {
                return Err(StoreError::Corrupt { dir, actual: id });
            }

            let doc_path = dir.join(DOCUMENT_FILE);
            let doc = if doc_path.is_file() {
                read_json(&doc_path)?
            } else {
                Document::default()
            };
            jobs.insert(id, Job::new(state_point).with_doc(doc));
        }

        tracing::debug!(root = %root.display(), jobs = jobs.len(), "job store opened");
        Ok(Self { root, schema, jobs })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn schema(&self) -> &CoordinateSchema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Return the job for `state_point`, creating it on first sight.
    ///
    /// Calling this again with an equal state point has no side effects.
    pub fn open_or_create(&mut self, state_point: &StatePoint) -> Result<Job, StoreError> {
        self.schema.validate(state_point)?;
        let id = JobId::of(state_point);
        if let Some(job) = self.jobs.get(&id) {
            return Ok(job.clone());
        }

        let dir = self.job_dir(&id);
        fs::create_dir_all(&dir)?;
        write_json(&dir.join(STATE_POINT_FILE), state_point)?;
        write_json(&dir.join(DOCUMENT_FILE), &Document::default())?;

        let job = Job::new(state_point.clone());
        tracing::info!(job = job.short_id(), state_point = %state_point, "job created");
        self.jobs.insert(id, job.clone());
        Ok(job)
    }

    /// Look up a job by state point without creating it
    pub fn find(&self, state_point: &StatePoint) -> Option<&Job> {
        self.jobs.get(&JobId::of(state_point))
    }

    /// All jobs, ordered by ID
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    /// Owned copy of every job, for building aggregates
    pub fn snapshot(&self) -> Vec<Job> {
        self.jobs.values().cloned().collect()
    }

    pub fn document(&self, id: &JobId) -> Result<&Document, StoreError> {
        self.live(id).map(|job| &job.doc)
    }

    /// Read one document value; `Ok(None)` when the key is not set
    pub fn get(&self, id: &JobId, key: &str) -> Result<Option<&Value>, StoreError> {
        Ok(self.document(id)?.get(key))
    }

    /// Write one document value, returning whether anything changed
    pub fn set(
        &mut self,
        id: &JobId,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<bool, StoreError> {
        self.update(id, [(key.to_string(), value.into())])
    }

    /// Write several document values with a single file write
    pub fn update<K, I>(&mut self, id: &JobId, entries: I) -> Result<bool, StoreError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        self.live(id)?;
        let dir = self.job_dir(id);
        let job = self
            .jobs
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownJob(id.to_string()))?;

        let mut changed = false;
        for (key, value) in entries {
            changed |= job.doc.set(key, value);
        }
        if changed {
            write_json(&dir.join(DOCUMENT_FILE), &job.doc)?;
            tracing::debug!(job = job.short_id(), "document updated");
        }
        Ok(changed)
    }

    fn job_dir(&self, id: &JobId) -> PathBuf {
        self.root.join(id.as_str())
    }

    /// The job, provided it is known and its storage still exists
    fn live(&self, id: &JobId) -> Result<&Job, StoreError> {
        match self.jobs.get(id) {
            Some(job) if self.job_dir(id).is_dir() => Ok(job),
            _ => Err(StoreError::UnknownJob(id.to_string())),
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Write via a temporary file so readers never see a partial document
fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
