// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Artifact path resolution for aggregates
//!
//! Every derived artifact of an aggregate lives at
//! `{products_dir}/{kind}_of_{label}.{ext}` and every log at
//! `{logs_dir}/{operation}_{label}.log`. All members must agree on the
//! directories and the label, otherwise two aggregates could write to the
//! same paths.

use crate::aggregate::Aggregate;
use crate::document::{BINARY_FILE, LOGS_DIR, PARITY, PRODUCTS_DIR};
use crate::job::JobId;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from resolving artifact paths
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error(
        "heterogeneous aggregate '{aggregate}': members disagree on '{field}' ('{first}' vs '{other}')"
    )]
    HeterogeneousAggregate {
        aggregate: String,
        field: String,
        first: String,
        other: String,
    },
    #[error("job {job} has no document field '{field}'")]
    MissingField { job: JobId, field: String },
}

/// Kinds of derived artifacts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Concatenated member recordings
    Aggregate,
    /// Summary statistics of the aggregate
    Stats,
    /// Detected rising edges
    Edges,
    /// Summary figure
    Figure,
    Custom { stem: String, ext: String },
}

impl ArtifactKind {
    pub fn stem(&self) -> &str {
        match self {
            ArtifactKind::Aggregate => "aggregate",
            ArtifactKind::Stats => "stats",
            ArtifactKind::Edges => "edges",
            ArtifactKind::Figure => "figure",
            ArtifactKind::Custom { stem, .. } => stem,
        }
    }

    pub fn ext(&self) -> &str {
        match self {
            ArtifactKind::Aggregate => "bin",
            ArtifactKind::Stats | ArtifactKind::Edges => "json",
            ArtifactKind::Figure => "png",
            ArtifactKind::Custom { ext, .. } => ext,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stem())
    }
}

/// Resolved locations for one aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    aggregate: String,
    products_dir: PathBuf,
    logs_dir: PathBuf,
    label: String,
    binary_files: Vec<PathBuf>,
}

impl ArtifactPaths {
    /// Resolve paths using the document's `parity` as group label
    pub fn resolve(aggregate: &Aggregate) -> Result<Self, PathError> {
        Self::resolve_with_label(aggregate, PARITY)
    }

    /// Resolve paths using an arbitrary document field as group label
    pub fn resolve_with_label(aggregate: &Aggregate, label_field: &str) -> Result<Self, PathError> {
        let label = shared_field(aggregate, label_field)?;
        Self::resolve_labelled(aggregate, label)
    }

    /// Resolve paths with a label chosen by the caller
    pub fn resolve_labelled(
        aggregate: &Aggregate,
        label: impl Into<String>,
    ) -> Result<Self, PathError> {
        let binary_files = aggregate
            .members()
            .iter()
            .map(|job| {
                job.doc
                    .get_str(BINARY_FILE)
                    .map(PathBuf::from)
                    .ok_or_else(|| PathError::MissingField {
                        job: job.id.clone(),
                        field: BINARY_FILE.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            aggregate: aggregate.key().to_string(),
            products_dir: PathBuf::from(shared_field(aggregate, PRODUCTS_DIR)?),
            logs_dir: PathBuf::from(shared_field(aggregate, LOGS_DIR)?),
            label: label.into(),
            binary_files,
        })
    }

    /// The products directory shared by every member, without requiring a label
    pub fn products_dir_of(aggregate: &Aggregate) -> Result<PathBuf, PathError> {
        shared_field(aggregate, PRODUCTS_DIR).map(PathBuf::from)
    }

    pub fn aggregate(&self) -> &str {
        &self.aggregate
    }

    pub fn products_dir(&self) -> &Path {
        &self.products_dir
    }

    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Raw recordings of the members, in member order
    pub fn binary_files(&self) -> &[PathBuf] {
        &self.binary_files
    }

    pub fn artifact(&self, kind: &ArtifactKind) -> PathBuf {
        self.products_dir
            .join(format!("{}_of_{}.{}", kind.stem(), self.label, kind.ext()))
    }

    pub fn log_file(&self, operation: &str) -> PathBuf {
        self.logs_dir
            .join(format!("{}_{}.log", operation, self.label))
    }

    /// Key identifying the file namespace this aggregate writes into
    pub fn namespace(&self) -> (&Path, &str) {
        (&self.products_dir, &self.label)
    }
}

/// Value of `field` that every member of `aggregate` agrees on
fn shared_field(aggregate: &Aggregate, field: &str) -> Result<String, PathError> {
    let mut shared: Option<String> = None;
    for job in aggregate.members() {
        let value = job
            .doc
            .get(field)
            .map(|v| match v.as_str() {
                Some(s) => s.to_string(),
                None => v.to_string(),
            })
            .ok_or_else(|| PathError::MissingField {
                job: job.id.clone(),
                field: field.to_string(),
            })?;
        match &shared {
            None => shared = Some(value),
            Some(first) if *first != value => {
                return Err(PathError::HeterogeneousAggregate {
                    aggregate: aggregate.key().to_string(),
                    field: field.to_string(),
                    first: first.clone(),
                    other: value,
                });
            }
            Some(_) => {}
        }
    }
    // Aggregates are never empty
    shared.ok_or_else(|| PathError::HeterogeneousAggregate {
        aggregate: aggregate.key().to_string(),
        field: field.to_string(),
        first: String::new(),
        other: String::new(),
    })
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
