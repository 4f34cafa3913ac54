// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jobs: one state point plus its document

use crate::document::Document;
use crate::state_point::StatePoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a job, derived from its state point
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn of(sp: &StatePoint) -> Self {
        Self(sp.job_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A snapshot of a job taken from the store.
///
/// The state point never changes after creation. The document is a copy:
/// writes go through the store, not through this value.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub state_point: StatePoint,
    pub doc: Document,
}

impl Job {
    pub fn new(state_point: StatePoint) -> Self {
        Self {
            id: JobId::of(&state_point),
            state_point,
            doc: Document::default(),
        }
    }

    pub fn with_doc(mut self, doc: Document) -> Self {
        self.doc = doc;
        self
    }

    /// Short form used in log lines
    pub fn short_id(&self) -> &str {
        &self.id.0[..8.min(self.id.0.len())]
    }
}
