// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Aggregates: ordered groups of jobs processed as one unit
//!
//! Aggregates are views computed fresh from the job store on every call.
//! Grouping and member ordering are strategy values, so new strategies can
//! be added without touching [`group`].

use crate::document::GROUP_KEY;
use crate::job::{Job, JobId};
use crate::recording::{RECORDING_INDEX, SESSION};
use crate::state_point::Scalar;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors from grouping jobs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("job {job} has no grouping field '{field}'")]
    MissingGroupField { job: JobId, field: String },
}

/// Computes the group key of a job
pub trait Grouping {
    fn group_key(&self, job: &Job) -> Result<String, AggregateError>;
}

/// Computes the ordering key of a job within its aggregate
pub trait SortKey {
    fn sort_key(&self, job: &Job) -> Option<Scalar>;
}

/// Built-in grouping strategies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupBy {
    /// Group on a string field of the job document
    DocField(String),
    /// Group on a field of the state point
    StatePointField(String),
}

impl GroupBy {
    /// Parity-partitioned grouping on the document's `group_key`
    pub fn group_key() -> Self {
        GroupBy::DocField(GROUP_KEY.to_string())
    }

    /// Whole-session grouping, ignoring parity
    pub fn session() -> Self {
        GroupBy::StatePointField(SESSION.to_string())
    }
}

impl Grouping for GroupBy {
    fn group_key(&self, job: &Job) -> Result<String, AggregateError> {
        let missing = |field: &str| AggregateError::MissingGroupField {
            job: job.id.clone(),
            field: field.to_string(),
        };
        match self {
            GroupBy::DocField(field) => job
                .doc
                .get(field)
                .map(|v| match v.as_str() {
                    Some(s) => s.to_string(),
                    None => v.to_string(),
                })
                .ok_or_else(|| missing(field)),
            GroupBy::StatePointField(field) => job
                .state_point
                .get(field)
                .map(|v| v.to_string())
                .ok_or_else(|| missing(field)),
        }
    }
}

/// Built-in member orderings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortBy {
    /// Ascending by a state point field; jobs without it sort first
    StatePointField(String),
    /// Keep the input order
    Input,
}

impl SortBy {
    pub fn recording_index() -> Self {
        SortBy::StatePointField(RECORDING_INDEX.to_string())
    }
}

impl SortKey for SortBy {
    fn sort_key(&self, job: &Job) -> Option<Scalar> {
        match self {
            SortBy::StatePointField(field) => job.state_point.get(field).cloned(),
            SortBy::Input => None,
        }
    }
}

/// An ordered, non-empty group of jobs sharing a group key
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    key: String,
    members: Vec<Job>,
}

impl Aggregate {
    /// Build an aggregate directly; returns `None` for an empty member list
    pub fn from_members(key: impl Into<String>, members: Vec<Job>) -> Option<Self> {
        if members.is_empty() {
            return None;
        }
        Some(Self {
            key: key.into(),
            members,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn members(&self) -> &[Job] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &JobId> {
        self.members.iter().map(|j| &j.id)
    }
}

/// Partition `jobs` into aggregates.
///
/// Aggregates come back ordered by key. Members are ordered ascending by
/// `sort`; ties keep their input order.
pub fn group<G, S>(
    jobs: impl IntoIterator<Item = Job>,
    grouping: &G,
    sort: &S,
) -> Result<Vec<Aggregate>, AggregateError>
where
    G: Grouping + ?Sized,
    S: SortKey + ?Sized,
{
    let mut groups: BTreeMap<String, Vec<Job>> = BTreeMap::new();
    for job in jobs {
        let key = grouping.group_key(&job)?;
        groups.entry(key).or_default().push(job);
    }

    Ok(groups
        .into_iter()
        .filter_map(|(key, mut members)| {
            // sort_by_key is stable
            members.sort_by_key(|job| sort.sort_key(job));
            Aggregate::from_members(key, members)
        })
        .collect())
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod tests;
