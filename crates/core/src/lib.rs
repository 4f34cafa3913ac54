// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! recflow-core: data model and scheduling logic for the recording pipeline
//!
//! This crate provides:
//! - State points, jobs and their documents
//! - Grouping of jobs into ordered aggregates
//! - Artifact path resolution per aggregate
//! - Operation records and the graph that decides what runs next
//!
//! Nothing here performs I/O; artifact existence is asked of an
//! [`ArtifactStore`] supplied by the caller.

pub mod aggregate;
pub mod artifact;
pub mod document;
pub mod graph;
pub mod invocation;
pub mod job;
pub mod operation;
pub mod paths;
pub mod recording;
pub mod state_point;

#[cfg(test)]
mod test_support;

pub use aggregate::{group, Aggregate, AggregateError, GroupBy, Grouping, SortBy, SortKey};
pub use artifact::ArtifactStore;
pub use document::{Document, Parity, RecordingDoc};
pub use graph::{GraphError, Next, OpStatus, OperationGraph};
pub use invocation::{batch_args, CallStyle, Invocation};
pub use job::{Job, JobId};
pub use operation::{
    Action, ActionContext, ActionError, ArgSpec, Operation, Postcondition,
};
pub use paths::{ArtifactKind, ArtifactPaths, PathError};
pub use recording::{
    is_recording_name, parse_recording_name, recording_state_point, RECORDING_INDEX, SESSION,
};
pub use state_point::{CoordinateError, CoordinateSchema, Scalar, ScalarKind, StatePoint};
