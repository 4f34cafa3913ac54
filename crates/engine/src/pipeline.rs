// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation groups and the reference recording pipeline

use crate::cleaner;
use crate::figure;
use recflow_core::document::PARITY;
use recflow_core::{
    group, Aggregate, AggregateError, ArgSpec, ArtifactKind, ArtifactPaths, GraphError, GroupBy,
    Grouping, Job, Operation, OperationGraph, PathError, SortBy, SortKey,
};
use std::fmt;
use std::sync::Arc;

/// Group running the aggregate → stats → edges → figure chain
pub const ANALYZE_AGGREGATES: &str = "analyze_aggregates";
/// Group that removes every session's products
pub const CLEAN: &str = "clean";

pub const AGGREGATE_RECORDINGS: &str = "aggregate_recordings";
pub const COMPUTE_STATS: &str = "compute_stats";
pub const FIND_RISING_EDGES: &str = "find_rising_edges";
pub const PLOT_SUMMARY: &str = "plot_summary";
pub const CLEAN_PRODUCTS_DIR: &str = "clean_products_dir";

/// Source of the label in an aggregate's artifact and log file names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// Document field shared by every member
    Field(String),
    /// The aggregate key itself
    AggregateKey,
}

/// A named set of operations applied to every aggregate of one grouping
pub struct OperationGroup {
    name: String,
    grouping: Box<dyn Grouping + Send + Sync>,
    sort: Box<dyn SortKey + Send + Sync>,
    label: Label,
    graph: OperationGraph,
}

impl OperationGroup {
    pub fn new(
        name: impl Into<String>,
        grouping: impl Grouping + Send + Sync + 'static,
        sort: impl SortKey + Send + Sync + 'static,
        graph: OperationGraph,
    ) -> Self {
        Self {
            name: name.into(),
            grouping: Box::new(grouping),
            sort: Box::new(sort),
            label: Label::Field(PARITY.to_string()),
            graph,
        }
    }

    /// Name artifacts after `label` instead of the document's parity
    pub fn with_label(mut self, label: Label) -> Self {
        self.label = label;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn graph(&self) -> &OperationGraph {
        &self.graph
    }

    /// Aggregates of `jobs` under this group's grouping and ordering
    pub fn aggregates(&self, jobs: Vec<Job>) -> Result<Vec<Aggregate>, AggregateError> {
        group(jobs, self.grouping.as_ref(), self.sort.as_ref())
    }

    /// Artifact locations of one of this group's aggregates
    pub fn paths(&self, aggregate: &Aggregate) -> Result<ArtifactPaths, PathError> {
        match &self.label {
            Label::Field(field) => ArtifactPaths::resolve_with_label(aggregate, field),
            Label::AggregateKey => ArtifactPaths::resolve_labelled(aggregate, aggregate.key()),
        }
    }
}

impl fmt::Debug for OperationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationGroup")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("graph", &self.graph)
            .finish()
    }
}

/// Registry of the operation groups a project can run
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    groups: Vec<Arc<OperationGroup>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recording analysis pipeline and its cleanup group
    pub fn reference() -> Result<Self, GraphError> {
        Ok(Self::new()
            .with_group(analyze_aggregates()?)
            .with_group(clean_sessions()?))
    }

    pub fn with_group(mut self, group: OperationGroup) -> Self {
        self.groups.push(Arc::new(group));
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<OperationGroup>> {
        self.groups.iter().find(|g| g.name == name).cloned()
    }

    /// Group names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }
}

/// Grouping used by the cleaner: one aggregate per session
pub fn clean_grouping() -> GroupBy {
    GroupBy::session()
}

/// Operations of the recording analysis chain, in dependency order
pub fn analysis_operations() -> Vec<Operation> {
    vec![
        Operation::batch(
            AGGREGATE_RECORDINGS,
            "concatenateFiles",
            vec![ArgSpec::Artifact(ArtifactKind::Aggregate), ArgSpec::BinaryFiles],
        )
        .output(ArtifactKind::Aggregate),
        Operation::batch(
            COMPUTE_STATS,
            "computeStats",
            vec![
                ArgSpec::Artifact(ArtifactKind::Aggregate),
                ArgSpec::Artifact(ArtifactKind::Stats),
            ],
        )
        .after(AGGREGATE_RECORDINGS)
        .output(ArtifactKind::Stats),
        Operation::batch(
            FIND_RISING_EDGES,
            "findRisingEdges",
            vec![
                ArgSpec::Artifact(ArtifactKind::Aggregate),
                ArgSpec::Artifact(ArtifactKind::Stats),
                ArgSpec::Artifact(ArtifactKind::Edges),
            ],
        )
        .after(COMPUTE_STATS)
        .output(ArtifactKind::Edges),
        Operation::in_process(PLOT_SUMMARY, figure::plot_summary)
            .after(FIND_RISING_EDGES)
            .output(ArtifactKind::Figure),
    ]
}

/// Parity-partitioned aggregates ordered by recording index
pub fn analyze_aggregates() -> Result<OperationGroup, GraphError> {
    Ok(OperationGroup::new(
        ANALYZE_AGGREGATES,
        GroupBy::group_key(),
        SortBy::recording_index(),
        OperationGraph::new(analysis_operations())?,
    ))
}

/// One aggregate per session whose products directory gets removed.
///
/// Done once nothing is left under the products directory.
pub fn clean_sessions() -> Result<OperationGroup, GraphError> {
    let clean = Operation::in_process(CLEAN_PRODUCTS_DIR, cleaner::clean_products_dir)
        .postcondition(|paths, store| !store.exists_under(paths.products_dir()));
    Ok(OperationGroup::new(
        CLEAN,
        clean_grouping(),
        SortBy::Input,
        OperationGraph::new(vec![clean])?,
    )
    .with_label(Label::AggregateKey))
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
