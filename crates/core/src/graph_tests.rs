// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::aggregate::Aggregate;
use crate::operation::ArgSpec;
use crate::paths::ArtifactKind;
use crate::test_support::{recording_job, SetStore};
use proptest::prelude::*;

fn chain() -> OperationGraph {
    OperationGraph::new(vec![
        Operation::batch(
            "aggregate_recordings",
            "concatenateFiles",
            vec![ArgSpec::Artifact(ArtifactKind::Aggregate), ArgSpec::BinaryFiles],
        )
        .output(ArtifactKind::Aggregate),
        Operation::batch("compute_stats", "computeStats", Vec::new())
            .after("aggregate_recordings")
            .output(ArtifactKind::Stats),
        Operation::batch("find_rising_edges", "findRisingEdges", Vec::new())
            .after("compute_stats")
            .output(ArtifactKind::Edges),
        Operation::in_process("plot_summary", |_| Ok(()))
            .after("find_rising_edges")
            .output(ArtifactKind::Figure),
    ])
    .unwrap()
}

fn paths() -> ArtifactPaths {
    let aggregate =
        Aggregate::from_members("a-even", vec![recording_job("a", 0), recording_job("a", 2)])
            .unwrap();
    ArtifactPaths::resolve(&aggregate).unwrap()
}

fn complete(store: &SetStore, paths: &ArtifactPaths, op: &Operation) {
    for path in op.output_paths(paths) {
        store.touch(path);
    }
}

#[test]
fn chain_resolves_one_operation_at_a_time() {
    let graph = chain();
    let paths = paths();
    let store = SetStore::default();

    let mut executed = Vec::new();
    loop {
        match graph.next(&paths, &store) {
            Next::Run(op) => {
                executed.push(op.name.clone());
                complete(&store, &paths, op);
            }
            Next::Blocked(op) => panic!("unexpected block on {}", op.name),
            Next::Done => break,
        }
    }

    assert_eq!(
        executed,
        vec![
            "aggregate_recordings",
            "compute_stats",
            "find_rising_edges",
            "plot_summary"
        ]
    );
    assert!(graph
        .statuses(&paths, &store)
        .iter()
        .all(|(_, status)| *status == OpStatus::Done));
}

#[test]
fn fresh_aggregate_statuses() {
    let graph = chain();
    let statuses = graph.statuses(&paths(), &SetStore::default());
    assert_eq!(
        statuses,
        vec![
            ("aggregate_recordings", OpStatus::Ready),
            ("compute_stats", OpStatus::Pending),
            ("find_rising_edges", OpStatus::Pending),
            ("plot_summary", OpStatus::Pending),
        ]
    );
}

#[test]
fn stray_downstream_artifact_does_not_unblock_chain() {
    let graph = chain();
    let paths = paths();
    let store = SetStore::default();
    // edges exist but stats do not
    store.touch(paths.artifact(&ArtifactKind::Aggregate));
    store.touch(paths.artifact(&ArtifactKind::Edges));

    assert_eq!(graph.next(&paths, &store).operation_name(), Some("compute_stats"));
    assert_eq!(
        graph.status("find_rising_edges", &paths, &store),
        Ok(OpStatus::Done)
    );
    assert_eq!(
        graph.status("plot_summary", &paths, &store),
        Ok(OpStatus::Ready)
    );
}

#[test]
fn selection_reports_blocked() {
    let graph = chain();
    let paths = paths();
    let store = SetStore::default();
    let selection = vec!["compute_stats".to_string()];

    let next = graph.next_within(&selection, &paths, &store);
    assert!(matches!(next, Next::Blocked(op) if op.name == "compute_stats"));

    store.touch(paths.artifact(&ArtifactKind::Aggregate));
    let next = graph.next_within(&selection, &paths, &store);
    assert!(matches!(next, Next::Run(op) if op.name == "compute_stats"));

    store.touch(paths.artifact(&ArtifactKind::Stats));
    assert!(matches!(graph.next_within(&selection, &paths, &store), Next::Done));
}

#[test]
fn empty_selection_means_everything() {
    let graph = chain();
    let next = graph.next_within(&[], &paths(), &SetStore::default());
    assert_eq!(next.operation_name(), Some("aggregate_recordings"));
}

#[test]
fn diamond_requires_every_dependency() {
    let graph = OperationGraph::new(vec![
        Operation::batch("merge", "merge", Vec::new())
            .after("left")
            .after("right")
            .output(ArtifactKind::Figure),
        Operation::batch("left", "left", Vec::new()).output(ArtifactKind::Stats),
        Operation::batch("right", "right", Vec::new()).output(ArtifactKind::Edges),
    ])
    .unwrap();
    let paths = paths();
    let store = SetStore::default();

    let order: Vec<&str> = graph.operations().iter().map(|o| o.name.as_str()).collect();
    assert_eq!(order, vec!["left", "right", "merge"]);

    store.touch(paths.artifact(&ArtifactKind::Stats));
    assert_eq!(graph.status("merge", &paths, &store), Ok(OpStatus::Pending));
    let ready: Vec<&str> = graph.ready(&paths, &store).iter().map(|o| o.name.as_str()).collect();
    assert_eq!(ready, vec!["right"]);

    store.touch(paths.artifact(&ArtifactKind::Edges));
    assert_eq!(graph.status("merge", &paths, &store), Ok(OpStatus::Ready));
}

#[test]
fn rejects_unknown_dependency() {
    let err = OperationGraph::new(vec![Operation::batch("a", "a", Vec::new())
        .after("ghost")
        .output(ArtifactKind::Stats)])
    .unwrap_err();
    assert_eq!(
        err,
        GraphError::UnknownDependency {
            operation: "a".to_string(),
            dependency: "ghost".to_string(),
        }
    );
}

#[test]
fn rejects_cycles() {
    let err = OperationGraph::new(vec![
        Operation::batch("root", "root", Vec::new()).output(ArtifactKind::Aggregate),
        Operation::batch("a", "a", Vec::new()).after("b").output(ArtifactKind::Stats),
        Operation::batch("b", "b", Vec::new()).after("a").output(ArtifactKind::Edges),
    ])
    .unwrap_err();
    assert_eq!(err, GraphError::Cycle(vec!["a".to_string(), "b".to_string()]));
}

#[test]
fn rejects_duplicates_and_missing_postconditions() {
    let dup = OperationGraph::new(vec![
        Operation::batch("a", "a", Vec::new()).output(ArtifactKind::Stats),
        Operation::batch("a", "a", Vec::new()).output(ArtifactKind::Edges),
    ]);
    assert_eq!(dup.unwrap_err(), GraphError::DuplicateOperation("a".to_string()));

    let bare = OperationGraph::new(vec![Operation::batch("a", "a", Vec::new())]);
    assert_eq!(bare.unwrap_err(), GraphError::NoPostcondition("a".to_string()));
}

#[test]
fn unknown_operation_queries() {
    let graph = chain();
    assert_eq!(
        graph.status("nope", &paths(), &SetStore::default()),
        Err(GraphError::UnknownOperation("nope".to_string()))
    );
    assert_eq!(
        graph.check_selection(&["compute_stats".to_string(), "nope".to_string()]),
        Err(GraphError::UnknownOperation("nope".to_string()))
    );
}

proptest! {
    /// Whatever subset of artifacts exists, nothing is Ready ahead of its dependency
    #[test]
    fn never_ready_before_dependency(present in proptest::collection::vec(any::<bool>(), 4)) {
        let graph = chain();
        let paths = paths();
        let store = SetStore::default();
        for (op, exists) in graph.operations().iter().zip(&present) {
            if *exists {
                complete(&store, &paths, op);
            }
        }

        for op in graph.operations() {
            let status = graph.status(&op.name, &paths, &store).unwrap();
            if status == OpStatus::Ready {
                for dep in &op.after {
                    prop_assert_eq!(graph.status(dep, &paths, &store).unwrap(), OpStatus::Done);
                }
            }
        }
        if let Next::Run(op) = graph.next(&paths, &store) {
            for dep in &op.after {
                prop_assert!(graph.get(dep).unwrap().is_done(&paths, &store));
            }
        }
    }
}
