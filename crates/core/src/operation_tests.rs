// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::{recording_job, SetStore};

fn paths() -> ArtifactPaths {
    let aggregate =
        Aggregate::from_members("a-odd", vec![recording_job("a", 1), recording_job("a", 3)])
            .unwrap();
    ArtifactPaths::resolve(&aggregate).unwrap()
}

#[test]
fn outputs_postcondition_requires_every_output() {
    let op = Operation::batch("split", "splitFile", vec![ArgSpec::Artifact(ArtifactKind::Aggregate)])
        .output(ArtifactKind::Stats)
        .output(ArtifactKind::Edges);
    let paths = paths();
    let store = SetStore::default();

    assert!(!op.is_done(&paths, &store));
    store.touch(paths.artifact(&ArtifactKind::Stats));
    assert!(!op.is_done(&paths, &store));
    store.touch(paths.artifact(&ArtifactKind::Edges));
    assert!(op.is_done(&paths, &store));
}

#[test]
fn operation_without_outputs_is_never_done() {
    let op = Operation::batch("noop", "noop", Vec::new());
    assert!(!op.is_done(&paths(), &SetStore::default()));
}

#[test]
fn predicate_postcondition_overrides_outputs() {
    let op = Operation::in_process("marker", |_| Ok(()))
        .output(ArtifactKind::Figure)
        .postcondition(|paths, store| store.exists(&paths.products_dir().join("DONE")));
    let paths = paths();
    let store = SetStore::default();

    store.touch(paths.artifact(&ArtifactKind::Figure));
    assert!(!op.is_done(&paths, &store));
    store.touch(paths.products_dir().join("DONE"));
    assert!(op.is_done(&paths, &store));
}

#[test]
fn output_paths_resolve_against_aggregate() {
    let op = Operation::batch("stats", "computeStats", Vec::new()).output(ArtifactKind::Stats);
    assert_eq!(
        op.output_paths(&paths()),
        vec![PathBuf::from("data/a/products/stats_of_odd.json")]
    );
}

#[test]
fn builder_records_dependencies() {
    let op = Operation::batch("edges", "findRisingEdges", Vec::new())
        .after("stats")
        .after("aggregate");
    assert_eq!(op.after, vec!["stats".to_string(), "aggregate".to_string()]);
    assert!(!op.is_in_process());
    assert!(format!("{:?}", op).contains("batch(findRisingEdges)"));
}
