// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::recording_job;
use recflow_core::Scalar;

fn jobs() -> Vec<Job> {
    // Deliberately out of order
    let mut jobs = Vec::new();
    for session in ["b", "a"] {
        for index in [3, 1, 2, 0] {
            jobs.push(recording_job(session, index));
        }
    }
    jobs
}

#[test]
fn reference_chain_is_ordered() {
    let group = analyze_aggregates().unwrap();
    let names: Vec<&str> = group
        .graph()
        .operations()
        .iter()
        .map(|op| op.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![AGGREGATE_RECORDINGS, COMPUTE_STATS, FIND_RISING_EDGES, PLOT_SUMMARY]
    );
    assert!(group.graph().get(PLOT_SUMMARY).unwrap().is_in_process());
    assert!(!group.graph().get(COMPUTE_STATS).unwrap().is_in_process());
}

#[test]
fn analyze_aggregates_partitions_by_session_and_parity() {
    let group = analyze_aggregates().unwrap();
    let aggregates = group.aggregates(jobs()).unwrap();

    let keys: Vec<&str> = aggregates.iter().map(|a| a.key()).collect();
    assert_eq!(keys, vec!["a-even", "a-odd", "b-even", "b-odd"]);
    for aggregate in &aggregates {
        assert_eq!(aggregate.len(), 2);
    }
    let a_even: Vec<_> = aggregates[0]
        .members()
        .iter()
        .map(|j| j.state_point.get("recording_index").cloned())
        .collect();
    assert_eq!(a_even, vec![Some(Scalar::Int(0)), Some(Scalar::Int(2))]);
}

#[test]
fn clean_grouping_is_one_aggregate_per_session() {
    let aggregates = group(jobs(), &clean_grouping(), &SortBy::recording_index()).unwrap();
    let keys: Vec<&str> = aggregates.iter().map(|a| a.key()).collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert!(aggregates.iter().all(|a| a.len() == 4));
}

#[test]
fn registry_lookup() {
    let pipeline = Pipeline::reference().unwrap();
    assert_eq!(pipeline.names(), vec![ANALYZE_AGGREGATES, CLEAN]);
    assert!(pipeline.get(ANALYZE_AGGREGATES).is_some());
    assert!(pipeline.get(CLEAN).is_some());
    assert!(pipeline.get("nope").is_none());
}

#[test]
fn custom_groups_can_be_registered() {
    let graph = OperationGraph::new(vec![Operation::batch("touch", "touch", Vec::new())
        .output(ArtifactKind::Custom {
            stem: "marker".to_string(),
            ext: "txt".to_string(),
        })])
    .unwrap();
    let pipeline = Pipeline::reference()
        .unwrap()
        .with_group(OperationGroup::new("per_session", clean_grouping(), SortBy::Input, graph));

    assert_eq!(pipeline.names(), vec![ANALYZE_AGGREGATES, CLEAN, "per_session"]);
    let aggregates = pipeline.get("per_session").unwrap().aggregates(jobs()).unwrap();
    assert_eq!(aggregates.len(), 2);
}

#[test]
fn clean_group_labels_artifacts_by_session() {
    let group = clean_sessions().unwrap();
    assert_eq!(group.graph().len(), 1);
    assert!(group.graph().get(CLEAN_PRODUCTS_DIR).unwrap().is_in_process());

    let aggregates = group.aggregates(jobs()).unwrap();
    let keys: Vec<&str> = aggregates.iter().map(|a| a.key()).collect();
    assert_eq!(keys, vec!["a", "b"]);

    // Session aggregates mix parities, so only the key can name them
    assert!(analyze_aggregates().unwrap().paths(&aggregates[0]).is_err());
    let paths = group.paths(&aggregates[0]).unwrap();
    assert_eq!(paths.label(), "a");
    assert_eq!(paths.products_dir(), std::path::Path::new("recordings/a/products"));
}
