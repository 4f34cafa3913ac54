// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Driver: runs an operation group over every aggregate
//!
//! Aggregates are independent: each owns a distinct `(products_dir, label)`
//! namespace, checked before anything runs, so several may be processed at
//! once. Within one aggregate operations run strictly one after another.

use crate::error::EngineError;
use crate::executor::Executor;
use crate::pipeline::OperationGroup;
use crate::report::{AggregateReport, Outcome, RunReport, StatusRow, StatusTable};
use recflow_adapters::ProcessRunner;
use recflow_core::{Aggregate, ArtifactPaths, ArtifactStore, Job, Next, Operation};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::Instrument;

/// Runs operation groups, judging completion against `store`
pub struct Runtime<R, S> {
    executor: Executor<R>,
    store: S,
    max_parallel: usize,
}

impl<R, S> Runtime<R, S>
where
    R: ProcessRunner,
    S: ArtifactStore + Clone + 'static,
{
    /// `store` must see the artifacts the executor's actions produce
    pub fn new(executor: Executor<R>, store: S, max_parallel: usize) -> Self {
        Self {
            executor,
            store,
            max_parallel: max_parallel.max(1),
        }
    }

    pub fn executor(&self) -> &Executor<R> {
        &self.executor
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Bring every aggregate of `group` as far as one pass allows.
    ///
    /// `selection` limits the pass to the named operations; empty means all.
    pub async fn run_group(
        &self,
        group: Arc<OperationGroup>,
        jobs: Vec<Job>,
        selection: &[String],
    ) -> Result<RunReport, EngineError> {
        group.graph().check_selection(selection)?;
        let planned = plan(&group, jobs)?;
        tracing::info!(
            group = group.name(),
            aggregates = planned.len(),
            max_parallel = self.max_parallel,
            "running group"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_parallel));
        let selection: Arc<[String]> = selection.into();
        let mut tasks = JoinSet::new();
        for (slot, (aggregate, paths)) in planned.into_iter().enumerate() {
            let group = Arc::clone(&group);
            let executor = self.executor.clone();
            let store = self.store.clone();
            let selection = Arc::clone(&selection);
            let semaphore = Arc::clone(&semaphore);
            let span = tracing::info_span!("aggregate", key = %aggregate.key());
            tasks.spawn(
                async move {
                    let _permit = semaphore.acquire_owned().await;
                    let report =
                        drive(&group, &executor, &store, &selection, &aggregate, &paths).await;
                    (slot, report)
                }
                .instrument(span),
            );
        }

        let mut slots: Vec<Option<AggregateReport>> = vec![None; tasks.len()];
        while let Some(joined) = tasks.join_next().await {
            let (slot, report) = joined.map_err(|e| EngineError::Task(e.to_string()))?;
            slots[slot] = Some(report);
        }

        let report = RunReport {
            group: group.name().to_string(),
            aggregates: slots.into_iter().flatten().collect(),
        };
        tracing::info!(
            group = group.name(),
            executed = report.executed(),
            all_done = report.all_done(),
            "group finished"
        );
        Ok(report)
    }

    /// State of every operation of `group` on every aggregate
    pub fn status(&self, group: &OperationGroup, jobs: Vec<Job>) -> Result<StatusTable, EngineError> {
        let graph = group.graph();
        let rows = plan(group, jobs)?
            .into_iter()
            .map(|(aggregate, paths)| StatusRow {
                aggregate: aggregate.key().to_string(),
                statuses: graph
                    .statuses(&paths, &self.store)
                    .into_iter()
                    .map(|(_, status)| status)
                    .collect(),
            })
            .collect();

        Ok(StatusTable {
            group: group.name().to_string(),
            operations: graph.operations().iter().map(|op| op.name.clone()).collect(),
            rows,
        })
    }
}

/// Aggregates with resolved paths, failing before any action on
/// heterogeneous aggregates or on two aggregates sharing a namespace
fn plan(
    group: &OperationGroup,
    jobs: Vec<Job>,
) -> Result<Vec<(Aggregate, ArtifactPaths)>, EngineError> {
    let mut planned = Vec::new();
    let mut owners: HashMap<(PathBuf, String), String> = HashMap::new();
    for aggregate in group.aggregates(jobs)? {
        let paths = group.paths(&aggregate)?;
        let (products_dir, label) = paths.namespace();
        let key = (products_dir.to_path_buf(), label.to_string());
        if let Some(first) = owners.get(&key) {
            return Err(EngineError::PathCollision {
                first: first.clone(),
                second: aggregate.key().to_string(),
                products_dir: key.0,
                label: key.1,
            });
        }
        owners.insert(key, aggregate.key().to_string());
        planned.push((aggregate, paths));
    }
    Ok(planned)
}

/// One pass over one aggregate; every operation is attempted at most once
async fn drive<R: ProcessRunner>(
    group: &OperationGroup,
    executor: &Executor<R>,
    store: &dyn ArtifactStore,
    selection: &[String],
    aggregate: &Aggregate,
    paths: &ArtifactPaths,
) -> AggregateReport {
    let graph = group.graph();
    let mut attempted = HashSet::new();
    let mut executed = Vec::new();

    let outcome = loop {
        let op = match graph.next_within(selection, paths, store) {
            Next::Done => break Outcome::Done,
            Next::Blocked(op) => {
                tracing::info!(operation = %op.name, "blocked");
                break Outcome::Blocked {
                    operation: op.name.clone(),
                };
            }
            Next::Run(op) => op,
        };
        if !attempted.insert(op.name.clone()) {
            break Outcome::ActionFailed {
                operation: op.name.clone(),
                reason: "already attempted in this pass".to_string(),
            };
        }

        executed.push(op.name.clone());
        let result = executor.run(op, aggregate, paths).await;

        // Only the postcondition decides whether the operation happened
        if op.is_done(paths, store) {
            if let Err(e) = result {
                tracing::warn!(operation = %op.name, error = %e, "action reported failure but its outputs exist");
            }
            continue;
        }
        let reason = match result {
            Err(e) => e.to_string(),
            Ok(()) => format!(
                "postcondition not met: missing {}",
                missing_outputs(op, paths, store)
            ),
        };
        tracing::error!(operation = %op.name, reason = %reason, "operation did not complete");
        break Outcome::ActionFailed {
            operation: op.name.clone(),
            reason,
        };
    };

    AggregateReport {
        aggregate: aggregate.key().to_string(),
        executed,
        outcome,
    }
}

fn missing_outputs(op: &Operation, paths: &ArtifactPaths, store: &dyn ArtifactStore) -> String {
    let missing: Vec<String> = op
        .output_paths(paths)
        .into_iter()
        .filter(|p| !store.exists(p))
        .map(|p| p.display().to_string())
        .collect();
    if missing.is_empty() {
        "custom predicate is false".to_string()
    } else {
        missing.join(", ")
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
