// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation graph: decides what runs next for an aggregate
//!
//! The graph holds no state of its own. Every answer is computed on demand
//! from postconditions evaluated against the artifact store, so a rerun after
//! everything finished finds nothing to do.

use crate::artifact::ArtifactStore;
use crate::operation::Operation;
use crate::paths::ArtifactPaths;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Errors in graph construction or queries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("duplicate operation: {0}")]
    DuplicateOperation(String),
    #[error("operation '{operation}' depends on unknown operation '{dependency}'")]
    UnknownDependency {
        operation: String,
        dependency: String,
    },
    #[error("dependency cycle among: {}", .0.join(", "))]
    Cycle(Vec<String>),
    #[error("operation '{0}' has neither outputs nor a postcondition predicate")]
    NoPostcondition(String),
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
}

/// State of one (operation, aggregate) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpStatus {
    /// Not done and some dependency is not done
    Pending,
    /// Not done and every dependency is done
    Ready,
    /// Postcondition holds
    Done,
}

impl fmt::Display for OpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpStatus::Pending => write!(f, "pending"),
            OpStatus::Ready => write!(f, "ready"),
            OpStatus::Done => write!(f, "done"),
        }
    }
}

/// Resolution of the next step for an aggregate
#[derive(Debug, Clone, Copy)]
pub enum Next<'a> {
    /// This operation is ready to run
    Run(&'a Operation),
    /// The first unfinished operation waits on a dependency
    Blocked(&'a Operation),
    /// Every considered operation is done
    Done,
}

impl Next<'_> {
    pub fn operation_name(&self) -> Option<&str> {
        match self {
            Next::Run(op) | Next::Blocked(op) => Some(&op.name),
            Next::Done => None,
        }
    }
}

/// A validated set of operations in evaluation order
#[derive(Debug, Clone)]
pub struct OperationGraph {
    /// Topological order, ties broken by declaration order
    operations: Vec<Operation>,
    index: HashMap<String, usize>,
}

impl OperationGraph {
    /// Validate `operations` and fix their evaluation order
    pub fn new(operations: Vec<Operation>) -> Result<Self, GraphError> {
        let mut names = HashSet::new();
        for op in &operations {
            if !names.insert(op.name.as_str()) {
                return Err(GraphError::DuplicateOperation(op.name.clone()));
            }
            if op.outputs.is_empty()
                && matches!(op.postcondition, crate::operation::Postcondition::Outputs)
            {
                return Err(GraphError::NoPostcondition(op.name.clone()));
            }
        }
        for op in &operations {
            if let Some(dep) = op.after.iter().find(|d| !names.contains(d.as_str())) {
                return Err(GraphError::UnknownDependency {
                    operation: op.name.clone(),
                    dependency: dep.clone(),
                });
            }
        }

        let order = topological_order(&operations)?;
        let mut slots: Vec<Option<Operation>> = operations.into_iter().map(Some).collect();
        let operations: Vec<Operation> = order.into_iter().filter_map(|i| slots[i].take()).collect();
        let index = operations
            .iter()
            .enumerate()
            .map(|(i, op)| (op.name.clone(), i))
            .collect();

        Ok(Self { operations, index })
    }

    /// Operations in evaluation order
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn get(&self, name: &str) -> Option<&Operation> {
        self.index.get(name).map(|&i| &self.operations[i])
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Fail on the first name that is not an operation of this graph
    pub fn check_selection(&self, selection: &[String]) -> Result<(), GraphError> {
        match selection.iter().find(|name| !self.index.contains_key(*name)) {
            Some(unknown) => Err(GraphError::UnknownOperation(unknown.clone())),
            None => Ok(()),
        }
    }

    /// Whether every dependency of `op` is done
    pub fn precondition_met(
        &self,
        op: &Operation,
        paths: &ArtifactPaths,
        store: &dyn ArtifactStore,
    ) -> bool {
        op.after.iter().all(|dep| {
            self.get(dep)
                .map(|d| d.is_done(paths, store))
                .unwrap_or(false)
        })
    }

    /// State of a single operation on one aggregate
    pub fn status(
        &self,
        name: &str,
        paths: &ArtifactPaths,
        store: &dyn ArtifactStore,
    ) -> Result<OpStatus, GraphError> {
        let op = self
            .get(name)
            .ok_or_else(|| GraphError::UnknownOperation(name.to_string()))?;
        Ok(self.status_of(op, paths, store))
    }

    /// State of every operation on one aggregate, in evaluation order
    pub fn statuses<'a>(
        &'a self,
        paths: &ArtifactPaths,
        store: &dyn ArtifactStore,
    ) -> Vec<(&'a str, OpStatus)> {
        self.operations
            .iter()
            .map(|op| (op.name.as_str(), self.status_of(op, paths, store)))
            .collect()
    }

    /// Next step over all operations
    pub fn next(&self, paths: &ArtifactPaths, store: &dyn ArtifactStore) -> Next<'_> {
        self.resolve(self.operations.iter(), paths, store)
    }

    /// Next step considering only the selected operations.
    ///
    /// Unselected operations are never scheduled, so a selected operation
    /// whose dependency is unfinished comes back as [`Next::Blocked`].
    pub fn next_within(
        &self,
        selection: &[String],
        paths: &ArtifactPaths,
        store: &dyn ArtifactStore,
    ) -> Next<'_> {
        if selection.is_empty() {
            return self.next(paths, store);
        }
        self.resolve(
            self.operations
                .iter()
                .filter(|op| selection.iter().any(|s| *s == op.name)),
            paths,
            store,
        )
    }

    /// Every operation currently ready on one aggregate
    pub fn ready(&self, paths: &ArtifactPaths, store: &dyn ArtifactStore) -> Vec<&Operation> {
        self.operations
            .iter()
            .filter(|op| self.status_of(op, paths, store) == OpStatus::Ready)
            .collect()
    }

    fn status_of(&self, op: &Operation, paths: &ArtifactPaths, store: &dyn ArtifactStore) -> OpStatus {
        if op.is_done(paths, store) {
            OpStatus::Done
        } else if self.precondition_met(op, paths, store) {
            OpStatus::Ready
        } else {
            OpStatus::Pending
        }
    }

    fn resolve<'a>(
        &'a self,
        candidates: impl Iterator<Item = &'a Operation>,
        paths: &ArtifactPaths,
        store: &dyn ArtifactStore,
    ) -> Next<'a> {
        for op in candidates {
            if op.is_done(paths, store) {
                continue;
            }
            return if self.precondition_met(op, paths, store) {
                Next::Run(op)
            } else {
                Next::Blocked(op)
            };
        }
        Next::Done
    }
}

/// Kahn's algorithm, always emitting the earliest declared ready operation
fn topological_order(operations: &[Operation]) -> Result<Vec<usize>, GraphError> {
    let position: HashMap<&str, usize> = operations
        .iter()
        .enumerate()
        .map(|(i, op)| (op.name.as_str(), i))
        .collect();

    let mut remaining: Vec<usize> = operations.iter().map(|op| op.after.len()).collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); operations.len()];
    for (i, op) in operations.iter().enumerate() {
        for dep in &op.after {
            if let Some(&d) = position.get(dep.as_str()) {
                dependents[d].push(i);
            }
        }
    }

    let mut placed = vec![false; operations.len()];
    let mut order = Vec::with_capacity(operations.len());
    while let Some(next) = (0..operations.len()).find(|&i| !placed[i] && remaining[i] == 0) {
        placed[next] = true;
        order.push(next);
        for &dependent in &dependents[next] {
            remaining[dependent] -= 1;
        }
    }

    if order.len() != operations.len() {
        let cycle = operations
            .iter()
            .enumerate()
            .filter(|(i, _)| !placed[*i])
            .map(|(_, op)| op.name.clone())
            .collect();
        return Err(GraphError::Cycle(cycle));
    }
    Ok(order)
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
