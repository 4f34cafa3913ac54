// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run reports and status tables

use recflow_core::OpStatus;
use serde::Serialize;
use std::fmt;

/// How processing of one aggregate ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Every targeted operation is done
    Done,
    /// The next targeted operation waits on an unfinished dependency
    Blocked { operation: String },
    /// An operation ran but its postcondition still does not hold
    ActionFailed { operation: String, reason: String },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Done => write!(f, "done"),
            Outcome::Blocked { operation } => write!(f, "blocked on {}", operation),
            Outcome::ActionFailed { operation, reason } => {
                write!(f, "{} failed: {}", operation, reason)
            }
        }
    }
}

/// Result of one pass over one aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateReport {
    pub aggregate: String,
    /// Operations attempted this pass, in order
    pub executed: Vec<String>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Result of running one operation group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub group: String,
    /// Ordered by aggregate key
    pub aggregates: Vec<AggregateReport>,
}

impl RunReport {
    /// Whether every targeted (operation, aggregate) pair ended done
    pub fn all_done(&self) -> bool {
        self.aggregates.iter().all(|a| a.outcome == Outcome::Done)
    }

    /// Number of actions run across all aggregates
    pub fn executed(&self) -> usize {
        self.aggregates.iter().map(|a| a.executed.len()).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &AggregateReport> {
        self.aggregates
            .iter()
            .filter(|a| a.outcome != Outcome::Done)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.aggregates.is_empty() {
            return writeln!(f, "{}: no aggregates", self.group);
        }
        for a in &self.aggregates {
            let ran = if a.executed.is_empty() {
                "nothing to do".to_string()
            } else {
                format!("ran {}", a.executed.join(", "))
            };
            writeln!(f, "{:<20} {:<40} {}", a.aggregate, ran, a.outcome)?;
        }
        let done = self.aggregates.len() - self.failures().count();
        write!(
            f,
            "{}: {}/{} aggregates done, {} actions run",
            self.group,
            done,
            self.aggregates.len(),
            self.executed()
        )
    }
}

/// Status of every operation of a group on every aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusTable {
    pub group: String,
    /// Column order
    pub operations: Vec<String>,
    pub rows: Vec<StatusRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub aggregate: String,
    /// One entry per operation, in column order
    pub statuses: Vec<OpStatus>,
}

impl StatusTable {
    pub fn status(&self, aggregate: &str, operation: &str) -> Option<OpStatus> {
        let column = self.operations.iter().position(|o| o == operation)?;
        self.rows
            .iter()
            .find(|r| r.aggregate == aggregate)
            .and_then(|r| r.statuses.get(column).copied())
    }

    pub fn all_done(&self) -> bool {
        self.rows
            .iter()
            .all(|r| r.statuses.iter().all(|s| *s == OpStatus::Done))
    }
}

impl fmt::Display for StatusTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self
            .rows
            .iter()
            .map(|r| r.aggregate.len())
            .chain(["AGGREGATE".len()])
            .max()
            .unwrap_or(0);
        let widths: Vec<usize> = self.operations.iter().map(|o| o.len().max(7)).collect();

        write!(f, "{:<first$}", "AGGREGATE")?;
        for (op, width) in self.operations.iter().zip(&widths) {
            write!(f, "  {:<width$}", op.to_uppercase())?;
        }
        for row in &self.rows {
            writeln!(f)?;
            write!(f, "{:<first$}", row.aggregate)?;
            for (status, width) in row.statuses.iter().zip(&widths) {
                write!(f, "  {:<width$}", status.to_string())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
