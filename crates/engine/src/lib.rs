// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! recflow execution engine: discovery, execution, driving and cleaning

mod cleaner;
pub mod config;
mod discovery;
mod error;
mod executor;
pub mod figure;
pub mod pipeline;
mod report;
mod runtime;

#[cfg(test)]
mod test_support;

pub use cleaner::Cleaner;
pub use config::{ConfigError, PipelineConfig, Project, RunnerConfig, CONFIG_FILE};
pub use discovery::{discover, DiscoveryError, DiscoveryReport, Skipped};
pub use error::EngineError;
pub use executor::{ExecuteError, Executor};
pub use pipeline::{OperationGroup, Pipeline};
pub use report::{AggregateReport, Outcome, RunReport, StatusRow, StatusTable};
pub use runtime::Runtime;
