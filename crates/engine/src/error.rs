// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use crate::config::ConfigError;
use crate::discovery::DiscoveryError;
use recflow_core::{AggregateError, GraphError, PathError};
use recflow_storage::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole engine command
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("unknown group '{name}' (available: {})", .available.join(", "))]
    UnknownGroup {
        name: String,
        available: Vec<String>,
    },
    #[error(
        "aggregates '{first}' and '{second}' would both write '{label}' artifacts into {}",
        .products_dir.display()
    )]
    PathCollision {
        first: String,
        second: String,
        products_dir: PathBuf,
        label: String,
    },
    #[error("cannot remove {path}: {source}")]
    Clean {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("aggregate task failed: {0}")]
    Task(String),
}
