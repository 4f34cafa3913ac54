// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External process runners

mod local;

pub use local::LocalProcessRunner;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeBehavior, FakeProcessRunner, ProcessCall};

use async_trait::async_trait;
use recflow_core::Invocation;
use thiserror::Error;

/// Errors from starting or supervising a process
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to start {program}: {message}")]
    SpawnFailed { program: String, message: String },
    #[error("cannot open log file {path}: {message}")]
    LogFile { path: String, message: String },
}

/// How a finished process exited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitReport {
    /// `None` when terminated by a signal
    pub code: Option<i32>,
}

impl ExitReport {
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    pub fn failure(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Adapter that runs one invocation to completion.
///
/// The exit status is informational only: whether the work happened is
/// decided by re-checking the operation's postcondition afterwards.
#[async_trait]
pub trait ProcessRunner: Clone + Send + Sync + 'static {
    async fn run(&self, invocation: &Invocation) -> Result<ExitReport, ProcessError>;
}
