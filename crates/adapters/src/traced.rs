// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::process::{ExitReport, ProcessError, ProcessRunner};
use async_trait::async_trait;
use recflow_core::Invocation;
use tracing::Instrument;

/// Wrapper that adds tracing to any ProcessRunner
#[derive(Clone)]
pub struct TracedProcessRunner<R> {
    inner: R,
}

impl<R> TracedProcessRunner<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

#[async_trait]
impl<R: ProcessRunner> ProcessRunner for TracedProcessRunner<R> {
    async fn run(&self, invocation: &Invocation) -> Result<ExitReport, ProcessError> {
        let span = tracing::info_span!(
            "process.run",
            operation = %invocation.operation,
            aggregate = %invocation.aggregate
        );

        async {
            tracing::info!(
                command = %invocation.display_command(),
                log = %invocation.log_file.display(),
                "starting"
            );

            let start = std::time::Instant::now();
            let result = self.inner.run(invocation).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(report) if report.is_success() => tracing::info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    "process finished"
                ),
                // Exit codes are advisory; the postcondition decides
                Ok(report) => tracing::warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    code = ?report.code,
                    "process exited with failure"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "process failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
