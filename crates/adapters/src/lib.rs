// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: process runners and artifact stores

pub mod artifact;
pub mod process;
pub mod traced;

pub use artifact::FsArtifactStore;
pub use process::{ExitReport, LocalProcessRunner, ProcessError, ProcessRunner};
pub use traced::TracedProcessRunner;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use artifact::FakeArtifactStore;
#[cfg(any(test, feature = "test-support"))]
pub use process::{FakeBehavior, FakeProcessRunner, ProcessCall};
