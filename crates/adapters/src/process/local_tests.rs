// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;
use tempfile::TempDir;

fn invocation(program: &str, args: &[&str], log_file: &str) -> Invocation {
    Invocation {
        operation: "compute_stats".to_string(),
        aggregate: "a-even".to_string(),
        program: program.to_string(),
        args: args.iter().map(|a| a.to_string()).collect(),
        log_file: PathBuf::from(log_file),
        outputs: Vec::new(),
    }
}

#[tokio::test]
async fn output_lands_in_log_file() {
    let dir = TempDir::new().unwrap();
    let runner = LocalProcessRunner::with_cwd(dir.path());

    let report = runner
        .run(&invocation(
            "sh",
            &["-c", "echo to-stdout; echo to-stderr >&2"],
            "run.log",
        ))
        .await
        .unwrap();

    assert!(report.is_success());
    let log = fs::read_to_string(dir.path().join("run.log")).unwrap();
    assert!(log.contains("to-stdout"));
    assert!(log.contains("to-stderr"));
}

#[tokio::test]
async fn nonzero_exit_is_reported_not_raised() {
    let dir = TempDir::new().unwrap();
    let runner = LocalProcessRunner::with_cwd(dir.path());

    let report = runner
        .run(&invocation("sh", &["-c", "exit 3"], "fail.log"))
        .await
        .unwrap();

    assert_eq!(report, ExitReport::failure(3));
    assert!(!report.is_success());
}

#[tokio::test]
async fn arguments_are_not_shell_split() {
    let dir = TempDir::new().unwrap();
    let runner = LocalProcessRunner::with_cwd(dir.path());

    runner
        .run(&invocation(
            "sh",
            &["-c", "printf '%s|' \"$@\"", "sh", "two words", "it's"],
            "args.log",
        ))
        .await
        .unwrap();

    let log = fs::read_to_string(dir.path().join("args.log")).unwrap();
    assert_eq!(log, "two words|it's|");
}

#[tokio::test]
async fn missing_program_is_spawn_failure() {
    let dir = TempDir::new().unwrap();
    let runner = LocalProcessRunner::with_cwd(dir.path());

    let err = runner
        .run(&invocation("recflow-no-such-program", &[], "missing.log"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessError::SpawnFailed { .. }));
}

#[tokio::test]
async fn unwritable_log_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let runner = LocalProcessRunner::with_cwd(dir.path());

    let err = runner
        .run(&invocation("true", &[], "no/such/dir/x.log"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessError::LogFile { .. }));
}
