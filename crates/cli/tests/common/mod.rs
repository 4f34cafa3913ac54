// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stand-in for the batch tool: `runner.sh <script> <args...>`.
///
/// Fails with status 3 when `$RECFLOW_FAIL` names the script.
const RUNNER_SCRIPT: &str = r#"#!/bin/sh
set -e
script="$1"
shift
echo "running $script $*"
if [ "$script" = "$RECFLOW_FAIL" ]; then
    echo "injected failure" >&2
    exit 3
fi
case "$script" in
    concatenateFiles)
        out="$1"
        shift
        cat "$@" > "$out"
        ;;
    computeStats)
        printf '{"samples": %s}' "$(wc -c < "$1")" > "$2"
        ;;
    findRisingEdges)
        printf '[1, 3]' > "$3"
        ;;
    *)
        echo "unknown script $script" >&2
        exit 2
        ;;
esac
"#;

/// A temporary project whose runner is a shell script
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let script = dir.path().join("runner.sh");
        fs::write(&script, RUNNER_SCRIPT).expect("Failed to write runner");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
            .expect("Failed to make runner executable");

        let project = Self { dir };
        project.file(
            "recflow.toml",
            &format!(
                "[runner]\nprogram = \"{}\"\ncall_style = \"argv\"\n",
                script.display()
            ),
        );
        project
    }

    /// Project with `count` recordings in each session, each four samples long
    pub fn with_recordings(sessions: &[&str], count: u32) -> Self {
        let project = Self::new();
        for session in sessions {
            for index in 0..count {
                project.bytes(
                    &format!("recordings/{}/rec_{}.bin", session, index),
                    &[0, 255, 0, 255],
                );
            }
        }
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn file(&self, rel: &str, contents: &str) {
        self.bytes(rel, contents.as_bytes());
    }

    pub fn bytes(&self, rel: &str, contents: &[u8]) {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent");
        }
        fs::write(path, contents).expect("Failed to write file");
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.join(rel).exists()
    }

    /// `recflow` command running inside the project
    pub fn recflow(&self) -> Command {
        let mut cmd = Command::cargo_bin("recflow").expect("recflow binary");
        cmd.current_dir(self.path())
            .env_remove("RUST_LOG")
            .env_remove("RECFLOW_FAIL");
        cmd
    }

    /// Run `recflow init` and expect success
    pub fn init(&self) {
        self.recflow().arg("init").assert().success();
    }

    /// Document of the job whose state point is `(session, index)`
    pub fn document_path(&self, session: &str, index: u32) -> PathBuf {
        let workspace = self.join("workspace");
        for entry in fs::read_dir(&workspace).expect("Failed to read workspace") {
            let dir = entry.expect("dir entry").path();
            let sp = fs::read_to_string(dir.join("state_point.json")).unwrap_or_default();
            let sp: serde_json::Value = match serde_json::from_str(&sp) {
                Ok(sp) => sp,
                Err(_) => continue,
            };
            if sp["session"] == session && sp["recording_index"] == index {
                return dir.join("document.json");
            }
        }
        panic!("no job for {}/{}", session, index);
    }
}
