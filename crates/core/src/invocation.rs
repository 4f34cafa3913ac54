// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured requests for the external process runner

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a batch script and its arguments are passed to the program
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStyle {
    /// `program <batch_flag> "script('arg1','arg2')"`
    #[default]
    Matlab,
    /// `program script arg1 arg2`
    Argv,
}

/// One external program run.
///
/// Arguments are passed as an argv vector, never through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub operation: String,
    pub aggregate: String,
    pub program: String,
    pub args: Vec<String>,
    /// Receives the program's stdout and stderr
    pub log_file: PathBuf,
    /// Artifacts the run is expected to produce
    pub outputs: Vec<PathBuf>,
}

impl Invocation {
    /// Human readable command line for logs
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().map(|a| {
            if a.contains(char::is_whitespace) || a.is_empty() {
                format!("{:?}", a)
            } else {
                a.clone()
            }
        }));
        parts.join(" ")
    }
}

/// Builds the argument vector of a batch call
pub fn batch_args(style: CallStyle, batch_flag: &str, script: &str, args: &[String]) -> Vec<String> {
    match style {
        CallStyle::Matlab => vec![batch_flag.to_string(), matlab_call(script, args)],
        CallStyle::Argv => {
            let mut argv = Vec::with_capacity(args.len() + 1);
            argv.push(script.to_string());
            argv.extend(args.iter().cloned());
            argv
        }
    }
}

/// `script('a','b')` with single quotes doubled inside arguments
pub fn matlab_call(script: &str, args: &[String]) -> String {
    let quoted: Vec<String> = args
        .iter()
        .map(|a| format!("'{}'", a.replace('\'', "''")))
        .collect();
    format!("{}({})", script, quoted.join(","))
}

#[cfg(test)]
#[path = "invocation_tests.rs"]
mod tests;
