// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording file naming
//!
//! A recording file is named `rec_<index>.<ext>`: the index is one or more
//! ASCII digits and the extension is alphanumeric with no further dots.

use crate::state_point::{CoordinateError, StatePoint};
use regex::Regex;
use std::sync::LazyLock;

/// State point field naming the recording session
pub const SESSION: &str = "session";
/// State point field naming the recording index within its session
pub const RECORDING_INDEX: &str = "recording_index";

/// Prefix shared by every recording file name
pub const RECORDING_PREFIX: &str = "rec_";

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static RECORDING_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rec_([0-9]+)\.([A-Za-z0-9]+)$").expect("constant regex pattern is valid")
});

/// Whether a file name claims to be a recording (parsing may still fail)
pub fn is_recording_name(name: &str) -> bool {
    name.starts_with(RECORDING_PREFIX)
}

/// Extract the recording index from a file name
pub fn parse_recording_name(name: &str) -> Result<u32, CoordinateError> {
    let caps = RECORDING_NAME.captures(name).ok_or_else(|| {
        CoordinateError::Unparseable(format!(
            "'{}' does not match rec_<index>.<ext>",
            name
        ))
    })?;
    caps[1].parse::<u32>().map_err(|e| {
        CoordinateError::Unparseable(format!("index of '{}' out of range: {}", name, e))
    })
}

/// State point of recording `index` in `session`
pub fn recording_state_point(session: &str, index: u32) -> StatePoint {
    StatePoint::new()
        .with(SESSION, session)
        .with(RECORDING_INDEX, index)
}

#[cfg(test)]
#[path = "recording_tests.rs"]
mod tests;
