// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job mutable metadata

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Document key: raw recording file
pub const BINARY_FILE: &str = "binary_file";
/// Document key: directory holding derived products for the session
pub const PRODUCTS_DIR: &str = "products_dir";
/// Document key: directory holding operation logs
pub const LOGS_DIR: &str = "logs_dir";
/// Document key: classification of the recording index
pub const PARITY: &str = "parity";
/// Document key: aggregation key, `{session}-{parity}`
pub const GROUP_KEY: &str = "group_key";

/// Mutable key/value metadata attached to a job.
///
/// Last write wins; there is no versioning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(BTreeMap<String, Value>);

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Set a value, returning whether the document changed
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let key = key.into();
        let value = value.into();
        if self.0.get(&key) == Some(&value) {
            return false;
        }
        self.0.insert(key, value);
        true
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parity classification of a recording index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    pub fn of(index: u32) -> Self {
        if index % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Parity::Even => "even",
            Parity::Odd => "odd",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "even" => Some(Parity::Even),
            "odd" => Some(Parity::Odd),
            _ => None,
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Typed view of the fields discovery writes for a recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingDoc {
    pub binary_file: PathBuf,
    pub products_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub parity: Parity,
    pub group_key: String,
}

impl RecordingDoc {
    /// Derive the document of recording `index` of `session`
    pub fn derive(
        session: &str,
        binary_file: PathBuf,
        products_dir: PathBuf,
        logs_dir: PathBuf,
        index: u32,
    ) -> Self {
        let parity = Parity::of(index);
        Self {
            binary_file,
            products_dir,
            logs_dir,
            parity,
            group_key: format!("{}-{}", session, parity),
        }
    }

    /// Entries to write into a job document
    pub fn entries(&self) -> Vec<(&'static str, Value)> {
        vec![
            (BINARY_FILE, path_value(&self.binary_file)),
            (PRODUCTS_DIR, path_value(&self.products_dir)),
            (LOGS_DIR, path_value(&self.logs_dir)),
            (PARITY, Value::from(self.parity.as_str())),
            (GROUP_KEY, Value::from(self.group_key.as_str())),
        ]
    }

    /// Read the typed view back; `Err` names the first absent or invalid key
    pub fn from_document(doc: &Document) -> Result<Self, &'static str> {
        let path = |key: &'static str| doc.get_str(key).map(PathBuf::from).ok_or(key);
        Ok(Self {
            binary_file: path(BINARY_FILE)?,
            products_dir: path(PRODUCTS_DIR)?,
            logs_dir: path(LOGS_DIR)?,
            parity: doc
                .get_str(PARITY)
                .and_then(Parity::parse)
                .ok_or(PARITY)?,
            group_key: doc.get_str(GROUP_KEY).ok_or(GROUP_KEY)?.to_string(),
        })
    }
}

fn path_value(path: &std::path::Path) -> Value {
    Value::from(path.to_string_lossy().into_owned())
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
