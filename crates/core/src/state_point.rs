// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State points: the immutable coordinates that identify a job

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors raised when a coordinate does not fit its schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    #[error("malformed coordinate: missing field '{0}'")]
    MissingField(String),
    #[error("malformed coordinate: unexpected field '{0}'")]
    UnexpectedField(String),
    #[error("malformed coordinate: field '{field}' should be {expected}, got {actual}")]
    WrongKind {
        field: String,
        expected: ScalarKind,
        actual: ScalarKind,
    },
    #[error("malformed coordinate: {0}")]
    Unparseable(String),
}

/// A single coordinate value
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::Int(_) => ScalarKind::Int,
            Scalar::Str(_) => ScalarKind::Str,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl From<u32> for Scalar {
    fn from(n: u32) -> Self {
        Scalar::Int(i64::from(n))
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// The kind of a scalar, used by schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Bool,
    Int,
    Str,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::Bool => write!(f, "bool"),
            ScalarKind::Int => write!(f, "integer"),
            ScalarKind::Str => write!(f, "string"),
        }
    }
}

/// Immutable mapping of named coordinate fields to scalar values.
///
/// Fields are kept sorted by name, so two state points built in a different
/// field order compare, hash and serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatePoint(BTreeMap<String, Scalar>);

impl StatePoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field assignment
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.0.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical, field-order independent encoding (compact JSON, sorted keys)
    pub fn canonical(&self) -> String {
        // BTreeMap<String, Scalar> always serializes
        serde_json::to_string(&self.0).unwrap_or_default()
    }

    /// Stable job identifier derived from the canonical encoding
    pub fn job_id(&self) -> String {
        let digest = Sha256::digest(self.canonical().as_bytes());
        let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        hex[..32].to_string()
    }
}

impl fmt::Display for StatePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// The set of fields every state point of a store must assign
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateSchema {
    fields: BTreeMap<String, ScalarKind>,
}

impl CoordinateSchema {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, ScalarKind)>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Schema of a recording: `{session: string, recording_index: integer}`
    pub fn recording() -> Self {
        Self::new([
            (crate::SESSION, ScalarKind::Str),
            (crate::RECORDING_INDEX, ScalarKind::Int),
        ])
    }

    /// Check that `sp` is a total assignment of this schema and nothing more
    pub fn validate(&self, sp: &StatePoint) -> Result<(), CoordinateError> {
        for (field, expected) in &self.fields {
            let value = sp
                .get(field)
                .ok_or_else(|| CoordinateError::MissingField(field.clone()))?;
            if value.kind() != *expected {
                return Err(CoordinateError::WrongKind {
                    field: field.clone(),
                    expected: *expected,
                    actual: value.kind(),
                });
            }
        }
        if let Some((extra, _)) = sp.fields().find(|(k, _)| !self.fields.contains_key(*k)) {
            return Err(CoordinateError::UnexpectedField(extra.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "state_point_tests.rs"]
mod tests;
