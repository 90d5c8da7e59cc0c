// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run identifier type.
//!
//! A `RunId` uniquely names a run directory within one workspace. Engine
//! allocated IDs are `YYYYMMDD_HHMMSS_<suffix>` (see
//! `delta-storage::workspace::allocate_run_id`); caller-supplied IDs are
//! accepted verbatim after a filename-safety check.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a run within its workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub String);

impl RunId {
    /// Create a RunId from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string value of this RunId.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this ID is usable as a directory name.
    ///
    /// Rejects empty strings, path separators, `.`/`..`, and leading dots
    /// (a leading dot would hide the run dir inside the control plane).
    pub fn is_filename_safe(&self) -> bool {
        !self.0.is_empty()
            && !self.0.starts_with('.')
            && !self.0.contains('/')
            && !self.0.contains('\\')
            && !self.0.contains('\0')
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RunId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RunId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for RunId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RunId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl AsRef<str> for RunId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
