// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace control plane.
//!
//! A workspace directory holds the user's files (the data plane) and a
//! hidden `.delta/` subtree (the control plane) with one subdirectory per
//! run plus a `VERSION` file. There is deliberately no `LATEST` pointer:
//! concurrent runs never contend on a shared mutable file, and resumption
//! is always by explicit run ID. Legacy `LATEST` files are ignored.

use delta_core::id::RunId;
use delta_core::run::RunMetadata;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::metadata::{self, MetadataError};

/// Control-plane directory name.
pub const CONTROL_DIR: &str = ".delta";

/// Control-plane format version written to `VERSION`.
pub const FORMAT_VERSION: &str = "1.10";

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("workspace directory not found: {0}")]
    NotFound(PathBuf),

    #[error("run '{0}' already exists in this workspace")]
    RunExists(RunId),

    #[error("run '{0}' not found in this workspace")]
    RunNotFound(RunId),

    #[error("run ID '{0}' is not usable as a directory name")]
    UnsafeRunId(RunId),

    #[error(
        "workspace format version {found} is newer than supported {supported}; \
         upgrade the engine"
    )]
    VersionMismatch { found: String, supported: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// Handle to one workspace.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Open a workspace, creating the control plane on first use.
    ///
    /// Refuses control planes written by a newer major format version.
    pub fn open_or_init(root: &Path) -> Result<Self, WorkspaceError> {
        let root = root
            .canonicalize()
            .map_err(|_| WorkspaceError::NotFound(root.to_path_buf()))?;
        let control = root.join(CONTROL_DIR);
        std::fs::create_dir_all(&control)?;

        let version_path = control.join("VERSION");
        match std::fs::read_to_string(&version_path) {
            Ok(found) => {
                let found = found.trim().to_string();
                if major_version(&found) > major_version(FORMAT_VERSION) {
                    return Err(WorkspaceError::VersionMismatch {
                        found,
                        supported: FORMAT_VERSION.to_string(),
                    });
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                std::fs::write(&version_path, format!("{}\n", FORMAT_VERSION))?;
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn control_dir(&self) -> PathBuf {
        self.root.join(CONTROL_DIR)
    }

    pub fn run_dir(&self, id: &RunId) -> PathBuf {
        self.control_dir().join(id.as_str())
    }

    pub fn run_exists(&self, id: &RunId) -> bool {
        self.run_dir(id).is_dir()
    }

    /// Allocate a fresh engine-side run ID (`YYYYMMDD_HHMMSS_<suffix>`).
    ///
    /// The nanoid suffix makes same-second starts collision-free; the loop
    /// is a backstop for the astronomically unlucky.
    pub fn allocate_run_id(&self) -> RunId {
        loop {
            let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
            let id = RunId::new(format!("{}_{}", stamp, nanoid::nanoid!(6)));
            if !self.run_exists(&id) {
                return id;
            }
        }
    }

    /// Create the directory tree for a new run.
    ///
    /// A duplicate ID is rejected before any file is created; the existing
    /// run's journal and metadata are untouched.
    pub fn create_run_dir(&self, id: &RunId) -> Result<PathBuf, WorkspaceError> {
        if !id.is_filename_safe() {
            return Err(WorkspaceError::UnsafeRunId(id.clone()));
        }
        let run_dir = self.run_dir(id);
        if run_dir.exists() {
            return Err(WorkspaceError::RunExists(id.clone()));
        }
        std::fs::create_dir_all(run_dir.join("io").join("invocations"))?;
        std::fs::create_dir_all(run_dir.join("io").join("tool_executions"))?;
        std::fs::create_dir_all(run_dir.join("runtime_io").join("hooks"))?;
        tracing::debug!(run_id = %id, dir = %run_dir.display(), "run directory created");
        Ok(run_dir)
    }

    /// Load metadata for every run, newest first.
    ///
    /// Entries without readable metadata are skipped with a warning so one
    /// damaged run cannot hide the rest of the listing.
    pub fn list_runs(&self) -> Result<Vec<RunMetadata>, WorkspaceError> {
        let mut runs = Vec::new();
        for entry in std::fs::read_dir(self.control_dir())? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            match metadata::load_metadata(&entry.path()) {
                Ok(meta) => runs.push(meta),
                Err(e) => {
                    tracing::warn!(
                        dir = %entry.path().display(),
                        error = %e,
                        "skipping run with unreadable metadata"
                    );
                }
            }
        }
        runs.sort_by(|a, b| b.start_time_ms.cmp(&a.start_time_ms));
        Ok(runs)
    }
}

fn major_version(version: &str) -> u32 {
    version
        .split('.')
        .next()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
