// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Project root resolution and the paths derived from it.

use std::path::{Path, PathBuf};

use crate::config::{Settings, ENV_FILE_NAME};

/// Environment variable that overrides the project root.
pub const PROJECT_ROOT_ENV: &str = "DAP_PROJECT_ROOT";

/// Project root used when `DAP_PROJECT_ROOT` is unset.
pub const DEFAULT_PROJECT_ROOT: &str = env!("CARGO_MANIFEST_DIR");

/// Paths anchored at the project root.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DEFAULT_PROJECT_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Resolve the root from `DAP_PROJECT_ROOT`, falling back to the crate directory.
    pub fn from_env() -> Self {
        match std::env::var_os(PROJECT_ROOT_ENV) {
            Some(root) if !root.is_empty() => Self::new(root),
            _ => Self::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the optional env file.
    pub fn env_file(&self) -> PathBuf {
        self.root.join(ENV_FILE_NAME)
    }

    /// Storage directory for the given settings.
    ///
    /// An absolute `storage_path` replaces the root entirely.
    pub fn storage_dir(&self, settings: &Settings) -> PathBuf {
        self.root.join(&settings.storage_path)
    }
}
