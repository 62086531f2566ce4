// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Startup provisioning of the storage directory.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StartupError;

const PROBE_PREFIX: &str = ".write_probe";
const PROBE_DATA: &[u8] = b"dap-storage-probe";

/// The directory the service keeps its files in.
///
/// Only a provisioned `StorageDir` is handed to request handlers, so its
/// existence is guaranteed for the lifetime of the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageDir {
    path: PathBuf,
}

impl StorageDir {
    /// Create the directory (and any missing parents) and verify it is writable.
    ///
    /// Safe to call multiple times (idempotent).
    pub fn provision(path: impl Into<PathBuf>) -> Result<Self, StartupError> {
        let path = path.into();
        let fail = |source| StartupError::StorageProvisioning {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&path).map_err(fail)?;
        check_writable(&path).map_err(fail)?;

        tracing::debug!(path = %path.display(), "Storage directory ready");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write, read back, and remove a uniquely named probe file.
///
/// Existing files in `dir` are never touched.
fn check_writable(dir: &Path) -> std::io::Result<()> {
    let mut probe = tempfile::Builder::new()
        .prefix(PROBE_PREFIX)
        .tempfile_in(dir)?;
    probe.write_all(PROBE_DATA)?;
    probe.flush()?;

    let read_back = fs::read(probe.path())?;
    probe.close()?;

    if read_back != PROBE_DATA {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "storage probe read back different data",
        ));
    }
    Ok(())
}
