// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Directory
//!
//! The service keeps uploaded and generated files in a single directory under
//! the project root. It is created at startup, before the listener binds, and
//! the process refuses to serve if it cannot be created or written to.
//!
//! ## Layout
//!
//! ```text
//! <project_root>/
//!   .env          # Optional settings overrides
//!   <storage>/    # STORAGE_PATH, default "storage"
//! ```

pub mod paths;
pub mod provision;

pub use paths::StoragePaths;
pub use provision::StorageDir;
