// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! One-shot startup sequence: provision storage, then assemble the service.
//!
//! Nothing here is retried. Any error leaves the process un-bootstrapped and
//! the caller is expected to exit.

use axum::Router;

use crate::{
    api::{self, cors::allowed_origins},
    config::Settings,
    error::StartupError,
    state::AppState,
    storage::{StorageDir, StoragePaths},
};

/// Provision the storage directory and build the service around `routes`.
///
/// `routes` is the API route table; it is nested under `/api` and receives
/// the shared [`AppState`].
pub fn bootstrap(
    paths: &StoragePaths,
    settings: Settings,
    routes: Router<AppState>,
) -> Result<Router, StartupError> {
    tracing::info!(
        env = %settings.env,
        database_url = %settings.database_url_redacted(),
        "Settings loaded"
    );

    let storage = StorageDir::provision(paths.storage_dir(&settings))?;
    tracing::info!(path = %storage.path().display(), "Storage directory provisioned");

    tracing::info!(origins = ?allowed_origins(&settings), "CORS origins configured");

    Ok(api::service(AppState::new(settings, storage), routes))
}
