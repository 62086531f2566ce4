// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{io, path::PathBuf};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Fatal errors raised while bootstrapping the service.
///
/// None of these are retried: each one means the operator has to fix the
/// environment before the process can serve requests.
#[derive(Debug, Error)]
pub enum StartupError {
    /// A required setting is absent from the env file and the process environment.
    #[error("missing required setting `{name}`")]
    MissingSetting { name: &'static str },

    /// A setting is present but cannot be parsed into its field type.
    #[error("invalid value {value:?} for setting `{name}`: {reason}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// The env file exists but could not be read or parsed.
    #[error("failed to read env file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// The storage directory could not be created or is not writable.
    #[error("failed to provision storage directory {path}: {source}")]
    StorageProvisioning {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Fallback for paths that match neither the bootstrap routes nor the mounted table.
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}
