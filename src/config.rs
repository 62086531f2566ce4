// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Settings are resolved once at startup by merging, in increasing priority,
//! built-in defaults, the optional `.env` file at the project root, and the
//! live process environment. Variable names are matched case-insensitively
//! and unknown variables are ignored.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATABASE_URL` | Database connection string | Required |
//! | `STORAGE_PATH` | Storage directory, relative to the project root | `storage` |
//! | `BACKEND_PORT` | Server bind port | `8000` |
//! | `FRONTEND_PORT` | Frontend dev server port (CORS origin) | `5173` |
//! | `ENV` | Deployment tag | `dev` |
//! | `BACKEND_HOST` | Server bind address | `0.0.0.0` |
//! | `DAP_PROJECT_ROOT` | Overrides the project root | crate directory |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{collections::HashMap, path::Path, str::FromStr};

use url::Url;

use crate::error::StartupError;

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const STORAGE_PATH_ENV: &str = "STORAGE_PATH";
pub const BACKEND_PORT_ENV: &str = "BACKEND_PORT";
pub const FRONTEND_PORT_ENV: &str = "FRONTEND_PORT";
pub const ENV_NAME_ENV: &str = "ENV";
pub const BACKEND_HOST_ENV: &str = "BACKEND_HOST";

/// Name of the env file, looked up directly under the project root.
pub const ENV_FILE_NAME: &str = ".env";

pub const DEFAULT_STORAGE_PATH: &str = "storage";
pub const DEFAULT_BACKEND_PORT: u16 = 8000;
pub const DEFAULT_FRONTEND_PORT: u16 = 5173;
pub const DEFAULT_ENV_NAME: &str = "dev";
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Immutable process-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub storage_path: String,
    pub backend_port: u16,
    pub frontend_port: u16,
    pub env: String,
    pub host: String,
}

/// Variables from one source, keyed by upper-cased name.
type Vars = HashMap<String, String>;

fn normalize<I>(vars: I) -> Vars
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .map(|(key, value)| (key.to_ascii_uppercase(), value))
        .collect()
}

impl Settings {
    /// Load settings from the env file at `env_file` (if present) and the process environment.
    pub fn load(env_file: &Path) -> Result<Self, StartupError> {
        let file_vars = read_env_file(env_file)?;
        // Non-UTF-8 variables cannot name a setting; skip them rather than panic.
        let env_vars = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
        Self::from_sources(file_vars, env_vars)
    }

    /// Merge defaults, env file values, and environment values.
    ///
    /// Environment values take priority over the file.
    pub fn from_sources<F, E>(file_vars: F, env_vars: E) -> Result<Self, StartupError>
    where
        F: IntoIterator<Item = (String, String)>,
        E: IntoIterator<Item = (String, String)>,
    {
        let mut merged = normalize(file_vars);
        merged.extend(normalize(env_vars));

        let database_url = merged
            .remove(DATABASE_URL_ENV)
            .ok_or(StartupError::MissingSetting {
                name: DATABASE_URL_ENV,
            })?;

        Ok(Self {
            database_url,
            storage_path: merged
                .remove(STORAGE_PATH_ENV)
                .unwrap_or_else(|| DEFAULT_STORAGE_PATH.to_string()),
            backend_port: parse_or(&merged, BACKEND_PORT_ENV, DEFAULT_BACKEND_PORT)?,
            frontend_port: parse_or(&merged, FRONTEND_PORT_ENV, DEFAULT_FRONTEND_PORT)?,
            env: merged
                .remove(ENV_NAME_ENV)
                .unwrap_or_else(|| DEFAULT_ENV_NAME.to_string()),
            host: merged
                .remove(BACKEND_HOST_ENV)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        })
    }

    /// Address the HTTP listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.backend_port)
    }

    /// Connection string with any password masked, safe to log.
    ///
    /// Strings that do not parse as URLs are hidden entirely.
    pub fn database_url_redacted(&self) -> String {
        match Url::parse(&self.database_url) {
            Ok(mut url) => {
                if url.password().is_some() {
                    // Only fails for cannot-be-a-base URLs, which carry no password.
                    let _ = url.set_password(Some("***"));
                }
                url.to_string()
            }
            Err(_) => "<unparseable>".to_string(),
        }
    }
}

fn parse_or<T>(vars: &Vars, name: &'static str, default: T) -> Result<T, StartupError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match vars.get(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| StartupError::InvalidSetting {
                name,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

/// Read `KEY=value` pairs from an env file without touching the process environment.
///
/// A missing file yields no variables. Lines that do not parse are skipped
/// with a warning; I/O and encoding errors are fatal.
fn read_env_file(path: &Path) -> Result<Vec<(String, String)>, StartupError> {
    let to_error = |source: dotenvy::Error| StartupError::EnvFile {
        path: path.to_path_buf(),
        source,
    };

    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => return Ok(Vec::new()),
        Err(e) => return Err(to_error(e)),
    };

    let mut vars = Vec::new();
    for item in iter {
        match item {
            Ok(pair) => vars.push(pair),
            Err(dotenvy::Error::LineParse(line, index)) => {
                tracing::warn!(
                    path = %path.display(),
                    line = %line,
                    index,
                    "Skipping unparseable env file line"
                );
            }
            Err(e) => return Err(to_error(e)),
        }
    }
    Ok(vars)
}
