// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! DAP Backend - Service Bootstrap
//!
//! Loads settings, provisions the storage directory, and assembles the HTTP
//! service: a liveness probe, API docs, and an injected route table mounted
//! under `/api`, behind a CORS policy restricted to the frontend.
//!
//! ## Modules
//!
//! - `api` - HTTP service assembly, CORS, and the health probe (Axum)
//! - `bootstrap` - The one-shot startup sequence
//! - `config` - Settings loading from `.env` and the environment
//! - `storage` - Project root paths and storage directory provisioning
//! - `telemetry` - Tracing subscriber setup

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
pub mod telemetry;
