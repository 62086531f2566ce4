// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cross-origin policy for the frontend dev server.
//!
//! Origins are restricted to the frontend; methods and headers are mirrored
//! from the preflight request, which is the credential-compatible way to allow
//! all of them.

use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::Settings;

/// Second allowed origin. Independent of `FRONTEND_PORT`.
pub const LOOPBACK_ORIGIN: &str = "http://127.0.0.1:5173";

/// Origins allowed to make credentialed cross-origin requests.
pub fn allowed_origins(settings: &Settings) -> Vec<String> {
    vec![
        format!("http://localhost:{}", settings.frontend_port),
        LOOPBACK_ORIGIN.to_string(),
    ]
}

pub fn cors_layer(settings: &Settings) -> CorsLayer {
    let frontend = HeaderValue::try_from(format!("http://localhost:{}", settings.frontend_port))
        .expect("origin built from a u16 port is always a valid header value");
    let origins = [frontend, HeaderValue::from_static(LOOPBACK_ORIGIN)];

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
