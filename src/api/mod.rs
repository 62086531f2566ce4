// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{error::not_found, state::AppState};

pub mod cors;
pub mod health;

/// Prefix under which the externally owned route table is mounted.
pub const API_PREFIX: &str = "/api";

/// Build the service: liveness probe, API docs, and the injected route table
/// nested under `/api`, all behind the CORS policy.
pub fn service(state: AppState, routes: Router<AppState>) -> Router {
    let cors = cors::cors_layer(&state.settings);

    Router::new()
        .route("/health", get(health::health))
        .nest(API_PREFIX, routes)
        .fallback(not_found)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

#[derive(OpenApi)]
#[openapi(
    info(title = "DAP Backend"),
    paths(health::health),
    components(schemas(health::HealthResponse)),
    tags(
        (name = "Health", description = "Liveness probe")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Settings, storage::StorageDir};
    use axum::{
        body::{to_bytes, Body},
        extract::{Path, State},
        http::{header, Method, Request, StatusCode},
    };
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_state(temp: &TempDir, frontend_port: &str) -> AppState {
        let settings = Settings::from_sources(
            Vec::new(),
            vec![
                ("DATABASE_URL".to_string(), "postgresql://u:p@host/db".to_string()),
                ("FRONTEND_PORT".to_string(), frontend_port.to_string()),
            ],
        )
        .unwrap();
        let storage = StorageDir::provision(temp.path().join("storage")).unwrap();
        AppState::new(settings, storage)
    }

    fn app(temp: &TempDir) -> Router {
        service(test_state(temp, "5173"), Router::new())
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get_with_origin(uri: &str, origin: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn health_returns_fixed_payload() {
        let temp = TempDir::new().unwrap();
        let response = app(&temp)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            r#"{"status":"ok","service":"dap-backend"}"#
        );
    }

    #[tokio::test]
    async fn health_ignores_storage_state() {
        let temp = TempDir::new().unwrap();
        let app = app(&temp);
        std::fs::remove_dir_all(temp.path().join("storage")).unwrap();

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let temp = TempDir::new().unwrap();
        let response = app(&temp)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn cors_allows_configured_frontend_origin() {
        let temp = TempDir::new().unwrap();
        let app = service(test_state(&temp, "3000"), Router::new());

        let response = app
            .oneshot(get_with_origin("/health", "http://localhost:3000"))
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            headers
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn cors_allows_loopback_origin_regardless_of_port() {
        let temp = TempDir::new().unwrap();
        let app = service(test_state(&temp, "3000"), Router::new());

        let response = app
            .oneshot(get_with_origin("/health", "http://127.0.0.1:5173"))
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "http://127.0.0.1:5173"
        );
    }

    #[tokio::test]
    async fn cors_rejects_third_party_origin() {
        let temp = TempDir::new().unwrap();
        let response = app(&temp)
            .oneshot(get_with_origin("/health", "https://evil.example.com"))
            .await
            .unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn preflight_from_third_party_origin_gets_no_allow_origin() {
        let temp = TempDir::new().unwrap();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/datasets/1")
            .header(header::ORIGIN, "https://evil.example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
            .body(Body::empty())
            .unwrap();

        let response = app(&temp).oneshot(request).await.unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn preflight_mirrors_method_and_headers() {
        let temp = TempDir::new().unwrap();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/datasets/1")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-custom-header")
            .body(Body::empty())
            .unwrap();

        let response = app(&temp).oneshot(request).await.unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            "DELETE"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            "x-custom-header"
        );
    }

    #[tokio::test]
    async fn mounted_routes_are_served_under_api_prefix() {
        async fn dataset(Path(id): Path<u32>, State(state): State<AppState>) -> String {
            format!("{id}:{}", state.settings.env)
        }

        let temp = TempDir::new().unwrap();
        let routes = Router::new().route("/datasets/{id}", get(dataset));
        let app = service(test_state(&temp, "5173"), routes);

        let response = app
            .clone()
            .oneshot(Request::get("/api/datasets/7").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "7:dev");

        let response = app
            .oneshot(Request::get("/datasets/7").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_path_returns_json_404() {
        let temp = TempDir::new().unwrap();
        let response = app(&temp)
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, r#"{"error":"Not Found"}"#);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let temp = TempDir::new().unwrap();
        let response = app(&temp)
            .oneshot(Request::get("/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let doc: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(doc["info"]["title"], "DAP Backend");
        assert_eq!(doc["info"]["version"], "0.1.0");
        assert!(doc["paths"].get("/health").is_some());
    }
}
