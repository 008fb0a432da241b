use std::sync::Arc;
use std::time::Instant;

use axum::extract::{DefaultBodyLimit, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{Json, Router, routing::get};
use tower_http::cors::CorsLayer;

use super::dto::HealthResponse;
use super::projects::projects_router;
use crate::auth::TokenVerifier;
use crate::service::ProjectService;
use crate::store::Store;

const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub struct AppState {
    pub projects: ProjectService,
    pub verifier: TokenVerifier,
    /// Upper bound for JSON request bodies.
    pub max_body_bytes: usize,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, verifier: TokenVerifier) -> Self {
        Self {
            projects: ProjectService::new(store),
            verifier,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    #[must_use]
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "CipherStudio API is running".to_string(),
    })
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.max_body_bytes;

    Router::new()
        .route("/api/health", get(health))
        .nest("/api", projects_router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
