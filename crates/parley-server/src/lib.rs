//! Parley server library logic.

pub mod config;
pub mod relay;

use axum::{extract::Extension, routing::get, Json, Router};
use parley_responder::{KeywordResponder, Responder};
use relay::ConnectionRegistry;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Produces the reply for each inbound utterance.
    pub responder: Arc<dyn Responder>,
    /// Live relay connections.
    pub connections: ConnectionRegistry,
    /// Directory holding the browser client, if it should be served.
    pub client_dir: Option<PathBuf>,
}

impl AppState {
    /// Builds state around `responder` with no static client.
    pub fn new(responder: Arc<dyn Responder>) -> Self {
        Self {
            responder,
            connections: ConnectionRegistry::new(),
            client_dir: None,
        }
    }

    /// Serves the browser client from `dir`.
    pub fn with_client_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.client_dir = Some(dir.into());
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(KeywordResponder::default()))
    }
}

/// Health check handler.
async fn health(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "connections": state.connections.count().await,
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/ws", get(relay::ws_handler));

    let router = match state.client_dir.as_deref() {
        Some(dir) if dir.join("index.html").exists() => {
            tracing::info!(path = %dir.display(), "serving client static files");
            router.fallback_service(client_service(dir))
        }
        Some(dir) => {
            tracing::info!(
                path = %dir.display(),
                "client directory not found, skipping static file serving"
            );
            router
        }
        None => router,
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}

fn client_service(dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_check_returns_ok() {
        let response = app(AppState::default())
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(json["connections"], 0);
    }

    #[tokio::test]
    async fn unknown_route_without_client_is_not_found() {
        let response = app(AppState::default())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
