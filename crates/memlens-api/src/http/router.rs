//! Axum router configuration with middleware.
//!
//! Proxy routes live under `/api/`. Middleware: CORS (any origin, the
//! dashboard may be served from a dev server), request tracing.
//!
//! When the configured web directory exists, the built dashboard is served
//! from it. API routes take priority; unknown paths fall through to the
//! SPA's `index.html` for client-side routing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/mem0/memories", post(handlers::mem0::send_message))
        .route("/zep/messages", post(handlers::zep::send_message))
        .route("/compare", post(handlers::compare::compare_vendors));

    let web_dir = state.config.web_dir.clone();

    let mut router = Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if std::path::Path::new(&web_dir).is_dir() {
        let index_path = format!("{web_dir}/index.html");
        let serve_dir = ServeDir::new(&web_dir).fallback(ServeFile::new(index_path));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %web_dir, "dashboard static file serving enabled");
    }

    router
}

/// GET /health - Liveness check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
