//! API routes.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{analyze, find_moment, health, resolve_clip};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let api_routes = Router::new()
        .route("/analyze", post(analyze))
        .route("/find-moment", post(find_moment))
        .route("/resolve-clip", post(resolve_clip));

    let mut router = Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health));

    if let Some(handle) = metrics_handle {
        router = router.route(
            "/metrics",
            get(move || {
                let handle = handle.clone();
                async move { handle.render() }
            }),
        );
    }

    let cors = cors_layer(&state.config.cors_origins);
    let body_limit = RequestBodyLimitLayer::new(state.config.max_body_size);

    router
        .layer(
            ServiceBuilder::new()
                .layer(body_limit)
                .layer(cors)
                .layer(middleware::from_fn(request_id))
                .layer(middleware::from_fn(request_logging))
                .layer(middleware::from_fn(metrics_middleware)),
        )
        .with_state(state)
}
