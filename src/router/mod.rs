//! Router configuration module

use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::handlers::{add_excludes, health_check, list_excludes, notify, remove_excludes};
use crate::middleware::request_context_middleware;
use crate::openapi::ApiDoc;

/// Build the application router.
pub fn build_router(app_state: AppState) -> Router {
    let timeout = Duration::from_secs(app_state.config.request_timeout);

    // Exclusion list management and service metadata answer within the server timeout
    let bounded = Router::new()
        .route("/health", get(health_check))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route(
            "/listener/excludes",
            get(list_excludes).post(add_excludes).delete(remove_excludes),
        )
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ));

    // The webhook always answers 200, so it is bounded only by the outbound
    // client timeouts of the membership lookup and the mail relay
    Router::new()
        .route("/listener/notify", post(notify))
        .merge(bounded)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(from_fn(request_context_middleware))
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state)
}
