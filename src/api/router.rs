//! API router.
//!
//! Layers (outermost → innermost):
//! 1. `Cache-Control: no-store` on every response → 2. Access log → Handler

use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::error::ApiError;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router over a shared `CoreState`.
pub fn api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/message", post(endpoints::message::send))
        .route("/appointments", get(endpoints::appointments::list))
        .route("/health", get(endpoints::health::check))
        .fallback(not_found)
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::access_log::log_access))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("No such endpoint".into())
}
