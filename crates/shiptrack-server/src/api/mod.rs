/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # API Routes Aggregator Module
//!
//! Builds the application router: the versioned API under `/api/v1`, the
//! health check and metrics endpoints, the OpenAPI document and the cross-cutting
//! layers (request counting and CORS).

pub mod cors;
pub mod v1;

use crate::dal::DAL;
use crate::metrics::MetricsCollector;
use crate::utils::pak::PakService;
use axum::{
    body::Body,
    extract::{FromRef, Request, State},
    http::{header, StatusCode},
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use shiptrack_utils::config::{Alerts, Cors};
use shiptrack_utils::logging::prelude::*;
use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub dal: DAL,
    pub pak: Arc<PakService>,
    pub metrics: Arc<MetricsCollector>,
    pub alerts: Arc<Alerts>,
}

impl FromRef<AppState> for DAL {
    fn from_ref(state: &AppState) -> Self {
        state.dal.clone()
    }
}

impl FromRef<AppState> for Arc<MetricsCollector> {
    fn from_ref(state: &AppState) -> Self {
        state.metrics.clone()
    }
}

/// Configures the main application router.
///
/// The returned router still needs its state: `.with_state(state)`.
pub fn configure_api_routes(state: AppState, cors: &Cors) -> Router<AppState> {
    Router::new()
        .nest("/api/v1", v1::routes(state.clone()))
        .merge(v1::openapi::configure_openapi())
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .layer(from_fn_with_state(state, track_requests))
        .layer(cors::cors_layer(cors))
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn readyz() -> impl IntoResponse {
    (StatusCode::OK, "Ready")
}

/// Renders the collector in the Prometheus text exposition format.
async fn metrics(State(collector): State<Arc<MetricsCollector>>) -> Response {
    match collector.export() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to export metrics: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to export metrics").into_response()
        }
    }
}

async fn track_requests(
    State(collector): State<Arc<MetricsCollector>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let response = next.run(request).await;
    collector.record_http_request(&method, response.status().as_u16());
    response
}
