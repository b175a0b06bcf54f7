/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! GitHub metrics ingestion.

use crate::api::v1::{api_error, ApiError};
use crate::api::AppState;
use crate::metrics::{GithubMetricsReport, MetricsCollector};
use axum::{extract::State, http::StatusCode, routing::post, Router};
use shiptrack_utils::logging::prelude::*;
use std::sync::Arc;

pub fn routes() -> Router<AppState> {
    Router::new().route("/metrics/github", post(ingest_github_metrics))
}

/// Ingests a GitHub metrics report. Malformed reports get 400.
#[utoipa::path(
    post,
    path = "/api/v1/metrics/github",
    tag = "metrics",
    request_body = GithubMetricsReport,
    responses(
        (status = 204, description = "Report ingested"),
        (status = 400, description = "Malformed report"),
        (status = 401, description = "Invalid PAK"),
    ),
    security(("pak" = []))
)]
pub(crate) async fn ingest_github_metrics(
    State(collector): State<Arc<MetricsCollector>>,
    body: String,
) -> Result<StatusCode, ApiError> {
    match collector.ingest(&body) {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            warn!("Rejected GitHub metrics report: {}", e);
            Err(api_error(StatusCode::BAD_REQUEST, "Malformed metrics report"))
        }
    }
}
