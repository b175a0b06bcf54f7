/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::api::v1::middleware::AuthPayload;
use crate::api::v1::{api_error, require_admin, ApiError};
use crate::api::AppState;
use crate::dal::DAL;
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use shiptrack_models::models::event_counts::{EventCount, NewEventCount};
use shiptrack_utils::logging::prelude::*;
use utoipa::ToSchema;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/event-counts", get(list_event_counts))
        .route("/event-counts/:snapshot_name", put(put_event_count))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EventCountRequest {
    /// Id of the last event folded into the snapshot.
    pub event_id: i64,
}

#[utoipa::path(
    get,
    path = "/api/v1/event-counts",
    tag = "event-counts",
    responses(
        (status = 200, description = "Snapshot watermarks", body = Vec<EventCount>),
        (status = 401, description = "Invalid PAK"),
        (status = 500, description = "Internal server error"),
    ),
    security(("pak" = []))
)]
pub(crate) async fn list_event_counts(
    State(dal): State<DAL>,
) -> Result<Json<Vec<EventCount>>, ApiError> {
    dal.event_counts().list().map(Json).map_err(|e| {
        error!("Failed to fetch event counts: {:?}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch event counts")
    })
}

#[utoipa::path(
    put,
    path = "/api/v1/event-counts/{snapshot_name}",
    tag = "event-counts",
    params(("snapshot_name" = String, Path, description = "Snapshot name")),
    request_body = EventCountRequest,
    responses(
        (status = 200, description = "Watermark stored", body = EventCount),
        (status = 400, description = "Invalid watermark"),
        (status = 401, description = "Invalid PAK"),
        (status = 403, description = "Admin access required"),
        (status = 500, description = "Internal server error"),
    ),
    security(("pak" = []))
)]
pub(crate) async fn put_event_count(
    State(dal): State<DAL>,
    Extension(auth_payload): Extension<AuthPayload>,
    Path(snapshot_name): Path<String>,
    Json(request): Json<EventCountRequest>,
) -> Result<Json<EventCount>, ApiError> {
    require_admin(&auth_payload, "update an event count")?;

    let count = NewEventCount::new(snapshot_name, request.event_id)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, &e))?;

    match dal.event_counts().set(&count) {
        Ok(stored) => {
            debug!("Snapshot {} now at event {}", stored.snapshot_name, stored.event_id);
            Ok(Json(stored))
        }
        Err(e) => {
            error!("Failed to store event count {}: {:?}", count.snapshot_name, e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to store event count",
            ))
        }
    }
}
