/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Deploy reconciliation endpoints.

use crate::api::v1::{api_error, ApiError};
use crate::api::AppState;
use crate::dal::DAL;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shiptrack_models::reconciliation::DeployStatus;
use shiptrack_utils::logging::prelude::*;
use std::collections::HashMap;
use utoipa::{IntoParams, ToSchema};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/servers/:server/deploys", get(list_server_deploys))
        .route("/deploys/reconcile", post(reconcile_deploys))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DeploysQuery {
    /// Cutoff (RFC 3339). Defaults to now.
    pub at: Option<DateTime<Utc>>,
}

/// Body of a reconciliation request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReconcileRequest {
    pub server: String,
    /// Cutoff (RFC 3339). Defaults to now.
    pub at: Option<DateTime<Utc>>,
    /// Expected version per app name.
    pub apps: Option<HashMap<String, String>>,
}

/// Latest deploy per app on a server. `correct` is always null here.
#[utoipa::path(
    get,
    path = "/api/v1/servers/{server}/deploys",
    tag = "deploys",
    params(
        ("server" = String, Path, description = "Server identifier"),
        DeploysQuery,
    ),
    responses(
        (status = 200, description = "Latest deploy per app", body = Vec<DeployStatus>),
        (status = 401, description = "Invalid PAK"),
        (status = 500, description = "Internal server error"),
    ),
    security(("pak" = []))
)]
pub(crate) async fn list_server_deploys(
    State(dal): State<DAL>,
    Path(server): Path<String>,
    Query(query): Query<DeploysQuery>,
) -> Result<Json<Vec<DeployStatus>>, ApiError> {
    reconcile(&dal, &server, None, query.at).map(Json)
}

/// Latest deploy per app on a server, checked against expected versions.
#[utoipa::path(
    post,
    path = "/api/v1/deploys/reconcile",
    tag = "deploys",
    request_body = ReconcileRequest,
    responses(
        (status = 200, description = "Annotated latest deploy per app", body = Vec<DeployStatus>),
        (status = 400, description = "Missing server"),
        (status = 401, description = "Invalid PAK"),
        (status = 500, description = "Internal server error"),
    ),
    security(("pak" = []))
)]
pub(crate) async fn reconcile_deploys(
    State(dal): State<DAL>,
    Json(request): Json<ReconcileRequest>,
) -> Result<Json<Vec<DeployStatus>>, ApiError> {
    let server = request.server.trim();
    if server.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "server is required"));
    }
    reconcile(&dal, server, request.apps.as_ref(), request.at).map(Json)
}

fn reconcile(
    dal: &DAL,
    server: &str,
    expected: Option<&HashMap<String, String>>,
    at: Option<DateTime<Utc>>,
) -> Result<Vec<DeployStatus>, ApiError> {
    match dal.deploys().reconcile(server, expected, at) {
        Ok(statuses) => {
            debug!("Reconciled {} apps on {}", statuses.len(), server);
            Ok(statuses)
        }
        Err(e) => {
            error!("Failed to reconcile deploys on {}: {:?}", server, e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to reconcile deploys",
            ))
        }
    }
}
