/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Repo ownership snapshot endpoints.

use crate::api::v1::middleware::AuthPayload;
use crate::api::v1::{api_error, require_admin, ApiError};
use crate::api::AppState;
use crate::dal::DAL;
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use shiptrack_models::models::repo_ownerships::{NewRepoOwnership, RepoOwnership};
use shiptrack_utils::logging::prelude::*;
use utoipa::ToSchema;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/repo-ownerships", get(list_repo_ownerships))
        .route(
            "/repo-ownerships/:app_name",
            get(get_repo_ownership).put(put_repo_ownership),
        )
}

/// Owners and approvers for one app. Entries may hold several
/// comma-separated addresses.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RepoOwnershipRequest {
    #[serde(default)]
    pub repo_owners: Vec<String>,
    #[serde(default)]
    pub repo_approvers: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/repo-ownerships",
    tag = "repo-ownerships",
    responses(
        (status = 200, description = "All repo ownerships", body = Vec<RepoOwnership>),
        (status = 401, description = "Invalid PAK"),
        (status = 500, description = "Internal server error"),
    ),
    security(("pak" = []))
)]
pub(crate) async fn list_repo_ownerships(
    State(dal): State<DAL>,
) -> Result<Json<Vec<RepoOwnership>>, ApiError> {
    match dal.repo_ownerships().list() {
        Ok(ownerships) => Ok(Json(ownerships)),
        Err(e) => {
            error!("Failed to fetch repo ownerships: {:?}", e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch repo ownerships",
            ))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/repo-ownerships/{app_name}",
    tag = "repo-ownerships",
    params(("app_name" = String, Path, description = "Application name")),
    responses(
        (status = 200, description = "Repo ownership", body = RepoOwnership),
        (status = 401, description = "Invalid PAK"),
        (status = 404, description = "No ownership recorded for the app"),
        (status = 500, description = "Internal server error"),
    ),
    security(("pak" = []))
)]
pub(crate) async fn get_repo_ownership(
    State(dal): State<DAL>,
    Path(app_name): Path<String>,
) -> Result<Json<RepoOwnership>, ApiError> {
    match dal.repo_ownerships().get(&app_name) {
        Ok(Some(ownership)) => Ok(Json(ownership)),
        Ok(None) => Err(api_error(StatusCode::NOT_FOUND, "Repo ownership not found")),
        Err(e) => {
            error!("Failed to fetch repo ownership for {}: {:?}", app_name, e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch repo ownership",
            ))
        }
    }
}

/// Creates or replaces the ownership of an app.
///
/// Invalid addresses yield 422 with `{"errors": {field: [messages]}}`.
#[utoipa::path(
    put,
    path = "/api/v1/repo-ownerships/{app_name}",
    tag = "repo-ownerships",
    params(("app_name" = String, Path, description = "Application name")),
    request_body = RepoOwnershipRequest,
    responses(
        (status = 200, description = "Repo ownership stored", body = RepoOwnership),
        (status = 401, description = "Invalid PAK"),
        (status = 403, description = "Admin access required"),
        (status = 422, description = "Validation failed", body = shiptrack_models::validation::ValidationErrors),
        (status = 500, description = "Internal server error"),
    ),
    security(("pak" = []))
)]
pub(crate) async fn put_repo_ownership(
    State(dal): State<DAL>,
    Extension(auth_payload): Extension<AuthPayload>,
    Path(app_name): Path<String>,
    Json(request): Json<RepoOwnershipRequest>,
) -> Result<Json<RepoOwnership>, ApiError> {
    require_admin(&auth_payload, "update repo ownership")?;

    let ownership = NewRepoOwnership::new(app_name, request.repo_owners, request.repo_approvers)
        .map_err(|errors| {
            info!("Rejected repo ownership: {}", errors);
            let body = serde_json::to_value(&errors).unwrap_or_default();
            (StatusCode::UNPROCESSABLE_ENTITY, Json(body))
        })?;

    match dal.repo_ownerships().upsert(&ownership) {
        Ok(stored) => {
            info!("Stored repo ownership for {}", stored.app_name);
            Ok(Json(stored))
        }
        Err(e) => {
            error!("Failed to store repo ownership for {}: {:?}", ownership.app_name, e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to store repo ownership",
            ))
        }
    }
}
