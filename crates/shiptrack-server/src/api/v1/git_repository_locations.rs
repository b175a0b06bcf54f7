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
use shiptrack_models::models::git_repository_locations::{
    GitRepositoryLocation, NewGitRepositoryLocation,
};
use shiptrack_utils::logging::prelude::*;
use utoipa::ToSchema;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/git-repository-locations",
            get(list_git_repository_locations),
        )
        .route(
            "/git-repository-locations/:name",
            put(put_git_repository_location),
        )
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GitRepositoryLocationRequest {
    pub uri: String,
    pub remote_head: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/git-repository-locations",
    tag = "git-repository-locations",
    responses(
        (status = 200, description = "All repository locations", body = Vec<GitRepositoryLocation>),
        (status = 401, description = "Invalid PAK"),
        (status = 500, description = "Internal server error"),
    ),
    security(("pak" = []))
)]
pub(crate) async fn list_git_repository_locations(
    State(dal): State<DAL>,
) -> Result<Json<Vec<GitRepositoryLocation>>, ApiError> {
    dal.git_repository_locations().list().map(Json).map_err(|e| {
        error!("Failed to fetch git repository locations: {:?}", e);
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch git repository locations",
        )
    })
}

#[utoipa::path(
    put,
    path = "/api/v1/git-repository-locations/{name}",
    tag = "git-repository-locations",
    params(("name" = String, Path, description = "Application name")),
    request_body = GitRepositoryLocationRequest,
    responses(
        (status = 200, description = "Location stored", body = GitRepositoryLocation),
        (status = 400, description = "Invalid location"),
        (status = 401, description = "Invalid PAK"),
        (status = 403, description = "Admin access required"),
        (status = 500, description = "Internal server error"),
    ),
    security(("pak" = []))
)]
pub(crate) async fn put_git_repository_location(
    State(dal): State<DAL>,
    Extension(auth_payload): Extension<AuthPayload>,
    Path(name): Path<String>,
    Json(request): Json<GitRepositoryLocationRequest>,
) -> Result<Json<GitRepositoryLocation>, ApiError> {
    require_admin(&auth_payload, "update a git repository location")?;

    let location = NewGitRepositoryLocation::new(Some(name), request.uri, request.remote_head)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, &e))?;

    dal.git_repository_locations()
        .upsert(&location)
        .map(Json)
        .map_err(|e| {
            error!("Failed to store git repository location {}: {:?}", location.name, e);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to store git repository location",
            )
        })
}
