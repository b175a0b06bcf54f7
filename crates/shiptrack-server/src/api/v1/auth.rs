/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Authentication endpoints.

use crate::api::v1::middleware::{AuthPayload, AuthResponse};
use crate::api::AppState;
use axum::extract::Extension;
use axum::{routing::post, Json, Router};

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/pak", post(verify_pak))
}

/// Echoes the identity the presented PAK resolves to.
#[utoipa::path(
    post,
    path = "/api/v1/auth/pak",
    tag = "auth",
    responses(
        (status = 200, description = "PAK verified successfully", body = AuthResponse),
        (status = 401, description = "Invalid PAK"),
    ),
    security(
        ("pak" = [])
    )
)]
pub(crate) async fn verify_pak(Extension(auth_payload): Extension<AuthPayload>) -> Json<AuthResponse> {
    Json(AuthResponse::from(&auth_payload))
}
