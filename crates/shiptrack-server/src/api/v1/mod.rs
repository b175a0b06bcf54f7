/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Version 1 of the shiptrack API.
//!
//! Every route here sits behind [`middleware::auth_middleware`]. Reads need
//! any valid key; writes need the admin key unless a handler says otherwise.

mod auth;
mod deploys;
mod event_counts;
mod events;
mod git_repository_locations;
pub mod middleware;
mod metrics;
pub mod openapi;
mod repo_ownerships;
mod tickets;

use crate::api::AppState;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::{Json, Router};
use middleware::AuthPayload;
use shiptrack_utils::logging::prelude::*;

/// Error shape returned by every v1 handler.
pub(crate) type ApiError = (StatusCode, Json<serde_json::Value>);

pub(crate) fn api_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(serde_json::json!({ "error": message })))
}

/// Rejects non-admin callers with 403.
pub(crate) fn require_admin(auth_payload: &AuthPayload, action: &str) -> Result<(), ApiError> {
    if auth_payload.admin {
        Ok(())
    } else {
        warn!("Non-admin attempt to {}", action);
        Err(api_error(StatusCode::FORBIDDEN, "Admin access required"))
    }
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(deploys::routes())
        .merge(events::routes())
        .merge(repo_ownerships::routes())
        .merge(git_repository_locations::routes())
        .merge(tickets::routes())
        .merge(event_counts::routes())
        .merge(metrics::routes())
        .layer(from_fn_with_state(state, middleware::auth_middleware))
}
