/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Ticket and released-ticket snapshot endpoints.
//!
//! Tickets feed the deploy auditor: a version is approved when an approved
//! ticket lists it. Both collections are searchable with PostgreSQL full
//! text search.

use crate::api::v1::middleware::AuthPayload;
use crate::api::v1::{api_error, require_admin, ApiError};
use crate::api::AppState;
use crate::dal::DAL;
use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shiptrack_models::models::released_tickets::{NewReleasedTicket, ReleasedTicket};
use shiptrack_models::models::tickets::{NewTicket, Ticket};
use shiptrack_utils::logging::prelude::*;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_SEARCH_LIMIT: i64 = 20;
pub const MAX_SEARCH_LIMIT: i64 = 100;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tickets/search", get(search_tickets))
        .route("/tickets/:key", put(put_ticket))
        .route("/released-tickets/search", get(search_released_tickets))
        .route("/released-tickets/:key", put(put_released_ticket))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Free-text query.
    pub q: Option<String>,
    /// Maximum results (default 20, at most 100).
    pub limit: Option<i64>,
}

impl SearchQuery {
    fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT)
    }

    fn terms(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TicketRequest {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub versions: Vec<String>,
    /// When the tracker emitted the ticket event. Defaults to the time of receipt.
    pub event_created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReleasedTicketRequest {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub versions: Vec<String>,
    /// Deploys the ticket shipped in, as free-form JSON objects.
    #[serde(default)]
    pub deploys: Vec<serde_json::Value>,
    pub released_at: Option<DateTime<Utc>>,
}

#[utoipa::path(
    put,
    path = "/api/v1/tickets/{key}",
    tag = "tickets",
    params(("key" = String, Path, description = "Ticket key")),
    request_body = TicketRequest,
    responses(
        (status = 200, description = "Ticket stored", body = Ticket),
        (status = 400, description = "Invalid ticket"),
        (status = 401, description = "Invalid PAK"),
        (status = 403, description = "Admin access required"),
        (status = 500, description = "Internal server error"),
    ),
    security(("pak" = []))
)]
pub(crate) async fn put_ticket(
    State(dal): State<DAL>,
    Extension(auth_payload): Extension<AuthPayload>,
    Path(key): Path<String>,
    Json(request): Json<TicketRequest>,
) -> Result<Json<Ticket>, ApiError> {
    require_admin(&auth_payload, "update a ticket")?;

    let ticket = NewTicket::new(
        key,
        request.summary,
        request.description,
        request.status,
        request.approved_at,
        request.versions,
        request.event_created_at.unwrap_or_else(Utc::now),
    )
    .map_err(|e| api_error(StatusCode::BAD_REQUEST, &e))?;

    match dal.tickets().upsert(&ticket) {
        Ok(stored) => {
            info!("Stored ticket {} ({})", stored.key, stored.status);
            Ok(Json(stored))
        }
        Err(e) => {
            error!("Failed to store ticket {}: {:?}", ticket.key, e);
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store ticket"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/tickets/search",
    tag = "tickets",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching tickets, best first", body = Vec<Ticket>),
        (status = 401, description = "Invalid PAK"),
        (status = 500, description = "Internal server error"),
    ),
    security(("pak" = []))
)]
pub(crate) async fn search_tickets(
    State(dal): State<DAL>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    let Some(terms) = query.terms() else {
        return Ok(Json(Vec::new()));
    };

    dal.tickets()
        .search(terms, query.limit())
        .map(Json)
        .map_err(|e| {
            error!("Ticket search for '{}' failed: {:?}", terms, e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to search tickets")
        })
}

#[utoipa::path(
    put,
    path = "/api/v1/released-tickets/{key}",
    tag = "tickets",
    params(("key" = String, Path, description = "Ticket key")),
    request_body = ReleasedTicketRequest,
    responses(
        (status = 200, description = "Released ticket stored", body = ReleasedTicket),
        (status = 400, description = "Invalid released ticket"),
        (status = 401, description = "Invalid PAK"),
        (status = 403, description = "Admin access required"),
        (status = 500, description = "Internal server error"),
    ),
    security(("pak" = []))
)]
pub(crate) async fn put_released_ticket(
    State(dal): State<DAL>,
    Extension(auth_payload): Extension<AuthPayload>,
    Path(key): Path<String>,
    Json(request): Json<ReleasedTicketRequest>,
) -> Result<Json<ReleasedTicket>, ApiError> {
    require_admin(&auth_payload, "update a released ticket")?;

    let ticket = NewReleasedTicket::new(
        key,
        request.summary,
        request.description,
        request.versions,
        request.deploys,
        request.released_at,
    )
    .map_err(|e| api_error(StatusCode::BAD_REQUEST, &e))?;

    dal.released_tickets()
        .upsert(&ticket)
        .map(Json)
        .map_err(|e| {
            error!("Failed to store released ticket {}: {:?}", ticket.key, e);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to store released ticket",
            )
        })
}

#[utoipa::path(
    get,
    path = "/api/v1/released-tickets/search",
    tag = "tickets",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching released tickets, best first", body = Vec<ReleasedTicket>),
        (status = 401, description = "Invalid PAK"),
        (status = 500, description = "Internal server error"),
    ),
    security(("pak" = []))
)]
pub(crate) async fn search_released_tickets(
    State(dal): State<DAL>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ReleasedTicket>>, ApiError> {
    let Some(terms) = query.terms() else {
        return Ok(Json(Vec::new()));
    };

    dal.released_tickets()
        .search(terms, query.limit())
        .map(Json)
        .map_err(|e| {
            error!("Released ticket search for '{}' failed: {:?}", terms, e);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to search released tickets",
            )
        })
}
