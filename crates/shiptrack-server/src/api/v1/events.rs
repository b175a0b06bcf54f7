/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Deploy event ingestion.
//!
//! Records the deploy, then audits it. An audit failure is logged but never
//! loses the recorded deploy.

use crate::api::v1::middleware::AuthPayload;
use crate::api::v1::{api_error, ApiError};
use crate::api::AppState;
use crate::utils::deploy_audit::{audit_recorded_deploy, AuditOutcome};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shiptrack_models::models::api_tokens::SOURCE_DEPLOY;
use shiptrack_models::models::deploys::{Deploy, NewDeploy};
use shiptrack_utils::logging::prelude::*;
use utoipa::ToSchema;
use uuid::Uuid;

pub fn routes() -> Router<AppState> {
    Router::new().route("/events/deploy", post(record_deploy))
}

/// A deploy reported by a deploy tool.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeployEvent {
    pub app_name: String,
    pub server: String,
    pub version: Option<String>,
    pub deployed_by: Option<String>,
    pub region: Option<String>,
    /// When the deploy happened. Defaults to the time of receipt.
    pub event_created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeployEventResponse {
    pub deploy: Deploy,
    /// The alert raised by the audit, if any.
    pub alert: Option<String>,
    pub alert_job_id: Option<Uuid>,
}

#[utoipa::path(
    post,
    path = "/api/v1/events/deploy",
    tag = "events",
    request_body = DeployEvent,
    responses(
        (status = 201, description = "Deploy recorded", body = DeployEventResponse),
        (status = 400, description = "Invalid deploy event"),
        (status = 401, description = "Invalid PAK"),
        (status = 403, description = "Admin or deploy token required"),
        (status = 500, description = "Internal server error"),
    ),
    security(("pak" = []))
)]
pub(crate) async fn record_deploy(
    State(state): State<AppState>,
    Extension(auth_payload): Extension<AuthPayload>,
    Json(event): Json<DeployEvent>,
) -> Result<(StatusCode, Json<DeployEventResponse>), ApiError> {
    if !auth_payload.admin && !auth_payload.is_source(SOURCE_DEPLOY) {
        warn!("Deploy event rejected for token {:?}", auth_payload.token_id);
        return Err(api_error(
            StatusCode::FORBIDDEN,
            "Admin or deploy token required",
        ));
    }

    let new_deploy = NewDeploy::new(
        event.app_name,
        event.server,
        event.version,
        event.deployed_by,
        event.region,
        event.event_created_at.unwrap_or_else(Utc::now),
    )
    .map_err(|e| api_error(StatusCode::BAD_REQUEST, &e))?;

    let deploy = state.dal.deploys().create(&new_deploy).map_err(|e| {
        error!("Failed to record deploy of {}: {:?}", new_deploy.app_name, e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to record deploy")
    })?;
    info!(
        "Recorded deploy {} of {} to {} (version {:?})",
        deploy.id, deploy.app_name, deploy.server, deploy.version
    );

    let (alert, alert_job_id) = match audit_recorded_deploy(&state.dal, &state.alerts, &deploy) {
        Ok(AuditOutcome::Alerted(job)) => {
            let message = job.decode_payload().ok().map(|payload| payload.message);
            (message, Some(job.id))
        }
        Ok(AuditOutcome::Passed) | Ok(AuditOutcome::Skipped) => (None, None),
        Err(e) => {
            error!("Failed to audit deploy {}: {}", deploy.id, e);
            (None, None)
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(DeployEventResponse {
            deploy,
            alert,
            alert_job_id,
        }),
    ))
}
