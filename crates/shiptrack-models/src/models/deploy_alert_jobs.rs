/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Deploy alert jobs.
//!
//! A job is a queued notification about an unapproved deploy. The payload is
//! a JSON-encoded [`DeployAlertPayload`]; the worker decodes it, looks up the
//! app's owners and sends the email and chat message. Failed attempts are
//! rescheduled with exponential backoff until the retry budget is spent.

use crate::models::deploys::{Deploy, DeployAttributes};
use crate::schema::deploy_alert_jobs;
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const JOB_STATUS_PENDING: &str = "pending";
pub const JOB_STATUS_SUCCESS: &str = "success";
pub const JOB_STATUS_DEAD: &str = "dead";

/// Upper bound on the delay between attempts.
pub const MAX_BACKOFF_SECONDS: i64 = 3600;

/// Delay before the next attempt once `attempts` attempts have failed.
pub fn backoff_after(attempts: i32) -> Duration {
    let exponent = attempts.clamp(0, 12) as u32;
    Duration::seconds(2_i64.pow(exponent).min(MAX_BACKOFF_SECONDS))
}

/// What a job carries: both deploys with timestamps as strings, plus the audit message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeployAlertPayload {
    pub app_name: String,
    pub server: String,
    pub region: Option<String>,
    pub message: String,
    pub deploy: DeployAttributes,
    pub previous: Option<DeployAttributes>,
}

impl DeployAlertPayload {
    pub fn new(deploy: &Deploy, previous: Option<&Deploy>, message: String) -> Self {
        DeployAlertPayload {
            app_name: deploy.app_name.clone(),
            server: deploy.server.clone(),
            region: deploy.region.clone(),
            message,
            deploy: DeployAttributes::from(deploy),
            previous: previous.map(DeployAttributes::from),
        }
    }
}

/// A deploy alert job record from the database.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = deploy_alert_jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DeployAlertJob {
    pub id: Uuid,
    /// JSON-encoded [`DeployAlertPayload`].
    pub payload: String,
    /// pending, success or dead.
    pub status: String,
    pub attempts: i32,
    pub next_attempt_at: DateTime<Utc>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl DeployAlertJob {
    pub fn decode_payload(&self) -> Result<DeployAlertPayload, serde_json::Error> {
        serde_json::from_str(&self.payload)
    }
}

/// A new deploy alert job to be inserted.
#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = deploy_alert_jobs)]
pub struct NewDeployAlertJob {
    pub payload: String,
    pub status: String,
}

impl NewDeployAlertJob {
    pub fn new(payload: &DeployAlertPayload) -> Result<Self, String> {
        let payload = serde_json::to_string(payload)
            .map_err(|e| format!("Failed to serialize alert payload: {}", e))?;
        Ok(NewDeployAlertJob {
            payload,
            status: JOB_STATUS_PENDING.to_string(),
        })
    }
}
