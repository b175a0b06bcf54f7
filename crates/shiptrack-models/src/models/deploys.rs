/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Deploys Module
//!
//! A deploy records one application version landing on one server at a point
//! in time.
//!
//! ## Data Model
//!
//! - `id`: BIGSERIAL, insertion order; breaks ties between deploys sharing a timestamp
//! - `app_name`: VARCHAR(255), the deployed application
//! - `server`: VARCHAR(255), the server (or environment host) deployed to
//! - `version`: VARCHAR(255), the deployed version, absent when the deploy failed to report one
//! - `deployed_by`: VARCHAR(255), who ran the deploy
//! - `region`: VARCHAR(64), deployment region
//! - `event_created_at`: TIMESTAMP, when the deploy happened
//! - `created_at`: TIMESTAMP, when the record was inserted

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Represents a deploy record in the database.
#[derive(
    Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema,
)]
#[diesel(table_name = crate::schema::deploys)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[schema(example = json!({
    "id": 42,
    "app_name": "awesome_app",
    "server": "awesome-app.example.com",
    "version": "b2d1c0f",
    "deployed_by": "deployer@example.com",
    "region": "gb",
    "event_created_at": "2019-02-19T16:29:00Z",
    "created_at": "2019-02-19T16:29:05Z"
}))]
pub struct Deploy {
    pub id: i64,
    pub app_name: String,
    pub server: String,
    pub version: Option<String>,
    pub deployed_by: Option<String>,
    pub region: Option<String>,
    pub event_created_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Represents a new deploy to be inserted into the database.
#[derive(Insertable, Debug, Clone, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::deploys)]
pub struct NewDeploy {
    pub app_name: String,
    pub server: String,
    pub version: Option<String>,
    pub deployed_by: Option<String>,
    pub region: Option<String>,
    pub event_created_at: DateTime<Utc>,
}

impl NewDeploy {
    /// Creates a new `NewDeploy`.
    ///
    /// Blank optional values are stored as absent. Returns an error if
    /// `app_name` or `server` is empty.
    pub fn new(
        app_name: String,
        server: String,
        version: Option<String>,
        deployed_by: Option<String>,
        region: Option<String>,
        event_created_at: DateTime<Utc>,
    ) -> Result<Self, String> {
        let app_name = app_name.trim().to_string();
        let server = server.trim().to_string();

        if app_name.is_empty() {
            return Err("Deploy app_name cannot be empty".to_string());
        }
        if server.is_empty() {
            return Err("Deploy server cannot be empty".to_string());
        }

        Ok(NewDeploy {
            app_name,
            server,
            version: non_blank(version),
            deployed_by: non_blank(deployed_by),
            region: non_blank(region).map(|r| r.to_lowercase()),
            event_created_at,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Deploy attributes in queue-safe form: timestamps are RFC 3339 strings
/// carrying every non-zero sub-second digit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeployAttributes {
    pub id: i64,
    pub app_name: String,
    pub server: String,
    pub version: Option<String>,
    pub deployed_by: Option<String>,
    pub region: Option<String>,
    pub event_created_at: String,
}

impl From<&Deploy> for DeployAttributes {
    fn from(deploy: &Deploy) -> Self {
        DeployAttributes {
            id: deploy.id,
            app_name: deploy.app_name.clone(),
            server: deploy.server.clone(),
            version: deploy.version.clone(),
            deployed_by: deploy.deployed_by.clone(),
            region: deploy.region.clone(),
            event_created_at: deploy
                .event_created_at
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

impl DeployAttributes {
    /// Parses `event_created_at` back into a timestamp.
    pub fn deployed_at(&self) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(&self.event_created_at).map(|t| t.with_timezone(&Utc))
    }
}
