/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # API Tokens Module
//!
//! Named credentials for machine callers such as the deploy event pipeline.
//! Only the PAK hash is stored; the key itself is shown once at creation.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Token source allowed to post deploy events.
pub const SOURCE_DEPLOY: &str = "deploy";
/// Token source for snapshot feeders (tickets, ownership, repositories).
pub const SOURCE_SNAPSHOT: &str = "snapshot";
/// Token source for metric reporters.
pub const SOURCE_METRICS: &str = "metrics";

pub const VALID_SOURCES: [&str; 3] = [SOURCE_DEPLOY, SOURCE_SNAPSHOT, SOURCE_METRICS];

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::api_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ApiToken {
    pub id: Uuid,
    pub name: String,
    pub source: String,
    #[serde(skip_serializing)]
    pub pak_hash: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::api_tokens)]
pub struct NewApiToken {
    pub name: String,
    pub source: String,
    pub pak_hash: String,
}

impl NewApiToken {
    pub fn new(name: String, source: String, pak_hash: String) -> Result<Self, String> {
        if name.trim().is_empty() {
            return Err("Token name cannot be empty".to_string());
        }
        if name.len() > 255 {
            return Err("Token name cannot exceed 255 characters".to_string());
        }
        if !VALID_SOURCES.contains(&source.as_str()) {
            return Err(format!(
                "Invalid token source. Must be one of: {}",
                VALID_SOURCES.join(", ")
            ));
        }
        if pak_hash.is_empty() {
            return Err("Token hash cannot be empty".to_string());
        }

        Ok(NewApiToken {
            name: name.trim().to_string(),
            source,
            pak_hash,
        })
    }
}
