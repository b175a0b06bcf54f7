/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Released Tickets Module
//!
//! Tickets whose versions have reached production, kept as a search-indexed
//! read model for the releases page. `deploys` holds a JSON array describing
//! the deploys that shipped the ticket.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Represents a released ticket record in the database.
#[derive(
    Queryable, QueryableByName, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize, ToSchema,
)]
#[diesel(table_name = crate::schema::released_tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReleasedTicket {
    pub id: i64,
    pub key: String,
    pub summary: String,
    pub description: String,
    pub versions: Vec<Option<String>>,
    pub deploys: String,
    pub released_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReleasedTicket {
    /// Decodes the stored deploys list; malformed JSON yields an empty list.
    pub fn deploys(&self) -> Vec<serde_json::Value> {
        serde_json::from_str(&self.deploys).unwrap_or_default()
    }
}

/// Represents a released ticket to be inserted or upserted by key.
#[derive(Insertable, AsChangeset, Debug, Clone, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::released_tickets)]
#[diesel(treat_none_as_null = true)]
pub struct NewReleasedTicket {
    pub key: String,
    pub summary: String,
    pub description: String,
    pub versions: Vec<Option<String>>,
    pub deploys: String,
    pub released_at: Option<DateTime<Utc>>,
}

impl NewReleasedTicket {
    pub fn new(
        key: String,
        summary: String,
        description: String,
        versions: Vec<String>,
        deploys: Vec<serde_json::Value>,
        released_at: Option<DateTime<Utc>>,
    ) -> Result<Self, String> {
        if key.trim().is_empty() {
            return Err("Released ticket key cannot be empty".to_string());
        }
        let deploys = serde_json::to_string(&deploys)
            .map_err(|e| format!("Failed to encode deploys: {}", e))?;

        Ok(NewReleasedTicket {
            key: key.trim().to_string(),
            summary,
            description,
            versions: versions.into_iter().map(Some).collect(),
            deploys,
            released_at,
        })
    }
}
