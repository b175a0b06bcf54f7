/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Tickets Module
//!
//! Snapshot of release tickets from the issue tracker. A ticket carries the
//! versions (commit identifiers) it covers; once approved, those versions are
//! authorised for release.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Represents a ticket record in the database.
#[derive(
    Queryable, QueryableByName, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize, ToSchema,
)]
#[diesel(table_name = crate::schema::tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Ticket {
    pub id: i64,
    pub key: String,
    pub summary: String,
    pub description: String,
    pub status: String,
    pub approved_at: Option<DateTime<Utc>>,
    pub versions: Vec<Option<String>>,
    pub event_created_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    pub fn is_approved(&self) -> bool {
        self.approved_at.is_some()
    }
}

/// Represents a ticket to be inserted or upserted by key.
#[derive(Insertable, AsChangeset, Debug, Clone, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::tickets)]
#[diesel(treat_none_as_null = true)]
pub struct NewTicket {
    pub key: String,
    pub summary: String,
    pub description: String,
    pub status: String,
    pub approved_at: Option<DateTime<Utc>>,
    pub versions: Vec<Option<String>>,
    pub event_created_at: DateTime<Utc>,
}

impl NewTicket {
    pub fn new(
        key: String,
        summary: String,
        description: String,
        status: String,
        approved_at: Option<DateTime<Utc>>,
        versions: Vec<String>,
        event_created_at: DateTime<Utc>,
    ) -> Result<Self, String> {
        if key.trim().is_empty() {
            return Err("Ticket key cannot be empty".to_string());
        }
        if status.trim().is_empty() {
            return Err("Ticket status cannot be empty".to_string());
        }

        Ok(NewTicket {
            key: key.trim().to_string(),
            summary,
            description,
            status,
            approved_at,
            versions: versions.into_iter().map(Some).collect(),
            event_created_at,
        })
    }
}
