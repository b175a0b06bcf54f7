/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Event Counts Module
//!
//! Per-snapshot watermark: the id of the last event a snapshot has processed.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::event_counts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EventCount {
    pub id: i64,
    pub snapshot_name: String,
    pub event_id: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::event_counts)]
pub struct NewEventCount {
    pub snapshot_name: String,
    pub event_id: i64,
}

impl NewEventCount {
    pub fn new(snapshot_name: String, event_id: i64) -> Result<Self, String> {
        if snapshot_name.trim().is_empty() {
            return Err("Snapshot name cannot be empty".to_string());
        }
        if event_id < 0 {
            return Err("Event id cannot be negative".to_string());
        }
        Ok(NewEventCount {
            snapshot_name: snapshot_name.trim().to_string(),
            event_id,
        })
    }
}
