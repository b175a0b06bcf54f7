/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for EventCount operations.
//!
//! Each snapshot keeps one watermark row; setting it overwrites the previous value.

use crate::dal::{DalError, DAL};
use chrono::Utc;
use diesel::prelude::*;
use shiptrack_models::models::event_counts::{EventCount, NewEventCount};
use shiptrack_models::schema::event_counts;

pub struct EventCountsDAL<'a> {
    pub dal: &'a DAL,
}

impl EventCountsDAL<'_> {
    pub fn list(&self) -> Result<Vec<EventCount>, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(event_counts::table
            .order(event_counts::snapshot_name.asc())
            .select(EventCount::as_select())
            .load(conn)?)
    }

    pub fn get(&self, snapshot_name: &str) -> Result<Option<EventCount>, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(event_counts::table
            .filter(event_counts::snapshot_name.eq(snapshot_name))
            .select(EventCount::as_select())
            .first(conn)
            .optional()?)
    }

    /// Stores the watermark for a snapshot.
    pub fn set(&self, count: &NewEventCount) -> Result<EventCount, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(diesel::insert_into(event_counts::table)
            .values(count)
            .on_conflict(event_counts::snapshot_name)
            .do_update()
            .set((
                event_counts::event_id.eq(count.event_id),
                event_counts::updated_at.eq(Utc::now()),
            ))
            .returning(EventCount::as_returning())
            .get_result(conn)?)
    }
}
