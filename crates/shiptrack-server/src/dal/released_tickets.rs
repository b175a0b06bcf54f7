/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for ReleasedTicket operations.

use crate::dal::{DalError, DAL};
use chrono::Utc;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};
use shiptrack_models::models::released_tickets::{NewReleasedTicket, ReleasedTicket};
use shiptrack_models::schema::released_tickets;

/// Data Access Layer for ReleasedTicket operations.
pub struct ReleasedTicketsDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl ReleasedTicketsDAL<'_> {
    /// Inserts a released ticket or replaces the one with the same key.
    pub fn upsert(&self, ticket: &NewReleasedTicket) -> Result<ReleasedTicket, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(diesel::insert_into(released_tickets::table)
            .values(ticket)
            .on_conflict(released_tickets::key)
            .do_update()
            .set((ticket, released_tickets::updated_at.eq(Utc::now())))
            .returning(ReleasedTicket::as_returning())
            .get_result(conn)?)
    }

    /// Full text search over summary and description.
    ///
    /// Ranked by `ts_rank`, most recently released first among equal ranks.
    pub fn search(&self, query: &str, limit: i64) -> Result<Vec<ReleasedTicket>, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(diesel::sql_query(
            "SELECT * FROM released_tickets \
             WHERE to_tsvector('english', summary || ' ' || description) @@ plainto_tsquery('english', $1) \
             ORDER BY ts_rank(to_tsvector('english', summary || ' ' || description), plainto_tsquery('english', $1)) DESC, \
                      released_at DESC NULLS LAST \
             LIMIT $2",
        )
        .bind::<Text, _>(query)
        .bind::<BigInt, _>(limit)
        .load(conn)?)
    }
}
