/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for Ticket operations.
//!
//! Tickets are written by the issue tracker snapshot and read by the deploy
//! auditor, which only needs to know whether an approved ticket covers a
//! version.

use crate::dal::{DalError, DAL};
use chrono::Utc;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};
use shiptrack_models::models::tickets::{NewTicket, Ticket};
use shiptrack_models::schema::tickets;

/// Data Access Layer for Ticket operations.
pub struct TicketsDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl TicketsDAL<'_> {
    /// Inserts a ticket or replaces the one with the same key.
    pub fn upsert(&self, ticket: &NewTicket) -> Result<Ticket, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(diesel::insert_into(tickets::table)
            .values(ticket)
            .on_conflict(tickets::key)
            .do_update()
            .set((ticket, tickets::updated_at.eq(Utc::now())))
            .returning(Ticket::as_returning())
            .get_result(conn)?)
    }

    /// Gets a ticket by key.
    pub fn get(&self, key: &str) -> Result<Option<Ticket>, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(tickets::table
            .filter(tickets::key.eq(key))
            .select(Ticket::as_select())
            .first(conn)
            .optional()?)
    }

    /// Whether any approved ticket lists `version`.
    pub fn is_version_approved(&self, version: &str) -> Result<bool, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(diesel::select(exists(
            tickets::table
                .filter(tickets::approved_at.is_not_null())
                .filter(tickets::versions.contains(vec![Some(version.to_string())])),
        ))
        .get_result(conn)?)
    }

    /// Full text search over summary and description, best matches first.
    pub fn search(&self, query: &str, limit: i64) -> Result<Vec<Ticket>, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(diesel::sql_query(
            "SELECT * FROM tickets \
             WHERE to_tsvector('english', summary || ' ' || description) @@ plainto_tsquery('english', $1) \
             ORDER BY ts_rank(to_tsvector('english', summary || ' ' || description), plainto_tsquery('english', $1)) DESC, \
                      event_created_at DESC \
             LIMIT $2",
        )
        .bind::<Text, _>(query)
        .bind::<BigInt, _>(limit)
        .load(conn)?)
    }
}
