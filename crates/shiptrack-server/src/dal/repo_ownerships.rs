/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for RepoOwnership operations.

use crate::dal::{DalError, DAL};
use chrono::Utc;
use diesel::prelude::*;
use shiptrack_models::models::repo_ownerships::{NewRepoOwnership, RepoOwnership};
use shiptrack_models::schema::repo_ownerships;

/// Data Access Layer for RepoOwnership operations.
pub struct RepoOwnershipsDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl RepoOwnershipsDAL<'_> {
    /// Inserts the ownership for an app, replacing any existing owners and approvers.
    pub fn upsert(&self, ownership: &NewRepoOwnership) -> Result<RepoOwnership, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(diesel::insert_into(repo_ownerships::table)
            .values(ownership)
            .on_conflict(repo_ownerships::app_name)
            .do_update()
            .set((ownership, repo_ownerships::updated_at.eq(Utc::now())))
            .returning(RepoOwnership::as_returning())
            .get_result(conn)?)
    }

    /// Gets the ownership record for an app.
    pub fn get(&self, app_name: &str) -> Result<Option<RepoOwnership>, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(repo_ownerships::table
            .filter(repo_ownerships::app_name.eq(app_name))
            .select(RepoOwnership::as_select())
            .first(conn)
            .optional()?)
    }

    /// Lists all ownership records ordered by app name.
    pub fn list(&self) -> Result<Vec<RepoOwnership>, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(repo_ownerships::table
            .order(repo_ownerships::app_name.asc())
            .select(RepoOwnership::as_select())
            .load(conn)?)
    }
}
