/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for GitRepositoryLocation operations.

use crate::dal::{DalError, DAL};
use chrono::Utc;
use diesel::prelude::*;
use shiptrack_models::models::git_repository_locations::{
    GitRepositoryLocation, NewGitRepositoryLocation,
};
use shiptrack_models::schema::git_repository_locations;

pub struct GitRepositoryLocationsDAL<'a> {
    pub dal: &'a DAL,
}

impl GitRepositoryLocationsDAL<'_> {
    /// Inserts a location or replaces the one with the same name.
    pub fn upsert(
        &self,
        location: &NewGitRepositoryLocation,
    ) -> Result<GitRepositoryLocation, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(diesel::insert_into(git_repository_locations::table)
            .values(location)
            .on_conflict(git_repository_locations::name)
            .do_update()
            .set((location, git_repository_locations::updated_at.eq(Utc::now())))
            .returning(GitRepositoryLocation::as_returning())
            .get_result(conn)?)
    }

    pub fn get(&self, name: &str) -> Result<Option<GitRepositoryLocation>, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(git_repository_locations::table
            .filter(git_repository_locations::name.eq(name))
            .select(GitRepositoryLocation::as_select())
            .first(conn)
            .optional()?)
    }

    pub fn list(&self) -> Result<Vec<GitRepositoryLocation>, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(git_repository_locations::table
            .order(git_repository_locations::name.asc())
            .select(GitRepositoryLocation::as_select())
            .load(conn)?)
    }
}
