/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for ApiToken operations.

use crate::dal::{DalError, DAL};
use chrono::Utc;
use diesel::prelude::*;
use shiptrack_models::models::api_tokens::{ApiToken, NewApiToken};
use shiptrack_models::schema::api_tokens;
use uuid::Uuid;

/// Data Access Layer for ApiToken operations.
pub struct ApiTokensDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl ApiTokensDAL<'_> {
    pub fn create(&self, new_token: &NewApiToken) -> Result<ApiToken, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(diesel::insert_into(api_tokens::table)
            .values(new_token)
            .returning(ApiToken::as_returning())
            .get_result(conn)?)
    }

    /// Gets an active (not deleted) token.
    pub fn get(&self, id: Uuid) -> Result<Option<ApiToken>, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(api_tokens::table
            .find(id)
            .filter(api_tokens::deleted_at.is_null())
            .select(ApiToken::as_select())
            .first(conn)
            .optional()?)
    }

    /// Lists active tokens.
    pub fn list(&self) -> Result<Vec<ApiToken>, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(api_tokens::table
            .filter(api_tokens::deleted_at.is_null())
            .order(api_tokens::name.asc())
            .select(ApiToken::as_select())
            .load(conn)?)
    }

    pub fn update_pak_hash(&self, id: Uuid, pak_hash: String) -> Result<ApiToken, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(diesel::update(api_tokens::table.find(id))
            .set(api_tokens::pak_hash.eq(pak_hash))
            .returning(ApiToken::as_returning())
            .get_result(conn)?)
    }

    /// Soft-deletes a token. Returns the number of rows affected.
    pub fn soft_delete(&self, id: Uuid) -> Result<usize, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(diesel::update(
            api_tokens::table
                .find(id)
                .filter(api_tokens::deleted_at.is_null()),
        )
        .set(api_tokens::deleted_at.eq(Utc::now()))
        .execute(conn)?)
    }
}
