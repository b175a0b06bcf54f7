/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for the single admin role row.

use crate::dal::{DalError, DAL};
use chrono::Utc;
use diesel::prelude::*;
use shiptrack_models::schema::admin_role;
use uuid::Uuid;

pub struct AdminDAL<'a> {
    pub dal: &'a DAL,
}

impl AdminDAL<'_> {
    /// The stored admin PAK hash, if an admin has been created.
    pub fn pak_hash(&self) -> Result<Option<String>, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(admin_role::table
            .select(admin_role::pak_hash)
            .first(conn)
            .optional()?)
    }

    /// Replaces the admin PAK hash, creating the admin row on first use.
    pub fn set_pak_hash(&self, pak_hash: &str) -> Result<(), DalError> {
        let conn = &mut self.dal.pool.get()?;

        conn.transaction(|conn| {
            let existing = admin_role::table
                .select(admin_role::id)
                .first::<Uuid>(conn)
                .optional()?;

            match existing {
                Some(id) => diesel::update(admin_role::table.find(id))
                    .set((
                        admin_role::pak_hash.eq(pak_hash),
                        admin_role::updated_at.eq(Utc::now()),
                    ))
                    .execute(conn),
                None => diesel::insert_into(admin_role::table)
                    .values(admin_role::pak_hash.eq(pak_hash))
                    .execute(conn),
            }
        })?;

        Ok(())
    }
}
