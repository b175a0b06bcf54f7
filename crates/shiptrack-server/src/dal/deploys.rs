/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for Deploy operations.
//!
//! Besides plain inserts this module answers the history questions the
//! reconciler and the auditor ask: the latest deploy per app on a server,
//! the deploy a new one replaced, and when a version first landed.

use crate::dal::{DalError, DAL};
use chrono::{DateTime, Utc};
use diesel::dsl::min;
use diesel::prelude::*;
use shiptrack_models::models::deploys::{Deploy, NewDeploy};
use shiptrack_models::reconciliation::{self, DeployStatus};
use shiptrack_models::schema::deploys;
use std::collections::HashMap;

/// Data Access Layer for Deploy operations.
pub struct DeploysDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl DeploysDAL<'_> {
    /// Records a new deploy.
    pub fn create(&self, new_deploy: &NewDeploy) -> Result<Deploy, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(diesel::insert_into(deploys::table)
            .values(new_deploy)
            .returning(Deploy::as_returning())
            .get_result(conn)?)
    }

    /// Returns the latest deploy per app on `server` at or before `at`.
    ///
    /// Latest is the largest `(event_created_at, id)` pair, chosen by
    /// `DISTINCT ON (app_name)`; rows come back ordered by `app_name`.
    pub fn latest_per_app(&self, server: &str, at: DateTime<Utc>) -> Result<Vec<Deploy>, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(deploys::table
            .filter(deploys::server.eq(server))
            .filter(deploys::event_created_at.le(at))
            .distinct_on(deploys::app_name)
            .order((
                deploys::app_name.asc(),
                deploys::event_created_at.desc(),
                deploys::id.desc(),
            ))
            .select(Deploy::as_select())
            .load(conn)?)
    }

    /// Latest deploys on `server` annotated against `expected`.
    ///
    /// # Arguments
    ///
    /// * `server` - Server to reconcile.
    /// * `expected` - Optional app_name to version mapping.
    /// * `at` - Cutoff; defaults to now.
    pub fn reconcile(
        &self,
        server: &str,
        expected: Option<&HashMap<String, String>>,
        at: Option<DateTime<Utc>>,
    ) -> Result<Vec<DeployStatus>, DalError> {
        let latest = self.latest_per_app(server, at.unwrap_or_else(Utc::now))?;
        Ok(reconciliation::annotate(latest, expected))
    }

    /// The deploy that `deploy` replaced on the same server and app.
    pub fn previous_for(&self, deploy: &Deploy) -> Result<Option<Deploy>, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(deploys::table
            .filter(deploys::server.eq(&deploy.server))
            .filter(deploys::app_name.eq(&deploy.app_name))
            .filter(
                deploys::event_created_at.lt(deploy.event_created_at).or(deploys::event_created_at
                    .eq(deploy.event_created_at)
                    .and(deploys::id.lt(deploy.id))),
            )
            .order((deploys::event_created_at.desc(), deploys::id.desc()))
            .select(Deploy::as_select())
            .first(conn)
            .optional()?)
    }

    /// When `version` was first deployed to the server and app of `before`,
    /// considering only deploys that precede `before`.
    pub fn first_deployed_at(
        &self,
        version: &str,
        before: &Deploy,
    ) -> Result<Option<DateTime<Utc>>, DalError> {
        let conn = &mut self.dal.pool.get()?;

        Ok(deploys::table
            .filter(deploys::server.eq(&before.server))
            .filter(deploys::app_name.eq(&before.app_name))
            .filter(deploys::version.eq(version))
            .filter(
                deploys::event_created_at.lt(before.event_created_at).or(deploys::event_created_at
                    .eq(before.event_created_at)
                    .and(deploys::id.lt(before.id))),
            )
            .select(min(deploys::event_created_at))
            .first(conn)?)
    }
}
